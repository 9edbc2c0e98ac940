//! Retrieval window for the history endpoint.
//!
//! Both bounds are optional. They are rendered as whole seconds since the Unix epoch, the
//! format Slack expects for `oldest`/`latest`. Naive datetimes are interpreted as UTC.
//! No ordering check is made between the bounds: an inverted range is passed through.

use chrono::{DateTime, NaiveDateTime, Utc};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeRange {
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
}

impl TimeRange {
    pub fn new(from: Option<NaiveDateTime>, to: Option<NaiveDateTime>) -> Self {
        Self { from, to }
    }

    /// Lower bound, `"0"` when unset.
    pub fn encode_from(&self) -> String {
        match self.from {
            Some(from) => epoch_seconds(from).to_string(),
            None => "0".to_string(),
        }
    }

    /// Upper bound, the current time when unset.
    pub fn encode_to(&self) -> String {
        self.encode_to_at(Utc::now())
    }

    /// Fills an open upper bound with `now`, so every page of one retrieval shares the
    /// same `latest` value.
    pub fn pinned_at(self, now: DateTime<Utc>) -> Self {
        Self {
            to: self.to.or(Some(now.naive_utc())),
            ..self
        }
    }

    /// Like [`TimeRange::encode_to`] with an explicit "now".
    pub fn encode_to_at(&self, now: DateTime<Utc>) -> String {
        match self.to {
            Some(to) => epoch_seconds(to).to_string(),
            None => now.timestamp().to_string(),
        }
    }
}

fn epoch_seconds(instant: NaiveDateTime) -> i64 {
    instant.and_utc().timestamp()
}

use crate::prelude::{println, *};
use crate::slack::{spinner, SlackApi, SlackClient, SlackConfig};
use chrono::{NaiveDateTime, Utc};
use sleuth_core::limit::PageSize;
use sleuth_core::message::{retain_conversation, Message};
use sleuth_core::pagination::{fetch_all_with, FetchError, Page, PageFetch};
use sleuth_core::slack::{history_query, transform_history_response, ConversationsHistoryResponse};
use sleuth_core::snapshot;
use sleuth_core::time_range::TimeRange;
use std::path::{Path, PathBuf};

#[derive(Debug, clap::Args, Clone)]
#[command(after_help = "EXAMPLES:
  # Save all of January 2024 for analysis:
  sleuth history --channel C0123456789 --start 2024-01-01T00:00:00 --end 2024-02-01T00:00:00 --output january.json

  # Print everything up to now:
  sleuth history --channel C0123456789

NOTES:
  - Times are interpreted as UTC
  - Join, leave, topic and other system messages are dropped before saving")]
pub struct HistoryOptions {
    /// Channel id (see `sleuth channels`)
    #[arg(short, long)]
    pub channel: String,

    /// Oldest message time, e.g. 2024-01-31T09:00:00
    #[arg(short, long)]
    pub start: Option<NaiveDateTime>,

    /// Latest message time, defaults to now
    #[arg(short, long)]
    pub end: Option<NaiveDateTime>,

    /// Write the messages to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Messages requested per page (1-1000)
    #[arg(short, long, default_value_t = PageSize::DEFAULT)]
    pub limit: PageSize,
}

/// A channel's messages within a time window, one `conversations.history` page at a time
pub struct HistoryListing<'a, A> {
    pub api: &'a A,
    pub channel: &'a str,
    pub range: TimeRange,
    pub limit: PageSize,
}

impl<A: SlackApi> PageFetch for HistoryListing<'_, A> {
    type Item = Message;

    async fn fetch_page(&mut self, cursor: &str) -> Result<Page<Message>, FetchError> {
        let query = history_query(self.channel, &self.range, self.limit, cursor);
        let response: ConversationsHistoryResponse = self
            .api
            .call("conversations.history", &query)
            .await
            .map_err(FetchError::transport)?;

        let page = transform_history_response(response);
        log::debug!(
            "Fetched {} message(s) from {} (has_more: {})",
            page.items.len(),
            self.channel,
            page.has_more
        );
        Ok(page)
    }
}

pub async fn run(options: HistoryOptions, global: crate::Global) -> Result<()> {
    let config = SlackConfig::from_global(&global)?;
    let client = SlackClient::new(&config)?;
    let range = TimeRange::new(options.start, options.end);

    let messages =
        fetch_history_data(&client, &options.channel, range, options.limit, true).await?;

    log::info!("Fetched {} messages", messages.len());
    log::info!("Filtering out messages ...");

    let filtered = retain_conversation(messages);

    match &options.output {
        Some(path) => save_history(path, &filtered),
        None => {
            let json = snapshot::encode(&filtered).map_err(|source| Error::Snapshot {
                path: "<stdout>".to_string(),
                source,
            })?;
            println!("{}", json);
            Ok(())
        }
    }
}

/// Fetches every message of `channel` within `range`, system messages included
pub async fn fetch_history_data<A: SlackApi>(
    api: &A,
    channel: &str,
    range: TimeRange,
    limit: PageSize,
    show_progress: bool,
) -> Result<Vec<Message>> {
    let spinner = spinner(show_progress, &f!("Fetching history of {channel}..."))?;
    let mut listing = HistoryListing {
        api,
        channel,
        range: range.pinned_at(Utc::now()),
        limit,
    };

    let messages = fetch_all_with(&mut listing, |page, count| {
        spinner.set_message(f!(
            "Fetching history of {channel} (page {page}, {count} messages)..."
        ));
    })
    .await;

    spinner.finish_and_clear();

    messages.map_err(|source| {
        Error::Retrieval {
            what: "history",
            source,
        }
        .into()
    })
}

fn save_history(path: &Path, messages: &[Message]) -> Result<()> {
    snapshot::save(path, messages).map_err(|source| Error::Snapshot {
        path: path.display().to_string(),
        source,
    })?;

    let shown = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    log::info!("Saved {} messages to {}", messages.len(), shown.display());
    Ok(())
}

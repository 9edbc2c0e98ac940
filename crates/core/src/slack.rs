//! Transformation functions for Slack Web API responses
//!
//! Response bodies of `conversations.list`, `conversations.history` and `users.info`, the
//! query parameters each request carries, and the conversion of a decoded body into a
//! [`Page`] or a lookup result.

use regex::Regex;
use serde::Deserialize;

use crate::limit::{PageSize, ValidationError};
use crate::message::{Channel, Message, User};
use crate::pagination::Page;
use crate::time_range::TimeRange;
use crate::users::LookupError;

/// `users.info` error code for an unknown user id.
pub const USER_NOT_FOUND: &str = "user_not_found";

const UNKNOWN_ERROR: &str = "unknown_error";

/// Cursor metadata attached to every paged response
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ResponseMetadata {
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Response from `conversations.list`
#[derive(Debug, Deserialize, Clone)]
pub struct ConversationsListResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub channels: Option<Vec<Channel>>,
    #[serde(default)]
    pub response_metadata: Option<ResponseMetadata>,
}

/// Response from `conversations.history`
#[derive(Debug, Deserialize, Clone)]
pub struct ConversationsHistoryResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub messages: Option<Vec<Message>>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub response_metadata: Option<ResponseMetadata>,
}

/// Response from `users.info`
#[derive(Debug, Deserialize, Clone)]
pub struct UsersInfoResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

fn next_cursor(metadata: Option<ResponseMetadata>) -> Option<String> {
    metadata.and_then(|m| m.next_cursor)
}

/// Query for one page of public, non-archived channels.
pub fn channels_query(limit: PageSize, cursor: &str) -> Vec<(&'static str, String)> {
    vec![
        ("limit", limit.to_string()),
        ("exclude_archived", "true".to_string()),
        ("types", "public_channel".to_string()),
        ("cursor", cursor.to_string()),
    ]
}

/// Query for one page of a channel's history within `range`.
pub fn history_query(
    channel: &str,
    range: &TimeRange,
    limit: PageSize,
    cursor: &str,
) -> Vec<(&'static str, String)> {
    vec![
        ("channel", channel.to_string()),
        ("oldest", range.encode_from()),
        ("latest", range.encode_to()),
        ("limit", limit.to_string()),
        ("cursor", cursor.to_string()),
    ]
}

/// The channel listing reports no `has_more`; a non-blank cursor means another page.
pub fn transform_channels_response(response: ConversationsListResponse) -> Page<Channel> {
    if !response.ok {
        return Page::failed(response.error.unwrap_or_else(|| UNKNOWN_ERROR.to_string()));
    }

    Page::ok(
        response.channels.unwrap_or_default(),
        next_cursor(response.response_metadata),
    )
}

pub fn transform_history_response(response: ConversationsHistoryResponse) -> Page<Message> {
    if !response.ok {
        return Page::failed(response.error.unwrap_or_else(|| UNKNOWN_ERROR.to_string()));
    }

    Page {
        items: response.messages.unwrap_or_default(),
        ok: true,
        error: None,
        has_more: response.has_more,
        next_cursor: next_cursor(response.response_metadata),
    }
}

/// `Ok(None)` for an unknown user, an error for any other refusal.
pub fn transform_user_response(
    user_id: &str,
    response: UsersInfoResponse,
) -> Result<Option<User>, LookupError> {
    if response.ok {
        return Ok(response.user);
    }

    match response.error.as_deref() {
        Some(USER_NOT_FOUND) => Ok(None),
        error => Err(LookupError::Remote {
            user: user_id.to_string(),
            error: error.unwrap_or(UNKNOWN_ERROR).to_string(),
        }),
    }
}

/// Compiles a channel search term. The term may match anywhere in the name.
pub fn search_pattern(term: &str) -> Result<Regex, ValidationError> {
    Regex::new(term).map_err(|e| ValidationError::InvalidPattern {
        pattern: term.to_string(),
        reason: e.to_string(),
    })
}

/// Channels whose name matches `pattern`, all of them when there is none.
pub fn filter_channels<'a>(channels: &'a [Channel], pattern: Option<&Regex>) -> Vec<&'a Channel> {
    channels
        .iter()
        .filter(|c| pattern.map_or(true, |re| re.is_match(&c.name)))
        .collect()
}

//! Persisted message snapshots.
//!
//! A snapshot is a JSON array of messages in retrieval order, using the same snake_case
//! field names as the history endpoint. Decoding an encoded snapshot yields an equal
//! sequence.

use std::path::Path;

use crate::message::Message;

/// Error type for snapshot operations
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn encode(messages: &[Message]) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string_pretty(messages)?)
}

pub fn decode(json: &str) -> Result<Vec<Message>, SnapshotError> {
    Ok(serde_json::from_str(json)?)
}

pub fn save(path: &Path, messages: &[Message]) -> Result<(), SnapshotError> {
    std::fs::write(path, encode(messages)?)?;
    Ok(())
}

pub fn load(path: &Path) -> Result<Vec<Message>, SnapshotError> {
    decode(&std::fs::read_to_string(path)?)
}

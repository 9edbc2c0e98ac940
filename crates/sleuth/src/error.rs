use sleuth_core::limit::ValidationError;
use sleuth_core::pagination::FetchError;
use sleuth_core::snapshot::SnapshotError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    #[error("Error while fetching {what}: {source}")]
    Retrieval {
        what: &'static str,
        #[source]
        source: FetchError,
    },

    #[error("Invalid option: {0}")]
    Validation(#[from] ValidationError),

    #[error("Snapshot {path}: {source}")]
    Snapshot {
        path: String,
        #[source]
        source: SnapshotError,
    },

    #[error("User not found: {0}")]
    UserNotFound(String),
}

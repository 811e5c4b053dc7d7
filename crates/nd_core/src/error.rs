use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Malformed record {index}: {reason}")]
    MalformedRecord { index: usize, reason: String },

    #[error("Merge conflict: store is at version {found}, expected {expected}")]
    MergeConflict { expected: u64, found: u64 },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// True for errors a scheduler may resolve by re-running the job.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::MergeConflict { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;

//! Error types for the HoS explorer.

use hos_data::DataError;
use thiserror::Error;

/// Errors that can occur while serving a view.
#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Person not found: {0}")]
    NotFound(String),

    #[error("No person ID specified")]
    MissingId,

    #[error("Type at least {min_len} characters to search")]
    EmptyQuery { min_len: usize },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ExplorerError {
    /// Placeholder-state conditions that are shown inline rather than
    /// treated as failures.
    pub fn is_placeholder(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::MissingId | Self::EmptyQuery { .. }
        )
    }
}

/// Result type alias for explorer operations.
pub type ExplorerResult<T> = Result<T, ExplorerError>;

//! Error types for hos-data

use thiserror::Error;

use crate::store::DatasetName;

/// Errors that can occur while loading or querying datasets
#[derive(Debug, Error)]
pub enum DataError {
    /// A named dataset could not be retrieved or parsed
    #[error("Dataset unavailable: {dataset}: {reason}")]
    DatasetUnavailable { dataset: DatasetName, reason: String },

    /// Unknown dataset name
    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl DataError {
    /// Create a dataset unavailable error
    pub fn unavailable(dataset: DatasetName, reason: impl std::fmt::Display) -> Self {
        Self::DatasetUnavailable {
            dataset,
            reason: reason.to_string(),
        }
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// The dataset this error refers to, if any
    pub fn dataset(&self) -> Option<DatasetName> {
        match self {
            Self::DatasetUnavailable { dataset, .. } => Some(*dataset),
            _ => None,
        }
    }
}

/// Result type for dataset operations
pub type Result<T> = std::result::Result<T, DataError>;

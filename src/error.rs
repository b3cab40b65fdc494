use std::{io, path::PathBuf};

use thiserror::Error;

/// Raised when a single field cannot be coerced into its `Reading` type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("invalid timestamp: {0:?}")]
    BadTimestamp(String),
    #[error("invalid temperature: {0:?}")]
    BadTemperature(String),
    #[error("invalid status flag: {0:?}")]
    BadStatus(String),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("dataset not found at {} and no remote source configured", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to fetch dataset from {url}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to parse dataset from {source_id}: {reason}")]
    Parse { source_id: String, reason: String },

    #[error("failed to read dataset at {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to write dataset to {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

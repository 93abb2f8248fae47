//! Errors raised by the Trello adapter outside the port traits.
//!
//! Port methods report [`relay::RecordStoreError`] directly. [`TrelloError`]
//! covers construction and the local files the adapter owns (label map, mock
//! data); it converts into [`relay::RecordStoreError`] where a port method
//! touches those files.

use std::path::PathBuf;

use relay::RecordStoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrelloError {
    /// Credentials or board id missing.
    #[error("Trello configuration error: {message}")]
    Configuration { message: String },

    /// The HTTP client could not be built.
    #[error("Failed to build Trello HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A local JSON file (label map or mock data) is not in the expected shape.
    #[error("Invalid JSON in {path}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Mock mode has no data file for the requested card.
    #[error("No mock file defined for card ID: {id}")]
    UnknownMockRecord { id: String },
}

impl From<TrelloError> for RecordStoreError {
    fn from(err: TrelloError) -> Self {
        match err {
            TrelloError::UnknownMockRecord { id } => RecordStoreError::NotFound { id },
            TrelloError::Format { .. } => RecordStoreError::Malformed {
                operation: "read_local_file",
                message: err.to_string(),
            },
            other => RecordStoreError::Configuration {
                message: other.to_string(),
            },
        }
    }
}

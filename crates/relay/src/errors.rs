//! Error types for the card relay domain.
//!
//! [`RelayError`] covers everything that can abort the processing of one
//! queued event. It is produced by the event processor and contained at the
//! queue worker boundary: a [`RelayError`] is reported and the event dropped,
//! it never stops the worker.
//!
//! Component-level errors ([`RecordStoreError`] for the board API,
//! [`LlmError`] for the language model backend) are converted into
//! [`RelayError`] with `?`.

use std::time::Duration;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Component errors
// ---------------------------------------------------------------------------

/// Failures talking to the board (record store) API.
#[derive(Debug, Error)]
pub enum RecordStoreError {
    /// The referenced record does not exist (or is not visible to our token).
    #[error("Record not found: {id}")]
    NotFound {
        /// The identifier that was looked up.
        id: String,
    },

    /// The board API answered with a non-success status.
    #[error("Board API returned HTTP {status} during {operation}: {body}")]
    Status {
        /// Short name of the operation (e.g. `"fetch_record"`).
        operation: &'static str,
        /// HTTP status code.
        status: u16,
        /// Response body, truncated by the adapter.
        body: String,
    },

    /// The request never produced a response (DNS, TLS, connect, timeout).
    #[error("Board API transport failure during {operation}: {message}")]
    Transport {
        /// Short name of the operation.
        operation: &'static str,
        /// Underlying error text.
        message: String,
    },

    /// The response could not be decoded into the expected shape.
    #[error("Malformed board API response during {operation}: {message}")]
    Malformed {
        /// Short name of the operation.
        operation: &'static str,
        /// Decoder error text.
        message: String,
    },

    /// Credentials or board identifiers are missing or invalid.
    #[error("Board configuration error: {message}")]
    Configuration {
        /// Description of the problem.
        message: String,
    },
}

/// Failures calling the language model backend.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The backend answered with a non-success status.
    #[error("LLM backend returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated by the adapter.
        body: String,
    },

    /// The request never produced a response.
    #[error("LLM backend transport failure: {message}")]
    Transport {
        /// Underlying error text.
        message: String,
    },

    /// The provider-owned request timeout elapsed.
    #[error("LLM backend did not answer within {after:?}")]
    Timeout {
        /// The timeout that was applied.
        after: Duration,
    },

    /// The backend answered but produced no text.
    #[error("LLM backend returned an empty response for model '{model}'")]
    EmptyResponse {
        /// Model that produced the empty answer.
        model: String,
    },

    /// The response could not be decoded.
    #[error("Malformed LLM backend response: {message}")]
    Malformed {
        /// Decoder error text.
        message: String,
    },

    /// The provider is not usable with the current configuration
    /// (e.g. missing API key).
    #[error("LLM configuration error: {message}")]
    Configuration {
        /// Description of the problem.
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Processing-level errors
// ---------------------------------------------------------------------------

/// Errors that abort the processing of a single queued event.
#[derive(Debug, Error)]
pub enum RelayError {
    /// A board API call failed while resolving or updating the record.
    #[error("Record store failure: {0}")]
    RecordStore(#[from] RecordStoreError),

    /// The metadata/reply generator failed.
    #[error("Generator failure: {0}")]
    Generator(#[from] LlmError),

    /// The event could not be interpreted.
    #[error("Invalid event: {reason}")]
    InvalidEvent {
        /// Human-readable description of what was wrong.
        reason: String,
    },

    /// The processing task ended abnormally (panic or cancellation).
    #[error("Processing aborted: {reason}")]
    Aborted {
        /// Description of how the task ended.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_errors_convert_into_relay_errors() {
        fn fetch() -> Result<(), RelayError> {
            Err(RecordStoreError::NotFound { id: "Y".into() })?;
            Ok(())
        }
        let err = fetch().expect_err("must fail");
        assert!(matches!(err, RelayError::RecordStore(_)));
        assert_eq!(err.to_string(), "Record store failure: Record not found: Y");
    }
}

//! Error types for QuickStats
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! The variants mirror the request-handling taxonomy: malformed input that is
//! rejected before anything is read, per-operation validation failures that
//! abort the batch, missing documents, optimistic-concurrency conflicts, and
//! storage collaborator failures. Callers decide how each kind surfaces (the
//! HTTP layer maps the first four to 4xx responses and the rest to a generic
//! 5xx).

use thiserror::Error;

/// Result type alias for QuickStats operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the stats update pipeline
#[derive(Debug, Error)]
pub enum Error {
    /// Request could not be decoded at all (missing body, bad JSON, missing
    /// required fields). Nothing is read or written.
    #[error("{0}")]
    Malformed(String),

    /// An operation in the batch is invalid (unknown kind, bad path,
    /// non-numeric inc target, non-object merge payload). The whole batch is
    /// discarded.
    #[error("{0}")]
    Validation(String),

    /// Document absent (or empty) and creation was disallowed
    #[error("{0}")]
    NotFound(String),

    /// Supplied ETag does not match the stored document's current ETag
    #[error("ETag mismatch: expected {expected}, current {current}")]
    Conflict {
        /// ETag the caller expected the document to have
        expected: String,
        /// ETag the store currently reports
        current: String,
    },

    /// Storage collaborator failure other than "absent" (network, auth, ...)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Stored blob exists but cannot be interpreted as a stats document
    #[error("Data corruption: {0}")]
    Corruption(String),
}

impl Error {
    /// Shorthand for a [`Error::Malformed`] with an owned message
    pub fn malformed(msg: impl Into<String>) -> Self {
        Error::Malformed(msg.into())
    }

    /// Shorthand for a [`Error::Validation`] with an owned message
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    /// True for error kinds caused by the caller (4xx-class)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::Malformed(_) | Error::Validation(_) | Error::NotFound(_) | Error::Conflict { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_validation() {
        let err = Error::validation("Unknown op: \"bump\"");
        assert_eq!(err.to_string(), "Unknown op: \"bump\"");
    }

    #[test]
    fn test_error_display_conflict() {
        let err = Error::Conflict {
            expected: "\"abc\"".to_string(),
            current: "\"def\"".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("ETag mismatch"));
        assert!(msg.contains("\"abc\""));
        assert!(msg.contains("\"def\""));
    }

    #[test]
    fn test_error_display_storage() {
        let err = Error::Storage("connection reset".to_string());
        let msg = err.to_string();
        assert!(msg.contains("Storage error"));
        assert!(msg.contains("connection reset"));
    }

    #[test]
    fn test_client_error_classification() {
        assert!(Error::malformed("Missing body").is_client_error());
        assert!(Error::validation("bad path").is_client_error());
        assert!(Error::NotFound("Stats file not found".into()).is_client_error());
        assert!(Error::Conflict {
            expected: "a".into(),
            current: "b".into()
        }
        .is_client_error());
        assert!(!Error::Storage("io".into()).is_client_error());
        assert!(!Error::Corruption("truncated".into()).is_client_error());
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }

        assert_eq!(returns_result().unwrap(), 42);
    }
}

//! Error types for the sync boundary
//!
//! The sequence CRDT itself never fails: duplicates, unknown targets and
//! out-of-order deletes all resolve to no-ops. Errors only exist where raw
//! wire data enters the crate.

use thiserror::Error;

/// Errors raised while decoding or validating wire messages
#[derive(Debug, Error)]
pub enum SyncError {
    /// Message is not valid JSON or does not match any message shape
    #[error("Malformed message: {0}")]
    Json(#[from] serde_json::Error),

    /// A field required by the message type is absent
    #[error("Missing field `{field}` in {kind} message")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },

    /// A position identifier cannot address a character (e.g. empty path)
    #[error("Invalid position identifier: {0}")]
    InvalidPosition(String),

    /// Any other protocol violation
    #[error("Protocol error: {0}")]
    Protocol(String),
}

/// Result alias used across the boundary modules
pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SyncError::MissingField {
            kind: "insert",
            field: "left",
        };
        assert_eq!(err.to_string(), "Missing field `left` in insert message");

        let err = SyncError::InvalidPosition("empty path".to_string());
        assert_eq!(err.to_string(), "Invalid position identifier: empty path");
    }

    #[test]
    fn test_json_error_conversion() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: SyncError = parse.unwrap_err().into();
        assert!(matches!(err, SyncError::Json(_)));
    }
}

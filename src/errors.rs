//! Typed error hierarchy for the taskboard client.
//!
//! Three top-level enums cover the three subsystems:
//! - `BoardError`: drag/reducer failures, raised before any state change
//! - `GatewayError`: backend calls (transport, status, decoding)
//! - `SessionError`: persisted session handling

use thiserror::Error;

use taskboard_common::{MalformedTask, TaskId};

/// Errors from the drag controller and reducer. A move that fails with one of
/// these never reaches the store.
#[derive(Debug, Error, PartialEq)]
pub enum BoardError {
    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    #[error("Source index {index} out of range for column {column} (len {len})")]
    SourceOutOfRange {
        column: String,
        index: usize,
        len: usize,
    },

    #[error("Destination index {index} out of range for column {column} (len {len})")]
    DestinationOutOfRange {
        column: String,
        index: usize,
        len: usize,
    },

    #[error("Task at {column}[{index}] is {found}, not {expected}")]
    StaleIntent {
        column: String,
        index: usize,
        expected: TaskId,
        found: TaskId,
    },

    #[error("Task {0} not found on the board")]
    TaskNotFound(TaskId),

    #[error("No async runtime available to persist the move")]
    NoRuntime,
}

/// Errors from calls to the REST backend.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Session expired or rejected by the server")]
    Unauthorized,

    #[error("Backend returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("Backend sent a malformed task: {0}")]
    Malformed(#[from] MalformedTask),
}

impl GatewayError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, GatewayError::Unauthorized)
    }
}

/// Errors from the persisted session file.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Not signed in. Run `taskboard login` first")]
    NotSignedIn,

    #[error("Failed to access session file at {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Session file at {path} is corrupt: {source}")]
    Corrupt {
        path: std::path::PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_error_stale_intent_carries_ids() {
        let err = BoardError::StaleIntent {
            column: "todo".into(),
            index: 0,
            expected: TaskId::new("a"),
            found: TaskId::new("b"),
        };
        assert_eq!(err.to_string(), "Task at todo[0] is b, not a");
    }

    #[test]
    fn gateway_error_unauthorized_is_detectable() {
        assert!(GatewayError::Unauthorized.is_unauthorized());
        let err = GatewayError::Decode {
            url: "http://x".into(),
            message: "eof".into(),
        };
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn gateway_error_from_malformed_task() {
        let err: GatewayError = MalformedTask::MissingId.into();
        assert!(matches!(err, GatewayError::Malformed(MalformedTask::MissingId)));
        assert!(err.to_string().contains("no taskId"));
    }

    #[test]
    fn gateway_error_status_mentions_code() {
        let err = GatewayError::Status {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            body: "boom".into(),
        };
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn session_error_io_carries_path() {
        let path = std::path::PathBuf::from("/tmp/session.json");
        let err = SessionError::Io {
            path: path.clone(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        match &err {
            SessionError::Io { path: p, source } => {
                assert_eq!(p, &path);
                assert_eq!(source.kind(), std::io::ErrorKind::PermissionDenied);
            }
            _ => panic!("Expected Io"),
        }
    }

    #[test]
    fn all_error_types_implement_std_error_trait() {
        fn assert_std_error<E: std::error::Error>(_: &E) {}
        assert_std_error(&BoardError::UnknownColumn("x".into()));
        assert_std_error(&GatewayError::Unauthorized);
        assert_std_error(&SessionError::NotSignedIn);
    }
}

//! Error types for taskmgr
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad input, unknown user, unknown task)
//! - 3: Blocked by task state (editing a completed task)
//! - 4: Operation failed (I/O error, corrupt data file)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the taskmgr CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const STATE_BLOCKED: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for taskmgr operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("{0}")]
    Validation(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No task titled '{title}' assigned to {username}")]
    TaskNotFound { username: String, title: String },

    #[error("File not found: {0}")]
    NotFound(PathBuf),

    // State blocks (exit code 3)
    #[error("{0}")]
    State(String),

    // Operation failures (exit code 4)
    #[error("Malformed line {line} in {path}: {reason}")]
    Format {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Malformed record: {0}")]
    FormatLine(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Validation(_)
            | Error::InvalidConfig(_)
            | Error::TaskNotFound { .. }
            | Error::NotFound(_) => exit_codes::USER_ERROR,

            Error::State(_) => exit_codes::STATE_BLOCKED,

            Error::Format { .. }
            | Error::FormatLine(_)
            | Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Machine-readable category matching the exit code
    pub fn kind(&self) -> &'static str {
        match self.exit_code() {
            exit_codes::USER_ERROR => "user_error",
            exit_codes::STATE_BLOCKED => "state_blocked",
            _ => "operation_failed",
        }
    }

    /// Structured fields for the JSON error envelope
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::Validation(message)
            | Error::InvalidConfig(message)
            | Error::State(message) => Some(serde_json::json!({ "message": message })),
            Error::TaskNotFound { username, title } => Some(serde_json::json!({
                "username": username,
                "title": title,
            })),
            Error::NotFound(path) => Some(serde_json::json!({ "path": path })),
            Error::Format { path, line, reason } => Some(serde_json::json!({
                "path": path,
                "line": line,
                "reason": reason,
            })),
            _ => None,
        }
    }

    /// Attach file and line context to a codec failure
    pub fn at_line(self, path: impl Into<PathBuf>, line: usize) -> Self {
        match self {
            Error::FormatLine(reason) => Error::Format {
                path: path.into(),
                line,
                reason,
            },
            other => other,
        }
    }
}

/// Result type alias for taskmgr operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wrapper for displaying errors in JSON format
#[derive(serde::Serialize)]
pub struct JsonError {
    pub message: String,
    pub code: i32,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            message: err.to_string(),
            code: err.exit_code(),
            kind: err.kind(),
            details: err.details(),
        }
    }
}

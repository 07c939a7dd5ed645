//! Error types for sync operations.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, SyncError>;

/// Filesystem operation that failed, named in [`SyncError::Io`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOp {
    Open,
    Close,
    ReadDirectory,
    Write,
    Remove,
    Copy,
    CreateDirectory,
}

impl std::fmt::Display for IoOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            IoOp::Open => "open",
            IoOp::Close => "close",
            IoOp::ReadDirectory => "read directory",
            IoOp::Write => "write",
            IoOp::Remove => "remove",
            IoOp::Copy => "copy",
            IoOp::CreateDirectory => "create directory",
        })
    }
}

/// Errors that can occur while syncing a package.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Malformed Go source.
    #[error("{}:{line}:{column}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    /// Filesystem failure on a working-tree file.
    #[error("cannot {op} {}: {source}", path.display())]
    Io {
        op: IoOp,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The constructor does not have a shape that can be rewritten.
    #[error("cannot rewrite constructor {function}: {reason}")]
    StrategyPrecondition { function: String, reason: String },

    /// A field expected on a structure is not declared.
    #[error("structure {structure} has no field {field}")]
    FieldNotFound { structure: String, field: String },

    /// A function declaration without a body.
    #[error("function {function} has no body")]
    MissingBody { function: String },

    /// The analyzer produced a message without a `path:line:column` prefix.
    #[error("malformed diagnostic: {message}")]
    DiagnosticFormat { message: String },

    /// Self-healing gave up with the diagnostic still reported.
    #[error("repair did not converge after {iterations} iterations: {diagnostic}")]
    NotConverged {
        iterations: usize,
        diagnostic: String,
    },

    /// Invalid name pattern.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Invalid or unreadable configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl SyncError {
    /// Create an IO error for an operation on `path`.
    pub fn io(op: IoOp, path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            op,
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a strategy precondition error.
    pub fn precondition(function: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::StrategyPrecondition {
            function: function.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

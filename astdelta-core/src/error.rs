//! Error types for astdelta-core.

use thiserror::Error;

/// Result type alias for astdelta-core operations.
pub type Result<T> = std::result::Result<T, DeltaError>;

/// Errors raised by the collaborators around the comparison engine.
///
/// The comparator itself is total: structural discrepancies are reported as
/// differences, never as errors.
#[derive(Error, Debug)]
pub enum DeltaError {
    /// Source text is not syntactically valid.
    #[error("Parse error at {line}:{column}: {message}")]
    Parse {
        /// 1-based line of the first invalid construct.
        line: usize,
        /// 1-based column of the first invalid construct.
        column: usize,
        /// Description of the failure.
        message: String,
    },

    /// The formatter pre-pass failed.
    #[error("Format error: {message}")]
    Format {
        /// Description of the formatter failure.
        message: String,
    },

    /// A serialized tree is missing required node shape.
    #[error("Malformed syntax tree: {message}")]
    MalformedTree {
        /// What was missing or invalid.
        message: String,
    },

    /// IO error talking to an external collaborator.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error for serialized trees.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DeltaError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        DeltaError::MalformedTree {
            message: message.into(),
        }
    }

    pub(crate) fn format(message: impl Into<String>) -> Self {
        DeltaError::Format {
            message: message.into(),
        }
    }
}

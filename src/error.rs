// ⚠️ Error taxonomy
//
// Line-level problems are recoverable: the line is dropped and logged.
// File-level problems are fatal: the run stops on the first one.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// LINE LEVEL (recovered)
// ============================================================================

/// Why a single log line was rejected.
///
/// Comparable so that the same input line always produces the same rejection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineFormatError {
    #[error("line does not match the expected layout")]
    Malformed,

    #[error("unknown action '{0}'")]
    UnknownAction(String),

    #[error("odd number of item tokens ({0}), expected (item_type_id, amount) pairs")]
    OddItemTokens(usize),

    #[error("field '{field}' is not a base-10 integer: '{value}'")]
    InvalidInteger { field: &'static str, value: String },

    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },
}

// ============================================================================
// FILE LEVEL (fatal)
// ============================================================================

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("source unavailable: {}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read {} at line {line}", path.display())]
    Read {
        path: PathBuf,
        line: u64,
        #[source]
        source: io::Error,
    },

    #[error("malformed reference data in {}: {message}", path.display())]
    ReferenceFormat { path: PathBuf, message: String },

    #[error("timestamp {0} cannot be rendered as a UTC date")]
    TimestampOutOfRange(i64),

    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PipelineError {
    pub fn unavailable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        PipelineError::SourceUnavailable {
            path: path.into(),
            source,
        }
    }

    pub fn reference(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        PipelineError::ReferenceFormat {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        PipelineError::Write {
            path: path.into(),
            source,
        }
    }
}

// ============================================================================
// INTERACTIVE (recovered)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryInputError {
    #[error("Invalid item_type_id: {0}")]
    NotAnInteger(String),
}

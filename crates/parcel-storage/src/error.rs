//! Codec error types.

use parcel_registry::InsertError;
use thiserror::Error;

/// Codec error type.
#[derive(Debug, Error)]
pub enum CodecError {
    /// An entry could not be decoded and was skipped.
    #[error("malformed {section}[{index}]: {reason}")]
    Malformed {
        section: &'static str,
        index: usize,
        reason: String,
    },

    /// An entry decoded but the registry refused it.
    #[error("rejected {section}[{index}]: {source}")]
    Rejected {
        section: &'static str,
        index: usize,
        #[source]
        source: InsertError,
    },

    /// A section has the wrong shape (not an object, not a list).
    #[error("malformed document at {path}: {reason}")]
    Structure { path: &'static str, reason: String },

    /// JSON error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

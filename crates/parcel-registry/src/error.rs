//! Registry error types.

use parcel_core::Uuid;
use thiserror::Error;

/// Why a region could not be placed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InsertError {
    /// The box overlaps a region owned by someone else and the registry
    /// rejects foreign overlaps.
    #[error("region {id} overlaps region {with} owned by someone else")]
    Conflict { id: Uuid, with: Uuid },

    /// The box is the empty sentinel.
    #[error("region {id} has no box")]
    EmptyBox { id: Uuid },
}

/// Configuration could not be parsed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for placement operations.
pub type InsertResult<T> = Result<T, InsertError>;

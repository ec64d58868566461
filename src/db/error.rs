use crate::domain::OwnerId;
use thiserror::Error;

/// Failures of the cache store.
///
/// A miss or a stale entry is never an error; reads report those as `Ok(None)`.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Owner not found: {0}")]
    OwnerNotFound(OwnerId),

    #[error("Storage error: {0}")]
    Storage(#[from] sea_orm::DbErr),

    #[error("Payload serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid stored timestamp '{value}': {source}")]
    InvalidTimestamp {
        value: String,
        source: chrono::ParseError,
    },
}

impl CacheError {
    /// True when the persistence layer itself rejected the operation.
    #[must_use]
    pub const fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

pub type CacheResult<T> = Result<T, CacheError>;

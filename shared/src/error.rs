use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by the data sources.
///
/// Only `NotFound`, `Io`, `Parse` and `InvalidArgument` ever reach a caller;
/// query and cache failures are absorbed by the fallback chain.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("snapshot not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("database query failed: {0}")]
    Query(#[from] sqlx::Error),

    #[error("cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("cache payload error: {0}")]
    CacheCodec(#[source] serde_json::Error),
}

impl DataError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, DataError::NotFound { .. })
    }
}

pub type DataResult<T> = Result<T, DataError>;

//! Error types for the layered cache
//!
//! Provides unified error handling using thiserror.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for both cache tiers.
///
/// A cache miss is never an error: lookups return `Ok(None)`.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Invalid configuration (missing disk root, unparseable override)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Remote store did not answer the liveness check
    #[error("Remote store unreachable: {0}")]
    Connection(#[source] redis::RedisError),

    /// Remote store command failed
    #[error("Remote store error: {0}")]
    Store(#[from] redis::RedisError),

    /// Partition name is not a valid YYYYMMDD date
    #[error("Invalid partition date: {0}")]
    InvalidPartition(String),

    /// Key cannot be used as a file name
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Filesystem failure in the disk tier
    #[error("I/O {operation} failed: {}", path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CacheError {
    /// Wraps an I/O error with the operation and path that produced it.
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        CacheError::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

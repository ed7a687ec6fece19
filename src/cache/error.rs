//! File cache error types

use thiserror::Error;

/// Errors that can occur during cache operations
#[derive(Error, Debug)]
pub enum CacheError {
    /// SQLite query or connection failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O error reading a tracked file or preparing the cache directory
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Write attempted through a read-only handle
    #[error("Cache opened read-only, refusing to {0}")]
    ReadOnly(&'static str),

    /// Operation attempted before `init()`
    #[error("Cache not initialized")]
    NotInitialized,
}

pub type CacheResult<T> = std::result::Result<T, CacheError>;

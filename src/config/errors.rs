//! Unified error handling utilities
//!
//! Application-level code uses anyhow; the cache has its own typed error in
//! [`crate::cache::CacheError`] which converts into this one at the boundary.

pub use anyhow::{anyhow, bail, Context, Error, Result};

/// Error context builders for common operations
pub trait ErrorContextExt<T> {
    /// Add file operation context
    fn file_context(self, path: &std::path::Path) -> Result<T>;

    /// Add cache operation context
    fn cache_context(self, operation: &str) -> Result<T>;
}

impl<T, E> ErrorContextExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn file_context(self, path: &std::path::Path) -> Result<T> {
        self.with_context(|| format!("File operation failed: {}", path.display()))
    }

    fn cache_context(self, operation: &str) -> Result<T> {
        self.with_context(|| format!("Cache operation failed: {}", operation))
    }
}

//! Configuration management with environment variable support
//!
//! Every environment input the CLI reads is resolved here once, at startup.
//! The rest of the crate takes a [`Config`] and never looks at the process
//! environment itself.

pub mod errors;

pub use errors::{Error, ErrorContextExt, Result};

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::Context;

/// Cache directory used when `CACHEBRO_DIR` is not set, relative to the working directory
pub const DEFAULT_CACHE_DIR: &str = ".cachebro";

/// File name of the cache database inside the cache directory
pub const DATABASE_FILE: &str = "cache.db";

/// Process-wide configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Absolute cache directory (`CACHEBRO_DIR`, default `./.cachebro`)
    pub cache_dir: PathBuf,
    /// The user's home directory
    pub home_dir: PathBuf,
    /// Base directory for XDG-style host configs (`XDG_CONFIG_HOME`, default `~/.config`)
    pub config_home: PathBuf,
}

impl Config {
    /// Load configuration from the process environment
    ///
    /// Supported environment variables:
    /// - CACHEBRO_DIR: cache directory (default: .cachebro, resolved against the working directory)
    /// - XDG_CONFIG_HOME: base for XDG-style host configs (default: ~/.config)
    pub fn from_env() -> Result<Self> {
        let cwd = env::current_dir().context("Failed to determine the working directory")?;
        let home = directories::BaseDirs::new()
            .map(|dirs| dirs.home_dir().to_path_buf())
            .context("Failed to determine the home directory")?;

        Ok(Self::resolve(
            &cwd,
            home,
            env::var_os("CACHEBRO_DIR"),
            env::var_os("XDG_CONFIG_HOME"),
        ))
    }

    /// Build a configuration from already-read inputs
    ///
    /// An empty `CACHEBRO_DIR` falls back to the default. `XDG_CONFIG_HOME` is
    /// ignored unless it is a non-empty absolute path.
    pub fn resolve(
        cwd: &Path,
        home_dir: PathBuf,
        cache_dir: Option<OsString>,
        xdg_config_home: Option<OsString>,
    ) -> Self {
        let cache_dir = cache_dir
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR));
        let cache_dir = if cache_dir.is_absolute() {
            cache_dir
        } else {
            cwd.join(cache_dir)
        };

        let config_home = xdg_config_home
            .map(PathBuf::from)
            .filter(|dir| dir.is_absolute())
            .unwrap_or_else(|| home_dir.join(".config"));

        Self {
            cache_dir,
            home_dir,
            config_home,
        }
    }

    /// Path of the cache database file
    pub fn db_path(&self) -> PathBuf {
        self.cache_dir.join(DATABASE_FILE)
    }
}

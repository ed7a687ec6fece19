//! File cache with per-session change tracking
//!
//! Tracks which files an agent has read and their content hashes. A repeat
//! read of an unchanged file within the same session is answered with a short
//! marker instead of the full content, and the tokens that were not re-sent
//! are added to a cumulative counter.
//!
//! Backed by SQLite in WAL mode, so `cachebro status` can hold a read-only
//! handle while a serving process writes to the same database.

mod error;

pub use error::{CacheError, CacheResult};

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use sha2::{Digest, Sha256};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

const TOKENS_SAVED: &str = "tokens_saved";

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS files (
        path TEXT PRIMARY KEY,
        hash TEXT NOT NULL,
        size INTEGER NOT NULL,
        updated_at INTEGER NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS session_reads (
        session_id TEXT NOT NULL,
        path TEXT NOT NULL,
        hash TEXT NOT NULL,
        read_at INTEGER NOT NULL,
        PRIMARY KEY (session_id, path)
    )",
    "CREATE TABLE IF NOT EXISTS counters (
        name TEXT PRIMARY KEY,
        value INTEGER NOT NULL
    )",
];

/// How to open the cache
#[derive(Debug, Clone)]
pub struct CacheOptions {
    /// SQLite database file
    pub db_path: PathBuf,
    /// Session the reads are attributed to
    pub session_id: String,
    /// Open without write access; never creates or migrates the database
    pub read_only: bool,
}

/// Snapshot of cache-wide statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Distinct files the cache has seen
    pub files_tracked: u64,
    /// Estimated tokens not re-sent, across all sessions
    pub tokens_saved: u64,
}

/// Result of reading a file through the cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// First read of this file in the session
    Fresh { content: String },
    /// Content differs from what this session last saw
    Changed { content: String },
    /// Same content this session already has
    Unchanged { tokens_saved: u64 },
}

/// Handle to the cache database
pub struct FileCache {
    options: CacheOptions,
    pool: Option<SqlitePool>,
}

/// Build a cache handle; nothing is opened until [`FileCache::init`]
pub fn create_cache(options: CacheOptions) -> FileCache {
    FileCache {
        options,
        pool: None,
    }
}

impl FileCache {
    pub fn session_id(&self) -> &str {
        &self.options.session_id
    }

    pub fn is_read_only(&self) -> bool {
        self.options.read_only
    }

    /// Open the database
    ///
    /// Writable handles create the file and schema when missing. Read-only
    /// handles fail if the database does not exist.
    pub async fn init(&mut self) -> CacheResult<()> {
        let connect = SqliteConnectOptions::new().filename(&self.options.db_path);

        let pool = if self.options.read_only {
            SqlitePoolOptions::new()
                .max_connections(1)
                .connect_with(connect.read_only(true).create_if_missing(false))
                .await?
        } else {
            if let Some(parent) = self.options.db_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let pool = SqlitePoolOptions::new()
                .max_connections(1)
                .connect_with(
                    connect
                        .create_if_missing(true)
                        .journal_mode(SqliteJournalMode::Wal),
                )
                .await?;
            for statement in SCHEMA {
                sqlx::query(statement).execute(&pool).await?;
            }
            pool
        };

        tracing::debug!(
            "Opened cache {} (session {}, read_only={})",
            self.options.db_path.display(),
            self.options.session_id,
            self.options.read_only
        );
        self.pool = Some(pool);
        Ok(())
    }

    fn pool(&self) -> CacheResult<&SqlitePool> {
        self.pool.as_ref().ok_or(CacheError::NotInitialized)
    }

    /// Read a file, reporting whether this session has already seen its content
    pub async fn read_file(&self, path: &Path) -> CacheResult<ReadOutcome> {
        if self.options.read_only {
            return Err(CacheError::ReadOnly("record file reads"));
        }
        let pool = self.pool()?;

        let path = path.canonicalize()?;
        let content = std::fs::read_to_string(&path)?;
        let hash = hash_content(&content);
        let key = path.to_string_lossy().into_owned();
        let now = unix_now();

        let previous: Option<String> =
            sqlx::query_scalar("SELECT hash FROM session_reads WHERE session_id = ? AND path = ?")
                .bind(&self.options.session_id)
                .bind(&key)
                .fetch_optional(pool)
                .await?;

        if previous.as_deref() == Some(hash.as_str()) {
            let tokens_saved = estimate_tokens(&content);
            sqlx::query(
                "INSERT INTO counters (name, value) VALUES (?, ?)
                 ON CONFLICT(name) DO UPDATE SET value = value + excluded.value",
            )
            .bind(TOKENS_SAVED)
            .bind(tokens_saved as i64)
            .execute(pool)
            .await?;
            tracing::debug!("{} unchanged, saved ~{} tokens", key, tokens_saved);
            return Ok(ReadOutcome::Unchanged { tokens_saved });
        }

        sqlx::query(
            "INSERT INTO files (path, hash, size, updated_at) VALUES (?, ?, ?, ?)
             ON CONFLICT(path) DO UPDATE SET
                hash = excluded.hash, size = excluded.size, updated_at = excluded.updated_at",
        )
        .bind(&key)
        .bind(&hash)
        .bind(content.len() as i64)
        .bind(now)
        .execute(pool)
        .await?;

        sqlx::query(
            "INSERT INTO session_reads (session_id, path, hash, read_at) VALUES (?, ?, ?, ?)
             ON CONFLICT(session_id, path) DO UPDATE SET
                hash = excluded.hash, read_at = excluded.read_at",
        )
        .bind(&self.options.session_id)
        .bind(&key)
        .bind(&hash)
        .bind(now)
        .execute(pool)
        .await?;

        Ok(match previous {
            Some(_) => ReadOutcome::Changed { content },
            None => ReadOutcome::Fresh { content },
        })
    }

    /// Cache-wide statistics
    pub async fn get_stats(&self) -> CacheResult<CacheStats> {
        let pool = self.pool()?;

        let files_tracked: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM files")
            .fetch_one(pool)
            .await?;
        let tokens_saved: Option<i64> =
            sqlx::query_scalar("SELECT value FROM counters WHERE name = ?")
                .bind(TOKENS_SAVED)
                .fetch_optional(pool)
                .await?;

        Ok(CacheStats {
            files_tracked: files_tracked.max(0) as u64,
            tokens_saved: tokens_saved.unwrap_or(0).max(0) as u64,
        })
    }

    /// Release the database handle
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}

/// SHA-256 of the content, hex encoded
fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Rough token count: one token per four bytes
fn estimate_tokens(content: &str) -> u64 {
    (content.len() as u64).div_ceil(4)
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

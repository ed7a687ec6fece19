//! `cachebro status`: print cache statistics without touching cache state

use std::io::Write;

use crate::cache::{create_cache, CacheOptions};
use crate::config::{Config, ErrorContextExt, Result};

/// Session reserved for CLI introspection, never used by a serving process
pub const STATUS_SESSION_ID: &str = "cli-status";

pub const NO_DATABASE_MESSAGE: &str =
    "No cachebro database found. Run 'cachebro serve' to start caching.";

/// Print the two-line cache report, or a notice when no database exists yet
///
/// The cache is opened read-only, so this is safe to run next to a live
/// `cachebro serve` on the same cache directory.
pub async fn report_status<W: Write>(config: &Config, out: &mut W) -> Result<()> {
    let db_path = config.db_path();
    if !db_path.exists() {
        writeln!(out, "{}", NO_DATABASE_MESSAGE)?;
        return Ok(());
    }

    let mut cache = create_cache(CacheOptions {
        db_path,
        session_id: STATUS_SESSION_ID.to_string(),
        read_only: true,
    });
    cache.init().await.cache_context("open")?;
    let stats = cache.get_stats().await.cache_context("get_stats")?;

    writeln!(out, "Files tracked: {}", stats.files_tracked)?;
    writeln!(out, "Tokens saved (total): ~{}", format_thousands(stats.tokens_saved))?;

    cache.close().await;
    Ok(())
}

/// Format with `,` between groups of three digits
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(c);
    }
    formatted
}

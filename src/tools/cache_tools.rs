//! Cache-backed MCP tool implementations
//!
//! - [`read_file`]: returns file content, or a short marker when the session
//!   already has the current version
//! - [`cache_status`]: the figures `cachebro status` prints

use std::path::Path;

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
    schemars,
};

use crate::cache::{CacheError, FileCache, ReadOutcome};
use crate::status::format_thousands;

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ReadFileParams {
    #[schemars(description = "Path to the file to read")]
    pub path: String,
}

fn to_mcp_error(path: &str, error: CacheError) -> McpError {
    match error {
        CacheError::Io(e) if e.kind() == std::io::ErrorKind::NotFound => McpError::invalid_params(
            format!("The specified path '{}' does not exist", path),
            None,
        ),
        CacheError::Io(e) if e.kind() == std::io::ErrorKind::InvalidData => {
            McpError::invalid_params(
                format!("The file '{}' is not valid UTF-8 text", path),
                None,
            )
        }
        other => {
            tracing::error!("Cache error reading '{}': {}", path, other);
            McpError::internal_error(other.to_string(), None)
        }
    }
}

pub async fn read_file(cache: &FileCache, path: &str) -> Result<CallToolResult, McpError> {
    let outcome = cache
        .read_file(Path::new(path))
        .await
        .map_err(|e| to_mcp_error(path, e))?;

    let text = match outcome {
        ReadOutcome::Fresh { content } => content,
        ReadOutcome::Changed { content } => {
            format!("[cachebro] {} changed since your last read:\n{}", path, content)
        }
        ReadOutcome::Unchanged { tokens_saved } => format!(
            "[cachebro] {} is unchanged since your last read in this session (~{} tokens saved).",
            path, tokens_saved
        ),
    };

    Ok(CallToolResult::success(vec![Content::text(text)]))
}

pub async fn cache_status(cache: &FileCache) -> Result<CallToolResult, McpError> {
    let stats = cache
        .get_stats()
        .await
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;

    Ok(CallToolResult::success(vec![Content::text(format!(
        "Files tracked: {}\nTokens saved (total): ~{}",
        stats.files_tracked,
        format_thousands(stats.tokens_saved)
    ))]))
}

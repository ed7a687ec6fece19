//! MCP (Model Context Protocol) server entry point

use std::sync::Arc;

use rmcp::{ServiceExt, transport::stdio};

use crate::cache::{create_cache, CacheOptions};
use crate::config::{Config, ErrorContextExt, Result};
use crate::tools::CacheToolRouter;

/// Serve the cache over stdio until the client disconnects
///
/// Each server process gets its own session, so change tracking never
/// leaks between agents sharing one cache directory.
pub async fn start_mcp_server(config: &Config) -> Result<()> {
    let session_id = uuid::Uuid::new_v4().to_string();
    let mut cache = create_cache(CacheOptions {
        db_path: config.db_path(),
        session_id,
        read_only: false,
    });
    cache.init().await.cache_context("open")?;
    let cache = Arc::new(cache);

    tracing::info!(
        "Starting cachebro MCP server (cache {}, session {})",
        config.db_path().display(),
        cache.session_id()
    );

    let service = CacheToolRouter::new(Arc::clone(&cache))
        .serve(stdio())
        .await
        .inspect_err(|e| {
            tracing::error!("serving error: {:?}", e);
        })?;

    service.waiting().await?;

    tracing::info!("cachebro MCP server shutting down");
    cache.close().await;
    Ok(())
}

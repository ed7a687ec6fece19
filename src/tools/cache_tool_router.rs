//! MCP tool routing for the file cache
//!
//! ```text
//! MCP Client
//!     ↓
//! CacheToolRouter (this module)
//!     └─→ cache_tools  (read_file, cache_status)
//!             ↓
//!         FileCache (one session per server process)
//! ```

use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Implementation, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};

use crate::cache::FileCache;
use crate::tools::cache_tools::{self, ReadFileParams};

#[derive(Clone)]
pub struct CacheToolRouter {
    tool_router: ToolRouter<Self>,
    cache: Arc<FileCache>,
}

impl CacheToolRouter {
    pub fn new(cache: Arc<FileCache>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            cache,
        }
    }
}

#[tool_router]
impl CacheToolRouter {
    /// Read a file through the cache
    #[tool(
        description = "Read a file. If this session already read the same content, returns a short 'unchanged' notice instead of the full text."
    )]
    async fn read_file(
        &self,
        Parameters(ReadFileParams { path }): Parameters<ReadFileParams>,
    ) -> Result<CallToolResult, McpError> {
        cache_tools::read_file(&self.cache, &path).await
    }

    /// Report cache statistics
    #[tool(description = "Show how many files the cache tracks and the estimated tokens saved")]
    async fn cache_status(&self) -> Result<CallToolResult, McpError> {
        cache_tools::cache_status(&self.cache).await
    }
}

#[tool_handler]
impl ServerHandler for CacheToolRouter {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "cachebro caches file reads per session: 1) read_file - read a file, getting a short notice instead of the full content when it has not changed since your last read, 2) cache_status - files tracked and tokens saved"
                    .into(),
            ),
            ..Default::default()
        }
    }
}

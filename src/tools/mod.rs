pub mod cache_tool_router;
pub mod cache_tools;

pub use cache_tool_router::CacheToolRouter;

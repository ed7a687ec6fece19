//! cachebro - agent file cache with change tracking
//!
//! Library modules for the `cachebro` CLI: host auto-configuration
//! (`targets`, `merge`, `installer`), command dispatch (`cli`), the file
//! cache (`cache`, `status`) and the MCP server (`mcp`, `tools`).

pub mod cache;
pub mod cli;
pub mod config;
pub mod installer;
pub mod mcp;
pub mod merge;
pub mod status;
pub mod targets;
pub mod tools;

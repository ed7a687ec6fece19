//! Host applications that cachebro knows how to register itself with
//!
//! Each target owns its registration literal. Hosts disagree on the entry
//! shape (`{command, args}` vs `{type, command: [..]}`), so entries are kept as
//! opaque JSON values instead of a shared schema.

use std::path::PathBuf;

use serde_json::{json, Value};

use crate::config::Config;

/// Identifier the registration is stored under inside a host's server map
pub const SERVER_NAME: &str = "cachebro";

/// A host application's MCP configuration file
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigTarget {
    /// Human-readable host name
    pub name: &'static str,
    /// Absolute path of the host's config file
    pub path: PathBuf,
    /// Top-level key holding the host's server registrations
    pub registration_key: &'static str,
    /// Exact value written under `registration_key.cachebro`
    pub entry: Value,
}

/// Registration in the `{command, args}` shape most hosts use
pub fn default_entry() -> Value {
    json!({
        "command": "npx",
        "args": ["cachebro", "serve"],
    })
}

/// Registration in OpenCode's local-server shape
fn opencode_entry() -> Value {
    json!({
        "type": "local",
        "command": ["npx", "cachebro", "serve"],
    })
}

/// Minimal document a user can paste into an unsupported host's config
pub fn manual_snippet() -> Value {
    json!({
        "mcpServers": {
            SERVER_NAME: default_entry(),
        }
    })
}

/// All supported hosts, in the order `init` configures them
pub fn config_targets(config: &Config) -> Vec<ConfigTarget> {
    let home = &config.home_dir;

    vec![
        ConfigTarget {
            name: "Claude Code",
            path: home.join(".claude.json"),
            registration_key: "mcpServers",
            entry: default_entry(),
        },
        ConfigTarget {
            name: "Cursor",
            path: home.join(".cursor").join("mcp.json"),
            registration_key: "mcpServers",
            entry: default_entry(),
        },
        ConfigTarget {
            name: "Windsurf",
            path: home.join(".codeium").join("windsurf").join("mcp_config.json"),
            registration_key: "mcpServers",
            entry: default_entry(),
        },
        ConfigTarget {
            name: "OpenCode",
            path: config.config_home.join("opencode").join("opencode.json"),
            registration_key: "mcp",
            entry: opencode_entry(),
        },
    ]
}

//! Non-destructive merge of a server registration into a host config file
//!
//! The host document is handled as a generic JSON tree. Only the single slot
//! `document[registration_key]["cachebro"]` is ever written; every other key
//! keeps its value and position.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::config::{ErrorContextExt, Result};
use crate::targets::{ConfigTarget, SERVER_NAME};

/// Outcome of merging the registration into one host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStatus {
    /// Registration was written
    Configured,
    /// A registration already existed and was left untouched
    AlreadyConfigured,
    /// Host is not installed (its config directory is missing)
    Skipped,
}

/// Add the cachebro registration to `target` unless it is already there
///
/// Never creates the host's config directory. A missing or malformed config
/// file is treated as an empty document.
pub fn merge_registration(target: &ConfigTarget) -> Result<MergeStatus> {
    let host_installed = target.path.parent().is_some_and(Path::is_dir);
    if !host_installed {
        tracing::debug!(
            "{}: no config directory for {}, skipping",
            target.name,
            target.path.display()
        );
        return Ok(MergeStatus::Skipped);
    }

    let mut document = load_document(&target.path);

    let registered = document
        .get(target.registration_key)
        .and_then(Value::as_object)
        .and_then(|servers| servers.get(SERVER_NAME))
        .is_some_and(is_truthy);
    if registered {
        return Ok(MergeStatus::AlreadyConfigured);
    }

    let slot = document
        .entry(target.registration_key)
        .or_insert_with(|| Value::Object(Map::new()));
    if !slot.is_object() {
        tracing::warn!(
            "{}: replacing non-object '{}' in {}",
            target.name,
            target.registration_key,
            target.path.display()
        );
        *slot = Value::Object(Map::new());
    }
    if let Value::Object(servers) = slot {
        servers.insert(SERVER_NAME.to_string(), target.entry.clone());
    }

    let rendered = render_document(&Value::Object(document))?;
    fs::write(&target.path, rendered).file_context(&target.path)?;
    tracing::info!("{}: registered in {}", target.name, target.path.display());

    Ok(MergeStatus::Configured)
}

/// Read a host config as a JSON object, falling back to an empty one
fn load_document(path: &Path) -> Map<String, Value> {
    if !path.exists() {
        return Map::new();
    }

    // Invalid UTF-8 inside a string value must not cost the user the whole file
    let raw = match fs::read(path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            tracing::warn!("Failed to read {}, starting fresh: {}", path.display(), e);
            return Map::new();
        }
    };

    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(document)) => document,
        Ok(_) => {
            tracing::warn!("{} is not a JSON object, starting fresh", path.display());
            Map::new()
        }
        Err(e) => {
            tracing::warn!("Malformed JSON in {}, starting fresh: {}", path.display(), e);
            Map::new()
        }
    }
}

/// Whether an existing registration counts as present
///
/// `null`, `false`, `0` and `""` are placeholders, not registrations, and get
/// replaced.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Serialize with 2-space indentation and a trailing newline
pub fn render_document(document: &Value) -> Result<String> {
    let mut rendered = serde_json::to_string_pretty(document)?;
    rendered.push('\n');
    Ok(rendered)
}

//! Integration tests for `cachebro init`
//!
//! Tests verify:
//! 1. Only hosts whose config directory exists are configured
//! 2. A second run changes nothing
//! 3. Unrelated settings survive the merge
//! 4. Malformed configs are replaced by a fresh document
//! 5. With no hosts installed, a manual snippet is printed

use anyhow::Result;
use cachebro::config::Config;
use cachebro::installer::install_all;
use cachebro::merge::MergeStatus;
use cachebro::targets::{config_targets, ConfigTarget};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct InitTestEnv {
    _temp_dir: TempDir,
    home: PathBuf,
    config: Config,
}

impl InitTestEnv {
    fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let home = temp_dir.path().join("home");
        fs::create_dir(&home)?;
        let config = Config::resolve(temp_dir.path(), home.clone(), None, None);

        Ok(Self {
            _temp_dir: temp_dir,
            home,
            config,
        })
    }

    fn targets(&self) -> Vec<ConfigTarget> {
        config_targets(&self.config)
    }

    fn install_host(&self, relative_dir: &str) -> Result<PathBuf> {
        let dir = self.home.join(relative_dir);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    fn run_init(&self) -> Result<(cachebro::installer::InstallReport, String)> {
        let mut out = Vec::new();
        let report = install_all(&self.targets(), &mut out)?;
        Ok((report, String::from_utf8(out)?))
    }
}

fn read_json(path: &Path) -> Result<Value> {
    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
}

#[test]
fn test_init_configures_detected_hosts_only() -> Result<()> {
    let env = InitTestEnv::new()?;
    env.install_host(".cursor")?;
    env.install_host(".config/opencode")?;

    let (report, output) = env.run_init()?;

    assert_eq!(report.configured_count, 3); // Claude Code's dir is the home dir itself
    assert_eq!(
        report.results,
        vec![
            ("Claude Code".to_string(), MergeStatus::Configured),
            ("Cursor".to_string(), MergeStatus::Configured),
            ("Windsurf".to_string(), MergeStatus::Skipped),
            ("OpenCode".to_string(), MergeStatus::Configured),
        ]
    );
    assert!(!env.home.join(".codeium").exists());
    assert!(output.contains("Done! Restart your editor to pick up cachebro."));

    let cursor = read_json(&env.home.join(".cursor/mcp.json"))?;
    assert_eq!(
        cursor,
        json!({ "mcpServers": { "cachebro": { "command": "npx", "args": ["cachebro", "serve"] } } })
    );

    let opencode = read_json(&env.home.join(".config/opencode/opencode.json"))?;
    assert_eq!(
        opencode,
        json!({ "mcp": { "cachebro": { "type": "local", "command": ["npx", "cachebro", "serve"] } } })
    );

    Ok(())
}

#[test]
fn test_init_is_idempotent() -> Result<()> {
    let env = InitTestEnv::new()?;
    env.install_host(".cursor")?;
    env.install_host(".codeium/windsurf")?;

    env.run_init()?;
    let paths: Vec<PathBuf> = env.targets().into_iter().map(|t| t.path).collect();
    let first: Vec<Option<String>> = paths.iter().map(|p| fs::read_to_string(p).ok()).collect();

    let (report, output) = env.run_init()?;
    let second: Vec<Option<String>> = paths.iter().map(|p| fs::read_to_string(p).ok()).collect();

    assert_eq!(first, second);
    assert!(report
        .results
        .iter()
        .filter(|(name, _)| name != "OpenCode")
        .all(|(_, status)| *status == MergeStatus::AlreadyConfigured));
    assert!(!output.contains(": configured ("));

    Ok(())
}

#[test]
fn test_init_preserves_unrelated_settings() -> Result<()> {
    let env = InitTestEnv::new()?;
    let original = json!({
        "numStartups": 12,
        "mcpServers": {
            "github": { "command": "gh-mcp", "args": ["--stdio"], "env": { "TOKEN": "x" } }
        },
        "projects": { "/work": { "allowedTools": [] } }
    });
    fs::write(
        env.home.join(".claude.json"),
        serde_json::to_string(&original)?,
    )?;

    env.run_init()?;

    let mut expected = original.clone();
    expected["mcpServers"]["cachebro"] = json!({ "command": "npx", "args": ["cachebro", "serve"] });
    assert_eq!(read_json(&env.home.join(".claude.json"))?, expected);

    Ok(())
}

#[test]
fn test_init_recovers_from_malformed_config() -> Result<()> {
    let env = InitTestEnv::new()?;
    let cursor_dir = env.install_host(".cursor")?;
    fs::write(cursor_dir.join("mcp.json"), "{\"mcpServers\": {,,}")?;

    let (report, _) = env.run_init()?;

    assert!(report.failures.is_empty());
    assert_eq!(
        read_json(&cursor_dir.join("mcp.json"))?,
        json!({ "mcpServers": { "cachebro": { "command": "npx", "args": ["cachebro", "serve"] } } })
    );

    Ok(())
}

#[test]
fn test_init_with_no_hosts_prints_manual_snippet() -> Result<()> {
    let env = InitTestEnv::new()?;
    // No home directory at all: every target is skipped
    let config = Config::resolve(
        env.home.as_path(),
        env.home.join("missing-home"),
        None,
        None,
    );

    let mut out = Vec::new();
    let report = install_all(&config_targets(&config), &mut out)?;
    let output = String::from_utf8(out)?;

    assert_eq!(report.configured_count, 0);
    assert!(!config.home_dir.exists());
    assert!(output.contains("No supported tools detected."));

    let snippet_start = output.find('{').expect("snippet printed");
    let snippet: Value = serde_json::from_str(&output[snippet_start..])?;
    assert_eq!(
        snippet,
        json!({ "mcpServers": { "cachebro": { "command": "npx", "args": ["cachebro", "serve"] } } })
    );

    Ok(())
}

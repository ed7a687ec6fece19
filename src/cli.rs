//! Subcommand dispatch
//!
//! Only the first argument is looked at; anything after it is ignored.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::config::{Config, Result};
use crate::installer::install_all;
use crate::mcp::start_mcp_server;
use crate::status::report_status;
use crate::targets::config_targets;

/// Text printed by `cachebro help`
pub const USAGE: &str = "cachebro - Agent file cache with diff tracking

Usage:
  cachebro init      Auto-configure cachebro for your editor
  cachebro serve     Start the MCP server (default)
  cachebro status    Show cache statistics
  cachebro help      Show this help message

Environment:
  CACHEBRO_DIR       Cache directory (default: .cachebro)";

#[derive(Parser, Debug)]
#[command(
    name = "cachebro",
    disable_help_subcommand = true,
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Args {
    /// Same as the `help` subcommand
    #[arg(long)]
    help: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

/// A cachebro subcommand
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start the MCP server over stdio (also used when no command is given)
    Serve,
    /// Print cache statistics
    Status,
    /// Register cachebro with every detected editor
    Init,
    /// Print usage
    Help,
    /// Anything else; holds the unrecognized command
    #[command(external_subcommand)]
    Unknown(Vec<OsString>),
}

impl Command {
    /// Parse the first command-line argument
    ///
    /// Input clap rejects (a stray flag, an empty string) is reported as an
    /// unknown command rather than a clap usage error.
    pub fn from_first_arg(arg: Option<OsString>) -> Self {
        let argv = std::iter::once(OsString::from("cachebro")).chain(arg.clone());
        match Args::try_parse_from(argv) {
            Ok(Args { help: true, .. }) => Self::Help,
            Ok(Args { command, .. }) => command.unwrap_or(Self::Serve),
            Err(e) => {
                tracing::debug!("clap rejected {:?}: {:?}", arg, e.kind());
                Self::Unknown(arg.into_iter().collect())
            }
        }
    }

    fn needs_config(&self) -> bool {
        matches!(self, Self::Serve | Self::Status | Self::Init)
    }
}

/// Run `command`, writing user-facing output to `out` and `err`
///
/// `load_config` is only called by commands that read the environment, so
/// `help` and unknown commands work even when it would fail. Errors from the
/// cache or the MCP server are returned untouched.
pub async fn run<F, O, E>(command: Command, load_config: F, out: &mut O, err: &mut E) -> Result<ExitCode>
where
    F: FnOnce() -> Result<Config>,
    O: Write,
    E: Write,
{
    let config = if command.needs_config() {
        let config = load_config()?;
        tracing::debug!("Resolved configuration: {:?}", config);
        Some(config)
    } else {
        None
    };

    match (command, config) {
        (Command::Serve, Some(config)) => start_mcp_server(&config).await?,
        (Command::Status, Some(config)) => report_status(&config, out).await?,
        (Command::Init, Some(config)) => {
            let report = install_all(&config_targets(&config), out)?;
            tracing::debug!(
                "init finished: {} configured, {} failed",
                report.configured_count,
                report.failures.len()
            );
        }
        (Command::Unknown(argv), _) => {
            let name = argv
                .first()
                .map(|arg| arg.to_string_lossy().into_owned())
                .unwrap_or_default();
            writeln!(err, "Unknown command: {}. Run 'cachebro help' for usage.", name)?;
            return Ok(ExitCode::from(1));
        }
        (_, _) => writeln!(out, "{}", USAGE)?,
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::errors::anyhow;

    fn parse(arg: Option<&str>) -> Command {
        Command::from_first_arg(arg.map(OsString::from))
    }

    #[test]
    fn test_from_first_arg() {
        assert_eq!(parse(None), Command::Serve);
        assert_eq!(parse(Some("serve")), Command::Serve);
        assert_eq!(parse(Some("status")), Command::Status);
        assert_eq!(parse(Some("init")), Command::Init);
        assert_eq!(parse(Some("help")), Command::Help);
        assert_eq!(parse(Some("--help")), Command::Help);
        assert_eq!(parse(Some("foo")), Command::Unknown(vec!["foo".into()]));
        // Matching is exact
        assert_eq!(parse(Some("Init")), Command::Unknown(vec!["Init".into()]));
        assert_eq!(parse(Some("-x")), Command::Unknown(vec!["-x".into()]));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_argument_is_unknown() {
        use std::os::unix::ffi::OsStringExt;

        let arg = OsString::from_vec(b"fo\xffo".to_vec());
        assert_eq!(
            Command::from_first_arg(Some(arg.clone())),
            Command::Unknown(vec![arg])
        );
    }

    #[tokio::test]
    async fn test_help_and_unknown_do_not_load_config() -> Result<()> {
        let failing = || -> Result<Config> { Err(anyhow!("no home directory")) };

        let (mut out, mut err) = (Vec::new(), Vec::new());
        let code = run(Command::Help, failing, &mut out, &mut err).await?;
        assert_eq!(code, ExitCode::SUCCESS);
        assert!(String::from_utf8(out)?.starts_with("cachebro - Agent file cache"));

        let (mut out, mut err) = (Vec::new(), Vec::new());
        let code = run(parse(Some("foo")), failing, &mut out, &mut err).await?;
        assert_eq!(code, ExitCode::from(1));
        assert!(out.is_empty());
        assert_eq!(
            String::from_utf8(err)?,
            "Unknown command: foo. Run 'cachebro help' for usage.\n"
        );

        let (mut out, mut err) = (Vec::new(), Vec::new());
        assert!(run(Command::Status, failing, &mut out, &mut err).await.is_err());

        Ok(())
    }
}

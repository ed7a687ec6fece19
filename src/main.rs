use std::process::ExitCode;

use cachebro::cli::{self, Command};
use cachebro::config::Config;
use tracing_subscriber::{self, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let command = Command::from_first_arg(std::env::args_os().nth(1));

    // stdout belongs to the MCP transport or the command's report
    let default_level = match command {
        Command::Serve => tracing::Level::DEBUG,
        _ => tracing::Level::WARN,
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    cli::run(
        command,
        Config::from_env,
        &mut std::io::stdout(),
        &mut std::io::stderr(),
    )
    .await
}

//! UFM CLI entry point.
//!
//! This binary is the composition root for the workspace. Responsibilities:
//!
//! 1. **Parse configuration**: connection settings come from flags or the
//!    `UFM_*` environment and are validated before any network call.
//! 2. **Wire observability**: `tracing-subscriber` with a JSON layer on stderr
//!    and an optional OpenTelemetry OTLP exporter. All `tracing` spans and
//!    events emitted by the library crates flow through it.
//! 3. **Construct infrastructure**: build the [`rest::HttpUfmClient`] and
//!    inject it into a [`manager::NetworkManager`].
//! 4. **Run one command** inside a root span carrying a random invocation id,
//!    print its output on stdout and exit non-zero on failure.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use fabric::UfmConfig;
use manager::NetworkManager;
use rest::HttpUfmClient;
use tracing::{info_span, Instrument};
use uuid::Uuid;

mod commands;
mod config;
mod output;
mod telemetry;

use commands::Command;
use config::ConnectionArgs;
use telemetry::TelemetryArgs;

/// Manage InfiniBand partitions through UFM.
#[derive(Parser, Debug)]
#[command(name = "ufm", version)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(flatten)]
    telemetry: TelemetryArgs,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let telemetry = match telemetry::init(&cli.telemetry) {
        Ok(telemetry) => telemetry,
        Err(e) => {
            eprintln!("{e:#}");
            return ExitCode::FAILURE;
        }
    };

    let span = info_span!(
        "ufm",
        invocation = %Uuid::new_v4(),
        command = cli.command.name(),
    );
    let result = run(cli).instrument(span).await;
    telemetry.shutdown();

    match result {
        Ok(out) => {
            print!("{out}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<String> {
    let config = cli
        .connection
        .into_config()
        .context("Failed to load UFM configuration")?;
    let manager = connect(&config).context("Failed to connect to UFM")?;
    commands::execute(&manager, cli.command).await
}

fn connect(config: &UfmConfig) -> anyhow::Result<NetworkManager> {
    let client = HttpUfmClient::new(config)?;
    tracing::debug!(?config, "connecting to ufm");
    Ok(NetworkManager::new(Arc::new(client), config.endpoint()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fabric::Scheme;

    #[test]
    fn connection_flags_resolve_to_config() {
        let cli = Cli::try_parse_from([
            "ufm",
            "--username",
            "admin",
            "--password",
            "123456",
            "--address",
            "ufm.example",
            "--http-schema",
            "HTTP",
            "--port",
            "8080",
            "--timeout",
            "5",
            "version",
        ])
        .unwrap();

        let config = cli.connection.into_config().unwrap();
        assert_eq!(config.scheme, Scheme::Http);
        assert_eq!(config.endpoint().url("/x"), "http://ufm.example:8080/x");
        assert_eq!(config.timeout, Some(std::time::Duration::from_secs(5)));
    }

    #[test]
    fn connection_flags_are_accepted_after_the_subcommand() {
        let cli = Cli::try_parse_from(["ufm", "list", "--address", "ufm.example", "-v"]).unwrap();
        assert_eq!(cli.connection.address.as_deref(), Some("ufm.example"));
        assert!(cli.telemetry.verbose);
    }

    #[test]
    fn unknown_scheme_is_rejected() {
        assert!(Cli::try_parse_from(["ufm", "--http-schema", "ftp", "version"]).is_err());
    }

    #[test]
    fn connect_builds_manager_for_endpoint() {
        let config = UfmConfig::new("admin", "123456", "ufm.example");
        let manager = connect(&config).unwrap();
        assert_eq!(manager.endpoint().url("/x"), "https://ufm.example:443/x");
    }
}

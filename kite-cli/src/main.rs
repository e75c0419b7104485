//! Kite CLI
//!
//! Command-line driver that applies a pipeline declaration to Buildkite and
//! keeps the resulting attributes in a local state file.

mod commands;
mod config;
mod state_file;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use kite_reconciler::config::DEFAULT_API_URL;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "kite")]
#[command(about = "Buildkite pipeline reconciliation CLI", long_about = None)]
struct Cli {
    /// Organization slug [falls back to BUILDKITE_ORGANIZATION]
    #[arg(long, global = true)]
    organization: Option<String>,

    /// API access token [falls back to BUILDKITE_API_TOKEN]
    #[arg(long, global = true)]
    api_token: Option<String>,

    /// API root
    #[arg(long, env = "BUILDKITE_API_URL", default_value = DEFAULT_API_URL, global = true)]
    api_url: String,

    /// State file holding the last known pipeline attributes
    #[arg(long, env = "KITE_STATE", default_value = "kite.state.json", global = true)]
    state: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kite_cli=info,kite_reconciler=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        organization: cli.organization,
        api_token: cli.api_token,
        api_url: cli.api_url,
        state_path: cli.state,
    };

    handle_command(cli.command, &config).await
}

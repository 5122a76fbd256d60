//! chatharvest CLI entry point.
//!
//! Binary name: `charv`
//!
//! Parses CLI arguments, loads configuration, then dispatches to the
//! provisioning, QR login, or extraction handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn,chatharvest_core=info,chatharvest_infra=info",
        1 => "info,chatharvest_core=debug,chatharvest_infra=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "charv", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init(&cli.config).await?;

    match cli.command {
        Commands::Provision => {
            cli::provision::provision(&state).await?;
        }

        Commands::Qr => {
            cli::qr::qr_login(&state).await?;
        }

        Commands::Extract {
            group_id,
            analysis_type,
            criteria,
        } => {
            cli::extract::extract(&state, &group_id, &analysis_type, criteria).await?;
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}

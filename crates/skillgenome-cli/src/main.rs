//! SkillGenome CLI entry point.
//!
//! Binary name: `sgen`
//!
//! Parses CLI arguments, loads config and the named learning session, then
//! dispatches to the appropriate command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use skillgenome_infra::config::load_config;
use skillgenome_infra::filesystem::resolve_data_dir;
use skillgenome_observe::tracing_setup::{init_tracing, shutdown_tracing};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "sgen", &mut std::io::stdout());
        return Ok(());
    }

    // Config decides OTel export, so it is read before the subscriber exists.
    let data_dir = resolve_data_dir();
    let config = load_config(&data_dir).await;

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,skillgenome_core=debug,skillgenome_infra=debug",
        _ => "trace",
    };
    init_tracing(config.telemetry.otel, filter)
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;

    let state = AppState::init(data_dir, config, &cli.session).await?;
    let result = cli::dispatch(cli.command, &state, cli.json).await;

    shutdown_tracing();
    result
}

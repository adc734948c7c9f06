//! Top-level CLI dispatch: parses arguments, builds the layered
//! configuration, wires up tracing, then runs the requested subcommand.

pub mod args;

use anyhow::{Context, Result};
use clap::Parser;
use ctsentry::{AppConfig, Pipeline};
use ctsentry_core::BrandList;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use args::{Cli, Commands};

/// Entry point invoked by `main`.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = crate::config::build(&cli).context("failed to build configuration")?;

    init_tracing(&config);

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_pipeline(config).await,
        Commands::ValidateConfig => validate_config(&config),
    }
}

async fn run_pipeline(config: AppConfig) -> Result<()> {
    let pipeline = Pipeline::build(config).context("failed to build pipeline")?;
    let shutdown = CancellationToken::new();

    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        wait_for_shutdown_signal().await;
        info!("shutdown signal received, draining pipeline");
        signal_shutdown.cancel();
    });

    pipeline.run(shutdown).await;
    Ok(())
}

/// Load and validate configuration (including the brand list) without
/// starting the WebSocket connection (§4.9).
fn validate_config(config: &AppConfig) -> Result<()> {
    config.validate().context("invalid configuration")?;
    let brands = BrandList::load(&config.brand_list_path).context("brand list failed to load")?;
    println!("configuration valid ({} brands loaded)", brands.len());
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    if config.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(_) => {
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = sigterm.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

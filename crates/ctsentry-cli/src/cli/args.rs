//! Command-line argument definitions using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Near-real-time phishing-candidate surveillance over the public
/// Certificate Transparency firehose.
///
/// Run with no subcommand to start the pipeline; use `validate-config`
/// to check configuration without opening the upstream WebSocket.
#[derive(Parser, Debug)]
#[command(name = "ctsentry")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a TOML configuration file (default: `config.toml` if present).
    #[arg(long, global = true, env = "CTSENTRY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Upstream certificate-update WebSocket URL.
    #[arg(long, global = true, env = "CTSENTRY_WS_URL")]
    pub ws_url: Option<String>,

    /// Output CSV path.
    #[arg(long, global = true, env = "CTSENTRY_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Worker pool size.
    #[arg(long, global = true, env = "CTSENTRY_WORKERS")]
    pub workers: Option<usize>,

    /// `tracing` env-filter directive or level (e.g. `info`, `debug`).
    #[arg(long, global = true, env = "CTSENTRY_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Emit structured JSON logs instead of human-readable text.
    #[arg(long, global = true, env = "CTSENTRY_LOG_JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Start the pipeline and block until shutdown (default).
    Run,

    /// Load and validate configuration without starting the WebSocket
    /// connection; exits non-zero with a diagnostic if invalid.
    ValidateConfig,
}

//! Layers CLI flags and environment variables (resolved natively by clap's
//! `env` attribute) on top of the TOML-file-or-defaults base that
//! [`ctsentry_core::AppConfig`] owns.

use std::path::Path;

use anyhow::{Context, Result};
use ctsentry_core::AppConfig;

use crate::cli::args::Cli;

/// Build the final configuration for this invocation.
///
/// Precedence, highest first: CLI flag, environment variable (both handled
/// by clap), TOML file, built-in default. The base layer comes from
/// `--config`/`CTSENTRY_CONFIG` if given, else a `config.toml` in the
/// current directory if one exists, else [`AppConfig::default`]. CLI/env
/// values resolved onto `cli` are then applied on top field by field.
pub fn build(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("failed to load config file {}", path.display()))?,
        None => {
            let default_path = Path::new("config.toml");
            if default_path.exists() {
                AppConfig::load(default_path)
                    .with_context(|| "failed to load config.toml from current directory")?
            } else {
                AppConfig::default()
            }
        }
    };

    if let Some(ws_url) = &cli.ws_url {
        config.ws_url = ws_url.clone();
    }
    if let Some(output) = &cli.output {
        config.output_path = output.clone();
    }
    if let Some(workers) = cli.workers {
        config.workers = workers;
    }
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone();
    }
    if cli.log_json {
        config.log_json = true;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn no_overrides_yields_defaults() {
        let cli = Cli::parse_from(["ctsentry"]);
        let config = build(&cli).unwrap();
        let defaults = AppConfig::default();
        assert_eq!(config.ws_url, defaults.ws_url);
        assert_eq!(config.workers, defaults.workers);
    }

    #[test]
    fn cli_flags_override_defaults() {
        let cli = Cli::parse_from([
            "ctsentry",
            "--ws-url",
            "ws://override:1234",
            "--workers",
            "42",
            "--log-json",
        ]);
        let config = build(&cli).unwrap();
        assert_eq!(config.ws_url, "ws://override:1234");
        assert_eq!(config.workers, 42);
        assert!(config.log_json);
    }

    #[test]
    fn missing_explicit_config_file_is_an_error() {
        let cli = Cli::parse_from(["ctsentry", "--config", "/nonexistent/path.toml"]);
        assert!(build(&cli).is_err());
    }
}

//! Command-line plumbing for the `ctsentry` binary: argument parsing,
//! layered configuration, tracing setup, and the `run` / `validate-config`
//! subcommands (§4.9).

pub mod cli;
pub mod config;

pub use cli::run;

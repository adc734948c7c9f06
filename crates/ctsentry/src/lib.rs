//! Composition root for the phishing-candidate surveillance pipeline: a
//! single process wiring together the CT ingest client, bounded work
//! queue, worker pool, side-service clients, and log writer described
//! in the system overview.
//!
//! Downstream crates (the CLI) only need [`Pipeline::build`] and
//! [`Pipeline::run`]; everything else is internal wiring.

mod error;
mod pipeline;

pub use error::{PipelineError, Result};
pub use pipeline::Pipeline;

pub use ctsentry_core::AppConfig;

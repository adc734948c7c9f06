//! Worker pool, feature extraction, scoring, deduplication, and log
//! writer for the phishing-candidate pipeline (C3 and C6, plus the
//! feature/scoring subsystem of §4.4).
//!
//! This crate has no knowledge of the WebSocket ingest side (C1/C2) —
//! it consumes [`ctsentry_core::WorkItem`]s from a channel and emits
//! [`ctsentry_core::AlertRecord`]s onto another, wiring §4.5's
//! [`ctsentry_permute::PermuteClient`] and §4.6's
//! [`ctsentry_whois::WhoisClient`] in between.

pub mod dedup;
pub mod domain;
mod error;
pub mod features;
pub mod lexical;
pub mod scoring;
pub mod similarity;
pub mod worker;
pub mod writer;

pub use dedup::SeenAlerts;
pub use error::{EngineError, Result};
pub use worker::{EngineConfig, EngineContext, WorkerPool};
pub use writer::LogWriter;

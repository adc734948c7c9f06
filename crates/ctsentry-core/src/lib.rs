//! Core types, configuration, and shared reference data for ctsentry, a
//! near-real-time phishing-candidate surveillance pipeline over the
//! public Certificate Transparency firehose.
//!
//! This crate has no async runtime or I/O dependency beyond the filesystem
//! reads needed to load configuration and reference lists; every other
//! crate in the workspace builds on top of it.

#![doc(html_root_url = "https://docs.rs/ctsentry-core/0.1.0")]

pub mod config;
mod error;
pub mod metrics;
pub mod reference;
pub mod types;

pub use config::AppConfig;
pub use error::{CoreError, Result};
pub use metrics::{MetricsSnapshot, PipelineMetrics};
pub use reference::BrandList;
pub use types::{AlertRecord, CertDate, FeatureVector, LeafCert, WorkItem, CSV_HEADER};

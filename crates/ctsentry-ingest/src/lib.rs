//! WebSocket ingest client for a certstream-style Certificate
//! Transparency firehose, turning raw `certificate_update` frames into
//! bounded work items for the scoring pipeline.

pub mod client;
pub mod envelope;
pub mod error;

pub use client::IngestClient;
pub use error::{IngestError, Result};

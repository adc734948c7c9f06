//! Subprocess-based WHOIS age lookups for the phishing-candidate pipeline.
//!
//! Registration age is a strong phishing signal (campaigns tend to use
//! domains registered within the last 30 days) but WHOIS registries are
//! slow, rate-limited, and inconsistently formatted, so every lookup here
//! degrades to [`whois::UNKNOWN_AGE`] rather than failing the pipeline.

pub mod error;
mod parse;
mod whois;

pub use error::{Result, WhoisError};
pub use whois::{WhoisClient, UNKNOWN_AGE};

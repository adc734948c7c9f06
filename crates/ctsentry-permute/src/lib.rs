//! HTTP client for the dnstwister typo-permutation service used to expand
//! a single observed domain into a set of plausible typo-squat
//! candidates before brand screening.

pub mod client;
pub mod error;

pub use client::{PermuteClient, RetryConfig};
pub use error::{PermuteError, Result};

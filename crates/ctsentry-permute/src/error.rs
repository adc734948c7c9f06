use thiserror::Error;

/// Result type alias for the permutation client.
pub type Result<T> = std::result::Result<T, PermuteError>;

/// Errors from the dnstwister-backed permutation client. Every variant is
/// retried up to the configured attempt count before the caller treats
/// the work item as a skip.
#[derive(Error, Debug)]
pub enum PermuteError {
    #[error("permutation service request failed: {0}")]
    Http(String),

    #[error("permutation service returned status {0}")]
    Status(u16),

    #[error("permutation service response could not be parsed: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("permutation service request timed out")]
    Timeout,

    #[error("permutation service returned no hexadecimal encoding for domain")]
    MissingHex,
}

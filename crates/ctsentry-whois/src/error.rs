use thiserror::Error;

/// Result type alias for WHOIS operations.
pub type Result<T> = std::result::Result<T, WhoisError>;

/// Errors from the WHOIS subprocess client. Per the specification every
/// variant here degrades to `registration_days = -1` at the call site;
/// nothing here is fatal to the pipeline.
#[derive(Error, Debug)]
pub enum WhoisError {
    /// The `whois` binary could not be spawned (not on `PATH`, permission denied, ...).
    #[error("failed to spawn whois: {0}")]
    Spawn(String),

    /// The subprocess did not finish within the configured timeout.
    #[error("whois lookup timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// The subprocess output contained no parseable creation date.
    #[error("no creation date found in whois output for {0}")]
    NoCreationDate(String),

    /// The creation date was found but failed to parse.
    #[error("failed to parse creation date {raw:?}: {reason}")]
    DateParse { raw: String, reason: String },
}

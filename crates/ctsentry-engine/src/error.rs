use thiserror::Error;

/// Result type alias for ctsentry-engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors surfaced by the worker pool and log writer. Per §7's
/// propagation rule, none of these escape a single item or a single
/// write — they are logged at the call site and the loop continues.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("permutation lookup failed for {domain}: {source}")]
    Permutation {
        domain: String,
        #[source]
        source: ctsentry_permute::PermuteError,
    },

    #[error("failed to append alert row: {0}")]
    Write(#[from] csv::Error),

    #[error("failed to open output file {path}: {source}")]
    OpenOutput {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

use thiserror::Error;

/// Result type alias for pipeline construction.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that can prevent the pipeline from starting at all. Per §7
/// taxonomy #5, these are the only conditions the process treats as
/// fatal; everything else degrades gracefully once running.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ctsentry_core::CoreError),
}

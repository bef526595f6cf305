use thiserror::Error;

/// Result type for frame pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that can occur during pipeline construction and execution
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Buffer capacity must be at least 1
    #[error("buffer capacity must be at least 1")]
    InvalidCapacity,

    /// Frame source failure
    #[error("source failed: {0}")]
    Source(String),

    /// Frame transform failure
    #[error("transform failed: {0}")]
    Transform(String),

    /// Frame sink failure
    #[error("sink failed: {0}")]
    Sink(String),

    /// Thread join error
    #[error("stage thread panicked: {0}")]
    ThreadError(String),
}

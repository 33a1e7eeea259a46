//! Error types for roster core
//!
//! Missing attributes, empty input and superseded grouping results are not
//! errors. The only failures here are invalid tuning parameters.

/// Errors raised when grouping or windowing parameters are out of range
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GroupingError {
    /// Chunk length must be positive
    #[error("chunk size must be greater than zero")]
    ZeroChunkSize,

    /// Reveal budget must be positive
    #[error("reveal budget must be greater than zero")]
    ZeroRevealBudget,

    /// Key path had no segments
    #[error("key path is empty")]
    EmptyKeyPath,

    /// Unknown category value
    #[error("unknown category: '{0}'")]
    UnknownCategory(String),
}

/// Result type alias for core operations
pub type CoreResult<T> = Result<T, GroupingError>;

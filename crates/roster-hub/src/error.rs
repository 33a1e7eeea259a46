//! Error types for the hub
//!
//! Every failure here is local and recoverable: loading another page,
//! changing the filter or picking another category restarts the pipeline.

use roster_core::GroupingError;
use roster_source::FetchError;
use std::path::PathBuf;

/// Main hub error type
#[derive(Debug, thiserror::Error)]
pub enum HubError {
    /// Page fetch failed; grouping and windowing state is unchanged
    #[error("page load failed: {0}")]
    Fetch(#[from] FetchError),

    /// Grouping parameters rejected
    #[error("grouping error: {0}")]
    Grouping(#[from] GroupingError),

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl HubError {
    /// Check if repeating the operation may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Fetch(err) if err.is_retryable())
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error during file read
    #[error("io error reading {path}: {source}")]
    Io {
        /// File that failed to load
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// File is not valid TOML for the config shape
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("invalid value for {field}: {message}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        message: String,
    },
}

impl ConfigError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create out-of-range error
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }
}

/// Result type alias for hub operations
pub type HubResult<T> = Result<T, HubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hub_error_display() {
        let err = HubError::from(FetchError::InvalidPage(0));
        assert_eq!(err.to_string(), "page load failed: invalid page number: 0 (pages start at 1)");
    }

    #[test]
    fn retryable_only_for_transient_fetch_failures() {
        assert!(HubError::from(FetchError::Source("offline".to_string())).is_retryable());
        assert!(!HubError::from(FetchError::InvalidPage(0)).is_retryable());
        assert!(!HubError::from(GroupingError::ZeroChunkSize).is_retryable());
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::invalid("page_size", "must be greater than zero");
        assert_eq!(err.to_string(), "invalid value for page_size: must be greater than zero");
    }
}

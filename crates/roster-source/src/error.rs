//! Errors at the page fetch boundary

/// Failure to load a page of users
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Pages are numbered from 1
    #[error("invalid page number: {0} (pages start at 1)")]
    InvalidPage(u32),

    /// Page size must be positive
    #[error("invalid page size: {0}")]
    InvalidPageSize(u32),

    /// Transport-level failure
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("unexpected status {status} for page {page}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Requested page
        page: u32,
    },

    /// Body did not match the expected shape
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Source-specific failure
    #[error("source error: {0}")]
    Source(String),
}

impl FetchError {
    /// Whether trying the same page again may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) | Self::Source(_) => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::InvalidPage(_) | Self::InvalidPageSize(_) | Self::Decode(_) => false,
        }
    }
}

/// Result type alias for fetch operations
pub type FetchResult<T> = Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_display() {
        assert_eq!(
            FetchError::InvalidPage(0).to_string(),
            "invalid page number: 0 (pages start at 1)"
        );
        let err = FetchError::Status { status: 503, page: 2 };
        assert_eq!(err.to_string(), "unexpected status 503 for page 2");
    }

    #[test]
    fn retryable_classification() {
        assert!(FetchError::Status { status: 503, page: 1 }.is_retryable());
        assert!(FetchError::Status { status: 429, page: 1 }.is_retryable());
        assert!(!FetchError::Status { status: 404, page: 1 }.is_retryable());
        assert!(!FetchError::InvalidPageSize(0).is_retryable());
        assert!(FetchError::Source("offline".to_string()).is_retryable());
    }
}

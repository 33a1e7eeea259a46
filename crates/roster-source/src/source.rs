//! Page sources
//!
//! [`PageSource`] is the boundary to wherever users come from. The HTTP
//! implementation talks to a randomuser-compatible API; tests substitute
//! in-memory sources.

use crate::error::{FetchError, FetchResult};
use crate::model::{ApiResult, User};
use async_trait::async_trait;
use roster_core::Record;
use std::fmt;

/// Public randomuser endpoint
pub const DEFAULT_API_URL: &str = "https://randomuser.me/api";

/// Seed that keeps pages stable between requests
pub const DEFAULT_SEED: &str = "awork";

/// Users requested per page when nothing else is configured
pub const DEFAULT_PAGE_SIZE: u32 = 5000;

/// Something that can produce one page of user records
#[async_trait]
pub trait PageSource: Send + Sync + fmt::Debug {
    /// Fetch `page` (1-based) holding up to `page_size` records
    async fn fetch_page(&self, page: u32, page_size: u32) -> FetchResult<Vec<Record>>;
}

/// Reject page 0 and empty pages before any I/O
///
/// # Errors
/// `FetchError::InvalidPage` or `FetchError::InvalidPageSize`.
pub fn validate_request(page: u32, page_size: u32) -> FetchResult<()> {
    if page == 0 {
        return Err(FetchError::InvalidPage(page));
    }
    if page_size == 0 {
        return Err(FetchError::InvalidPageSize(page_size));
    }
    Ok(())
}

/// Page source backed by the user API
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    client: reqwest::Client,
    base_url: String,
    seed: String,
}

impl HttpPageSource {
    /// Source for `base_url` with the default seed
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            seed: DEFAULT_SEED.to_string(),
        }
    }

    /// With result seed
    #[inline]
    #[must_use]
    pub fn with_seed(mut self, seed: impl Into<String>) -> Self {
        self.seed = seed.into();
        self
    }

    /// With a preconfigured client (timeouts, proxies)
    #[inline]
    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Request URL for one page
    #[must_use]
    pub fn page_url(&self, page: u32, page_size: u32) -> String {
        format!(
            "{}?results={page_size}&seed={}&page={page}",
            self.base_url, self.seed
        )
    }
}

impl Default for HttpPageSource {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch_page(&self, page: u32, page_size: u32) -> FetchResult<Vec<Record>> {
        validate_request(page, page_size)?;

        let url = self.page_url(page, page_size);
        tracing::debug!(%url, "requesting page");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                page,
            });
        }

        let body = response.bytes().await?;
        let api: ApiResult = serde_json::from_slice(&body)?;
        tracing::debug!(page, results = api.results.len(), seed = %api.info.seed, "page received");

        let records = User::from_results(api.results)
            .iter()
            .map(User::to_record)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }
}

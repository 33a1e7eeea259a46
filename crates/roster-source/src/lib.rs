//! Roster Source
//!
//! The boundary between the directory and the user API:
//! - Wire model of API responses and the flattened [`User`] record
//! - [`PageSource`] trait with an HTTP implementation
//! - [`PageCache`], a moka-backed cache of fetched pages
//!
//! # Example
//!
//! ```rust,ignore
//! use roster_source::{HttpPageSource, PageCache};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pages = PageCache::new(HttpPageSource::default(), 16);
//! let first = pages.get_page(1, 50).await?;
//! let again = pages.get_page(1, 50).await?; // no second request
//! assert_eq!(first.len(), again.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod cache;
pub mod error;
pub mod model;
pub mod source;

pub use cache::{PageCache, PageCacheStats, PageKey, DEFAULT_PAGE_CAPACITY};
pub use error::{FetchError, FetchResult};
pub use model::{ApiResult, Info, User, UserResult};
pub use source::{
    validate_request, HttpPageSource, PageSource, DEFAULT_API_URL, DEFAULT_PAGE_SIZE, DEFAULT_SEED,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

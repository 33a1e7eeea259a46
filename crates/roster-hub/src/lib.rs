//! Roster Hub
//!
//! Ties the page source to grouping and windowing:
//! - Load a page through the page cache
//! - Filter by name and group by the selected category
//! - Apply only the newest grouping result
//! - Reveal more records as scrolling nears the bottom
//!
//! # Example
//!
//! ```rust,ignore
//! use roster_hub::{HubConfig, UserHub};
//! use roster_source::HttpPageSource;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut hub = UserHub::new(HttpPageSource::default(), HubConfig::default())?;
//! hub.load_page(1).await?;
//! hub.settle().await;
//! for (key, users) in hub.visible_groups() {
//!     println!("{key}: {}", users.len());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod debounce;
pub mod error;
pub mod filter;
pub mod hub;

pub use config::HubConfig;
pub use debounce::SearchDebouncer;
pub use error::{ConfigError, HubError, HubResult};
pub use filter::filter_by_name;
pub use hub::{UserHub, DISPLAYED_PAGES};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving a hub
    pub use crate::config::HubConfig;
    pub use crate::error::{HubError, HubResult};
    pub use crate::hub::UserHub;
    pub use roster_core::{Category, ScrollMetrics};
}

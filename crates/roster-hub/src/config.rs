//! Hub configuration
//!
//! Defaults match the public directory: randomuser API with a fixed seed,
//! 20 records revealed per scroll step, 200-record grouping chunks.

use crate::error::ConfigError;
use roster_core::{
    Category, CoreResult, EdgeThresholds, GroupingOptions, RevealBudget, SortPolicy,
    DEFAULT_CHUNK_SIZE, DEFAULT_REVEAL_BUDGET,
};
use roster_core::scroll::{DEFAULT_BOTTOM_THRESHOLD, DEFAULT_TOP_THRESHOLD};
use roster_source::{DEFAULT_API_URL, DEFAULT_PAGE_CAPACITY, DEFAULT_PAGE_SIZE, DEFAULT_SEED};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Hub configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// User API endpoint
    pub api_url: String,
    /// Seed sent with every page request
    pub seed: String,
    /// Users per page
    pub page_size: u32,
    /// Records revealed per scroll step
    pub reveal_budget: usize,
    /// Records grouped per slice
    pub chunk_size: usize,
    /// Group key ordering
    pub sort_policy: SortPolicy,
    /// Distance from the bottom that triggers a reveal, in pixels
    pub bottom_threshold: f64,
    /// Offset from the top that counts as near the top, in pixels
    pub top_threshold: f64,
    /// Pages kept in the page cache
    pub cache_capacity: u64,
    /// Category selected at start
    pub default_category: Category,
    /// Quiet period before a search term is applied, in milliseconds
    pub search_debounce_ms: u64,
}

impl HubConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With users per page
    #[inline]
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// With records revealed per step
    #[inline]
    #[must_use]
    pub fn with_reveal_budget(mut self, budget: usize) -> Self {
        self.reveal_budget = budget;
        self
    }

    /// With grouping chunk length
    #[inline]
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// With starting category
    #[inline]
    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.default_category = category;
        self
    }

    /// With API endpoint
    #[inline]
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Parse from TOML text; missing keys take their defaults
    ///
    /// # Errors
    /// Parse errors and out-of-range values.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// IO errors, parse errors and out-of-range values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::io_error(path, e))?;
        Self::from_toml_str(&text)
    }

    /// Check value ranges
    ///
    /// # Errors
    /// `ConfigError::Invalid` naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::invalid("page_size", "must be greater than zero"));
        }
        if self.reveal_budget == 0 {
            return Err(ConfigError::invalid("reveal_budget", "must be greater than zero"));
        }
        if self.chunk_size == 0 {
            return Err(ConfigError::invalid("chunk_size", "must be greater than zero"));
        }
        for (field, value) in [
            ("bottom_threshold", self.bottom_threshold),
            ("top_threshold", self.top_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(field, "must be a finite, non-negative number"));
            }
        }
        Ok(())
    }

    /// Grouping options derived from this config
    ///
    /// # Errors
    /// `GroupingError::ZeroChunkSize` when `chunk_size` is zero.
    pub fn grouping_options(&self) -> CoreResult<GroupingOptions> {
        Ok(GroupingOptions::new()
            .with_chunk_size(self.chunk_size)?
            .with_sort(self.sort_policy))
    }

    /// Reveal budget derived from this config
    ///
    /// # Errors
    /// `GroupingError::ZeroRevealBudget` when `reveal_budget` is zero.
    pub fn budget(&self) -> CoreResult<RevealBudget> {
        RevealBudget::new(self.reveal_budget)
    }

    /// Scroll edge thresholds
    #[inline]
    #[must_use]
    pub fn thresholds(&self) -> EdgeThresholds {
        EdgeThresholds {
            bottom: self.bottom_threshold,
            top: self.top_threshold,
        }
    }

    /// Search debounce period
    #[inline]
    #[must_use]
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            seed: DEFAULT_SEED.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            reveal_budget: DEFAULT_REVEAL_BUDGET,
            chunk_size: DEFAULT_CHUNK_SIZE,
            sort_policy: SortPolicy::Auto,
            bottom_threshold: DEFAULT_BOTTOM_THRESHOLD,
            top_threshold: DEFAULT_TOP_THRESHOLD,
            cache_capacity: DEFAULT_PAGE_CAPACITY,
            default_category: Category::FirstName,
            search_debounce_ms: 500,
        }
    }
}

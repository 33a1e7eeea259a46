//! Page cache using moka
//!
//! Remembers fetched pages so revisiting a page never costs another network
//! round-trip. Entries are keyed by page number *and* page size: a page
//! fetched at size 50 is a different page from the same number at size 100.

use crate::error::FetchResult;
use crate::source::{validate_request, PageSource};
use async_trait::async_trait;
use moka::future::Cache;
use roster_core::Record;
use std::sync::Arc;
use std::time::Duration;

/// Default number of pages kept
pub const DEFAULT_PAGE_CAPACITY: u64 = 64;

/// Cache key of one page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageKey {
    /// 1-based page number
    pub page: u32,
    /// Records per page
    pub page_size: u32,
}

/// Statistics for cache monitoring
#[derive(Debug, Clone, Copy, Default)]
pub struct PageCacheStats {
    /// Pages currently cached (approximate)
    pub entry_count: u64,
}

/// Caching wrapper around a [`PageSource`]
#[derive(Debug)]
pub struct PageCache<S> {
    source: S,
    pages: Cache<PageKey, Arc<[Record]>>,
}

impl<S: PageSource> PageCache<S> {
    /// Cache at most `max_pages` pages of `source`
    #[inline]
    #[must_use]
    pub fn new(source: S, max_pages: u64) -> Self {
        Self {
            source,
            pages: Cache::new(max_pages),
        }
    }

    /// Cache with time-based expiration
    #[inline]
    #[must_use]
    pub fn with_ttl(source: S, max_pages: u64, ttl: Duration) -> Self {
        Self {
            source,
            pages: Cache::builder()
                .max_capacity(max_pages)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Get a page from cache or fetch it
    ///
    /// Failed fetches are not cached.
    ///
    /// # Errors
    /// Invalid arguments, or whatever the underlying source reports.
    pub async fn get_page(&self, page: u32, page_size: u32) -> FetchResult<Arc<[Record]>> {
        validate_request(page, page_size)?;
        let key = PageKey { page, page_size };

        if let Some(cached) = self.pages.get(&key).await {
            tracing::debug!(page, page_size, "page cache hit");
            return Ok(cached);
        }

        let records: Arc<[Record]> = self.source.fetch_page(page, page_size).await?.into();
        self.pages.insert(key, Arc::clone(&records)).await;
        tracing::debug!(page, page_size, records = records.len(), "page cached");

        Ok(records)
    }

    /// Check if a page is cached without touching its recency
    #[inline]
    #[must_use]
    pub fn contains(&self, page: u32, page_size: u32) -> bool {
        self.pages.contains_key(&PageKey { page, page_size })
    }

    /// Drop one page
    #[inline]
    pub async fn invalidate(&self, page: u32, page_size: u32) {
        self.pages.invalidate(&PageKey { page, page_size }).await;
    }

    /// Drop every page
    #[inline]
    pub fn invalidate_all(&self) {
        self.pages.invalidate_all();
    }

    /// Get cache statistics
    #[inline]
    #[must_use]
    pub fn stats(&self) -> PageCacheStats {
        PageCacheStats {
            entry_count: self.pages.entry_count(),
        }
    }

    /// Underlying source
    #[inline]
    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }
}

#[async_trait]
impl<S: PageSource> PageSource for PageCache<S> {
    async fn fetch_page(&self, page: u32, page_size: u32) -> FetchResult<Vec<Record>> {
        self.get_page(page, page_size).await.map(|records| records.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct CountingSource {
        calls: AtomicUsize,
        failing: AtomicBool,
    }

    #[async_trait]
    impl PageSource for CountingSource {
        async fn fetch_page(&self, page: u32, page_size: u32) -> FetchResult<Vec<Record>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                return Err(FetchError::Source("offline".to_string()));
            }
            Ok((0..page_size)
                .map(|i| Record::new(json!({"page": page, "index": i})))
                .collect())
        }
    }

    #[tokio::test]
    async fn second_fetch_served_from_cache() {
        let cache = PageCache::new(CountingSource::default(), 10);

        let first = cache.get_page(1, 50).await.unwrap();
        let second = cache.get_page(1, 50).await.unwrap();

        assert_eq!(first.len(), 50);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.source().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn page_size_is_part_of_the_key() {
        let cache = PageCache::new(CountingSource::default(), 10);

        let small = cache.get_page(1, 5).await.unwrap();
        let large = cache.get_page(1, 10).await.unwrap();

        assert_eq!(small.len(), 5);
        assert_eq!(large.len(), 10);
        assert_eq!(cache.source().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let cache = PageCache::new(CountingSource::default(), 10);
        cache.source().failing.store(true, Ordering::SeqCst);

        assert!(cache.get_page(2, 3).await.is_err());
        assert!(!cache.contains(2, 3));

        cache.source().failing.store(false, Ordering::SeqCst);
        assert_eq!(cache.get_page(2, 3).await.unwrap().len(), 3);
        assert_eq!(cache.source().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalid_request_never_reaches_source() {
        let cache = PageCache::new(CountingSource::default(), 10);
        assert!(matches!(cache.get_page(0, 3).await, Err(FetchError::InvalidPage(0))));
        assert_eq!(cache.source().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn invalidation_forces_refetch() {
        let cache = PageCache::new(CountingSource::default(), 10);
        cache.get_page(1, 2).await.unwrap();
        assert!(cache.contains(1, 2));

        cache.invalidate(1, 2).await;
        assert!(!cache.contains(1, 2));

        cache.get_page(1, 2).await.unwrap();
        assert_eq!(cache.source().calls.load(Ordering::SeqCst), 2);
    }
}

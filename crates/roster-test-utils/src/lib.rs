//! Testing utilities for the roster workspace
//!
//! Shared fixtures and an in-memory page source.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use roster_core::Record;
use roster_source::{validate_request, FetchError, FetchResult, PageSource};
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

const FIRST_NAMES: [&str; 8] = ["alice", "Bob", "anna", "Chloe", "dmitri", "Emil", "bea", "Zoe"];
const LAST_NAMES: [&str; 4] = ["Fonseca", "Wood", "Roux", "Novak"];
const NATIONALITIES: [&str; 5] = ["MX", "NZ", "FR", "DE", "BR"];

/// Flattened user record, shaped like the API mapping
pub fn user_record(first: &str, last: &str, nat: &str, gender: &str, age: u32) -> Record {
    Record::new(json!({
        "firstname": first,
        "lastname": last,
        "email": format!("{}.{}@example.com", first.to_lowercase(), last.to_lowercase()),
        "nat": nat,
        "gender": gender,
        "dob": {"date": "1970-01-01T00:00:00.000Z", "age": age},
        "login": {"uuid": format!("{first}-{last}"), "username": first},
    }))
}

/// Records that only carry a first name
pub fn people(names: &[&str]) -> Vec<Record> {
    names
        .iter()
        .map(|name| Record::new(json!({ "firstname": name })))
        .collect()
}

/// Deterministic directory of `count` users with varied categories
pub fn directory(count: usize) -> Vec<Record> {
    (0..count)
        .map(|i| {
            let gender = if i % 2 == 0 { "female" } else { "male" };
            let age = 18 + u32::try_from(i % 50).unwrap_or(0);
            let mut record = user_record(
                FIRST_NAMES[i % FIRST_NAMES.len()],
                LAST_NAMES[i % LAST_NAMES.len()],
                NATIONALITIES[i % NATIONALITIES.len()],
                gender,
                age,
            )
            .value()
            .clone();
            record["index"] = json!(i);
            Record::new(record)
        })
        .collect()
}

/// In-memory [`PageSource`] that counts every fetch
#[derive(Debug, Default)]
pub struct StubPageSource {
    pages: Mutex<HashMap<u32, Vec<Record>>>,
    failing: Mutex<HashSet<u32>>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl StubPageSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `records` for `page`
    pub fn with_page(self, page: u32, records: Vec<Record>) -> Self {
        self.pages.lock().insert(page, records);
        self
    }

    /// Sleep before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Make `page` fail until [`recover_page`](Self::recover_page)
    pub fn fail_page(&self, page: u32) {
        self.failing.lock().insert(page);
    }

    pub fn recover_page(&self, page: u32) {
        self.failing.lock().remove(&page);
    }

    /// Fetches that reached this source
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageSource for StubPageSource {
    async fn fetch_page(&self, page: u32, page_size: u32) -> FetchResult<Vec<Record>> {
        validate_request(page, page_size)?;
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.lock().contains(&page) {
            return Err(FetchError::Source(format!("page {page} unavailable")));
        }

        let pages = self.pages.lock();
        let records = pages.get(&page).map_or_else(Vec::new, |records| {
            records.iter().take(page_size as usize).cloned().collect()
        });
        Ok(records)
    }
}

//! In-memory object store
//!
//! Keys are kept sorted so pagination is stable. Besides storage it carries
//! call counters, scripted transient failures and per-key latency, which is
//! what the orchestrator and pool tests drive.

use bytes::Bytes;
use dashmap::DashMap;
use log::debug;
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::time::Duration;

use super::errors::{StoreError, StoreResult};
use super::types::{ListPage, ListRequest, ObjectEntry};
use super::{Listed, ObjectStore, paginate, roll_up};

/// Default number of rows per list page
const DEFAULT_PAGE_SIZE: usize = 1000;

pub struct MemoryObjectStore {
    objects: RwLock<BTreeMap<String, Bytes>>,
    page_size: usize,
    list_calls: AtomicUsize,
    get_calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    /// Key -> remaining transient failures before a get succeeds
    get_failures: DashMap<String, u32>,
    list_failures: AtomicU32,
    latency: DashMap<String, Duration>,
    list_latency: RwLock<Option<Duration>>,
}

impl MemoryObjectStore {
    #[must_use]
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    #[must_use]
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            objects: RwLock::new(BTreeMap::new()),
            page_size: page_size.max(1),
            list_calls: AtomicUsize::new(0),
            get_calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
            get_failures: DashMap::new(),
            list_failures: AtomicU32::new(0),
            latency: DashMap::new(),
            list_latency: RwLock::new(None),
        }
    }

    /// Insert or replace an object
    pub fn put(&self, key: impl Into<String>, body: impl Into<Bytes>) {
        self.objects.write().insert(key.into(), body.into());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }

    /// Make the next `times` gets of `key` fail with a transient error
    pub fn fail_next_gets(&self, key: impl Into<String>, times: u32) {
        self.get_failures.insert(key.into(), times);
    }

    /// Make the next `times` list calls fail with a transient error
    pub fn fail_next_lists(&self, times: u32) {
        self.list_failures.store(times, Ordering::SeqCst);
    }

    /// Delay every get of `key` by `delay`
    pub fn set_latency(&self, key: impl Into<String>, delay: Duration) {
        self.latency.insert(key.into(), delay);
    }

    pub fn set_list_latency(&self, delay: Duration) {
        *self.list_latency.write() = Some(delay);
    }

    #[must_use]
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    /// Highest number of gets that were in progress at the same time
    #[must_use]
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn take_scripted_failure(&self, key: &str) -> bool {
        match self.get_failures.get_mut(key) {
            Some(mut remaining) if *remaining > 0 => {
                *remaining -= 1;
                true
            }
            _ => false,
        }
    }

    fn take_list_failure(&self) -> bool {
        self.list_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    fn materialise(&self, request: &ListRequest) -> Vec<Listed> {
        let objects = self.objects.read();
        let mut rows = Vec::new();
        let mut seen_prefixes = BTreeSet::new();

        for (key, body) in objects.range(request.prefix.clone()..) {
            if !key.starts_with(&request.prefix) {
                break;
            }
            match roll_up(key, &request.prefix, request.delimiter.as_deref()) {
                Some(sub_prefix) => {
                    if seen_prefixes.insert(sub_prefix.clone()) {
                        rows.push(Listed::Prefix(sub_prefix));
                    }
                }
                None => rows.push(Listed::Entry(ObjectEntry {
                    key: key.clone(),
                    size: body.len() as u64,
                })),
            }
        }

        rows
    }
}

impl Default for MemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Tracks concurrent gets for `peak_in_flight`
struct InFlight<'a> {
    counter: &'a AtomicUsize,
}

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize, peak: &AtomicUsize) -> Self {
        let now = counter.fetch_add(1, Ordering::SeqCst) + 1;
        peak.fetch_max(now, Ordering::SeqCst);
        Self { counter }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ObjectStore for MemoryObjectStore {
    async fn list(&self, request: ListRequest) -> StoreResult<ListPage> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        let delay = *self.list_latency.read();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.take_list_failure() {
            debug!("Scripted list failure for prefix '{}'", request.prefix);
            return Err(StoreError::Transient(format!(
                "simulated list failure under '{}'",
                request.prefix
            )));
        }

        let rows = self.materialise(&request);
        paginate(rows, request.continuation_token.as_deref(), self.page_size)
    }

    async fn get_object(&self, key: &str) -> StoreResult<Bytes> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        let _guard = InFlight::enter(&self.in_flight, &self.peak_in_flight);

        let delay = self.latency.get(key).map(|d| *d);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.take_scripted_failure(key) {
            debug!("Scripted get failure for key '{key}'");
            return Err(StoreError::Transient(format!("simulated failure for '{key}'")));
        }

        self.objects
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> MemoryObjectStore {
        let store = MemoryObjectStore::with_page_size(2);
        store.put("a/1.srt", "one");
        store.put("a/2.srt", "two");
        store.put("a/b/3.srt", "three");
        store.put("c.txt", "four");
        store
    }

    #[tokio::test]
    async fn delimited_list_separates_files_and_prefixes() {
        let store = seeded();
        let page = store.list(ListRequest::delimited("a/", "/")).await.unwrap();

        // rows: a/1.srt, a/2.srt, a/b/ ; page size 2
        assert_eq!(page.entries.len(), 2);
        assert!(page.sub_prefixes.is_empty());

        let rest = store
            .list(ListRequest::delimited("a/", "/").with_token(page.next_token))
            .await
            .unwrap();
        assert_eq!(rest.sub_prefixes, vec!["a/b/".to_string()]);
        assert!(rest.next_token.is_none());
    }

    #[tokio::test]
    async fn scripted_failures_run_out() {
        let store = seeded();
        store.fail_next_gets("c.txt", 1);

        assert!(store.get_object("c.txt").await.unwrap_err().is_transient());
        assert_eq!(store.get_object("c.txt").await.unwrap(), Bytes::from("four"));
        assert_eq!(store.get_calls(), 2);
    }

    #[tokio::test]
    async fn missing_key_is_not_found() {
        let store = seeded();
        let err = store.get_object("nope.srt").await.unwrap_err();
        assert_eq!(err, StoreError::NotFound("nope.srt".to_string()));
    }
}

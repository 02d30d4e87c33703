//! Process-wide result and listing caches
//!
//! Two independent TTL caches share one owner: the document listing, stored
//! under a fixed key with its own (longer) TTL, and the per-query search
//! outcomes. Reads and writes are key-scoped and last-writer-wins.

pub mod ttl_cache;

use log::debug;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::config::SearchConfig;
use crate::enumerator::DocumentDescriptor;
use crate::search::SearchOutcome;
use crate::utils::constants::LISTING_CACHE_KEY;

pub use ttl_cache::{CacheEntry, CacheStats, TtlCache};

/// Only one listing is cached per orchestrator; a little head-room covers
/// several orchestrators sharing one cache.
const LISTING_CACHE_CAPACITY: usize = 4;

pub type DocumentListing = Arc<Vec<DocumentDescriptor>>;

pub struct SearchCache {
    listings: TtlCache<DocumentListing>,
    results: TtlCache<Arc<SearchOutcome>>,
}

impl SearchCache {
    #[must_use]
    pub fn new(result_capacity: usize, result_ttl: Duration, listing_ttl: Duration) -> Self {
        Self {
            listings: TtlCache::new(LISTING_CACHE_CAPACITY, listing_ttl),
            results: TtlCache::new(result_capacity, result_ttl),
        }
    }

    #[must_use]
    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(
            config.max_cache_entries(),
            config.result_ttl(),
            config.listing_ttl(),
        )
    }

    #[must_use]
    pub fn listing(&self) -> Option<DocumentListing> {
        self.listings.get(LISTING_CACHE_KEY)
    }

    pub fn store_listing(&self, documents: DocumentListing) {
        self.listings.insert(LISTING_CACHE_KEY, documents);
    }

    /// Drop the cached listing so the next search re-enumerates
    pub fn invalidate_listing(&self) {
        self.listings.remove(LISTING_CACHE_KEY);
    }

    #[must_use]
    pub fn result(&self, query_key: &str) -> Option<Arc<SearchOutcome>> {
        self.results.get(query_key)
    }

    pub fn store_result(&self, query_key: impl Into<String>, outcome: Arc<SearchOutcome>) {
        self.results.insert(query_key, outcome);
    }

    #[must_use]
    pub fn result_stats(&self) -> CacheStats {
        self.results.stats()
    }

    pub fn clear(&self) {
        self.listings.clear();
        self.results.clear();
    }

    /// Purge expired entries from both caches
    pub fn purge_expired(&self) -> usize {
        self.listings.purge_expired() + self.results.purge_expired()
    }

    /// Spawn a task that purges expired entries every `period`
    ///
    /// The task holds only a weak reference and exits once the cache is dropped.
    pub fn start_cleanup_task(self: &Arc<Self>, period: Duration) -> JoinHandle<()> {
        let cache: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // first tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                let Some(cache) = cache.upgrade() else {
                    debug!("Search cache dropped; stopping cleanup task");
                    return;
                };
                let purged = cache.purge_expired();
                if purged > 0 {
                    debug!("Purged {purged} expired cache entries");
                }
            }
        })
    }
}

impl Default for SearchCache {
    fn default() -> Self {
        Self::from_config(&SearchConfig::default())
    }
}

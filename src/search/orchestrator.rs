//! Batched search orchestration
//!
//! Coordinates one query end to end:
//! - result cache lookup
//! - document listing (cached, or enumerated under the request budget)
//! - optional candidate narrowing by key
//! - sequential batches, one pool task per document
//! - early exit once the occurrence quota is exceeded
//! - a hard stop at the request deadline
//! - write-through of the final outcome
//!
//! Document-level failures are isolated: a document whose fetch fails or
//! times out contributes nothing and is counted in `documents_failed`.

use futures::future::join_all;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::errors::{SearchError, SearchResult};
use super::matcher::scan_document;
use super::types::SearchOutcome;
use crate::cache::{DocumentListing, SearchCache};
use crate::config::SearchConfig;
use crate::enumerator::{DocumentDescriptor, Enumerator};
use crate::fetcher::RetryingFetcher;
use crate::store::{ObjectStore, StoreError};
use crate::utils::string_utils::safe_truncate_chars;
use crate::worker_pool::WorkerPool;

/// Longest query prefix written to logs
const LOGGED_QUERY_CHARS: usize = 64;

pub struct SearchOrchestrator<S> {
    config: SearchConfig,
    enumerator: Enumerator<S>,
    fetcher: RetryingFetcher<S>,
    pool: WorkerPool,
    cache: Arc<SearchCache>,
}

impl<S: ObjectStore> SearchOrchestrator<S> {
    /// Assemble an orchestrator from explicitly shared components
    ///
    /// `pool` and `cache` are process-wide; several orchestrators may share them.
    #[must_use]
    pub fn new(
        store: Arc<S>,
        config: SearchConfig,
        pool: WorkerPool,
        cache: Arc<SearchCache>,
    ) -> Self {
        let enumerator = Enumerator::new(
            Arc::clone(&store),
            config.listing_strategy(),
            config.retry(),
        );
        let fetcher = RetryingFetcher::new(store, config.retry());
        Self {
            config,
            enumerator,
            fetcher,
            pool,
            cache,
        }
    }

    /// Build a pool and cache sized by `config`
    #[must_use]
    pub fn from_config(store: Arc<S>, config: SearchConfig) -> Self {
        let pool = WorkerPool::new(config.concurrency(), config.task_timeout());
        let cache = Arc::new(SearchCache::from_config(&config));
        Self::new(store, config, pool, cache)
    }

    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<SearchCache> {
        &self.cache
    }

    #[must_use]
    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    /// Search every document for `query`
    ///
    /// Matching is a case-insensitive substring test against the query as
    /// given; whitespace in the query is significant. The call returns once
    /// the request budget is spent, with whatever the finished documents found.
    ///
    /// # Errors
    ///
    /// - `InvalidQuery` if the query is shorter than the minimum
    /// - `Config` / `Upstream` if the document listing cannot be obtained
    /// - `Timeout` if the listing does not finish within the request budget
    pub async fn handle_search(&self, query: &str) -> SearchResult<Arc<SearchOutcome>> {
        let started = Instant::now();
        let deadline = started + self.config.request_budget();

        let min_len = self.config.min_query_len();
        if query.chars().count() < min_len {
            return Err(SearchError::InvalidQuery { min_len });
        }

        let query_key = query_cache_key(query);
        let logged = safe_truncate_chars(&query_key, LOGGED_QUERY_CHARS);

        if let Some(hit) = self.cache.result(&query_key) {
            info!(query = logged, occurrences = hit.total_count, "Cache hit");
            return Ok(hit);
        }

        let documents = self.documents(deadline).await?;
        let candidates = self.candidates(&documents, &query_key);

        let outcome = self.run_batches(&candidates, &query_key, deadline).await;

        info!(
            query = logged,
            occurrences = outcome.total_count,
            partial = outcome.is_partial,
            scanned = outcome.documents_scanned,
            failed = outcome.documents_failed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Search completed"
        );

        let outcome = Arc::new(outcome);
        self.cache.store_result(query_key, Arc::clone(&outcome));
        Ok(outcome)
    }

    /// Cached listing, or a fresh enumeration that must finish by `deadline`
    async fn documents(&self, deadline: Instant) -> SearchResult<DocumentListing> {
        if let Some(listing) = self.cache.listing() {
            debug!(documents = listing.len(), "Listing cache hit");
            return Ok(listing);
        }

        let listed = tokio::time::timeout_at(
            deadline,
            self.enumerator
                .list_matching(self.config.root_prefix(), self.config.document_suffix()),
        )
        .await
        .map_err(|_| SearchError::Timeout(self.config.request_budget()))??;

        let listing = Arc::new(listed);
        self.cache.store_listing(Arc::clone(&listing));
        Ok(listing)
    }

    fn candidates<'a>(
        &self,
        documents: &'a [DocumentDescriptor],
        query_lower: &str,
    ) -> Vec<&'a DocumentDescriptor> {
        if !self.config.narrow_by_key() {
            return documents.iter().collect();
        }

        let narrowed: Vec<_> = documents
            .iter()
            .filter(|doc| doc.key.to_lowercase().contains(query_lower))
            .collect();
        debug!(
            total = documents.len(),
            narrowed = narrowed.len(),
            "Narrowed candidates by key"
        );
        narrowed
    }

    async fn run_batches(
        &self,
        candidates: &[&DocumentDescriptor],
        query_lower: &str,
        deadline: Instant,
    ) -> SearchOutcome {
        let mut outcome = SearchOutcome::default();
        let batch_size = self.config.batch_size().max(1);
        let quota = self.config.result_quota();
        let budget = self.config.request_budget();

        for (index, batch) in candidates.chunks(batch_size).enumerate() {
            if Instant::now() >= deadline {
                warn!(
                    batch = index,
                    budget_ms = budget.as_millis() as u64,
                    "Request budget spent; returning partial results"
                );
                outcome.is_partial = true;
                break;
            }

            // Tasks also stop at the deadline and release their slot
            let pending: Vec<_> = batch
                .iter()
                .map(|doc| {
                    let fetcher = self.fetcher.clone();
                    let key = doc.key.clone();
                    let query = query_lower.to_string();
                    let task = self.pool.submit(move || async move {
                        let fetch = tokio::time::timeout_at(deadline, fetcher.fetch(&key));
                        let Ok(fetched) = fetch.await else {
                            return Ok::<_, StoreError>(None);
                        };
                        let body = fetched?;
                        let text = String::from_utf8_lossy(&body);
                        Ok::<_, StoreError>(Some(scan_document(&key, &text, &query)))
                    });
                    tokio::time::timeout_at(deadline, task)
                })
                .collect();

            for (doc, result) in batch.iter().zip(join_all(pending).await) {
                match result {
                    Ok(Ok(Some(found))) => {
                        outcome.documents_scanned += 1;
                        outcome.occurrences.extend(found);
                    }
                    Ok(Ok(None)) | Err(_) => {
                        outcome.documents_failed += 1;
                        outcome.is_partial = true;
                        warn!(key = %doc.key, "Request budget spent before document finished");
                    }
                    Ok(Err(e)) => {
                        outcome.documents_failed += 1;
                        warn!(key = %doc.key, error = %e, "Skipping document");
                    }
                }
            }

            debug!(
                batch = index,
                documents = batch.len(),
                occurrences = outcome.occurrences.len(),
                "Batch finished"
            );

            if outcome.occurrences.len() > quota {
                info!(
                    quota,
                    occurrences = outcome.occurrences.len(),
                    "Result quota exceeded; stopping early"
                );
                outcome.is_partial = true;
                break;
            }
        }

        if let Some(cap) = self.config.max_results()
            && outcome.occurrences.len() > cap
        {
            outcome.occurrences.truncate(cap);
            outcome.is_partial = true;
        }

        outcome.total_count = outcome.occurrences.len();
        outcome
    }
}

/// Result-cache key of a query; also the form the matcher compares against
fn query_cache_key(query: &str) -> String {
    query.to_lowercase()
}

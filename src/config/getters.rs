//! Getter methods for `SearchConfig`

use std::time::Duration;

use super::types::SearchConfig;
use crate::enumerator::ListingStrategy;
use crate::fetcher::RetryConfig;

impl SearchConfig {
    #[must_use]
    pub fn root_prefix(&self) -> &str {
        &self.root_prefix
    }

    #[must_use]
    pub fn document_suffix(&self) -> &str {
        &self.document_suffix
    }

    #[must_use]
    pub fn listing_strategy(&self) -> ListingStrategy {
        self.listing_strategy
    }

    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    #[must_use]
    pub fn task_timeout(&self) -> Duration {
        self.task_timeout
    }

    #[must_use]
    pub fn retry(&self) -> RetryConfig {
        self.retry
    }

    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    #[must_use]
    pub fn result_quota(&self) -> usize {
        self.result_quota
    }

    #[must_use]
    pub fn max_results(&self) -> Option<usize> {
        self.max_results
    }

    #[must_use]
    pub fn min_query_len(&self) -> usize {
        self.min_query_len
    }

    #[must_use]
    pub fn narrow_by_key(&self) -> bool {
        self.narrow_by_key
    }

    #[must_use]
    pub fn request_budget(&self) -> Duration {
        self.request_budget
    }

    #[must_use]
    pub fn result_ttl(&self) -> Duration {
        self.result_ttl
    }

    #[must_use]
    pub fn listing_ttl(&self) -> Duration {
        self.listing_ttl
    }

    #[must_use]
    pub fn max_cache_entries(&self) -> usize {
        self.max_cache_entries
    }

    #[must_use]
    pub fn cache_cleanup_interval(&self) -> Duration {
        self.cache_cleanup_interval
    }
}

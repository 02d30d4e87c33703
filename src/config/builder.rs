//! Fluent builder for `SearchConfig`
//!
//! Every field has a default, so the builder only validates the combination
//! on `build()`.

use std::time::Duration;

use super::types::{ConfigError, SearchConfig};
use crate::enumerator::ListingStrategy;
use crate::fetcher::RetryConfig;

#[derive(Debug, Clone, Default)]
pub struct SearchConfigBuilder {
    config: SearchConfig,
}

impl SearchConfig {
    /// Create a builder starting from the defaults
    #[must_use]
    pub fn builder() -> SearchConfigBuilder {
        SearchConfigBuilder::default()
    }
}

impl From<SearchConfig> for SearchConfigBuilder {
    /// Start from an existing config, e.g. one loaded from the environment
    fn from(config: SearchConfig) -> Self {
        Self { config }
    }
}

impl SearchConfigBuilder {
    #[must_use]
    pub fn root_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.root_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn document_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.document_suffix = suffix.into();
        self
    }

    #[must_use]
    pub fn listing_strategy(mut self, strategy: ListingStrategy) -> Self {
        self.config.listing_strategy = strategy;
        self
    }

    #[must_use]
    pub fn concurrency(mut self, slots: usize) -> Self {
        self.config.concurrency = slots;
        self
    }

    #[must_use]
    pub fn task_timeout(mut self, timeout: Duration) -> Self {
        self.config.task_timeout = timeout;
        self
    }

    #[must_use]
    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.config.retry = retry;
        self
    }

    #[must_use]
    pub fn max_retries(mut self, attempts: u32) -> Self {
        self.config.retry.max_attempts = attempts;
        self
    }

    #[must_use]
    pub fn retry_base_delay(mut self, delay: Duration) -> Self {
        self.config.retry.base_delay = delay;
        self
    }

    #[must_use]
    pub fn batch_size(mut self, size: usize) -> Self {
        self.config.batch_size = size;
        self
    }

    #[must_use]
    pub fn result_quota(mut self, quota: usize) -> Self {
        self.config.result_quota = quota;
        self
    }

    #[must_use]
    pub fn max_results(mut self, cap: Option<usize>) -> Self {
        self.config.max_results = cap;
        self
    }

    #[must_use]
    pub fn min_query_len(mut self, len: usize) -> Self {
        self.config.min_query_len = len;
        self
    }

    #[must_use]
    pub fn narrow_by_key(mut self, enabled: bool) -> Self {
        self.config.narrow_by_key = enabled;
        self
    }

    #[must_use]
    pub fn request_budget(mut self, budget: Duration) -> Self {
        self.config.request_budget = budget;
        self
    }

    #[must_use]
    pub fn result_ttl(mut self, ttl: Duration) -> Self {
        self.config.result_ttl = ttl;
        self
    }

    #[must_use]
    pub fn listing_ttl(mut self, ttl: Duration) -> Self {
        self.config.listing_ttl = ttl;
        self
    }

    #[must_use]
    pub fn max_cache_entries(mut self, entries: usize) -> Self {
        self.config.max_cache_entries = entries;
        self
    }

    #[must_use]
    pub fn cache_cleanup_interval(mut self, interval: Duration) -> Self {
        self.config.cache_cleanup_interval = interval;
        self
    }

    /// Validate and produce the config
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for zero-sized pools, batches, caches,
    /// zero retry attempts, zero deadlines or an empty document suffix.
    pub fn build(self) -> Result<SearchConfig, ConfigError> {
        let config = self.config;

        let invalid = |field: &'static str, reason: &str| {
            Err(ConfigError::Invalid {
                field,
                reason: reason.to_string(),
            })
        };

        if config.concurrency == 0 {
            return invalid("concurrency", "must be at least 1");
        }
        if config.batch_size == 0 {
            return invalid("batch_size", "must be at least 1");
        }
        if config.max_cache_entries == 0 {
            return invalid("max_cache_entries", "must be at least 1");
        }
        if config.retry.max_attempts == 0 {
            return invalid("max_retries", "must be at least 1");
        }
        if config.task_timeout.is_zero() {
            return invalid("task_timeout", "must be non-zero");
        }
        if config.request_budget.is_zero() {
            return invalid("request_budget", "must be non-zero");
        }
        if config.cache_cleanup_interval.is_zero() {
            return invalid("cache_cleanup_interval", "must be non-zero");
        }
        if config.document_suffix.is_empty() {
            return invalid("document_suffix", "must not be empty");
        }
        if config.max_results == Some(0) {
            return invalid("max_results", "must be at least 1 when set");
        }

        Ok(config)
    }
}

//! Retrying document fetcher
//!
//! Wraps `ObjectStore::get_object` with exponential backoff. Safe to retry
//! because every call is a pure read.

pub mod retry;

use bytes::Bytes;
use std::sync::Arc;

use crate::store::{ObjectStore, StoreResult};

pub use retry::{RetryConfig, Retryable, retry_with_backoff};

pub struct RetryingFetcher<S> {
    store: Arc<S>,
    config: RetryConfig,
}

impl<S> Clone for RetryingFetcher<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: self.config,
        }
    }
}

impl<S: ObjectStore> RetryingFetcher<S> {
    #[must_use]
    pub fn new(store: Arc<S>, config: RetryConfig) -> Self {
        Self { store, config }
    }

    #[must_use]
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Fetch `key`, retrying transient failures
    ///
    /// # Errors
    ///
    /// Returns the last store error once attempts are exhausted, or the first
    /// permanent error immediately.
    pub async fn fetch(&self, key: &str) -> StoreResult<Bytes> {
        retry_with_backoff(self.config, key, || self.store.get_object(key)).await
    }
}

pub mod cache;
pub mod config;
pub mod enumerator;
pub mod fetcher;
pub mod search;
pub mod store;
pub mod utils;
pub mod worker_pool;

pub use cache::{SearchCache, TtlCache};
pub use config::{ConfigError, SearchConfig, SearchConfigBuilder};
pub use enumerator::{DocumentDescriptor, Enumerator, ListingStrategy};
pub use fetcher::{RetryConfig, RetryingFetcher, retry_with_backoff};
pub use search::{ErrorKind, Occurrence, SearchError, SearchOrchestrator, SearchOutcome};
pub use store::{
    ListPage, ListRequest, LocalObjectStore, MemoryObjectStore, ObjectEntry, ObjectStore,
    StoreError, StoreResult,
};
pub use worker_pool::{PoolError, WorkerPool};

/// Run one search against a filesystem store rooted at `root`
///
/// Convenience for callers that do not need to share the pool or cache
/// across requests.
///
/// # Errors
///
/// Returns `SearchError::Config` if `root` is not a directory, otherwise
/// whatever [`SearchOrchestrator::handle_search`] returns.
pub async fn search_directory(
    root: impl Into<std::path::PathBuf>,
    config: SearchConfig,
    query: &str,
) -> Result<std::sync::Arc<SearchOutcome>, SearchError> {
    let store = std::sync::Arc::new(LocalObjectStore::open(root)?);
    SearchOrchestrator::from_config(store, config)
        .handle_search(query)
        .await
}

//! Backoff timing and error propagation of the retrying fetcher

use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;
use subtitle_search::{MemoryObjectStore, RetryConfig, RetryingFetcher, StoreError};
use tokio::time::Instant;

fn one_second_backoff() -> RetryConfig {
    RetryConfig {
        max_attempts: 3,
        base_delay: Duration::from_secs(1),
        max_delay: Duration::from_secs(30),
    }
}

#[tokio::test(start_paused = true)]
async fn test_two_transient_failures_then_success() {
    let store = Arc::new(MemoryObjectStore::new());
    store.put("s01/e01.srt", "1\n00:00:01,000 --> 00:00:02,000\nOh. My. God.\n");
    store.fail_next_gets("s01/e01.srt", 2);

    let fetcher = RetryingFetcher::new(Arc::clone(&store), one_second_backoff());
    let begin = Instant::now();

    let body = fetcher.fetch("s01/e01.srt").await.unwrap();

    assert!(body.starts_with(b"1\n"));
    assert_eq!(store.get_calls(), 3);
    // base + base * 2
    assert!(begin.elapsed() >= Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn test_first_attempt_is_not_delayed() {
    let store = Arc::new(MemoryObjectStore::new());
    store.put("a.srt", "x");

    let fetcher = RetryingFetcher::new(Arc::clone(&store), one_second_backoff());
    let begin = Instant::now();

    assert_eq!(fetcher.fetch("a.srt").await.unwrap(), Bytes::from("x"));
    assert_eq!(begin.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_exhaustion_surfaces_last_transient_error() {
    let store = Arc::new(MemoryObjectStore::new());
    store.put("a.srt", "x");
    store.fail_next_gets("a.srt", 5);

    let fetcher = RetryingFetcher::new(Arc::clone(&store), one_second_backoff());
    let err = fetcher.fetch("a.srt").await.unwrap_err();

    assert!(err.is_transient());
    assert_eq!(store.get_calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_not_found_is_surfaced_without_retry() {
    let store = Arc::new(MemoryObjectStore::new());
    let fetcher = RetryingFetcher::new(Arc::clone(&store), one_second_backoff());
    let begin = Instant::now();

    let err = fetcher.fetch("missing.srt").await.unwrap_err();

    assert_eq!(err, StoreError::NotFound("missing.srt".to_string()));
    assert_eq!(store.get_calls(), 1);
    assert_eq!(begin.elapsed(), Duration::ZERO);
}

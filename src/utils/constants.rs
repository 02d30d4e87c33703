//! Shared configuration constants for subtitle search
//!
//! Default values used by `SearchConfig` and the components it configures.

use std::time::Duration;

/// Shortest query accepted by the orchestrator
pub const MIN_QUERY_LEN: usize = 2;

/// Suffix identifying searchable documents
pub const DEFAULT_DOCUMENT_SUFFIX: &str = ".srt";

/// Concurrent remote fetches allowed by the worker pool
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Deadline for one fetch-and-scan task; must stay below the request budget
pub const DEFAULT_TASK_TIMEOUT: Duration = Duration::from_secs(8);

/// Documents per batch
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Occurrence count after which no further batch is started
pub const DEFAULT_RESULT_QUOTA: usize = 100;

/// Total attempts per fetch, including the first
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Backoff after the first failed attempt; doubles per further attempt
pub const DEFAULT_RETRY_BASE_DELAY: Duration = Duration::from_secs(1);

/// Cap for any single backoff delay
pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Per-query result TTL (`CACHE_TTL`, seconds)
pub const DEFAULT_RESULT_TTL: Duration = Duration::from_secs(3600);

/// Document listing TTL
pub const DEFAULT_LISTING_TTL: Duration = Duration::from_secs(3600);

/// Maximum cached query results (`MAX_CACHE_SIZE`)
pub const DEFAULT_MAX_CACHE_ENTRIES: usize = 100;

/// Wall-clock budget for one search
pub const DEFAULT_REQUEST_BUDGET: Duration = Duration::from_secs(20);

/// Period of the background cache purge
pub const CACHE_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// Cache key of the full document listing
pub const LISTING_CACHE_KEY: &str = "all-documents";

/// Line marker identifying subtitle timing lines (`00:00:01,000 --> 00:00:02,000`)
pub const TIMING_MARKER: &str = "-->";

//! Core configuration type for subtitle search
//!
//! `SearchConfig` carries every knob of the pool, fetcher, enumerator,
//! orchestrator and caches. Build it with [`SearchConfig::builder`], start from
//! `Default`, or load overrides from the environment with
//! [`SearchConfig::from_env`].

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::enumerator::ListingStrategy;
use crate::fetcher::RetryConfig;
use crate::utils::constants::{
    CACHE_CLEANUP_INTERVAL, DEFAULT_BATCH_SIZE, DEFAULT_CONCURRENCY, DEFAULT_DOCUMENT_SUFFIX,
    DEFAULT_LISTING_TTL, DEFAULT_MAX_CACHE_ENTRIES, DEFAULT_REQUEST_BUDGET, DEFAULT_RESULT_QUOTA,
    DEFAULT_RESULT_TTL, DEFAULT_TASK_TIMEOUT, MIN_QUERY_LEN,
};

/// Invalid or unparsable configuration
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("Environment variable {var} has unparsable value '{value}'")]
    Env { var: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Prefix under which documents are enumerated ("" = whole store)
    pub(crate) root_prefix: String,
    /// Case-insensitive key suffix of searchable documents
    pub(crate) document_suffix: String,
    pub(crate) listing_strategy: ListingStrategy,

    /// Worker pool slots
    pub(crate) concurrency: usize,
    /// Deadline for one fetch-and-scan task
    pub(crate) task_timeout: Duration,
    pub(crate) retry: RetryConfig,

    pub(crate) batch_size: usize,
    /// Batches stop once the running count exceeds this
    pub(crate) result_quota: usize,
    /// Hard cap applied to the final list; `None` keeps every occurrence
    pub(crate) max_results: Option<usize>,
    pub(crate) min_query_len: usize,
    /// Only fetch documents whose key contains the query
    pub(crate) narrow_by_key: bool,
    /// No batch is started after this much wall-clock time
    pub(crate) request_budget: Duration,

    pub(crate) result_ttl: Duration,
    pub(crate) listing_ttl: Duration,
    pub(crate) max_cache_entries: usize,
    pub(crate) cache_cleanup_interval: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            root_prefix: String::new(),
            document_suffix: DEFAULT_DOCUMENT_SUFFIX.to_string(),
            listing_strategy: ListingStrategy::default(),
            concurrency: DEFAULT_CONCURRENCY,
            task_timeout: DEFAULT_TASK_TIMEOUT,
            retry: RetryConfig::default(),
            batch_size: DEFAULT_BATCH_SIZE,
            result_quota: DEFAULT_RESULT_QUOTA,
            max_results: None,
            min_query_len: MIN_QUERY_LEN,
            narrow_by_key: false,
            request_budget: DEFAULT_REQUEST_BUDGET,
            result_ttl: DEFAULT_RESULT_TTL,
            listing_ttl: DEFAULT_LISTING_TTL,
            max_cache_entries: DEFAULT_MAX_CACHE_ENTRIES,
            cache_cleanup_interval: CACHE_CLEANUP_INTERVAL,
        }
    }
}

impl SearchConfig {
    /// Defaults overridden by process environment variables
    ///
    /// Recognised: `CACHE_TTL` (s), `MAX_CACHE_SIZE`, `SUBSEARCH_ROOT`,
    /// `SUBSEARCH_SUFFIX`, `SUBSEARCH_STRATEGY`, `SUBSEARCH_LISTING_TTL` (s),
    /// `SUBSEARCH_CONCURRENCY`, `SUBSEARCH_TASK_TIMEOUT_MS`,
    /// `SUBSEARCH_BATCH_SIZE`, `SUBSEARCH_QUOTA`, `SUBSEARCH_MAX_RESULTS`,
    /// `SUBSEARCH_MAX_RETRIES`, `SUBSEARCH_RETRY_BASE_MS`, `SUBSEARCH_BUDGET_MS`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for unparsable values or a config that fails
    /// validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source
    ///
    /// # Errors
    ///
    /// See [`from_env`](Self::from_env).
    pub fn from_lookup<L>(lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let parse = |var: &str| parse_var::<u64, _>(&lookup, var);
        let mut builder = Self::builder();

        if let Some(secs) = parse("CACHE_TTL")? {
            builder = builder.result_ttl(Duration::from_secs(secs));
        }
        if let Some(n) = parse_var::<usize, _>(&lookup, "MAX_CACHE_SIZE")? {
            builder = builder.max_cache_entries(n);
        }
        if let Some(root) = lookup("SUBSEARCH_ROOT") {
            builder = builder.root_prefix(root);
        }
        if let Some(suffix) = lookup("SUBSEARCH_SUFFIX") {
            builder = builder.document_suffix(suffix);
        }
        if let Some(strategy) = parse_var::<ListingStrategy, _>(&lookup, "SUBSEARCH_STRATEGY")? {
            builder = builder.listing_strategy(strategy);
        }
        if let Some(secs) = parse("SUBSEARCH_LISTING_TTL")? {
            builder = builder.listing_ttl(Duration::from_secs(secs));
        }
        if let Some(n) = parse_var::<usize, _>(&lookup, "SUBSEARCH_CONCURRENCY")? {
            builder = builder.concurrency(n);
        }
        if let Some(ms) = parse("SUBSEARCH_TASK_TIMEOUT_MS")? {
            builder = builder.task_timeout(Duration::from_millis(ms));
        }
        if let Some(n) = parse_var::<usize, _>(&lookup, "SUBSEARCH_BATCH_SIZE")? {
            builder = builder.batch_size(n);
        }
        if let Some(n) = parse_var::<usize, _>(&lookup, "SUBSEARCH_QUOTA")? {
            builder = builder.result_quota(n);
        }
        if let Some(n) = parse_var::<usize, _>(&lookup, "SUBSEARCH_MAX_RESULTS")? {
            builder = builder.max_results(Some(n));
        }
        if let Some(n) = parse_var::<u32, _>(&lookup, "SUBSEARCH_MAX_RETRIES")? {
            builder = builder.max_retries(n);
        }
        if let Some(ms) = parse("SUBSEARCH_RETRY_BASE_MS")? {
            builder = builder.retry_base_delay(Duration::from_millis(ms));
        }
        if let Some(ms) = parse("SUBSEARCH_BUDGET_MS")? {
            builder = builder.request_budget(Duration::from_millis(ms));
        }

        builder.build()
    }
}

fn parse_var<T, L>(lookup: &L, var: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    L: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| ConfigError::Env {
            var: var.to_string(),
            value: raw,
        }),
    }
}

//! Error types for search requests
//!
//! Every failure that reaches the caller is one `SearchError` with a stable
//! [`ErrorKind`] and a human-readable message. Document-level failures never
//! show up here; they are absorbed into a partial outcome.

use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use crate::config::ConfigError;
use crate::store::StoreError;

/// Result type alias for search operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Kind tag exposed to the transport layer for status mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    InvalidQuery,
    ConfigError,
    UpstreamError,
    Timeout,
}

#[derive(Debug, Error)]
pub enum SearchError {
    /// Query failed validation; no remote call was made
    #[error("Search term must be at least {min_len} characters")]
    InvalidQuery { min_len: usize },

    /// Store or configuration missing; not retried
    #[error("Server configuration error: {0}")]
    Config(String),

    /// Listing failed after retries
    #[error("Error processing search: {0}")]
    Upstream(#[source] StoreError),

    /// The request budget ran out before the document set was known
    #[error("Search timed out after {0:?}")]
    Timeout(Duration),
}

impl SearchError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            SearchError::InvalidQuery { .. } => ErrorKind::InvalidQuery,
            SearchError::Config(_) => ErrorKind::ConfigError,
            SearchError::Upstream(_) => ErrorKind::UpstreamError,
            SearchError::Timeout(_) => ErrorKind::Timeout,
        }
    }

    /// Check if the caller may usefully retry the request
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            SearchError::Upstream(e) => e.is_transient(),
            SearchError::Timeout(_) => true,
            SearchError::InvalidQuery { .. } | SearchError::Config(_) => false,
        }
    }
}

impl From<StoreError> for SearchError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Config(msg) => SearchError::Config(msg),
            other => SearchError::Upstream(other),
        }
    }
}

impl From<ConfigError> for SearchError {
    fn from(error: ConfigError) -> Self {
        SearchError::Config(error.to_string())
    }
}

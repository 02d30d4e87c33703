//! Error types for object-store operations
//!
//! The split between transient and permanent failures drives the retry
//! policy: only transient errors are retried by the fetcher and enumerator.

use thiserror::Error;

/// Result type alias for object-store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Failure reported by an [`ObjectStore`](super::ObjectStore) call
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The requested object does not exist
    #[error("Object not found: {0}")]
    NotFound(String),

    /// Network-level or 5xx-style failure, safe to retry
    #[error("Transient store failure: {0}")]
    Transient(String),

    /// Non-retryable failure other than not-found (access denied, bad request)
    #[error("Store request rejected: {0}")]
    Permanent(String),

    /// Store is missing or misconfigured (credentials, bucket root)
    #[error("Store configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Check if error is transient and should be retried
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Transient(_))
    }

    /// Map an I/O error from a filesystem-backed store
    pub(crate) fn from_io(key: &str, error: &std::io::Error) -> Self {
        use std::io::ErrorKind;

        match error.kind() {
            ErrorKind::NotFound => StoreError::NotFound(key.to_string()),
            ErrorKind::PermissionDenied => StoreError::Permanent(format!("{key}: {error}")),
            ErrorKind::Interrupted | ErrorKind::TimedOut | ErrorKind::WouldBlock => {
                StoreError::Transient(format!("{key}: {error}"))
            }
            _ => StoreError::Transient(format!("{key}: {error}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn only_transient_errors_are_retryable() {
        assert!(StoreError::Transient("reset".into()).is_transient());
        assert!(!StoreError::NotFound("a.srt".into()).is_transient());
        assert!(!StoreError::Permanent("denied".into()).is_transient());
        assert!(!StoreError::Config("no root".into()).is_transient());
    }

    #[test]
    fn io_not_found_maps_to_not_found() {
        let err = io::Error::new(io::ErrorKind::NotFound, "gone");
        assert_eq!(
            StoreError::from_io("s01/e01.srt", &err),
            StoreError::NotFound("s01/e01.srt".to_string())
        );
    }
}

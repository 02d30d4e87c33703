//! Failure modes of a task submitted to the [`WorkerPool`](super::WorkerPool)

use std::time::Duration;
use thiserror::Error;

/// Why a submitted task did not produce a value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError<E> {
    /// The task ran and returned its own error
    #[error("{0}")]
    Task(#[source] E),

    /// The task did not finish within the pool deadline
    #[error("Task timed out after {0:?}")]
    Timeout(Duration),

    /// The task was dropped before reporting (panic or runtime shutdown)
    #[error("Task was abandoned before completing")]
    Abandoned,
}

impl<E> PoolError<E> {
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

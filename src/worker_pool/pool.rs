//! Fixed-slot task pool with FIFO admission and per-task deadlines
//!
//! Tasks are queued in submission order and handed to the first free slot.
//! Each running task races a deadline; whichever finishes first frees the
//! slot and immediately dispatches the next queued task. A timed-out task's
//! future is dropped, which cancels it at its next await point.

use futures::future::BoxFuture;
use log::{debug, warn};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::oneshot;

use super::errors::PoolError;

/// Type-erased queued unit of work; reports its own result through a channel
type Job = Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send>;

struct PoolState {
    queue: VecDeque<Job>,
    /// `true` while a slot holds a running task
    slots: Vec<bool>,
}

impl PoolState {
    fn running(&self) -> usize {
        self.slots.iter().filter(|busy| **busy).count()
    }
}

struct Inner {
    state: Mutex<PoolState>,
    deadline: Duration,
    peak_running: AtomicUsize,
}

/// Bounded scheduler for remote I/O tasks
///
/// Cloning is cheap and every clone drives the same slots and queue.
#[derive(Clone)]
pub struct WorkerPool {
    inner: Arc<Inner>,
}

impl WorkerPool {
    /// Create a pool with `capacity` slots (minimum 1) and a per-task `deadline`
    #[must_use]
    pub fn new(capacity: usize, deadline: Duration) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(PoolState {
                    queue: VecDeque::new(),
                    slots: vec![false; capacity],
                }),
                deadline,
                peak_running: AtomicUsize::new(0),
            }),
        }
    }

    /// Queue `task` and return a future for its outcome
    ///
    /// The task is enqueued before this returns, so submission order is
    /// dispatch order even if the returned futures are awaited later or in a
    /// different order. Must be called from within a Tokio runtime.
    pub fn submit<F, Fut, T, E>(
        &self,
        task: F,
    ) -> impl Future<Output = Result<T, PoolError<E>>> + Send + 'static
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let deadline = self.inner.deadline;

        let job: Job = Box::new(move || {
            Box::pin(async move {
                let outcome = match tokio::time::timeout(deadline, task()).await {
                    Ok(Ok(value)) => Ok(value),
                    Ok(Err(e)) => Err(PoolError::Task(e)),
                    Err(_) => Err(PoolError::Timeout(deadline)),
                };
                // Receiver may have been dropped by a caller that gave up
                let _ = tx.send(outcome);
            })
        });

        self.inner.state.lock().queue.push_back(job);
        Inner::dispatch(&self.inner);

        async move { rx.await.unwrap_or(Err(PoolError::Abandoned)) }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.state.lock().slots.len()
    }

    /// Number of tasks currently holding a slot
    #[must_use]
    pub fn running(&self) -> usize {
        self.inner.state.lock().running()
    }

    /// Number of tasks waiting for a slot
    #[must_use]
    pub fn queued(&self) -> usize {
        self.inner.state.lock().queue.len()
    }

    /// Highest number of simultaneously running tasks seen so far
    #[must_use]
    pub fn peak_running(&self) -> usize {
        self.inner.peak_running.load(Ordering::Relaxed)
    }
}

impl Inner {
    /// Move queued jobs into free slots until either runs out
    ///
    /// Called from `submit` and from every slot release; a no-op when there is
    /// no free slot or no queued job.
    fn dispatch(inner: &Arc<Inner>) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!("WorkerPool dispatch outside a Tokio runtime; jobs stay queued");
            return;
        };

        loop {
            let (slot, job) = {
                let mut state = inner.state.lock();
                let Some(slot) = state.slots.iter().position(|busy| !busy) else {
                    return;
                };
                let Some(job) = state.queue.pop_front() else {
                    return;
                };
                state.slots[slot] = true;
                inner
                    .peak_running
                    .fetch_max(state.running(), Ordering::Relaxed);
                (slot, job)
            };

            debug!("WorkerPool dispatching job into slot {slot}");

            let guard = SlotGuard {
                inner: Arc::clone(inner),
                slot,
            };
            handle.spawn(async move {
                let _guard = guard;
                job().await;
            });
        }
    }
}

/// Frees a slot on drop, including when the task panics
struct SlotGuard {
    inner: Arc<Inner>,
    slot: usize,
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        self.inner.state.lock().slots[self.slot] = false;
        Inner::dispatch(&self.inner);
    }
}

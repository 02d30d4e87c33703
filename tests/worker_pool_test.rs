//! Scheduling, concurrency bound and deadline behaviour of the worker pool

use futures::future::join_all;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use subtitle_search::{PoolError, WorkerPool};
use tokio::time::Instant;

#[tokio::test]
async fn test_burst_never_exceeds_capacity() {
    let pool = WorkerPool::new(3, Duration::from_secs(5));
    let current = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let pending: Vec<_> = (0..20)
        .map(|i| {
            let current = Arc::clone(&current);
            let peak = Arc::clone(&peak);
            pool.submit(move || async move {
                let now = current.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                current.fetch_sub(1, Ordering::SeqCst);
                Ok::<_, ()>(i)
            })
        })
        .collect();

    assert!(pool.running() <= 3);
    assert_eq!(pool.running() + pool.queued(), 20);

    let results = join_all(pending).await;
    assert_eq!(results.len(), 20);
    assert!(results.iter().all(Result::is_ok));

    assert_eq!(peak.load(Ordering::SeqCst), 3);
    assert_eq!(pool.peak_running(), 3);
    assert_eq!(pool.running(), 0);
    assert_eq!(pool.queued(), 0);
}

#[tokio::test]
async fn test_dispatch_follows_submission_order() {
    let pool = WorkerPool::new(1, Duration::from_secs(5));
    let started = Arc::new(Mutex::new(Vec::new()));

    let pending: Vec<_> = (0..6)
        .map(|i| {
            let started = Arc::clone(&started);
            pool.submit(move || async move {
                started.lock().push(i);
                tokio::task::yield_now().await;
                Ok::<_, ()>(i)
            })
        })
        .collect();

    // Await in reverse; dispatch order must not depend on await order
    for (i, handle) in pending.into_iter().enumerate().rev() {
        assert_eq!(handle.await, Ok(i));
    }

    assert_eq!(*started.lock(), vec![0, 1, 2, 3, 4, 5]);
}

#[tokio::test(start_paused = true)]
async fn test_stuck_task_times_out_and_frees_slot() {
    let deadline = Duration::from_millis(100);
    let pool = WorkerPool::new(1, deadline);
    let begin = Instant::now();

    let stuck = pool.submit(|| futures::future::pending::<Result<(), ()>>());
    let next = pool.submit(|| async { Ok::<_, ()>(Instant::now()) });

    assert_eq!(stuck.await, Err(PoolError::Timeout(deadline)));
    let timed_out_after = begin.elapsed();
    assert!(timed_out_after >= deadline);
    assert!(timed_out_after < deadline + Duration::from_millis(10));

    let next_started = next.await.unwrap();
    assert!(next_started.duration_since(begin) < deadline + Duration::from_millis(10));
}

#[tokio::test(start_paused = true)]
async fn test_timed_out_task_is_cancelled() {
    struct DropFlag(Arc<AtomicBool>);
    impl Drop for DropFlag {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    let pool = WorkerPool::new(1, Duration::from_millis(50));
    let dropped = Arc::new(AtomicBool::new(false));
    let flag = DropFlag(Arc::clone(&dropped));

    let result = pool
        .submit(move || async move {
            let _flag = flag;
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok::<_, ()>(())
        })
        .await;

    assert!(result.unwrap_err().is_timeout());
    assert!(dropped.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_failures_do_not_stall_the_queue() {
    let pool = WorkerPool::new(2, Duration::from_secs(5));

    let pending: Vec<_> = (0..10)
        .map(|i| {
            pool.submit(move || async move {
                if i % 2 == 0 {
                    Err(format!("doc {i} failed"))
                } else {
                    Ok(i)
                }
            })
        })
        .collect();

    let results = join_all(pending).await;
    let ok: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).copied().collect();
    assert_eq!(ok, vec![1, 3, 5, 7, 9]);
    assert_eq!(
        results[0],
        Err(PoolError::Task("doc 0 failed".to_string()))
    );
}

#[test]
fn test_pool_error_display_and_source() {
    use std::error::Error;
    use subtitle_search::StoreError;

    let task: PoolError<StoreError> = PoolError::Task(StoreError::NotFound("e01.srt".into()));
    assert_eq!(task.to_string(), "Object not found: e01.srt");
    assert_eq!(
        task.source().map(ToString::to_string),
        Some("Object not found: e01.srt".to_string())
    );

    let timeout: PoolError<StoreError> = PoolError::Timeout(Duration::from_secs(8));
    assert_eq!(timeout.to_string(), "Task timed out after 8s");
    assert!(timeout.source().is_none());
    assert!(PoolError::<StoreError>::Abandoned.source().is_none());
}

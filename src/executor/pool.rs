//! Concurrent group synchronization.
//!
//! Each group runs `sync_tree` on a tokio blocking thread; a semaphore caps
//! how many groups are in flight. The two passes of one group always run on
//! the same thread, in order. Results come back in input order.

use crate::executor::sync_tree;
use crate::types::{MirrorError, Observer, SyncGroup, SyncOutcome};
use std::path::Path;
use std::sync::Arc;
use tokio::runtime::Builder;
use tokio::sync::Semaphore;

/// Result of one group's synchronization
pub type GroupResult = Result<SyncOutcome, MirrorError>;

/// Synchronize `jobs` with at most `workers` groups in flight.
///
/// Each job carries the observer used for that group. The returned vector is
/// aligned with `jobs`.
///
/// # Errors
/// Only runtime construction fails the call; per-group errors, including a
/// panicked worker, are returned inside the vector.
pub fn sync_groups_parallel(
    jobs: Vec<(SyncGroup, Observer)>,
    workers: usize,
) -> Result<Vec<GroupResult>, MirrorError> {
    let workers = workers.max(1);
    let runtime = Builder::new_multi_thread()
        .worker_threads(workers)
        .max_blocking_threads(workers)
        .enable_all()
        .build()
        .map_err(MirrorError::Io)?;

    runtime.block_on(async move {
        let permits = Arc::new(Semaphore::new(workers));
        let mut handles = Vec::with_capacity(jobs.len());

        for (group, observer) in jobs {
            let permits = Arc::clone(&permits);
            let source = group.source.clone();
            let handle = tokio::spawn(async move {
                let _permit = match permits.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => return Err(pool_error(&group.source, e.to_string())),
                };
                let task_source = group.source.clone();
                let task = tokio::task::spawn_blocking(move || {
                    sync_tree(&group.source, &group.destination, &observer)
                });
                match task.await {
                    Ok(result) => result,
                    Err(e) => Err(pool_error(&task_source, e.to_string())),
                }
            });
            handles.push((source, handle));
        }

        let mut results = Vec::with_capacity(handles.len());
        for (source, handle) in handles {
            results.push(match handle.await {
                Ok(result) => result,
                Err(e) => Err(pool_error(&source, e.to_string())),
            });
        }
        Ok(results)
    })
}

fn pool_error(source: &Path, reason: String) -> MirrorError {
    MirrorError::SubtreeSync {
        path: source.to_path_buf(),
        reason: format!("group worker failed: {}", reason),
    }
}

//! Bounded worker pool for embarrassingly parallel per-shard work.
//!
//! Each item runs as its own blocking task, with at most `workers` tasks in
//! flight. Results are handed to a sink on the coordinating task as tasks
//! finish, and each finished task frees its slot for the next item at once.
//! The sink can fold results into plain owned state without locks, and memory
//! stays bounded by the number of in-flight results.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::task::JoinSet;

use crate::error::{CountError, CountResult};

/// Fixed-size pool of blocking workers.
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    /// Create a pool with `workers` concurrent tasks (at least one).
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    /// Number of concurrent tasks.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `work` on every item and feed each result to `sink` in completion
    /// order. With one worker that is also submission order.
    ///
    /// The first failure (a task error, a panic, or a sink error) aborts the
    /// run: no further tasks start, queued tasks return early, in-flight tasks
    /// are awaited, and the error is returned.
    pub async fn run<T, R, F, S>(&self, items: Vec<T>, work: F, mut sink: S) -> CountResult<()>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> CountResult<R> + Send + Sync + 'static,
        S: FnMut(R) -> CountResult<()>,
    {
        let work = Arc::new(work);
        let cancelled = Arc::new(AtomicBool::new(false));
        let mut pending = items.into_iter();
        let mut in_flight: JoinSet<CountResult<R>> = JoinSet::new();

        loop {
            while in_flight.len() < self.workers {
                let Some(item) = pending.next() else { break };
                let work = Arc::clone(&work);
                let cancelled = Arc::clone(&cancelled);
                in_flight.spawn_blocking(move || {
                    if cancelled.load(Ordering::Acquire) {
                        return Err(CountError::Cancelled);
                    }
                    let result = work(item);
                    if result.is_err() {
                        cancelled.store(true, Ordering::Release);
                    }
                    result
                });
            }

            let Some(joined) = in_flight.join_next().await else {
                return Ok(());
            };

            let outcome = match joined {
                Ok(result) => result.and_then(&mut sink),
                Err(e) => Err(CountError::Worker(e.to_string())),
            };

            if let Err(e) = outcome {
                cancelled.store(true, Ordering::Release);
                drain(in_flight).await;
                return Err(e);
            }
        }
    }
}

/// Wait for tasks that were already running when the pool aborted.
async fn drain<R: Send + 'static>(mut in_flight: JoinSet<CountResult<R>>) {
    if !in_flight.is_empty() {
        tracing::debug!("Waiting for {} in-flight workers to stop", in_flight.len());
    }
    while in_flight.join_next().await.is_some() {}
}

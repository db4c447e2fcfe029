//! Bounded-concurrency task gate.
//!
//! The limiter caps how many admitted tasks run at once. Admission is
//! FIFO: tokio's semaphore queues waiters in arrival order, so a task
//! submitted earlier is always admitted no later than one submitted
//! after it. A task's outcome is irrelevant to the queue: the permit is
//! released when the task's future completes or is dropped, success or
//! not, so one failing task never stalls the tasks behind it.

use std::sync::Arc;

use tokio::sync::Semaphore;

/// Default number of concurrent detail fetches during a cache fill.
pub const DEFAULT_FILL_CONCURRENCY: usize = 10;

/// Caps the number of concurrently running tasks.
#[derive(Clone)]
pub struct ConcurrencyLimiter {
    semaphore: Arc<Semaphore>,
    max_concurrency: usize,
}

impl ConcurrencyLimiter {
    /// Creates a limiter admitting at most `max_concurrency` tasks at
    /// once (clamped to at least 1).
    pub fn new(max_concurrency: usize) -> Self {
        let max_concurrency = max_concurrency.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrency)),
            max_concurrency,
        }
    }

    /// The configured concurrency cap.
    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Number of tasks that could be admitted right now without waiting.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Runs `task` once a slot is free, holding the slot for the task's
    /// full duration.
    pub async fn run<F, T>(&self, task: F) -> T
    where
        F: std::future::Future<Output = T>,
    {
        // The semaphore is never closed, so acquisition cannot fail.
        let _permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("limiter semaphore closed");
        task.await
    }
}

impl std::fmt::Debug for ConcurrencyLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConcurrencyLimiter")
            .field("max_concurrency", &self.max_concurrency)
            .field("available", &self.available())
            .finish()
    }
}

impl Default for ConcurrencyLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_FILL_CONCURRENCY)
    }
}

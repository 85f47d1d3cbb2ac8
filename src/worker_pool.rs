//! Fixed-size pool of OS threads draining the shared [`TaskQueue`].
//!
//! Each worker runs one full request lifecycle per task (read, parse,
//! route, respond, close). Tasks run under `catch_unwind` so a panicking
//! handler never takes a worker down with it. Shutdown closes the queue;
//! because the queue drains before reporting closed, every connection
//! enqueued before shutdown is still served.

use crate::queue::TaskQueue;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::{env, thread};
use tracing::{debug, error, info};

/// A unit of work closing over one accepted connection.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

#[derive(Debug, Clone, Copy)]
pub struct WorkerPoolConfig {
    /// Number of worker threads
    pub num_workers: usize,
}

impl WorkerPoolConfig {
    /// Load configuration from environment variables (`CLIE_WORKERS`).
    pub fn from_env() -> Self {
        let num_workers = env::var("CLIE_WORKERS")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|&n| n > 0)
            .unwrap_or(4);
        Self { num_workers }
    }

    pub fn new(num_workers: usize) -> Self {
        Self { num_workers }
    }
}

impl Default for WorkerPoolConfig {
    fn default() -> Self {
        Self { num_workers: 4 }
    }
}

pub struct WorkerPool {
    queue: Arc<TaskQueue<Task>>,
    workers: Vec<JoinHandle<()>>,
    completed: Arc<AtomicU64>,
}

impl WorkerPool {
    pub fn new(config: WorkerPoolConfig) -> Self {
        let queue = Arc::new(TaskQueue::new());
        let completed = Arc::new(AtomicU64::new(0));

        info!(num_workers = config.num_workers, "creating worker pool");

        let mut workers = Vec::with_capacity(config.num_workers);
        for worker_id in 0..config.num_workers {
            let queue = queue.clone();
            let completed = completed.clone();
            workers.push(thread::spawn(move || {
                debug!(worker_id, "worker started");
                while let Some(task) = queue.pop() {
                    if catch_unwind(AssertUnwindSafe(task)).is_err() {
                        error!(worker_id, "task panicked");
                    }
                    completed.fetch_add(1, Ordering::Relaxed);
                }
                debug!(worker_id, "worker exiting");
            }));
        }

        Self {
            queue,
            workers,
            completed,
        }
    }

    /// Shared queue the listener pushes accepted connections into.
    pub fn queue(&self) -> Arc<TaskQueue<Task>> {
        self.queue.clone()
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    pub fn completed_count(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    /// Close the queue, let the workers drain the backlog, and join them all.
    pub fn shutdown(self) {
        self.queue.close();
        let started = self.workers.len();
        let mut joined = 0usize;
        for handle in self.workers {
            if handle.join().is_ok() {
                joined += 1;
            }
        }
        info!(
            started,
            joined,
            completed = self.completed.load(Ordering::Relaxed),
            "worker pool drained"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_config_defaults() {
        let config = WorkerPoolConfig::default();
        assert_eq!(config.num_workers, 4);
    }

    #[test]
    fn test_shutdown_runs_every_queued_task() {
        let pool = WorkerPool::new(WorkerPoolConfig::new(3));
        let counter = Arc::new(AtomicUsize::new(0));
        let queue = pool.queue();
        for _ in 0..100 {
            let counter = counter.clone();
            queue.push(Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }));
        }
        pool.shutdown();
        assert_eq!(counter.load(Ordering::SeqCst), 100);
    }

    #[test]
    fn test_completed_count_reaches_queued_total() {
        let pool = WorkerPool::new(WorkerPoolConfig::new(2));
        assert_eq!(pool.worker_count(), 2);
        let queue = pool.queue();
        for _ in 0..10 {
            queue.push(Box::new(|| {}));
        }
        let completed = pool.completed.clone();
        pool.shutdown();
        assert_eq!(completed.load(Ordering::Relaxed), 10);
    }

    #[test]
    fn test_panicking_task_does_not_kill_worker() {
        let pool = WorkerPool::new(WorkerPoolConfig::new(1));
        let queue = pool.queue();
        let ran_after_panic = Arc::new(AtomicUsize::new(0));
        queue.push(Box::new(|| panic!("boom")));
        let flag = ran_after_panic.clone();
        queue.push(Box::new(move || {
            flag.fetch_add(1, Ordering::SeqCst);
        }));
        pool.shutdown();
        assert_eq!(ran_after_panic.load(Ordering::SeqCst), 1);
    }
}

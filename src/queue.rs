//! Thread-safe FIFO handing accepted connections to the worker pool.
//!
//! One mutex, one condition variable. The queue is unbounded: accepted
//! connections are never rejected for queue depth, only by the OS accept
//! backlog. Instead of sentinel tasks, shutdown uses `close()`: `pop`
//! keeps returning queued items until the backlog is drained and only then
//! reports `None`, so nothing enqueued before shutdown is dropped.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

pub struct TaskQueue<T> {
    inner: Mutex<Inner<T>>,
    cond: Condvar,
}

struct Inner<T> {
    items: VecDeque<T>,
    closed: bool,
}

impl<T> TaskQueue<T> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                items: VecDeque::new(),
                closed: false,
            }),
            cond: Condvar::new(),
        }
    }

    /// Enqueue an item and wake one waiter. Pushes after `close` are dropped.
    pub fn push(&self, item: T) {
        let mut inner = self.inner.lock().unwrap();
        if inner.closed {
            return;
        }
        inner.items.push_back(item);
        drop(inner);
        self.cond.notify_one();
    }

    /// Block until an item is available and remove it. Returns `None` once
    /// the queue has been closed and fully drained.
    pub fn pop(&self) -> Option<T> {
        let mut inner = self.inner.lock().unwrap();
        loop {
            if let Some(item) = inner.items.pop_front() {
                return Some(item);
            }
            if inner.closed {
                return None;
            }
            inner = self.cond.wait(inner).unwrap();
        }
    }

    /// Non-authoritative snapshot; another thread may push or pop between
    /// this returning and the caller acting on it.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().items.is_empty()
    }

    /// Close the queue and wake all waiters. Idempotent.
    pub fn close(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.closed = true;
        drop(inner);
        self.cond.notify_all();
    }
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

// src/engine/queue.rs

//! Multi-consumer queue of runnable instances shared by all workers.
//!
//! A plain `VecDeque` behind a lock, with a [`Notify`] to wake a waiting
//! worker when an instance arrives. Popping races the shutdown signal, so a
//! worker blocked here wakes as soon as the pool is cancelled.
//!
//! The queue is sized for one slot per worker. Workers only push after they
//! pop, so occupancy never exceeds that and `push` never has to wait.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;

use super::shutdown::Shutdown;

pub struct WorkQueue<I> {
    items: Arc<Mutex<VecDeque<I>>>,
    available: Arc<Notify>,
    capacity: usize,
}

// Manual impl: `I` itself does not need to be `Clone`.
impl<I> Clone for WorkQueue<I> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
            available: Arc::clone(&self.available),
            capacity: self.capacity,
        }
    }
}

impl<I: Send> WorkQueue<I> {
    /// Create a queue with one slot for each of `capacity` workers.
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Arc::new(Mutex::new(VecDeque::new())),
            available: Arc::new(Notify::new()),
            capacity,
        }
    }

    pub fn push(&self, item: I) {
        self.lock().push_back(item);
        self.available.notify_one();
    }

    /// Wait for the next instance, or `None` once `shutdown` fires.
    ///
    /// The signal is checked first, so an already-fired shutdown wins even
    /// when an instance is available.
    pub async fn pop(&self, shutdown: &Shutdown) -> Option<I> {
        tokio::select! {
            biased;
            _ = shutdown.triggered() => None,
            item = self.next_item() => Some(item),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of instances waiting to be picked up.
    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }

    async fn next_item(&self) -> I {
        loop {
            if let Some(item) = self.lock().pop_front() {
                return item;
            }
            // A push between the check above and this await leaves a permit
            // behind, so the wakeup is not lost.
            self.available.notified().await;
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<I>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// src/engine/supervisor.rs

use std::fmt;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::exec::InstanceFactory;

use super::PoolOptions;
use super::queue::WorkQueue;
use super::shutdown::Shutdown;
use super::worker::{Worker, WorkerReport};

/// Runs a fixed-size pool of identical instances.
///
/// The pool owns a work queue with one slot per worker. It is seeded with
/// `instances` fresh instances, then `instances` workers drain it, each
/// optionally putting a replacement back after a successful run.
pub struct Supervisor<F: InstanceFactory> {
    factory: Arc<F>,
    options: PoolOptions,
}

impl<F: InstanceFactory> fmt::Debug for Supervisor<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Supervisor")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<F: InstanceFactory> Supervisor<F> {
    pub fn new(factory: Arc<F>, options: PoolOptions) -> Self {
        Self { factory, options }
    }

    /// Block until every worker has retired.
    ///
    /// Per-instance failures stay inside the pool; they are logged, never
    /// returned. With zero instances this returns immediately.
    pub async fn run(self, shutdown: Shutdown) {
        let n = self.options.instances;
        if n == 0 {
            debug!("pool size is zero; nothing to run");
            return;
        }

        info!(instances = n, repeat = self.options.repeat, "supervisor started");

        let queue = WorkQueue::new(n);
        for _ in 0..n {
            queue.push(self.factory.new_instance(&shutdown));
        }
        debug!(pending = queue.len(), capacity = queue.capacity(), "work queue seeded");

        let mut workers = JoinSet::new();
        for id in 0..n {
            let worker = Worker {
                id,
                factory: Arc::clone(&self.factory),
                queue: queue.clone(),
                shutdown: shutdown.clone(),
                repeat: self.options.repeat,
            };
            workers.spawn(worker.run());
        }

        let mut total_runs = 0;
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(WorkerReport { runs, .. }) => total_runs += runs,
                Err(e) => error!(error = %e, "worker task ended abnormally"),
            }
        }

        info!(total_runs, "all workers retired; supervisor exiting");
    }
}

/// Run `n` copies of `factory`'s instances until they all retire.
///
/// Convenience form of [`Supervisor::run`].
pub async fn run<F: InstanceFactory>(
    shutdown: &Shutdown,
    factory: Arc<F>,
    n: usize,
    repeat: bool,
) {
    Supervisor::new(factory, PoolOptions { instances: n, repeat })
        .run(shutdown.clone())
        .await
}

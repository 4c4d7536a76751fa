// src/engine/worker.rs

//! Worker state machine: wait for an instance, run it, decide, repeat.

use std::sync::Arc;

use tracing::{debug, info};

use crate::exec::{Instance, InstanceFactory};

use super::core::{Decision, RetireReason, decide};
use super::queue::WorkQueue;
use super::shutdown::Shutdown;

/// Summary a worker hands back once it has retired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerReport {
    pub worker: usize,
    /// Instances this worker picked up and ran.
    pub runs: usize,
    pub reason: RetireReason,
}

pub(crate) struct Worker<F: InstanceFactory> {
    pub(crate) id: usize,
    pub(crate) factory: Arc<F>,
    pub(crate) queue: WorkQueue<F::Instance>,
    pub(crate) shutdown: Shutdown,
    pub(crate) repeat: bool,
}

impl<F: InstanceFactory> Worker<F> {
    /// Loop until retired.
    ///
    /// A worker runs at most one instance at a time; each loop iteration is
    /// Waiting → Running → Deciding.
    pub(crate) async fn run(self) -> WorkerReport {
        let mut runs = 0;

        let reason = loop {
            // Waiting
            let Some(instance) = self.queue.pop(&self.shutdown).await else {
                debug!(worker = self.id, "shutdown while waiting for an instance");
                break RetireReason::Cancelled;
            };

            // Running
            runs += 1;
            debug!(worker = self.id, run = runs, "running instance");
            let outcome = instance.run().await;

            // Deciding
            match decide(&outcome, self.repeat) {
                Decision::Requeue => {
                    self.queue.push(self.factory.new_instance(&self.shutdown));
                    debug!(worker = self.id, pending = self.queue.len(), "instance requeued");
                }
                Decision::Retire(reason) => {
                    debug!(worker = self.id, ?outcome, "instance finished; retiring");
                    break reason;
                }
            }
        };

        info!(worker = self.id, runs, ?reason, "worker retired");
        WorkerReport {
            worker: self.id,
            runs,
            reason,
        }
    }
}

// src/engine/mod.rs

//! Supervision engine for procpool.
//!
//! This module ties together:
//! - the shutdown signal every worker and instance observes
//! - the work queue shared by all workers, one slot per worker
//! - the per-worker wait / run / decide loop
//! - the supervisor that seeds the queue and waits for all workers
//!
//! The pure decision step lives in [`core`]; the async loop around it is
//! in [`worker`] and [`supervisor`].

/// How one instance ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Exited with status 0.
    Success,
    /// Exited non-zero; `-1` when killed by a signal.
    Failed(i32),
    /// Could not be started (bad path, bad environment, ...).
    StartFailed(String),
    /// Stopped by the shutdown signal.
    Cancelled,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Success)
    }
}

/// Pool shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolOptions {
    /// Number of workers and queue slots. Zero means do nothing.
    pub instances: usize,
    /// Replace successfully finished instances with fresh ones.
    pub repeat: bool,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            instances: 1,
            repeat: false,
        }
    }
}

pub mod core;
pub mod queue;
pub mod shutdown;
pub mod supervisor;
pub mod worker;

pub use self::core::{Decision, RetireReason, decide};
pub use queue::WorkQueue;
pub use shutdown::{Shutdown, spawn_ctrl_c_bridge};
pub use supervisor::{Supervisor, run};
pub use worker::WorkerReport;

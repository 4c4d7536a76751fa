// src/exec/backend.rs

//! Pluggable instance abstraction.
//!
//! The supervisor never touches `tokio::process` directly. It asks an
//! [`InstanceFactory`] for fresh instances and runs them through the
//! [`Instance`] trait, which keeps the pool loop testable with fakes that
//! don't spawn real processes.
//!
//! - [`CommandSpec`](super::CommandSpec) is the production factory; its
//!   instances are [`CommandInstance`](super::CommandInstance)s.
//! - Tests can provide factories whose instances return scripted outcomes.

use std::future::Future;
use std::pin::Pin;

use crate::engine::{RunOutcome, Shutdown};

/// One single-use unit of work.
///
/// `run` consumes the instance: repeating work always means asking the
/// factory for a new one.
pub trait Instance: Send + 'static {
    /// Start the work and wait for it to end.
    ///
    /// Implementations must observe the shutdown signal they were created
    /// with and return [`RunOutcome::Cancelled`] promptly once it fires.
    fn run(self) -> Pin<Box<dyn Future<Output = RunOutcome> + Send>>;
}

/// Produces independent instances bound to a shutdown signal.
pub trait InstanceFactory: Send + Sync + 'static {
    type Instance: Instance;

    /// Build a new, not-yet-started instance.
    ///
    /// Must not start any work and must not fail; problems surface when the
    /// instance is run.
    fn new_instance(&self, shutdown: &Shutdown) -> Self::Instance;
}

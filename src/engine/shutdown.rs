// src/engine/shutdown.rs

//! Pool-wide cancellation signal.
//!
//! A [`Shutdown`] is a single-shot broadcast flag. Every clone observes the
//! same state; once triggered it stays triggered, and both current and future
//! waiters on [`Shutdown::triggered`] resolve immediately.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<bool>>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Fire the signal. Calling this again (or after every worker already
    /// retired) has no further effect.
    pub fn trigger(&self) {
        let was_triggered = self.tx.send_replace(true);
        if !was_triggered {
            info!("shutdown triggered");
        }
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolve once the signal has fired.
    pub async fn triggered(&self) {
        let mut rx = self.tx.subscribe();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            // The sender lives in `self`, so this only errs if it is dropped.
            if rx.changed().await.is_err() {
                return;
            }
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Ctrl-C → shutdown.
///
/// Spawns one task that converts the first interrupt into a triggered
/// [`Shutdown`]. Failing to install the handler is logged and the pool keeps
/// running without it.
pub fn spawn_ctrl_c_bridge(shutdown: Shutdown) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl+C");
            return;
        }
        info!("interrupt received");
        shutdown.trigger();
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn trigger_is_idempotent_and_sticky() {
        let shutdown = Shutdown::new();
        assert!(!shutdown.is_triggered());

        shutdown.trigger();
        shutdown.trigger();
        assert!(shutdown.is_triggered());

        // A waiter arriving after the fact still resolves.
        tokio::time::timeout(Duration::from_secs(1), shutdown.triggered())
            .await
            .expect("late waiter should resolve");
    }

    #[tokio::test]
    async fn clones_share_state() {
        let shutdown = Shutdown::new();
        let clone = shutdown.clone();

        let waiter = tokio::spawn(async move { clone.triggered().await });
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should wake")
            .expect("waiter task should not panic");
    }
}

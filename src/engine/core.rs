// src/engine/core.rs

//! Pure per-worker decision step.
//!
//! Given how an instance ended and the pool's repeat policy, decide whether
//! the worker queues a replacement or retires. No IO happens here; the async
//! worker loop in [`worker`](super::worker) executes the decision.

use super::RunOutcome;

/// Why a worker stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetireReason {
    /// Instance succeeded and the pool does not repeat.
    Completed,
    /// Instance exited non-zero or could not be started.
    Failed,
    /// Shutdown fired while waiting or running.
    Cancelled,
}

/// What the worker does after an instance ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Build a fresh instance, queue it, go back to waiting.
    Requeue,
    Retire(RetireReason),
}

/// Failures always retire, even with `repeat`: restarting a broken command
/// would spin.
pub fn decide(outcome: &RunOutcome, repeat: bool) -> Decision {
    match outcome {
        RunOutcome::Success if repeat => Decision::Requeue,
        RunOutcome::Success => Decision::Retire(RetireReason::Completed),
        RunOutcome::Failed(_) | RunOutcome::StartFailed(_) => {
            Decision::Retire(RetireReason::Failed)
        }
        RunOutcome::Cancelled => Decision::Retire(RetireReason::Cancelled),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_requeues_only_with_repeat() {
        assert_eq!(decide(&RunOutcome::Success, true), Decision::Requeue);
        assert_eq!(
            decide(&RunOutcome::Success, false),
            Decision::Retire(RetireReason::Completed)
        );
    }

    #[test]
    fn failures_retire_regardless_of_repeat() {
        for repeat in [false, true] {
            assert_eq!(
                decide(&RunOutcome::Failed(1), repeat),
                Decision::Retire(RetireReason::Failed)
            );
            assert_eq!(
                decide(&RunOutcome::StartFailed("enoent".into()), repeat),
                Decision::Retire(RetireReason::Failed)
            );
        }
    }

    #[test]
    fn cancellation_never_requeues() {
        assert_eq!(
            decide(&RunOutcome::Cancelled, true),
            Decision::Retire(RetireReason::Cancelled)
        );
    }
}

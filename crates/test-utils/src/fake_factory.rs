use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use procpool::engine::{RunOutcome, Shutdown};
use procpool::exec::{Instance, InstanceFactory};

/// What a scripted instance does when run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    /// Sleep for the factory's run time, then exit 0.
    Succeed,
    /// Sleep for the factory's run time, then exit with this code.
    Fail(i32),
    /// Fail to start at all.
    StartFail,
    /// Run until the shutdown signal fires.
    BlockUntilCancelled,
}

/// Counters shared between a factory, its instances and the test.
#[derive(Debug, Default)]
pub struct ScriptStats {
    pub created: AtomicUsize,
    pub started: AtomicUsize,
    pub succeeded: AtomicUsize,
    pub failed: AtomicUsize,
    pub cancelled: AtomicUsize,
    /// Instance ids in the order they were started.
    pub started_ids: Mutex<Vec<usize>>,
}

impl ScriptStats {
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn succeeded(&self) -> usize {
        self.succeeded.load(Ordering::SeqCst)
    }

    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }

    pub fn cancelled(&self) -> usize {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn started_ids(&self) -> Vec<usize> {
        self.started_ids.lock().unwrap().clone()
    }
}

type ScriptFn = dyn Fn(usize) -> Script + Send + Sync;

/// A fake `InstanceFactory` that:
/// - numbers every instance it creates (0, 1, 2, ...)
/// - asks a script what instance `i` should do
/// - records starts and outcomes in [`ScriptStats`]
/// - optionally fires a shutdown after the k-th success
pub struct ScriptedFactory {
    script: Box<ScriptFn>,
    run_time: Duration,
    stop_after_successes: Option<(usize, Shutdown)>,
    stats: Arc<ScriptStats>,
}

impl ScriptedFactory {
    pub fn new(script: impl Fn(usize) -> Script + Send + Sync + 'static) -> Self {
        Self {
            script: Box::new(script),
            run_time: Duration::from_millis(1),
            stop_after_successes: None,
            stats: Arc::new(ScriptStats::default()),
        }
    }

    /// Every instance behaves the same.
    pub fn always(script: Script) -> Self {
        Self::new(move |_| script)
    }

    pub fn run_time(mut self, run_time: Duration) -> Self {
        self.run_time = run_time;
        self
    }

    /// Trigger `shutdown` as soon as the `count`-th instance succeeds.
    pub fn stop_after_successes(mut self, count: usize, shutdown: Shutdown) -> Self {
        self.stop_after_successes = Some((count, shutdown));
        self
    }

    pub fn stats(&self) -> Arc<ScriptStats> {
        Arc::clone(&self.stats)
    }
}

impl InstanceFactory for ScriptedFactory {
    type Instance = ScriptedInstance;

    fn new_instance(&self, shutdown: &Shutdown) -> ScriptedInstance {
        let id = self.stats.created.fetch_add(1, Ordering::SeqCst);
        ScriptedInstance {
            id,
            script: (self.script)(id),
            run_time: self.run_time,
            shutdown: shutdown.clone(),
            stop_after_successes: self.stop_after_successes.clone(),
            stats: Arc::clone(&self.stats),
        }
    }
}

pub struct ScriptedInstance {
    id: usize,
    script: Script,
    run_time: Duration,
    shutdown: Shutdown,
    stop_after_successes: Option<(usize, Shutdown)>,
    stats: Arc<ScriptStats>,
}

impl ScriptedInstance {
    async fn execute(&self) -> RunOutcome {
        match self.script {
            Script::StartFail => {
                RunOutcome::StartFailed(format!("instance {} cannot start", self.id))
            }
            Script::BlockUntilCancelled => {
                self.shutdown.triggered().await;
                RunOutcome::Cancelled
            }
            Script::Succeed | Script::Fail(_) => {
                tokio::select! {
                    biased;
                    _ = self.shutdown.triggered() => RunOutcome::Cancelled,
                    _ = tokio::time::sleep(self.run_time) => match self.script {
                        Script::Fail(code) => RunOutcome::Failed(code),
                        _ => RunOutcome::Success,
                    },
                }
            }
        }
    }
}

impl Instance for ScriptedInstance {
    fn run(self) -> Pin<Box<dyn Future<Output = RunOutcome> + Send>> {
        Box::pin(async move {
            if self.shutdown.is_triggered() {
                self.stats.cancelled.fetch_add(1, Ordering::SeqCst);
                return RunOutcome::Cancelled;
            }

            self.stats.started.fetch_add(1, Ordering::SeqCst);
            self.stats.started_ids.lock().unwrap().push(self.id);

            let outcome = self.execute().await;
            match &outcome {
                RunOutcome::Success => {
                    let total = self.stats.succeeded.fetch_add(1, Ordering::SeqCst) + 1;
                    if let Some((count, shutdown)) = &self.stop_after_successes {
                        if total >= *count {
                            shutdown.trigger();
                        }
                    }
                }
                RunOutcome::Failed(_) | RunOutcome::StartFailed(_) => {
                    self.stats.failed.fetch_add(1, Ordering::SeqCst);
                }
                RunOutcome::Cancelled => {
                    self.stats.cancelled.fetch_add(1, Ordering::SeqCst);
                }
            }
            outcome
        })
    }
}

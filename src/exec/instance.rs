// src/exec/instance.rs

//! A single run of a [`CommandSpec`](super::CommandSpec).

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::process::Stdio;

use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::engine::{RunOutcome, Shutdown};
use crate::errors::{ProcpoolError, Result};

use super::backend::Instance;
use super::command_spec::parse_env_entry;
use super::sink::OutputSink;

/// One not-yet-started child process, bound to the pool's shutdown signal.
///
/// Created by [`CommandSpec`](super::CommandSpec) through
/// [`InstanceFactory`](super::InstanceFactory); consumed by [`Instance::run`].
#[derive(Debug)]
pub struct CommandInstance {
    pub(super) path: String,
    pub(super) args: Vec<String>,
    pub(super) env: Vec<String>,
    pub(super) dir: Option<PathBuf>,
    pub(super) stdout: OutputSink,
    pub(super) stderr: OutputSink,
    pub(super) shutdown: Shutdown,
}

impl Instance for CommandInstance {
    fn run(self) -> Pin<Box<dyn Future<Output = RunOutcome> + Send>> {
        Box::pin(async move {
            if self.shutdown.is_triggered() {
                debug!(path = %self.path, "shutdown already requested; not starting instance");
                return RunOutcome::Cancelled;
            }

            let path = self.path.clone();
            match self.run_inner().await {
                Ok(outcome) => outcome,
                Err(err) => {
                    warn!(path = %path, error = %err, "instance failed to run");
                    RunOutcome::StartFailed(err.to_string())
                }
            }
        })
    }
}

impl CommandInstance {
    pub fn path(&self) -> &str {
        &self.path
    }

    fn build_command(&self) -> Result<Command> {
        let mut cmd = Command::new(&self.path);
        cmd.args(&self.args);

        if !self.env.is_empty() {
            cmd.env_clear();
            for entry in &self.env {
                let (key, value) = parse_env_entry(entry)?;
                cmd.env(key, value);
            }
        }

        if let Some(dir) = &self.dir {
            cmd.current_dir(dir);
        }

        cmd.stdin(Stdio::null())
            .stdout(self.stdout.to_stdio()?)
            .stderr(self.stderr.to_stdio()?)
            .kill_on_drop(true);

        Ok(cmd)
    }

    async fn run_inner(self) -> Result<RunOutcome> {
        let mut cmd = self.build_command()?;

        let mut child = cmd.spawn().map_err(|source| ProcpoolError::Spawn {
            path: self.path.clone(),
            source,
        })?;

        let pid = child.id();
        info!(path = %self.path, ?pid, "instance started");

        let mut relays = Vec::new();
        if let Some(out) = child.stdout.take() {
            relays.extend(self.stdout.relay(out));
        }
        if let Some(err) = child.stderr.take() {
            relays.extend(self.stderr.relay(err));
        }

        // Either the child exits on its own, or the pool is shutting down and
        // the child gets killed.
        tokio::select! {
            status_res = child.wait() => {
                let status = status_res?;

                // Drain teed output before reporting the exit. A background
                // grandchild can hold the pipe open forever, so shutdown still
                // wins here.
                let interrupted = tokio::select! {
                    biased;
                    _ = self.shutdown.triggered() => true,
                    _ = drain_relays(&mut relays) => false,
                };
                if interrupted {
                    abort_relays(&relays);
                    info!(
                        path = %self.path,
                        ?pid,
                        "shutdown requested while draining output; abandoning relays"
                    );
                    return Ok(RunOutcome::Cancelled);
                }

                let code = status.code().unwrap_or(-1);
                info!(
                    path = %self.path,
                    ?pid,
                    exit_code = code,
                    success = status.success(),
                    "instance exited"
                );

                Ok(if status.success() {
                    RunOutcome::Success
                } else {
                    RunOutcome::Failed(code)
                })
            }

            _ = self.shutdown.triggered() => {
                info!(path = %self.path, ?pid, "shutdown requested; killing instance");
                if let Err(e) = child.kill().await {
                    warn!(
                        path = %self.path,
                        ?pid,
                        error = %e,
                        "failed to kill child process on shutdown"
                    );
                }
                abort_relays(&relays);
                Ok(RunOutcome::Cancelled)
            }
        }
    }
}

async fn drain_relays(relays: &mut [JoinHandle<()>]) {
    for relay in relays.iter_mut() {
        if let Err(e) = relay.await {
            debug!(error = %e, "output relay ended abnormally");
        }
    }
}

fn abort_relays(relays: &[JoinHandle<()>]) {
    for relay in relays {
        relay.abort();
    }
}

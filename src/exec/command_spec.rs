// src/exec/command_spec.rs

//! Immutable template for the command every pool slot runs.

use std::path::{Path, PathBuf};

use crate::engine::Shutdown;
use crate::errors::{ProcpoolError, Result};

use super::backend::InstanceFactory;
use super::instance::CommandInstance;
use super::sink::OutputSink;

/// What to run: executable, arguments, environment, working directory and
/// output sinks.
///
/// Build it once with the builder methods, then share it (usually as an
/// `Arc<CommandSpec>`). The supervisor only ever reads it.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    path: String,
    args: Vec<String>,
    env: Vec<String>,
    dir: Option<PathBuf>,
    stdout: OutputSink,
    stderr: OutputSink,
}

impl CommandSpec {
    /// Start a spec for `path` with no arguments, inherited environment and
    /// working directory, and both streams discarded.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            args: Vec::new(),
            env: Vec::new(),
            dir: None,
            stdout: OutputSink::Discard,
            stderr: OutputSink::Discard,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Add one `KEY=VALUE` entry.
    ///
    /// As soon as any entry is present the child gets exactly these
    /// variables instead of the caller's environment.
    pub fn env(mut self, entry: impl Into<String>) -> Self {
        self.env.push(entry.into());
        self
    }

    pub fn envs<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.env.extend(entries.into_iter().map(Into::into));
        self
    }

    /// Working directory; an empty path keeps the caller's.
    pub fn dir(mut self, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        self.dir = if dir.as_os_str().is_empty() {
            None
        } else {
            Some(dir)
        };
        self
    }

    pub fn stdout(mut self, sink: OutputSink) -> Self {
        self.stdout = sink;
        self
    }

    pub fn stderr(mut self, sink: OutputSink) -> Self {
        self.stderr = sink;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    pub fn environment(&self) -> &[String] {
        &self.env
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    pub fn stdout_sink(&self) -> &OutputSink {
        &self.stdout
    }

    pub fn stderr_sink(&self) -> &OutputSink {
        &self.stderr
    }
}

impl InstanceFactory for CommandSpec {
    type Instance = CommandInstance;

    fn new_instance(&self, shutdown: &Shutdown) -> CommandInstance {
        CommandInstance {
            path: self.path.clone(),
            args: self.args.clone(),
            env: self.env.clone(),
            dir: self.dir.clone(),
            stdout: self.stdout.clone(),
            stderr: self.stderr.clone(),
            shutdown: shutdown.clone(),
        }
    }
}

/// Split a `KEY=VALUE` entry. The value may contain further `=`s.
pub fn parse_env_entry(entry: &str) -> Result<(&str, &str)> {
    match entry.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key, value)),
        _ => Err(ProcpoolError::InvalidEnv(entry.to_string())),
    }
}

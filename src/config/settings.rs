// src/config/settings.rs

//! Effective settings: config file values with CLI overrides applied.

use std::path::PathBuf;

use tracing::warn;

use crate::cli::CliArgs;
use crate::config::model::{CommandSection, ConfigFile, OutputSection};
use crate::config::validate::validate_command;
use crate::engine::PoolOptions;
use crate::errors::{ProcpoolError, Result};
use crate::exec::sink::sink_for_file;
use crate::exec::{CommandSpec, OutputSink, SharedFile, StdStream, open_sink};

const DEFAULT_INSTANCES: i64 = 1;

/// Largest pool `resolve` accepts. Every instance is built up front.
pub const MAX_INSTANCES: i64 = 1024;

#[derive(Debug, Clone)]
pub struct Settings {
    /// As given; anything below 1 means "run nothing".
    pub instances: i64,
    pub repeat: bool,
    /// `None` when neither the CLI nor the file names a command.
    pub command: Option<CommandSection>,
    pub output: OutputSection,
}

impl Settings {
    /// Merge CLI arguments over an optional config file.
    ///
    /// - positional command replaces `[command].path` / `args` (env and dir
    ///   from the file still apply)
    /// - `-n` replaces `[pool].instances`; more than [`MAX_INSTANCES`] is an
    ///   error
    /// - `-r` forces repeat on
    /// - `--out` / `--err` replace the file's output paths; `--tee` forces tee
    pub fn resolve(cli: &CliArgs, file: Option<ConfigFile>) -> Result<Self> {
        let (pool, file_command, output) = match file {
            Some(cfg) => (cfg.pool, cfg.command, cfg.output),
            None => Default::default(),
        };

        let command = match cli.command.split_first() {
            Some((path, args)) => {
                let base = file_command.unwrap_or_else(|| CommandSection {
                    path: String::new(),
                    args: Vec::new(),
                    env: Vec::new(),
                    dir: None,
                });
                let merged = CommandSection {
                    path: path.clone(),
                    args: args.to_vec(),
                    ..base
                };
                validate_command(&merged)?;
                Some(merged)
            }
            None => file_command,
        };

        let instances = cli
            .instances
            .or(pool.instances)
            .unwrap_or(DEFAULT_INSTANCES);
        if instances > MAX_INSTANCES {
            return Err(ProcpoolError::ConfigError(format!(
                "instances = {instances} exceeds the limit of {MAX_INSTANCES}"
            )));
        }

        Ok(Self {
            instances,
            repeat: cli.repeat || pool.repeat.unwrap_or(false),
            command,
            output: OutputSection {
                stdout: pick(cli.out.as_ref(), output.stdout),
                stderr: pick(cli.err.as_ref(), output.stderr),
                tee: cli.tee || output.tee,
            },
        })
    }

    pub fn pool_options(&self) -> PoolOptions {
        PoolOptions {
            instances: usize::try_from(self.instances).unwrap_or(0),
            repeat: self.repeat,
        }
    }

    /// Build the command template, opening output files.
    ///
    /// Output files that fail to open fall back to our own streams with a
    /// warning.
    pub fn command_spec(&self) -> Option<CommandSpec> {
        let command = self.command.as_ref()?;
        let (stdout, stderr) = open_sinks(&self.output);

        let mut spec = CommandSpec::new(command.path.clone())
            .args(command.args.iter().cloned())
            .envs(command.env.iter().cloned())
            .stdout(stdout)
            .stderr(stderr);
        if let Some(dir) = &command.dir {
            spec = spec.dir(dir.clone());
        }
        Some(spec)
    }
}

fn pick(cli: Option<&PathBuf>, file: Option<PathBuf>) -> Option<PathBuf> {
    cli.cloned().or(file)
}

/// Same path for both streams shares one file handle.
fn open_sinks(output: &OutputSection) -> (OutputSink, OutputSink) {
    match (&output.stdout, &output.stderr) {
        (Some(out), Some(err)) if out == err => match SharedFile::open_append(out) {
            Ok(file) => (
                sink_for_file(file.clone(), StdStream::Stdout, output.tee),
                sink_for_file(file, StdStream::Stderr, output.tee),
            ),
            Err(e) => {
                warn!(
                    path = %out.display(),
                    error = %e,
                    "failed to open output file; falling back to stdout/stderr"
                );
                (OutputSink::Inherit, OutputSink::Inherit)
            }
        },
        (out, err) => (
            open_sink(out.as_deref(), StdStream::Stdout, output.tee),
            open_sink(err.as_deref(), StdStream::Stderr, output.tee),
        ),
    }
}

// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `procpool`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "procpool",
    version,
    about = "Run N copies of a command, optionally restarting each one after it succeeds.",
    long_about = None
)]
pub struct CliArgs {
    /// Number of concurrent instances.
    ///
    /// Default: `[pool].instances` from the config file, else 1. Values
    /// below 1 run nothing.
    #[arg(short = 'n', long = "instances", value_name = "N", allow_negative_numbers = true)]
    pub instances: Option<i64>,

    /// Start a fresh instance after each successful exit.
    #[arg(short = 'r', long)]
    pub repeat: bool,

    /// Append child stdout to this file instead of inheriting ours.
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Append child stderr to this file instead of inheriting ours.
    #[arg(long, value_name = "PATH")]
    pub err: Option<PathBuf>,

    /// With `--out`/`--err`, also echo child output to our own streams.
    #[arg(long)]
    pub tee: bool,

    /// Optional TOML config file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PROCPOOL_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve settings and print them, but don't start anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Command to run, followed by its arguments.
    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

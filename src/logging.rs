// src/logging.rs

//! Supervisor diagnostics on stderr.
//!
//! The filter comes from `--log-level` when given, otherwise from
//! `PROCPOOL_LOG`, otherwise `info`. The environment variable takes full
//! `EnvFilter` directives, so `PROCPOOL_LOG=procpool::exec=debug` narrows
//! the output to process handling. Stdout is left to the children.

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::cli::LogLevel;

/// Environment variable consulted when no `--log-level` is given.
pub const LOG_ENV_VAR: &str = "PROCPOOL_LOG";

const DEFAULT_DIRECTIVES: &str = "info";

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env_value = std::env::var(LOG_ENV_VAR).ok();
    let directives = filter_directives(cli_level, env_value.as_deref());

    let filter = EnvFilter::try_new(&directives).unwrap_or_else(|e| {
        eprintln!("procpool: ignoring {LOG_ENV_VAR}={directives:?}: {e}");
        EnvFilter::new(DEFAULT_DIRECTIVES)
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .context("failed to install log subscriber")
}

fn filter_directives(cli_level: Option<LogLevel>, env_value: Option<&str>) -> String {
    if let Some(level) = cli_level {
        return level.as_str().to_string();
    }
    match env_value.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => DEFAULT_DIRECTIVES.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_flag_beats_env() {
        assert_eq!(filter_directives(Some(LogLevel::Trace), Some("error")), "trace");
    }

    #[test]
    fn env_directives_pass_through_trimmed() {
        assert_eq!(
            filter_directives(None, Some("  procpool::exec=debug,warn ")),
            "procpool::exec=debug,warn"
        );
    }

    #[test]
    fn blank_or_missing_env_uses_info() {
        assert_eq!(filter_directives(None, Some("   ")), "info");
        assert_eq!(filter_directives(None, None), "info");
    }

    #[test]
    fn every_cli_level_is_a_valid_filter() {
        for level in [
            LogLevel::Error,
            LogLevel::Warn,
            LogLevel::Info,
            LogLevel::Debug,
            LogLevel::Trace,
        ] {
            assert!(EnvFilter::try_new(filter_directives(Some(level), None)).is_ok());
        }
    }
}

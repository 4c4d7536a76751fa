// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [pool]
/// instances = 4
/// repeat = true
///
/// [command]
/// path = "/usr/local/bin/worker"
/// args = ["--batch", "nightly"]
/// env = ["MODE=prod"]
/// dir = "/srv/work"
///
/// [output]
/// stdout = "worker.out.log"
/// stderr = "worker.err.log"
/// tee = false
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub pool: PoolSection,

    /// Absent means the command must come from the CLI.
    #[serde(default)]
    pub command: Option<CommandSection>,

    #[serde(default)]
    pub output: OutputSection,
}

/// Validated configuration. Build it with `ConfigFile::try_from(raw)`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub pool: PoolSection,
    pub command: Option<CommandSection>,
    pub output: OutputSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        pool: PoolSection,
        command: Option<CommandSection>,
        output: OutputSection,
    ) -> Self {
        Self {
            pool,
            command,
            output,
        }
    }
}

/// `[pool]` section. Unset fields fall back to CLI values or built-in
/// defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PoolSection {
    /// Number of concurrent instances; below 1 runs nothing.
    #[serde(default)]
    pub instances: Option<i64>,

    #[serde(default)]
    pub repeat: Option<bool>,
}

/// `[command]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandSection {
    /// Executable to run. Relative paths resolve against `dir` when set.
    pub path: String,

    #[serde(default)]
    pub args: Vec<String>,

    /// `KEY=VALUE` entries. Non-empty replaces the inherited environment.
    #[serde(default)]
    pub env: Vec<String>,

    #[serde(default)]
    pub dir: Option<PathBuf>,
}

/// `[output]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct OutputSection {
    #[serde(default)]
    pub stdout: Option<PathBuf>,

    #[serde(default)]
    pub stderr: Option<PathBuf>,

    /// Also echo file-bound output to our own streams.
    #[serde(default)]
    pub tee: bool,
}

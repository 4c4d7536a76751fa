#![allow(dead_code)]

use std::path::PathBuf;

use procpool::config::{CommandSection, ConfigFile, RawConfigFile};

/// Builder for `ConfigFile` to simplify test setup.
pub struct RawConfigBuilder {
    config: RawConfigFile,
}

impl RawConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn instances(mut self, n: i64) -> Self {
        self.config.pool.instances = Some(n);
        self
    }

    pub fn repeat(mut self, val: bool) -> Self {
        self.config.pool.repeat = Some(val);
        self
    }

    pub fn command(mut self, path: &str, args: &[&str]) -> Self {
        let command = self.command_mut();
        command.path = path.to_string();
        command.args = args.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn env(mut self, entry: &str) -> Self {
        self.command_mut().env.push(entry.to_string());
        self
    }

    pub fn dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.command_mut().dir = Some(dir.into());
        self
    }

    pub fn stdout(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output.stdout = Some(path.into());
        self
    }

    pub fn stderr(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output.stderr = Some(path.into());
        self
    }

    pub fn tee(mut self, val: bool) -> Self {
        self.config.output.tee = val;
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }

    fn command_mut(&mut self) -> &mut CommandSection {
        self.config.command.get_or_insert_with(|| CommandSection {
            path: String::new(),
            args: Vec::new(),
            env: Vec::new(),
            dir: None,
        })
    }
}

impl Default for RawConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

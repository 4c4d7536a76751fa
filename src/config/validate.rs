// src/config/validate.rs

use crate::config::model::{CommandSection, ConfigFile, RawConfigFile};
use crate::errors::{ProcpoolError, Result};
use crate::exec::parse_env_entry;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = ProcpoolError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.pool, raw.command, raw.output))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    if let Some(command) = &cfg.command {
        validate_command(command)?;
    }
    Ok(())
}

pub(crate) fn validate_command(command: &CommandSection) -> Result<()> {
    if command.path.trim().is_empty() {
        return Err(ProcpoolError::ConfigError(
            "[command].path must not be empty".to_string(),
        ));
    }

    for entry in &command.env {
        parse_env_entry(entry).map_err(|_| {
            ProcpoolError::ConfigError(format!(
                "[command].env entry {entry:?} must have the form KEY=VALUE"
            ))
        })?;
    }

    Ok(())
}

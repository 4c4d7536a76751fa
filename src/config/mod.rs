// src/config/mod.rs

//! Configuration loading and validation for procpool.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate basic invariants like a non-empty command path (`validate.rs`).
//! - Merge the file with CLI overrides into effective `Settings` (`settings.rs`).

pub mod loader;
pub mod model;
pub mod settings;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, parse_str};
pub use model::{CommandSection, ConfigFile, OutputSection, PoolSection, RawConfigFile};
pub use settings::{MAX_INSTANCES, Settings};

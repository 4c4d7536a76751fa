// src/exec/mod.rs

//! Process execution layer.
//!
//! This module turns a command template into child processes started with
//! `tokio::process::Command`, and is the only place that talks to the OS.
//!
//! - [`backend`] provides the `Instance` / `InstanceFactory` traits the
//!   supervisor is written against, so tests can swap in fakes.
//! - [`command_spec`] holds the immutable `CommandSpec` template (the
//!   production factory).
//! - [`instance`] runs one `CommandInstance` to completion or until shutdown.
//! - [`sink`] resolves stdout/stderr destinations, including file tee-ing.

pub mod backend;
pub mod command_spec;
pub mod instance;
pub mod sink;

pub use backend::{Instance, InstanceFactory};
pub use command_spec::{CommandSpec, parse_env_entry};
pub use instance::CommandInstance;
pub use sink::{OutputSink, SharedFile, StdStream, open_sink};

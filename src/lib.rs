// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{Settings, load_and_validate};
use crate::engine::{Shutdown, Supervisor, spawn_ctrl_c_bridge};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading + CLI overrides
/// - output sink selection
/// - Ctrl-C handling
/// - the supervisor pool
pub async fn run(args: CliArgs) -> Result<()> {
    let file_cfg = match &args.config {
        Some(path) => Some(load_and_validate(path)?),
        None => None,
    };
    let settings = Settings::resolve(&args, file_cfg)?;

    if args.dry_run {
        print_dry_run(&settings);
        return Ok(());
    }

    let Some(spec) = settings.command_spec() else {
        debug!("no command given; nothing to do");
        return Ok(());
    };

    let shutdown = Shutdown::new();
    let bridge = spawn_ctrl_c_bridge(shutdown.clone());

    info!(path = %spec.path(), args = ?spec.arguments(), "launching pool");
    Supervisor::new(Arc::new(spec), settings.pool_options())
        .run(shutdown)
        .await;

    bridge.abort();
    Ok(())
}

/// Print the resolved settings without starting anything.
fn print_dry_run(settings: &Settings) {
    println!("procpool dry-run");
    println!("  pool.instances = {}", settings.instances);
    println!("  pool.repeat = {}", settings.repeat);

    match &settings.command {
        Some(cmd) => {
            println!("  command.path = {}", cmd.path);
            if !cmd.args.is_empty() {
                println!("  command.args = {:?}", cmd.args);
            }
            if !cmd.env.is_empty() {
                println!("  command.env = {:?}", cmd.env);
            }
            if let Some(dir) = &cmd.dir {
                println!("  command.dir = {}", dir.display());
            }
        }
        None => println!("  command = (none)"),
    }

    let describe = |path: &Option<std::path::PathBuf>| match path {
        Some(p) => p.display().to_string(),
        None => "(inherit)".to_string(),
    };
    println!("  output.stdout = {}", describe(&settings.output.stdout));
    println!("  output.stderr = {}", describe(&settings.output.stderr));
    if settings.output.tee {
        println!("  output.tee = true");
    }

    debug!("dry-run complete (no execution)");
}

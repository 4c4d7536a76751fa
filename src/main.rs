// src/main.rs

use std::process::ExitCode;

use procpool::{cli, logging, run};

/// Exit 0 once every worker has retired, 1 if the pool could not be set up.
/// Instance failures never change the exit status.
#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();

    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("procpool: {err:#}");
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("procpool error: {err:?}");
            ExitCode::FAILURE
        }
    }
}

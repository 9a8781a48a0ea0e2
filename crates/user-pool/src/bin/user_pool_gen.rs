//! Generates a pool of synthetic users and writes it to a file.
//!
//! Settings come from command-line flags, `USER_POOL_*` environment
//! variables, and configuration files; see `user_pool::settings`.

use std::env;
use std::io::{self, Write};
use std::process::ExitCode;

use tracing::{error, warn};
use tracing_subscriber::{EnvFilter, fmt};
use user_pool::pipeline::{PipelineError, RunSummary, run};
use user_pool::settings::load_settings;

fn main() -> ExitCode {
    if let Err(err) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(io::stderr)
        .try_init()
    {
        warn!(error = %err, "tracing init failed");
    }

    match generate() {
        Ok(summary) => {
            write_success(&summary);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "user pool generation failed");
            if let Err(write_err) = writeln!(io::stderr().lock(), "{err}") {
                drop(write_err);
            }
            ExitCode::FAILURE
        }
    }
}

fn generate() -> Result<RunSummary, PipelineError> {
    let settings = load_settings(env::args_os())?;
    run(&settings)
}

fn write_success(summary: &RunSummary) {
    let message = format!(
        "Wrote {} users ({}) to {}",
        summary.records, summary.mode, summary.path
    );
    if let Err(err) = writeln!(io::stdout().lock(), "{message}") {
        drop(err);
    }
}

//! ERGM network simulation binary.
//!
//! `sim <config-file>` simulates networks as configured; `sim -h` dumps
//! the recognised configuration keywords to stderr. Exit code 0 on
//! success, 1 on any configuration or input error.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;

use ergm_cli::{
    cli::{SimArgs, run_sim},
    logging::{self, LoggingError},
};

fn try_main() -> Result<()> {
    let args = SimArgs::parse();
    run_sim(&args).context("simulation failed")?;
    Ok(())
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }
    if let Err(err) = try_main() {
        error!(error = %err, cause = ?err.root_cause(), "sim failed");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

/// Emit a fallback diagnostic to stderr when tracing initialization fails.
#[expect(
    clippy::print_stderr,
    reason = "one-off diagnostic before tracing is initialized"
)]
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialize logging: {err}");
}

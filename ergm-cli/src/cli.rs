//! Argument parsing and command execution for the two binaries.
//!
//! Both binaries take a single configuration-file argument. `-h` keeps its
//! historical meaning: it dumps the recognised configuration keywords and
//! statistic names to stderr, so clap's automatic help flag is disabled.

use std::path::PathBuf;

use clap::Parser;
use rayon::prelude::*;
use thiserror::Error;
use tracing::info;

use ergm_core::{Config, ErgmError, describe_keywords, run_estimation_task, run_simulation};

/// Arguments of the `estim` binary.
#[derive(Clone, Debug, Parser)]
#[command(
    name = "estim",
    about = "Estimate ERGM parameters from an observed network.",
    disable_help_flag = true
)]
pub struct EstimArgs {
    /// Dump recognised configuration keywords and statistics to stderr.
    #[arg(short = 'h', long = "help")]
    pub list_keywords: bool,

    /// Configuration file.
    pub config: Option<PathBuf>,

    /// Number of independent estimation tasks to run in parallel; each gets
    /// its own seed and output-file suffix.
    #[arg(short = 't', long = "tasks", default_value_t = 1)]
    pub tasks: u64,
}

/// Arguments of the `sim` binary.
#[derive(Clone, Debug, Parser)]
#[command(
    name = "sim",
    about = "Simulate networks from fixed ERGM parameters.",
    disable_help_flag = true
)]
pub struct SimArgs {
    /// Dump recognised configuration keywords and statistics to stderr.
    #[arg(short = 'h', long = "help")]
    pub list_keywords: bool,

    /// Configuration file.
    pub config: Option<PathBuf>,
}

/// Errors surfaced by command execution.
#[derive(Debug, Error)]
pub enum CliError {
    /// No configuration file was given.
    #[error("a configuration file is required (run with -h for the keyword list)")]
    MissingConfig,
    /// The run itself failed.
    #[error(transparent)]
    Run(#[from] ErgmError),
}

/// Prints the recognised keyword and statistic listing to stderr.
#[expect(
    clippy::print_stderr,
    reason = "the -h listing is user-facing terminal output, not logging"
)]
pub fn print_keyword_listing() {
    eprintln!("{}", describe_keywords());
}

/// Executes the `estim` command.
///
/// # Errors
/// Returns [`CliError`] when the configuration is missing or any estimation
/// task fails.
pub fn run_estim(args: &EstimArgs) -> Result<(), CliError> {
    if args.list_keywords {
        print_keyword_listing();
        return Ok(());
    }
    let path = args.config.as_deref().ok_or(CliError::MissingConfig)?;
    let config = ergm_core::load_config(path)?;
    run_estimation_tasks(&config, args.tasks)?;
    Ok(())
}

/// Runs `tasks` independent estimation chains in parallel.
///
/// # Errors
/// Returns the first task failure.
pub fn run_estimation_tasks(config: &Config, tasks: u64) -> Result<(), ErgmError> {
    info!(tasks, "starting estimation");
    (0..tasks)
        .into_par_iter()
        .map(|task| run_estimation_task(config, task))
        .collect::<Result<Vec<()>, ErgmError>>()?;
    Ok(())
}

/// Executes the `sim` command.
///
/// # Errors
/// Returns [`CliError`] when the configuration is missing or the simulation
/// fails.
pub fn run_sim(args: &SimArgs) -> Result<(), CliError> {
    if args.list_keywords {
        print_keyword_listing();
        return Ok(());
    }
    let path = args.config.as_deref().ok_or(CliError::MissingConfig)?;
    let config = ergm_core::load_config(path)?;
    run_simulation(&config)?;
    Ok(())
}

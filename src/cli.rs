//! Command-line interface for filesorter.
//!
//! Parses arguments with clap, loads the filter configuration, picks the
//! reporter and hands the directory to the sorter.

use crate::config::SortConfig;
use crate::error::{SortError, SortResult};
use crate::output::{Reporter, SilentReporter, TerminalReporter, summary_table};
use crate::sorter::{SortSummary, sort_directory};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Sort the files of a directory into folders named after their type.
#[derive(Debug, Parser)]
#[command(name = "filesorter", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log level used when RUST_LOG is not set (error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Move every file of SOURCE into a subfolder named after its category.
    Sort(SortCommand),
}

#[derive(Debug, Clone, clap::Args)]
pub struct SortCommand {
    /// Directory whose files are sorted.
    pub source: PathBuf,

    /// Suppress status and progress output.
    #[arg(long)]
    pub silent: bool,

    /// Path to a TOML filter configuration.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Runs a parsed command.
///
/// Every error is reported exactly once through the selected reporter before
/// it is returned, so callers only need to map it to an exit code.
///
/// # Examples
///
/// ```no_run
/// use filesorter::cli::{SortCommand, run_cli};
/// use std::path::PathBuf;
///
/// let command = SortCommand {
///     source: PathBuf::from("/path/to/Downloads"),
///     silent: false,
///     config: None,
/// };
/// if run_cli(&command).is_err() {
///     std::process::exit(1);
/// }
/// ```
pub fn run_cli(command: &SortCommand) -> SortResult<SortSummary> {
    if command.silent {
        run_with_reporter(command, &mut SilentReporter)
    } else {
        let summary = run_with_reporter(command, &mut TerminalReporter::new())?;
        if summary.moved > 0 {
            summary_table(&summary.per_category, summary.moved);
        }
        Ok(summary)
    }
}

/// Loads the configuration and sorts `command.source`, reporting through
/// `reporter`.
pub fn run_with_reporter<R: Reporter + ?Sized>(
    command: &SortCommand,
    reporter: &mut R,
) -> SortResult<SortSummary> {
    let filters = SortConfig::load(command.config.as_deref())
        .and_then(SortConfig::compile)
        .map_err(SortError::from);

    let filters = match filters {
        Ok(filters) => filters,
        Err(e) => {
            reporter.report_error(&e.to_string());
            return Err(e);
        }
    };

    sort_directory(&command.source, filters, reporter)
}

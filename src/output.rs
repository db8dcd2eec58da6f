//! Status reporting for a sort run.
//!
//! The sorter talks to a [`Reporter`] only. [`TerminalReporter`] renders a
//! colored progress display, [`SilentReporter`] discards everything, so
//! `--silent` never leaks into the sorting logic.

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::path::Path;

use crate::file_category::Category;

/// Receives progress and status events from a sort run.
pub trait Reporter {
    /// Called once before the first file, with the snapshot file count.
    fn report_start(&mut self, directory: &Path, file_count: usize);

    /// Called before each file is processed. `current` is 1-based.
    fn report_progress(&mut self, current: usize, file_count: usize, file_name: &str);

    fn report_error(&mut self, message: &str);

    fn report_success(&mut self, message: &str);
}

/// Reporter used in silent mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn report_start(&mut self, _directory: &Path, _file_count: usize) {}

    fn report_progress(&mut self, _current: usize, _file_count: usize, _file_name: &str) {}

    fn report_error(&mut self, _message: &str) {}

    fn report_success(&mut self, _message: &str) {}
}

/// Renders a run to the terminal with a progress bar.
#[derive(Default)]
pub struct TerminalReporter {
    progress: Option<ProgressBar>,
}

impl TerminalReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("█▓░"));
        }
        pb
    }

    /// Prints to stderr above the progress bar, or plainly when there is none.
    fn print_error_line(&self, line: String) {
        let emit = || eprintln!("{}", line);
        match &self.progress {
            Some(pb) => pb.suspend(emit),
            None => emit(),
        }
    }
}

impl Reporter for TerminalReporter {
    fn report_start(&mut self, directory: &Path, file_count: usize) {
        println!("{}", "📁 filesorter".bold().green());
        println!("Sorting files by type in {}", directory.display().to_string().cyan());
        println!(
            "{} {} found",
            file_count.to_string().bold(),
            if file_count == 1 { "file" } else { "files" }
        );
        self.progress = Some(Self::create_progress_bar(file_count as u64));
    }

    fn report_progress(&mut self, current: usize, file_count: usize, file_name: &str) {
        if let Some(pb) = &self.progress {
            if current as u64 > pb.length().unwrap_or(0) {
                pb.set_length(file_count.max(current) as u64);
            }
            pb.set_position(current as u64);
            pb.set_message(file_name.yellow().to_string());
        }
    }

    fn report_error(&mut self, message: &str) {
        self.print_error_line(format!("{} {}", "✗".red(), message.red()));
    }

    fn report_success(&mut self, message: &str) {
        if let Some(pb) = self.progress.take() {
            pb.finish_and_clear();
        }
        println!("{} {}", "✓".green(), message.green());
    }
}

/// Prints the number of files moved into each category folder.
pub fn summary_table(per_category: &BTreeMap<Category, usize>, total_files: usize) {
    println!("\n{}", "SUMMARY".bold());

    let width = per_category
        .keys()
        .map(|category| category.folder_name().len())
        .max()
        .unwrap_or(0)
        .max("Category".len());

    println!("{:<width$} | {}", "Category".bold(), "Files".bold(), width = width);
    println!("{}", "-".repeat(width + 10));

    for (category, count) in per_category {
        println!(
            "{:<width$} | {} {}",
            category.folder_name(),
            count.to_string().green(),
            if *count == 1 { "file" } else { "files" },
            width = width
        );
    }

    println!("{}", "-".repeat(width + 10));
    println!(
        "{:<width$} | {} {}",
        "Total".bold(),
        total_files.to_string().green().bold(),
        if total_files == 1 { "file" } else { "files" },
        width = width
    );
}

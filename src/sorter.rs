//! The scan, classify, resolve and move loop.
//!
//! A [`Sorter`] is created only for a validated directory. Running it walks
//! the files once; a file that cannot be moved is reported and skipped, the
//! rest of the batch still runs.
//!
//! The file count is a snapshot taken at creation. Files added or removed by
//! other processes during the run are not guarded against: new files may be
//! picked up (progress can exceed the count), removed ones surface as
//! per-file errors. Interrupting a run leaves a partially sorted directory;
//! running again only sees the files that are still in place.

use crate::config::CompiledFilters;
use crate::error::{SortError, SortResult};
use crate::file_category::{Category, classify_path};
use crate::file_organizer::FileOrganizer;
use crate::output::Reporter;
use crate::scanner::SourceDirectory;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Lifecycle of a [`Sorter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortState {
    /// Directory validated, file count captured.
    Created,
    /// Iterating files.
    Running,
    /// Every file was processed.
    Completed,
    /// The directory could not be read; nothing was touched.
    Aborted,
}

/// Outcome of a completed run.
#[derive(Debug, Default)]
pub struct SortSummary {
    /// Files seen during the run.
    pub total: usize,
    /// Files successfully moved.
    pub moved: usize,
    /// Files left in place, with the reason.
    pub failures: Vec<(PathBuf, SortError)>,
    /// Moved files per category.
    pub per_category: BTreeMap<Category, usize>,
}

impl SortSummary {
    /// Message passed to [`Reporter::report_success`].
    pub fn message(&self) -> String {
        let folders = self.per_category.len();
        let mut message = format!(
            "Sorted {} {} into {} {}",
            self.moved,
            if self.moved == 1 { "file" } else { "files" },
            folders,
            if folders == 1 { "folder" } else { "folders" }
        );
        if !self.failures.is_empty() {
            message.push_str(&format!(", {} failed", self.failures.len()));
        }
        message
    }

    pub fn is_complete_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Sorts one source directory.
#[derive(Debug)]
pub struct Sorter {
    source: SourceDirectory,
    filters: CompiledFilters,
    file_count: usize,
    state: SortState,
}

impl Sorter {
    /// Validates `path` and captures its current file count.
    ///
    /// # Errors
    ///
    /// [`SortError::NotFound`] or [`SortError::NotADirectory`] when `path`
    /// is not a usable directory.
    pub fn new(path: &Path, filters: CompiledFilters) -> SortResult<Self> {
        let source = SourceDirectory::validate(path)?;
        let file_count = source.count_files(&filters)?;

        Ok(Self {
            source,
            filters,
            file_count,
            state: SortState::Created,
        })
    }

    pub fn state(&self) -> SortState {
        self.state
    }

    pub fn file_count(&self) -> usize {
        self.file_count
    }

    /// Moves every file into its category folder.
    ///
    /// Emits `report_start`, one `report_progress` per file, one
    /// `report_error` per failed file and a final `report_success`. If the
    /// directory cannot be listed the run ends [`SortState::Aborted`] after a
    /// single `report_error`.
    pub fn run<R: Reporter + ?Sized>(&mut self, reporter: &mut R) -> SortResult<SortSummary> {
        let files = match self.source.list_files(&self.filters) {
            Ok(files) => files,
            Err(e) => {
                self.state = SortState::Aborted;
                reporter.report_error(&e.to_string());
                return Err(e);
            }
        };

        self.state = SortState::Running;
        reporter.report_start(self.source.path(), self.file_count);
        info!(
            directory = %self.source.path().display(),
            files = self.file_count,
            "sorting started"
        );

        let mut summary = SortSummary::default();
        for (index, file_path) in files.enumerate() {
            let file_name = file_path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            reporter.report_progress(index + 1, self.file_count, &file_name);
            summary.total += 1;

            let category = classify_path(&file_path);
            match FileOrganizer::move_to_category(self.source.path(), &file_path, category) {
                Ok(operation) => {
                    debug!(
                        from = %operation.original_path.display(),
                        to = %operation.new_path.display(),
                        category = %operation.category,
                        "sorted file"
                    );
                    summary.moved += 1;
                    *summary.per_category.entry(operation.category).or_insert(0) += 1;
                }
                Err(e) => {
                    warn!(file = %file_path.display(), "skipped: {}", e);
                    reporter.report_error(&e.to_string());
                    summary.failures.push((file_path, e));
                }
            }
        }

        self.state = SortState::Completed;
        info!(
            moved = summary.moved,
            failed = summary.failures.len(),
            "sorting completed"
        );
        reporter.report_success(&summary.message());
        Ok(summary)
    }
}

/// Validates `path` and sorts it.
///
/// A validation failure is reported once through `reporter` and returned;
/// no folder is created and no file is moved in that case.
pub fn sort_directory<R: Reporter + ?Sized>(
    path: &Path,
    filters: CompiledFilters,
    reporter: &mut R,
) -> SortResult<SortSummary> {
    let mut sorter = match Sorter::new(path, filters) {
        Ok(sorter) => sorter,
        Err(e) => {
            reporter.report_error(&e.to_string());
            return Err(e);
        }
    };
    sorter.run(reporter)
}

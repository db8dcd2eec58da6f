//! Enumeration of the files directly inside a source directory.

use crate::config::CompiledFilters;
use crate::error::{SortError, SortResult};
use std::fs::{self, ReadDir};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A path that was an existing directory when it was validated.
///
/// The check happens once; the directory may still vanish afterwards, so
/// every later filesystem call reports its own error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDirectory {
    path: PathBuf,
}

impl SourceDirectory {
    /// Validates that `path` exists and is a directory.
    ///
    /// # Errors
    ///
    /// * [`SortError::NotFound`] if nothing exists at `path`
    /// * [`SortError::NotADirectory`] if `path` is a file or other non-directory
    /// * [`SortError::PermissionDenied`] / [`SortError::Io`] if it cannot be inspected
    pub fn validate(path: &Path) -> SortResult<Self> {
        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(SortError::NotFound {
                    path: path.to_path_buf(),
                });
            }
            Err(e) => return Err(SortError::from_io(path, e)),
        };

        if !metadata.is_dir() {
            return Err(SortError::NotADirectory {
                path: path.to_path_buf(),
            });
        }

        debug!(path = %path.display(), "validated source directory");
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lists the regular files directly inside the directory.
    ///
    /// Each call re-reads the directory. Subdirectories and entries that are
    /// not regular files (after following symlinks) are skipped, as are
    /// files rejected by `filters`. Order is whatever the filesystem yields.
    pub fn list_files<'a>(&self, filters: &'a CompiledFilters) -> SortResult<Files<'a>> {
        let entries = fs::read_dir(&self.path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => SortError::NotFound {
                path: self.path.clone(),
            },
            _ => SortError::from_io(&self.path, e),
        })?;

        Ok(Files { entries, filters })
    }

    /// Counts the entries [`SourceDirectory::list_files`] would yield.
    pub fn count_files(&self, filters: &CompiledFilters) -> SortResult<usize> {
        Ok(self.list_files(filters)?.count())
    }
}

/// Lazy iterator over the files of a [`SourceDirectory`].
#[derive(Debug)]
pub struct Files<'a> {
    entries: ReadDir,
    filters: &'a CompiledFilters,
}

impl Iterator for Files<'_> {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        for entry in self.entries.by_ref() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("skipping unreadable directory entry: {}", e);
                    continue;
                }
            };

            let path = entry.path();
            let is_file = fs::metadata(&path).map(|m| m.is_file()).unwrap_or(false);
            if is_file && self.filters.should_include(&path) {
                return Some(path);
            }
        }
        None
    }
}

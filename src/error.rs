//! Error types shared by the scanner, organizer and sorter.

use std::io;
use std::path::{Path, PathBuf};

use crate::config::ConfigError;

/// Errors that can occur while sorting a directory.
///
/// `NotFound`, `NotADirectory` and `Config` are fatal to a run. Every other
/// variant describes a single file and is reported without stopping the
/// remaining files.
#[derive(Debug, thiserror::Error)]
pub enum SortError {
    /// The source directory does not exist.
    #[error("Directory {} does not exist", path.display())]
    NotFound { path: PathBuf },

    /// The source path exists but is not a directory.
    #[error("{} is not a directory", path.display())]
    NotADirectory { path: PathBuf },

    /// The operating system refused access.
    #[error("Permission denied for {}: {source}", path.display())]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Any other filesystem failure.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The destination folder already holds a file with the same name.
    #[error("Cannot move {}: {} already exists", file.display(), destination.display())]
    MoveCollision { file: PathBuf, destination: PathBuf },

    /// The file disappeared between scanning and moving.
    #[error("Cannot move {}: file no longer exists", path.display())]
    SourceMissing { path: PathBuf },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl SortError {
    /// Wraps an I/O error, keeping permission failures distinguishable.
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::PermissionDenied => SortError::PermissionDenied {
                path: path.to_path_buf(),
                source,
            },
            _ => SortError::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }
}

/// Result type for sorting operations.
pub type SortResult<T> = Result<T, SortError>;

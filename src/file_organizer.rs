/// Destination folders and file relocation.
///
/// This module creates the per-category folders inside the source directory
/// and moves files into them without ever overwriting an existing file.
use crate::error::{SortError, SortResult};
use crate::file_category::Category;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Record of one successful move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub original_path: PathBuf,
    pub new_path: PathBuf,
    pub category: Category,
}

/// Returns `<source_dir>/<Category>` without touching the filesystem.
pub fn destination_path(source_dir: &Path, category: Category) -> PathBuf {
    source_dir.join(category.folder_name())
}

/// Returns the destination folder for `category`, creating it (and any
/// missing parents) if needed. Calling it again for an existing folder is a
/// no-op.
///
/// # Errors
///
/// Fails with [`SortError::PermissionDenied`] or [`SortError::Io`] when the
/// folder cannot be created, including when a non-directory already occupies
/// its name.
pub fn resolve_destination(source_dir: &Path, category: Category) -> SortResult<PathBuf> {
    let folder = destination_path(source_dir, category);

    if folder.is_dir() {
        return Ok(folder);
    }

    fs::create_dir_all(&folder).map_err(|e| SortError::from_io(&folder, e))?;
    info!(folder = %folder.display(), "created destination folder");
    Ok(folder)
}

/// Moves `file_path` into `destination_folder`, keeping its file name.
///
/// The file is renamed when possible. When the destination lives on another
/// filesystem the content is copied first and the source is removed only
/// after the copy is complete.
///
/// # Errors
///
/// * [`SortError::SourceMissing`] if the file no longer exists
/// * [`SortError::MoveCollision`] if the destination already has that name
/// * [`SortError::PermissionDenied`] / [`SortError::Io`] for anything else
pub fn move_file(file_path: &Path, destination_folder: &Path) -> SortResult<PathBuf> {
    let file_name = file_path.file_name().ok_or_else(|| SortError::Io {
        path: file_path.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidInput, "file has no name component"),
    })?;
    let destination = destination_folder.join(file_name);

    if let Err(e) = fs::symlink_metadata(file_path) {
        return Err(match e.kind() {
            io::ErrorKind::NotFound => SortError::SourceMissing {
                path: file_path.to_path_buf(),
            },
            _ => SortError::from_io(file_path, e),
        });
    }

    // rename() replaces existing files on Unix, so collisions are checked
    // first. A file appearing between the check and the rename is not caught.
    if fs::symlink_metadata(&destination).is_ok() {
        return Err(SortError::MoveCollision {
            file: file_path.to_path_buf(),
            destination,
        });
    }

    match fs::rename(file_path, &destination) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            debug!(file = %file_path.display(), "rename crosses filesystems, copying");
            copy_then_remove(file_path, &destination)?;
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound && !file_path.exists() => {
            return Err(SortError::SourceMissing {
                path: file_path.to_path_buf(),
            });
        }
        Err(e) => return Err(SortError::from_io(file_path, e)),
    }

    debug!(from = %file_path.display(), to = %destination.display(), "moved file");
    Ok(destination)
}

/// Copies `source` to a newly created `destination`, then deletes `source`.
///
/// `destination` must not exist. On a failed copy the partial destination is
/// removed and `source` is left untouched.
fn copy_then_remove(source: &Path, destination: &Path) -> SortResult<()> {
    let mut reader = File::open(source).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => SortError::SourceMissing {
            path: source.to_path_buf(),
        },
        _ => SortError::from_io(source, e),
    })?;

    let mut writer = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(destination)
        .map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => SortError::MoveCollision {
                file: source.to_path_buf(),
                destination: destination.to_path_buf(),
            },
            _ => SortError::from_io(destination, e),
        })?;

    let copied = io::copy(&mut reader, &mut writer).and_then(|_| writer.sync_all());
    drop(writer);

    if let Err(e) = copied {
        if let Err(cleanup) = fs::remove_file(destination) {
            warn!(
                path = %destination.display(),
                "could not remove partial copy: {}", cleanup
            );
        }
        return Err(SortError::from_io(destination, e));
    }

    if let Ok(metadata) = fs::metadata(source)
        && let Err(e) = fs::set_permissions(destination, metadata.permissions())
    {
        warn!(path = %destination.display(), "could not copy permissions: {}", e);
    }

    remove_source(source, destination)
}

/// Deletes `source` once its content is complete at `destination`. If the
/// source cannot be deleted the copy is removed again, so the file stays
/// only at its original location.
fn remove_source(source: &Path, destination: &Path) -> SortResult<()> {
    let Err(e) = fs::remove_file(source) else {
        return Ok(());
    };

    if let Err(cleanup) = fs::remove_file(destination) {
        warn!(
            path = %destination.display(),
            "could not remove copy after failed source removal: {}", cleanup
        );
    }
    Err(SortError::from_io(source, e))
}

/// Organizes single files into category folders.
pub struct FileOrganizer;

impl FileOrganizer {
    /// Resolves the destination folder for `category` and moves `file_path`
    /// into it, returning the completed operation.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use filesorter::file_category::Category;
    /// use filesorter::file_organizer::FileOrganizer;
    /// use std::path::Path;
    ///
    /// let result = FileOrganizer::move_to_category(
    ///     Path::new("/path/to/base"),
    ///     Path::new("/path/to/base/image.png"),
    ///     Category::Image,
    /// );
    ///
    /// match result {
    ///     Ok(op) => println!("Moved to {}", op.new_path.display()),
    ///     Err(e) => eprintln!("{}", e),
    /// }
    /// ```
    pub fn move_to_category(
        base_path: &Path,
        file_path: &Path,
        category: Category,
    ) -> SortResult<Operation> {
        let folder = resolve_destination(base_path, category)?;
        let new_path = move_file(file_path, &folder)?;

        Ok(Operation {
            original_path: file_path.to_path_buf(),
            new_path,
            category,
        })
    }
}

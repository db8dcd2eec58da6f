//! filesorter - sort the files of a directory into folders by type
//!
//! Files directly inside a source directory are classified by extension and
//! moved into a sibling folder named after their category (`Image`,
//! `Document`, `Other`, ...). Status is reported through the [`Reporter`]
//! trait so the same pipeline serves the terminal and silent mode.

pub mod cli;
pub mod config;
pub mod error;
pub mod file_category;
pub mod file_organizer;
pub mod output;
pub mod scanner;
pub mod sorter;

pub use config::{CompiledFilters, ConfigError, SortConfig};
pub use error::{SortError, SortResult};
pub use file_category::{Category, classify, classify_path};
pub use file_organizer::{FileOrganizer, move_file, resolve_destination};
pub use output::{Reporter, SilentReporter, TerminalReporter};
pub use scanner::SourceDirectory;
pub use sorter::{SortState, SortSummary, Sorter, sort_directory};

pub use cli::{SortCommand, run_cli};

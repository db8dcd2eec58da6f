//! Exclusion filters loaded from an optional TOML file.
//!
//! Without a configuration file every regular file in the source directory
//! is sorted. A file can narrow that down:
//!
//! ```toml
//! [filters]
//! include_hidden = false
//!
//! [filters.exclude]
//! filenames = ["Thumbs.db", "desktop.ini"]
//! extensions = ["part", "crdownload"]
//! patterns = ["*.tmp"]
//! regex = ["^~\\$"]
//!
//! [filters.include]
//! patterns = [".keep-me"]
//! ```

use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Name of the configuration file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = ".filesorter.toml";

/// Errors that can occur while loading or compiling the configuration.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Invalid glob pattern '{0}'")]
    InvalidGlobPattern(String),

    #[error("Invalid regex pattern '{pattern}': {reason}")]
    InvalidRegexPattern { pattern: String, reason: String },

    #[error("IO error reading configuration: {0}")]
    Io(String),
}

/// Top-level configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SortConfig {
    #[serde(default)]
    pub filters: FilterRules,

    /// File this configuration was read from, if any.
    #[serde(skip)]
    pub loaded_from: Option<PathBuf>,
}

/// Which directory entries take part in sorting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterRules {
    /// Whether names starting with "." are sorted. Defaults to true.
    #[serde(default = "default_include_hidden")]
    pub include_hidden: bool,

    #[serde(default)]
    pub exclude: ExcludeRules,

    /// Whitelist that overrides every exclusion.
    #[serde(default)]
    pub include: IncludeRules,
}

fn default_include_hidden() -> bool {
    true
}

impl Default for FilterRules {
    fn default() -> Self {
        Self {
            include_hidden: default_include_hidden(),
            exclude: ExcludeRules::default(),
            include: IncludeRules::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExcludeRules {
    /// Exact file names.
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Extensions without the leading dot, matched case-insensitively.
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Glob patterns matched against the file name.
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Regular expressions matched against the file name.
    #[serde(default)]
    pub regex: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncludeRules {
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl SortConfig {
    /// Loads the configuration.
    ///
    /// Lookup order:
    /// 1. `config_path`, if given (it must exist)
    /// 2. `.filesorter.toml` in the current directory
    /// 3. `~/.config/filesorter/config.toml`
    /// 4. built-in defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.is_file() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("filesorter")
                .join("config.toml");
            if home_config.is_file() {
                return Self::load_from_file(&home_config);
            }
        }

        debug!("no configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Loads the configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let mut config = Self::from_toml(&content)?;
        info!(path = %path.display(), "loaded configuration");
        config.loaded_from = Some(fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf()));
        Ok(config)
    }

    /// Parses a configuration document.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Compiles the filter rules, validating every pattern up front.
    ///
    /// The file the configuration came from is always excluded, so a
    /// `.filesorter.toml` inside the source directory stays where it is.
    pub fn compile(self) -> Result<CompiledFilters, ConfigError> {
        let mut filters = CompiledFilters::new(self.filters)?;
        filters.config_file = self.loaded_from;
        Ok(filters)
    }
}

/// Filter rules with glob and regex patterns compiled once per run.
#[derive(Debug, Clone)]
pub struct CompiledFilters {
    include_hidden: bool,
    exclude_filenames: HashSet<String>,
    exclude_extensions: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
    include_patterns: Vec<Pattern>,
    config_file: Option<PathBuf>,
}

impl Default for CompiledFilters {
    /// Accepts every file.
    fn default() -> Self {
        Self {
            include_hidden: true,
            exclude_filenames: HashSet::new(),
            exclude_extensions: HashSet::new(),
            exclude_patterns: Vec::new(),
            exclude_regexes: Vec::new(),
            include_patterns: Vec::new(),
            config_file: None,
        }
    }
}

fn compile_globs(patterns: &[String]) -> Result<Vec<Pattern>, ConfigError> {
    patterns
        .iter()
        .map(|p| Pattern::new(p).map_err(|_| ConfigError::InvalidGlobPattern(p.clone())))
        .collect()
}

impl CompiledFilters {
    fn new(rules: FilterRules) -> Result<Self, ConfigError> {
        let exclude_patterns = compile_globs(&rules.exclude.patterns)?;
        let include_patterns = compile_globs(&rules.include.patterns)?;

        let exclude_regexes = rules
            .exclude
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            include_hidden: rules.include_hidden,
            exclude_filenames: rules.exclude.filenames.into_iter().collect(),
            exclude_extensions: rules
                .exclude
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            exclude_patterns,
            exclude_regexes,
            include_patterns,
            config_file: None,
        })
    }

    /// Decides whether a file takes part in sorting. Apart from the loaded
    /// configuration file, which is never sorted, only the file name is
    /// inspected.
    ///
    /// Include patterns win outright; after that a file is rejected if it is
    /// hidden (and hidden files are off), or matches an excluded name,
    /// extension, glob or regex, in that order.
    pub fn should_include(&self, file_path: &Path) -> bool {
        if self.is_config_file(file_path) {
            return false;
        }

        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if self
            .include_patterns
            .iter()
            .any(|pattern| pattern.matches(&file_name))
        {
            return true;
        }

        if !self.include_hidden && file_name.starts_with('.') {
            return false;
        }

        if self.exclude_filenames.contains(file_name.as_ref()) {
            return false;
        }

        if let Some(ext) = file_path.extension() {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            if self.exclude_extensions.contains(&ext_lower) {
                return false;
            }
        }

        if self
            .exclude_patterns
            .iter()
            .any(|pattern| pattern.matches(&file_name))
        {
            return false;
        }

        !self
            .exclude_regexes
            .iter()
            .any(|regex| regex.is_match(&file_name))
    }

    fn is_config_file(&self, file_path: &Path) -> bool {
        let Some(config_file) = &self.config_file else {
            return false;
        };
        if config_file.file_name() != file_path.file_name() {
            return false;
        }
        fs::canonicalize(file_path).is_ok_and(|path| &path == config_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn compile(toml: &str) -> CompiledFilters {
        SortConfig::from_toml(toml).unwrap().compile().unwrap()
    }

    #[test]
    fn test_default_accepts_everything() {
        let filters = SortConfig::default().compile().unwrap();
        assert!(filters.should_include(Path::new("photo.jpg")));
        assert!(filters.should_include(Path::new(".bashrc")));
        assert!(filters.should_include(Path::new("notes")));
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = SortConfig::from_toml("").unwrap();
        assert!(config.filters.include_hidden);
        assert!(config.filters.exclude.filenames.is_empty());
    }

    #[test]
    fn test_hidden_files_can_be_excluded() {
        let filters = compile("[filters]\ninclude_hidden = false\n");
        assert!(!filters.should_include(Path::new(".DS_Store")));
        assert!(filters.should_include(Path::new("visible.txt")));
    }

    #[test]
    fn test_exclude_exact_filename() {
        let filters = compile("[filters.exclude]\nfilenames = [\"Thumbs.db\"]\n");
        assert!(!filters.should_include(Path::new("Thumbs.db")));
        assert!(filters.should_include(Path::new("thumbs.db")));
    }

    #[test]
    fn test_exclude_extensions_case_insensitive() {
        let filters = compile("[filters.exclude]\nextensions = [\"part\", \".TMP\"]\n");
        assert!(!filters.should_include(Path::new("movie.mkv.part")));
        assert!(!filters.should_include(Path::new("movie.PART")));
        assert!(!filters.should_include(Path::new("scratch.tmp")));
        assert!(filters.should_include(Path::new("movie.mkv")));
    }

    #[test]
    fn test_exclude_glob_patterns_match_file_name() {
        let filters = compile("[filters.exclude]\npatterns = [\"[0-9]*.log\", \"draft?.md\"]\n");
        assert!(!filters.should_include(Path::new("/downloads/2024.log")));
        assert!(!filters.should_include(Path::new("draft1.md")));
        assert!(filters.should_include(Path::new("app.log")));
        assert!(filters.should_include(Path::new("draft12.md")));
    }

    #[test]
    fn test_exclude_regex() {
        let filters = compile("[filters.exclude]\nregex = ['^~\\$']\n");
        assert!(!filters.should_include(Path::new("~$report.docx")));
        assert!(filters.should_include(Path::new("report.docx")));
    }

    #[test]
    fn test_include_overrides_exclude() {
        let filters = compile(
            "[filters]\ninclude_hidden = false\n\n[filters.include]\npatterns = [\".keep\"]\n",
        );
        assert!(filters.should_include(Path::new(".keep")));
        assert!(!filters.should_include(Path::new(".other")));
    }

    #[test]
    fn test_invalid_patterns_fail_to_compile() {
        let bad_regex = SortConfig::from_toml("[filters.exclude]\nregex = [\"[oops(\"]\n")
            .unwrap()
            .compile();
        assert!(matches!(bad_regex, Err(ConfigError::InvalidRegexPattern { .. })));

        let bad_glob = SortConfig::from_toml("[filters.exclude]\npatterns = [\"[oops\"]\n")
            .unwrap()
            .compile();
        assert!(matches!(bad_glob, Err(ConfigError::InvalidGlobPattern(_))));
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        let result = SortConfig::from_toml("[filters\ninclude_hidden = ");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let missing = temp_dir.path().join("nope.toml");
        let result = SortConfig::load(Some(&missing));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_explicit_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[filters.exclude]\nfilenames = [\"desktop.ini\"]\n")
            .expect("Failed to write config");

        let config = SortConfig::load(Some(&path)).expect("Failed to load config");
        assert_eq!(config.filters.exclude.filenames, vec!["desktop.ini".to_string()]);
    }

    #[test]
    fn test_loaded_config_file_is_never_sorted() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join(LOCAL_CONFIG_FILE);
        fs::write(&path, "[filters.include]\npatterns = [\"*\"]\n")
            .expect("Failed to write config");
        let same_name_elsewhere = temp_dir.path().join("sub").join(LOCAL_CONFIG_FILE);
        fs::create_dir(temp_dir.path().join("sub")).unwrap();
        fs::write(&same_name_elsewhere, "").unwrap();

        let filters = SortConfig::load(Some(&path)).unwrap().compile().unwrap();

        assert!(!filters.should_include(&path));
        assert!(filters.should_include(&same_name_elsewhere));
        assert!(filters.should_include(&temp_dir.path().join("notes.txt")));
    }

    #[test]
    fn test_parsed_config_has_no_source_file() {
        let config = SortConfig::from_toml("").unwrap();
        assert!(config.loaded_from.is_none());
        let filters = config.compile().unwrap();
        assert!(filters.should_include(Path::new(LOCAL_CONFIG_FILE)));
    }
}

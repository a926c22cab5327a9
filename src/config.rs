//! Configuration for lumina-rs
//!
//! Settings are grouped by subsystem. Every section has a `Default` matching the
//! values the reader UI expects, so an empty JSON object is a valid config file.

use crate::error::{LuminaError, Result};
use crate::storage::Dataset;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dataset location and attachment policy
    pub data: DataConfig,

    /// Full-text search settings
    pub search: SearchConfig,

    /// Study tool defaults and fallback texts
    pub study: StudyConfig,
}

/// Where the datasets live and how they are attached
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directory holding `core.db` and the optional `versions.db`, `commentaries.db`, `extras.db`
    pub data_dir: PathBuf,

    /// Optional datasets attached when the federation opens (if their file exists)
    pub eager_attach: Vec<Dataset>,

    /// Capacity of the id -> reference cache used by reference resolution
    pub label_cache_size: usize,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("assets/data"),
            eager_attach: vec![Dataset::Versions, Dataset::Commentaries, Dataset::Extras],
            label_cache_size: 4096,
        }
    }
}

/// Search paging and highlighting
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum rows returned per search call
    pub page_size: usize,

    /// Sentinel the index engine inserts before a match
    pub highlight_open: String,

    /// Sentinel the index engine inserts after a match
    pub highlight_close: String,

    /// Markup substituted for `highlight_open` after sanitization
    pub mark_open: String,

    /// Markup substituted for `highlight_close` after sanitization
    pub mark_close: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: 200,
            highlight_open: "[[MARK]]".to_string(),
            highlight_close: "[[/MARK]]".to_string(),
            mark_open: "<mark>".to_string(),
            mark_close: "</mark>".to_string(),
        }
    }
}

/// Defaults for study tools
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyConfig {
    /// Version whose rows live in core; every other version lives in `versions`
    pub canonical_version: String,

    /// Commentary module used when a request names none
    pub default_commentary: String,

    /// Dictionary module used when a request names none
    pub default_dictionary: String,

    /// Modules advertised when the commentary dataset holds none
    pub fallback_commentaries: Vec<String>,

    /// Returned by `commentary` when the module has no entry for the verse
    pub missing_commentary_text: String,

    /// Returned by `definition` when the term is unknown
    pub missing_definition_text: String,

    /// Returned by `passage` when the verse does not exist in the version
    pub missing_verse_text: String,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            canonical_version: "KJV".to_string(),
            default_commentary: "mhc".to_string(),
            default_dictionary: "EASTON".to_string(),
            fallback_commentaries: ["MHC", "BARNES", "JFB", "ACC", "RWP"]
                .iter()
                .map(|m| m.to_string())
                .collect(),
            missing_commentary_text: "No commentary found for this verse.".to_string(),
            missing_definition_text: "Not found.".to_string(),
            missing_verse_text: "Verse not found.".to_string(),
        }
    }
}

impl Config {
    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            LuminaError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: Config = serde_json::from_str(&contents)
            .map_err(|e| LuminaError::Config(format!("Failed to parse {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Configuration rooted at a data directory, everything else default
    pub fn with_data_dir<P: Into<PathBuf>>(data_dir: P) -> Self {
        let mut config = Config::default();
        config.data.data_dir = data_dir.into();
        config
    }

    /// Reject settings the search and study layers cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.search.page_size == 0 {
            return Err(LuminaError::Config("search.page_size must be at least 1".to_string()));
        }
        if self.search.highlight_open.is_empty() || self.search.highlight_close.is_empty() {
            return Err(LuminaError::Config("highlight sentinels must not be empty".to_string()));
        }
        if self.search.highlight_open == self.search.highlight_close {
            return Err(LuminaError::Config("highlight sentinels must differ".to_string()));
        }
        if self.study.canonical_version.is_empty() {
            return Err(LuminaError::Config("study.canonical_version must not be empty".to_string()));
        }
        if self.data.label_cache_size == 0 {
            return Err(LuminaError::Config("data.label_cache_size must be at least 1".to_string()));
        }
        Ok(())
    }
}

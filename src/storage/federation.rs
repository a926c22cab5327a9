//! Dataset federation over SQLite
//!
//! `core` is opened as the main database and is always present. The optional
//! datasets are separate files attached to the same connection under their
//! alias, at most once each. A query names the datasets it needs; if one of
//! them cannot be attached the query fails with `DatasetUnavailable` instead of
//! returning an empty result.

use crate::config::DataConfig;
use crate::error::{LuminaError, Result};
use rusqlite::{Connection, OpenFlags, OptionalExtension, Params, Row};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};

/// A logical dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    /// Canonical text and book structure
    Core,
    /// Alternate translations
    Versions,
    /// Commentary modules and their entries
    Commentaries,
    /// Cross references, lexicon, dictionaries and interlinear words
    Extras,
}

impl Dataset {
    pub const ALL: [Dataset; 4] = [
        Dataset::Core,
        Dataset::Versions,
        Dataset::Commentaries,
        Dataset::Extras,
    ];

    /// Public alias
    pub fn alias(&self) -> &'static str {
        match self {
            Dataset::Core => "core",
            Dataset::Versions => "versions",
            Dataset::Commentaries => "commentaries",
            Dataset::Extras => "extras",
        }
    }

    /// Schema name used to qualify tables in SQL
    pub fn schema(&self) -> &'static str {
        match self {
            Dataset::Core => "main",
            other => other.alias(),
        }
    }

    /// File name inside the data directory
    pub fn file_name(&self) -> String {
        format!("{}.db", self.alias())
    }

    /// Tables a dataset of this kind carries
    pub fn tables(&self) -> &'static [&'static str] {
        match self {
            Dataset::Core => &["books", "verses", "verses_fts"],
            Dataset::Versions => &["verses", "verses_fts"],
            Dataset::Commentaries => &["commentaries", "commentary_entries"],
            Dataset::Extras => &["cross_references", "lexicon", "dictionaries", "verse_words"],
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.alias())
    }
}

impl FromStr for Dataset {
    type Err = LuminaError;

    fn from_str(s: &str) -> Result<Self> {
        Dataset::ALL
            .into_iter()
            .find(|d| d.alias().eq_ignore_ascii_case(s) || (s == "main" && *d == Dataset::Core))
            .ok_or_else(|| LuminaError::DatasetUnavailable(format!("unknown dataset alias '{}'", s)))
    }
}

/// Connection to `core` plus the set of attached optional datasets
pub struct DatasetFederation {
    data_dir: PathBuf,
    conn: Mutex<Connection>,
    attached: Mutex<HashSet<Dataset>>,
}

impl fmt::Debug for DatasetFederation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatasetFederation")
            .field("data_dir", &self.data_dir)
            .field("attached", &self.attached_datasets())
            .finish()
    }
}

fn read_only_flags() -> OpenFlags {
    OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX
}

impl DatasetFederation {
    /// Open `core` in `data_dir` and eagerly attach the configured datasets that exist
    pub fn open(config: &DataConfig) -> Result<Self> {
        let federation = Self::open_dir(&config.data_dir)?;
        for dataset in &config.eager_attach {
            if !federation.attach(*dataset)? {
                log::debug!("Dataset '{}' not present, leaving it detached", dataset);
            }
        }
        Ok(federation)
    }

    /// Open `core` only; every other dataset attaches on first use
    pub fn open_dir<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        let core_path = data_dir.join(Dataset::Core.file_name());
        if !core_path.is_file() {
            return Err(LuminaError::DatasetUnavailable(format!(
                "core database missing at {}",
                core_path.display()
            )));
        }

        let conn = Connection::open_with_flags(&core_path, read_only_flags()).map_err(|e| {
            LuminaError::DatasetUnavailable(format!("failed to open {}: {}", core_path.display(), e))
        })?;

        log::info!("Opened core dataset at {}", core_path.display());

        let mut attached = HashSet::new();
        attached.insert(Dataset::Core);

        Ok(Self {
            data_dir,
            conn: Mutex::new(conn),
            attached: Mutex::new(attached),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| LuminaError::Storage("connection lock poisoned".to_string()))
    }

    fn attached_set(&self) -> Result<MutexGuard<'_, HashSet<Dataset>>> {
        self.attached
            .lock()
            .map_err(|_| LuminaError::Storage("attachment registry lock poisoned".to_string()))
    }

    /// Attach a dataset if its file exists; returns whether it is now queryable.
    ///
    /// Idempotent: attaching an attached dataset is a no-op returning `true`,
    /// and concurrent first attachments serialize on the registry so only one
    /// of them issues the `ATTACH`.
    pub fn attach(&self, dataset: Dataset) -> Result<bool> {
        let mut attached = self.attached_set()?;
        if attached.contains(&dataset) {
            return Ok(true);
        }

        let path = self.data_dir.join(dataset.file_name());
        if !path.is_file() {
            return Ok(false);
        }

        let path_str = path.to_string_lossy().to_string();
        let sql = format!("ATTACH DATABASE ?1 AS {}", dataset.schema());
        self.connection()?.execute(&sql, [&path_str]).map_err(|e| {
            LuminaError::DatasetUnavailable(format!("failed to attach {}: {}", path.display(), e))
        })?;

        attached.insert(dataset);
        log::info!("Attached dataset '{}' from {}", dataset, path.display());
        Ok(true)
    }

    /// Attach by alias string
    pub fn attach_alias(&self, alias: &str) -> Result<bool> {
        self.attach(alias.parse()?)
    }

    /// Whether a dataset is attached right now (does not attempt to attach)
    pub fn is_attached(&self, dataset: Dataset) -> bool {
        self.attached_set()
            .map(|set| set.contains(&dataset))
            .unwrap_or(false)
    }

    /// Attached datasets in canonical order
    pub fn attached_datasets(&self) -> Vec<Dataset> {
        Dataset::ALL
            .into_iter()
            .filter(|d| self.is_attached(*d))
            .collect()
    }

    /// Ensure every dataset is attached or fail with `DatasetUnavailable`
    pub fn require(&self, datasets: &[Dataset]) -> Result<()> {
        for dataset in datasets {
            if !self.attach(*dataset)? {
                return Err(LuminaError::DatasetUnavailable(format!(
                    "dataset '{}' is not installed in {}",
                    dataset,
                    self.data_dir.display()
                )));
            }
        }
        Ok(())
    }

    /// Run a query over the given datasets, mapping every row
    pub fn query<T, P, F>(&self, requires: &[Dataset], sql: &str, params: P, map: F) -> Result<Vec<T>>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        self.require(requires)?;
        log::debug!("query [{}]: {}", describe(requires), sql.trim());

        let conn = self.connection()?;
        let mut stmt = conn
            .prepare_cached(sql)
            .map_err(|e| LuminaError::Storage(format!("Failed to prepare query: {}", e)))?;
        let rows = stmt
            .query_map(params, map)
            .map_err(|e| LuminaError::Storage(format!("Failed to run query: {}", e)))?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row.map_err(|e| LuminaError::Storage(format!("Failed to read row: {}", e)))?);
        }
        Ok(result)
    }

    /// Run a query expected to return at most one row
    pub fn query_row<T, P, F>(&self, requires: &[Dataset], sql: &str, params: P, map: F) -> Result<Option<T>>
    where
        P: Params,
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        self.require(requires)?;
        log::debug!("query_row [{}]: {}", describe(requires), sql.trim());

        let conn = self.connection()?;
        let mut stmt = conn
            .prepare_cached(sql)
            .map_err(|e| LuminaError::Storage(format!("Failed to prepare query: {}", e)))?;
        stmt.query_row(params, map)
            .optional()
            .map_err(|e| LuminaError::Storage(format!("Failed to run query: {}", e)))
    }
}

fn describe(datasets: &[Dataset]) -> String {
    datasets.iter().map(|d| d.alias()).collect::<Vec<_>>().join(",")
}

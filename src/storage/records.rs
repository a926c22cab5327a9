//! Typed rows returned by dataset queries
//!
//! One struct per query shape; nothing is passed around as a column map.

use crate::canon::VerseId;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

/// A row of the core `books` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRow {
    pub id: u16,
    pub name: String,
}

impl BookRow {
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    }
}

/// One verse of one version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseRecord {
    /// Row id in the dataset holding the version; equals the canonical id in core
    pub id: i64,
    pub book: String,
    pub chapter: u16,
    pub verse: u16,
    pub text: String,
    pub version: String,
}

/// A commentary module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentaryModule {
    pub id: i64,
    pub abbreviation: String,
    pub name: Option<String>,
}

impl CommentaryModule {
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            abbreviation: row.get(1)?,
            name: row.get(2)?,
        })
    }
}

/// Which modules comment on a canonical verse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentaryAvailability {
    pub verse_id: VerseId,
    pub abbreviations: Vec<String>,
}

/// A cross-reference edge between two canonical verses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossReference {
    pub from: VerseId,
    pub to: VerseId,
}

/// One word of an interlinear verse with its optional lexicon tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterlinearWord {
    pub word: String,
    pub lexicon_id: Option<String>,
    pub transliteration: Option<String>,
}

impl InterlinearWord {
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            word: row.get(0)?,
            lexicon_id: row.get::<_, Option<String>>(1)?.filter(|id| !id.is_empty()),
            transliteration: row.get(2)?,
        })
    }
}

/// Where a definition is looked up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefinitionKind {
    /// Topical dictionary entry, keyed by topic and module
    #[default]
    Dictionary,
    /// Hebrew lexicon entry, ids prefixed `H`
    StrongHebrew,
    /// Greek lexicon entry, ids prefixed `G`
    StrongGreek,
}

impl DefinitionKind {
    /// Lexicon kind implied by a lexicon id
    pub fn for_lexicon_id(id: &str) -> Self {
        if id.starts_with('G') {
            DefinitionKind::StrongGreek
        } else {
            DefinitionKind::StrongHebrew
        }
    }

    pub fn is_lexicon(&self) -> bool {
        !matches!(self, DefinitionKind::Dictionary)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DefinitionKind::Dictionary => "dictionary",
            DefinitionKind::StrongHebrew => "strong_hebrew",
            DefinitionKind::StrongGreek => "strong_greek",
        }
    }
}

//! Request types
//!
//! Requests arrive as JSON objects tagged by `action`. Missing parameters take
//! the reader UI's defaults; [`Request::validate`] rejects malformed values
//! before any dataset is touched.

use crate::error::{LuminaError, Result};
use crate::search::Scope;
use crate::storage::DefinitionKind;
use serde::{Deserialize, Serialize};

fn default_book() -> String {
    "Genesis".to_string()
}

fn default_chapter() -> u16 {
    1
}

fn default_version() -> String {
    "KJV".to_string()
}

/// `text`: one chapter of one version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRequest {
    #[serde(default = "default_book")]
    pub book: String,
    #[serde(default = "default_chapter")]
    pub chapter: u16,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub interlinear: bool,
}

impl Default for TextRequest {
    fn default() -> Self {
        Self {
            book: default_book(),
            chapter: default_chapter(),
            version: default_version(),
            interlinear: false,
        }
    }
}

/// `passage`: one verse, or a verse range within a chapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassageRequest {
    pub book: String,
    pub chapter: u16,
    pub verse: u16,
    #[serde(default)]
    pub end_verse: Option<u16>,
    #[serde(default = "default_version")]
    pub version: String,
}

/// A single verse, as used by `xrefs`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseRequest {
    pub book: String,
    pub chapter: u16,
    pub verse: u16,
}

/// `commentary`: one module's entry for one verse
///
/// Without a `module` the service uses its configured default commentary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentaryRequest {
    pub book: String,
    pub chapter: u16,
    pub verse: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
}

/// `definition`: a lexicon or dictionary entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionRequest {
    pub term: String,
    #[serde(rename = "type", default)]
    pub kind: DefinitionKind,
    /// Dictionary module; the configured default dictionary when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
}

/// `topics`: entries of a dictionary module, or of a lexicon via `HEBREW`/`GREEK`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicsRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
}

/// `search`: one page of full-text results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub q: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub scope: Scope,
    #[serde(default)]
    pub offset: usize,
}

/// Every request the service answers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Request {
    Text(TextRequest),
    Passage(PassageRequest),
    Commentary(CommentaryRequest),
    Xrefs(VerseRequest),
    Definition(DefinitionRequest),
    Topics(TopicsRequest),
    VersionList,
    CommentaryList,
    Search(SearchRequest),
}

fn require_text(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(LuminaError::InvalidRequest(format!("Missing {}.", field)));
    }
    Ok(())
}

fn require_positive(value: u16, field: &str) -> Result<()> {
    if value < 1 {
        return Err(LuminaError::InvalidRequest(format!("Invalid {}.", field)));
    }
    Ok(())
}

fn require_module(module: Option<&String>) -> Result<()> {
    module.map_or(Ok(()), |m| require_text(m, "module"))
}

fn require_verse(book: &str, chapter: u16, verse: u16) -> Result<()> {
    require_text(book, "book")?;
    require_positive(chapter, "chapter")?;
    require_positive(verse, "verse")
}

impl Request {
    /// Parse and validate a JSON request
    pub fn from_json(json: &str) -> Result<Self> {
        let request: Request =
            serde_json::from_str(json).map_err(|e| LuminaError::InvalidRequest(e.to_string()))?;
        request.validate()?;
        Ok(request)
    }

    /// The `action` name
    pub fn action(&self) -> &'static str {
        match self {
            Request::Text(_) => "text",
            Request::Passage(_) => "passage",
            Request::Commentary(_) => "commentary",
            Request::Xrefs(_) => "xrefs",
            Request::Definition(_) => "definition",
            Request::Topics(_) => "topics",
            Request::VersionList => "version_list",
            Request::CommentaryList => "commentary_list",
            Request::Search(_) => "search",
        }
    }

    /// Reject malformed parameters
    pub fn validate(&self) -> Result<()> {
        match self {
            Request::Text(r) => {
                require_text(&r.book, "book")?;
                require_positive(r.chapter, "chapter")?;
                require_text(&r.version, "version")
            }
            Request::Passage(r) => {
                require_verse(&r.book, r.chapter, r.verse)?;
                require_text(&r.version, "version")?;
                match r.end_verse {
                    Some(end) if end < r.verse => Err(LuminaError::InvalidRequest(format!(
                        "end_verse {} precedes verse {}.",
                        end, r.verse
                    ))),
                    _ => Ok(()),
                }
            }
            Request::Commentary(r) => {
                require_verse(&r.book, r.chapter, r.verse)?;
                require_module(r.module.as_ref())
            }
            Request::Xrefs(r) => require_verse(&r.book, r.chapter, r.verse),
            Request::Definition(r) => {
                require_text(&r.term, "term")?;
                if r.kind == DefinitionKind::Dictionary {
                    require_module(r.module.as_ref())?;
                }
                Ok(())
            }
            Request::Topics(r) => require_module(r.module.as_ref()),
            Request::VersionList | Request::CommentaryList => Ok(()),
            Request::Search(r) => {
                require_text(&r.version, "version")?;
                if i64::try_from(r.offset).is_err() {
                    return Err(LuminaError::InvalidRequest("Invalid offset.".to_string()));
                }
                Ok(())
            }
        }
    }
}

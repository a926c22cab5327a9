//! Response bodies, serialized with the field names the reader UI expects

use crate::canon::VerseRef;
use crate::error::LuminaError;
use crate::search::SearchPage;
use serde::{Deserialize, Serialize};

/// One verse of a `text` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseEntry {
    pub id: i64,
    pub verse: u16,
    pub text: String,
    /// Comma-joined commentary abbreviations available for the verse
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modules: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextResponse {
    pub verses: Vec<VerseEntry>,
}

/// `passage` and `commentary`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBody {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XrefsResponse {
    pub xrefs: Vec<VerseRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionResponse {
    pub definition: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: String,
    pub label: String,
}

impl Topic {
    pub fn new(value: String) -> Self {
        Self {
            label: value.clone(),
            id: value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicsResponse {
    pub topics: Vec<Topic>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionsResponse {
    pub versions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModulesResponse {
    pub modules: Vec<String>,
}

/// Body returned for any failed request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&LuminaError> for ErrorResponse {
    fn from(error: &LuminaError) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}

/// Any response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Text(TextResponse),
    Body(TextBody),
    Xrefs(XrefsResponse),
    Definition(DefinitionResponse),
    Topics(TopicsResponse),
    Versions(VersionsResponse),
    Modules(ModulesResponse),
    Search(SearchPage),
    Error(ErrorResponse),
}

impl From<LuminaError> for Response {
    fn from(error: LuminaError) -> Self {
        Response::Error(ErrorResponse::from(&error))
    }
}

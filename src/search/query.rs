//! Search queries and scopes

use crate::canon::Testament;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Rows returned per page unless configured otherwise
pub const DEFAULT_PAGE_SIZE: usize = 200;

/// Which part of the canon a search covers
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Scope {
    #[default]
    All,
    OldTestament,
    NewTestament,
    /// A single book by exact name
    Book(String),
}

impl Scope {
    /// Testament range covered by the scope, if it is not a single book
    pub fn testament(&self) -> Option<Testament> {
        match self {
            Scope::OldTestament => Some(Testament::Old),
            Scope::NewTestament => Some(Testament::New),
            _ => None,
        }
    }

    /// Book id bounds for scopes that need no lookup
    pub fn fixed_bounds(&self) -> Option<(u16, u16)> {
        match self {
            Scope::All => Some((1, crate::canon::BOOK_COUNT as u16)),
            Scope::Book(_) => None,
            _ => self.testament().map(|t| {
                let range = t.book_numbers();
                (*range.start(), *range.end())
            }),
        }
    }
}

impl FromStr for Scope {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Ok(match trimmed.to_ascii_uppercase().as_str() {
            "" | "ALL" => Scope::All,
            "OT" => Scope::OldTestament,
            "NT" => Scope::NewTestament,
            _ => Scope::Book(trimmed.to_string()),
        })
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::All => f.write_str("ALL"),
            Scope::OldTestament => f.write_str("OT"),
            Scope::NewTestament => f.write_str("NT"),
            Scope::Book(name) => f.write_str(name),
        }
    }
}

impl Serialize for Scope {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Scope {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let Ok(scope) = raw.parse::<Scope>();
        Ok(scope)
    }
}

/// Strip everything outside `[A-Za-z0-9 ]`
pub fn sanitize_query(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .collect()
}

/// A scoped, paginated full-text query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub raw_query: String,
    pub sanitized_query: String,
    pub version: String,
    pub scope: Scope,
    pub offset: usize,
    pub limit: usize,
}

impl SearchQuery {
    pub fn new<Q: Into<String>, V: Into<String>>(raw_query: Q, version: V, scope: Scope, offset: usize) -> Self {
        let raw_query = raw_query.into();
        let sanitized_query = sanitize_query(&raw_query);
        Self {
            raw_query,
            sanitized_query,
            version: version.into(),
            scope,
            offset,
            limit: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// True when nothing searchable survived sanitization
    pub fn is_empty(&self) -> bool {
        self.sanitized_query.trim().is_empty()
    }

    /// FTS5 match expression: every term quoted, implicitly AND-ed
    pub fn match_expression(&self) -> String {
        self.sanitized_query
            .split_whitespace()
            .map(|term| format!("\"{}\"", term))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

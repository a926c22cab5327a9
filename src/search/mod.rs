//! Full-text search for lumina-rs
//!
//! Queries are sanitized to plain terms, scoped to the whole canon, one
//! testament or one book, and paged in canonical order with highlighting.

pub mod engine;
pub mod query;

// Re-export main types
pub use engine::{SearchEngine, SearchPage, SearchResult};
pub use query::{DEFAULT_PAGE_SIZE, Scope, SearchQuery, sanitize_query};

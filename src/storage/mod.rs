//! Dataset storage for lumina-rs
//!
//! This module federates the SQLite datasets (`core`, `versions`,
//! `commentaries`, `extras`) behind one connection and exposes typed queries
//! over them. Dataset creation and reindexing live in [`setup`].

pub mod federation;
pub mod lookup;
pub mod queries;
pub mod records;
pub mod schema;
pub mod setup;

// Re-export main types
pub use federation::{Dataset, DatasetFederation};
pub use lookup::CoreVerseLookup;
pub use records::{
    BookRow, CommentaryAvailability, CommentaryModule, CrossReference, DefinitionKind, InterlinearWord,
    VerseRecord,
};

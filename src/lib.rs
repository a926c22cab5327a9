//! # lumina-rs
//!
//! Scripture text and study aids over federated SQLite datasets: a canonical
//! verse index, a decoder for the reference encodings embedded in legacy
//! study text, full-text search with paging and highlighting, and a request
//! API for the reader UI.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lumina_rs::{Config, Request, StudyService};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Open core.db (and whichever optional datasets exist) in assets/data
//!     let service = StudyService::open(Config::default())?;
//!
//!     let request = Request::from_json(r#"{"action":"text","book":"John","chapter":1}"#)?;
//!     let response = service.handle(&request)?;
//!     println!("{}", serde_json::to_string_pretty(&response)?);
//!
//!     let page = service.respond_json(r#"{"action":"search","q":"light","scope":"NT"}"#);
//!     println!("{}", page["count"]);
//!
//!     Ok(())
//! }
//! ```

// Core modules
pub mod api;
pub mod canon;
pub mod config;
pub mod decoder;
pub mod error;
pub mod search;
pub mod storage;
pub mod text;

// Re-export main API types
pub use api::{Request, Response, StudyService};
pub use canon::{VerseId, VerseIndex, VerseRef};
pub use config::Config;
pub use decoder::ReferenceDecoder;
pub use error::{LuminaError, Result};

// Re-export commonly used types
pub use search::{Scope, SearchEngine, SearchQuery, SearchResult};
pub use storage::{Dataset, DatasetFederation};
pub use text::StudyTextPipeline;

//! Embedded reference decoder for lumina-rs
//!
//! Legacy study text encodes verse references in several competing formats:
//! control-character delimiters, chevrons, parenthesised hex blocks and bare
//! hex runs. This module recognises them and replaces each with an inline
//! citation, or with the bracketed payload when the token does not resolve.
//!
//! The decoder holds no mutable state and can be shared freely across threads
//! as long as its lookup can.

pub mod bare;
pub mod passes;
pub mod resolve;
pub mod token;

// Re-export main types
pub use passes::{BARE_PIPELINE, DELIMITED_PIPELINE, Pass};
pub use resolve::{VerseLookup, citation, render_token, resolve_token};
pub use token::{EncodingKind, ReferenceToken, Resolution};

use crate::canon::VerseIndex;

/// Decodes encoded references in sanitized text
#[derive(Debug, Clone)]
pub struct ReferenceDecoder<L> {
    lookup: L,
}

impl ReferenceDecoder<&'static VerseIndex> {
    /// Decoder resolving labels from the static verse index
    pub fn canonical() -> Self {
        Self::new(VerseIndex::global())
    }
}

impl<L: VerseLookup> ReferenceDecoder<L> {
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }

    /// Decode delimited references: emphasis, control-delimited, parenthesised and chevron
    pub fn decode(&self, text: &str) -> String {
        passes::run_pipeline(&DELIMITED_PIPELINE, text, &self.lookup)
    }

    /// Decode text that carries no delimiters, including bare hex runs
    pub fn decode_bare(&self, text: &str) -> String {
        passes::run_pipeline(&BARE_PIPELINE, text, &self.lookup)
    }

    /// Resolve one token without rendering it
    pub fn resolve(&self, token: &ReferenceToken) -> crate::error::Result<Resolution> {
        resolve_token(&self.lookup, token)
    }
}

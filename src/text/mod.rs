//! Text processing for lumina-rs
//!
//! This module provides the HTML allow-list sanitizer and the study text
//! pipeline that combines it with the reference decoder.

pub mod pipeline;
pub mod sanitize;

// Re-export main types and functions
pub use pipeline::{RenderInput, StudyTextPipeline};
pub use sanitize::{ALLOWED_TAGS, AllowListSanitizer, Sanitizer, escape_html};

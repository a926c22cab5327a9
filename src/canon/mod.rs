//! Canonical verse index for lumina-rs
//!
//! This module holds the immutable book structure table and the bijection
//! between flat verse ids and (book, chapter, verse) references.

pub mod books;
pub mod index;

// Re-export main types
pub use books::{BOOK_COUNT, BOOKS, BookInfo, OLD_TESTAMENT_BOOKS, TOTAL_VERSES, Testament};
pub use index::{VerseId, VerseIndex, VerseRef};

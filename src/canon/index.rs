//! Bijection between canonical verse ids and (book, chapter, verse) triples
//!
//! Ids are 1-based and dense: Genesis 1:1 is 1, Revelation 22:21 is 31102.
//! Offsets are computed once from [`BOOKS`] and never mutated afterwards.

use crate::canon::books::{BOOKS, BookInfo, TOTAL_VERSES};
use crate::error::{LuminaError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// A canonical verse id in [1, 31102]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerseId(u32);

impl VerseId {
    /// Smallest valid id
    pub const FIRST: VerseId = VerseId(1);

    /// Largest valid id
    pub const LAST: VerseId = VerseId(TOTAL_VERSES);

    /// Wrap a raw integer, rejecting anything outside [1, 31102]
    pub fn new(raw: i64) -> Result<Self> {
        if raw < 1 || raw > TOTAL_VERSES as i64 {
            return Err(LuminaError::ReferenceOutOfRange(format!(
                "verse id {} outside [1, {}]",
                raw, TOTAL_VERSES
            )));
        }
        Ok(VerseId(raw as u32))
    }

    /// The raw integer value
    pub fn get(self) -> u32 {
        self.0
    }

    /// Iterate every valid id in order
    pub fn all() -> impl Iterator<Item = VerseId> {
        (1..=TOTAL_VERSES).map(VerseId)
    }
}

impl fmt::Display for VerseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Human-facing form of a verse id
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerseRef {
    pub book: String,
    pub chapter: u16,
    pub verse: u16,
}

impl VerseRef {
    pub fn new<S: Into<String>>(book: S, chapter: u16, verse: u16) -> Self {
        Self {
            book: book.into(),
            chapter,
            verse,
        }
    }
}

impl fmt::Display for VerseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}:{}", self.book, self.chapter, self.verse)
    }
}

/// Static verse index over the canonical book structure
#[derive(Debug)]
pub struct VerseIndex {
    books: &'static [BookInfo],
    /// Verses preceding each book
    book_offsets: Vec<u32>,
}

static GLOBAL: LazyLock<VerseIndex> = LazyLock::new(|| VerseIndex::new(&BOOKS));

impl VerseIndex {
    fn new(books: &'static [BookInfo]) -> Self {
        let mut book_offsets = Vec::with_capacity(books.len());
        let mut running = 0u32;
        for book in books {
            book_offsets.push(running);
            running += book.verse_count();
        }
        Self {
            books,
            book_offsets,
        }
    }

    /// The process-wide index
    pub fn global() -> &'static VerseIndex {
        &GLOBAL
    }

    /// All books in canonical order
    pub fn books(&self) -> &'static [BookInfo] {
        self.books
    }

    /// 1-based book number of a book name (exact match)
    pub fn book_number(&self, name: &str) -> Option<u16> {
        self.books
            .iter()
            .position(|b| b.name == name)
            .map(|idx| idx as u16 + 1)
    }

    /// Book metadata by name
    pub fn book(&self, name: &str) -> Option<&'static BookInfo> {
        self.books.iter().find(|b| b.name == name)
    }

    /// Resolve a (book, chapter, verse) triple to its canonical id
    pub fn to_id(&self, book: &str, chapter: u16, verse: u16) -> Result<VerseId> {
        let out_of_range =
            || LuminaError::ReferenceOutOfRange(format!("{} {}:{}", book, chapter, verse));

        let book_idx = self
            .books
            .iter()
            .position(|b| b.name == book)
            .ok_or_else(out_of_range)?;
        let info = &self.books[book_idx];

        let verses_in_chapter = info.verses_in_chapter(chapter).ok_or_else(out_of_range)?;
        if verse == 0 || verse > verses_in_chapter {
            return Err(out_of_range());
        }

        let preceding_chapters: u32 = info.chapter_verse_counts[..chapter as usize - 1]
            .iter()
            .map(|&c| c as u32)
            .sum();

        Ok(VerseId(self.book_offsets[book_idx] + preceding_chapters + verse as u32))
    }

    /// Resolve a raw integer id to its reference
    pub fn from_raw(&self, raw: i64) -> Result<VerseRef> {
        Ok(self.from_id(VerseId::new(raw)?))
    }

    /// Resolve a canonical id to its (book, chapter, verse) triple
    pub fn from_id(&self, id: VerseId) -> VerseRef {
        // Last book whose offset lies strictly below the id
        let book_idx = self.book_offsets.partition_point(|&offset| offset < id.0) - 1;
        let info = &self.books[book_idx];

        let mut remaining = id.0 - self.book_offsets[book_idx];
        for (chapter_idx, &count) in info.chapter_verse_counts.iter().enumerate() {
            let count = count as u32;
            if remaining <= count {
                return VerseRef::new(info.name, chapter_idx as u16 + 1, remaining as u16);
            }
            remaining -= count;
        }

        // Offsets are built from the same table, so every valid id lands in a chapter
        unreachable!("verse id {} not covered by book {}", id.0, info.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries() {
        let index = VerseIndex::global();
        assert_eq!(index.to_id("Genesis", 1, 1).unwrap().get(), 1);
        assert_eq!(index.to_id("Revelation", 22, 21).unwrap().get(), 31102);
        assert_eq!(index.to_id("Matthew", 1, 1).unwrap().get(), 23146);
        assert_eq!(index.to_id("Malachi", 4, 6).unwrap().get(), 23145);

        assert_eq!(index.from_id(VerseId::FIRST), VerseRef::new("Genesis", 1, 1));
        assert_eq!(index.from_id(VerseId::LAST), VerseRef::new("Revelation", 22, 21));
    }

    #[test]
    fn test_known_ids() {
        let index = VerseIndex::global();
        assert_eq!(index.from_raw(0x5749).unwrap(), VerseRef::new("Joel", 3, 1));
        assert_eq!(index.from_raw(0x575D).unwrap(), VerseRef::new("Joel", 3, 21));
        assert_eq!(index.from_raw(0x36C0).unwrap(), VerseRef::new("Psalms", 8, 3));
        assert_eq!(index.from_raw(31).unwrap(), VerseRef::new("Genesis", 1, 31));
        assert_eq!(index.from_raw(32).unwrap(), VerseRef::new("Genesis", 2, 1));
    }

    #[test]
    fn test_round_trip_every_id() {
        let index = VerseIndex::global();
        for id in VerseId::all() {
            let r = index.from_id(id);
            assert_eq!(index.to_id(&r.book, r.chapter, r.verse).unwrap(), id);
        }
    }

    #[test]
    fn test_round_trip_every_triple() {
        let index = VerseIndex::global();
        let mut expected = 1u32;
        for book in index.books() {
            for (c, &count) in book.chapter_verse_counts.iter().enumerate() {
                for v in 1..=count {
                    let id = index.to_id(book.name, c as u16 + 1, v).unwrap();
                    assert_eq!(id.get(), expected);
                    assert_eq!(index.from_id(id), VerseRef::new(book.name, c as u16 + 1, v));
                    expected += 1;
                }
            }
        }
        assert_eq!(expected - 1, TOTAL_VERSES);
    }

    #[test]
    fn test_out_of_range() {
        let index = VerseIndex::global();
        assert!(matches!(
            index.to_id("Genesis", 51, 1),
            Err(LuminaError::ReferenceOutOfRange(_))
        ));
        assert!(index.to_id("Genesis", 1, 32).is_err());
        assert!(index.to_id("Genesis", 0, 1).is_err());
        assert!(index.to_id("Genesis", 1, 0).is_err());
        assert!(index.to_id("Hezekiah", 1, 1).is_err());
        assert!(index.from_raw(0).is_err());
        assert!(index.from_raw(31103).is_err());
        assert!(index.from_raw(-5).is_err());
    }

    #[test]
    fn test_book_number() {
        let index = VerseIndex::global();
        assert_eq!(index.book_number("Genesis"), Some(1));
        assert_eq!(index.book_number("Matthew"), Some(40));
        assert_eq!(index.book_number("Revelation"), Some(66));
        assert_eq!(index.book_number("genesis"), None);
    }
}

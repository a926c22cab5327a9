//! Typed dataset queries
//!
//! Every fetch names the datasets it touches. Lookups that cross datasets
//! (a commentary entry pointing at a core verse, a translation row pointing at
//! a core book) are split into separate fetches joined in Rust.

use crate::canon::{VerseId, VerseRef};
use crate::error::{LuminaError, Result};
use crate::storage::Dataset;
use crate::storage::federation::DatasetFederation;
use crate::storage::records::{
    BookRow, CommentaryAvailability, CommentaryModule, CrossReference, InterlinearWord, VerseRecord,
};
use rusqlite::params;
use std::collections::HashMap;

impl DatasetFederation {
    /// All books in canonical order
    pub fn books(&self) -> Result<Vec<BookRow>> {
        self.query(
            &[Dataset::Core],
            "SELECT id, name FROM main.books ORDER BY id",
            [],
            BookRow::from_row,
        )
    }

    /// Id of a book by exact name
    pub fn book_id(&self, name: &str) -> Result<u16> {
        self.query_row(
            &[Dataset::Core],
            "SELECT id FROM main.books WHERE name = ?1 LIMIT 1",
            [name],
            |row| row.get(0),
        )?
        .ok_or_else(|| LuminaError::UnknownBook(name.to_string()))
    }

    /// Canonical id of a verse as stored in core
    pub fn canonical_verse_id(&self, book: &str, chapter: u16, verse: u16) -> Result<Option<VerseId>> {
        let raw: Option<i64> = self.query_row(
            &[Dataset::Core],
            r#"
            SELECT v.id FROM main.verses v
            JOIN main.books b ON v.book_id = b.id
            WHERE b.name = ?1 AND v.chapter = ?2 AND v.verse = ?3
            LIMIT 1
            "#,
            params![book, chapter, verse],
            |row| row.get(0),
        )?;
        raw.map(VerseId::new).transpose()
    }

    /// Canonical ids of every core verse in a chapter, keyed by verse number
    pub fn chapter_verse_ids(&self, book_id: u16, chapter: u16) -> Result<HashMap<u16, VerseId>> {
        let rows = self.query(
            &[Dataset::Core],
            "SELECT verse, id FROM main.verses WHERE book_id = ?1 AND chapter = ?2",
            params![book_id, chapter],
            |row| Ok((row.get::<_, u16>(0)?, row.get::<_, i64>(1)?)),
        )?;

        let mut ids = HashMap::with_capacity(rows.len());
        for (verse, raw) in rows {
            ids.insert(verse, VerseId::new(raw)?);
        }
        Ok(ids)
    }

    /// Reference for a canonical id, built from core rows
    pub fn verse_ref(&self, id: VerseId) -> Result<Option<VerseRef>> {
        self.query_row(
            &[Dataset::Core],
            r#"
            SELECT b.name, v.chapter, v.verse FROM main.verses v
            JOIN main.books b ON v.book_id = b.id
            WHERE v.id = ?1
            "#,
            [id.get()],
            |row| Ok(VerseRef::new(row.get::<_, String>(0)?, row.get(1)?, row.get(2)?)),
        )
    }

    /// Verses of one chapter of one version, in verse order
    ///
    /// `dataset` is core for the canonical version and versions otherwise; the
    /// book id is resolved against core first.
    pub fn chapter_verses(
        &self,
        dataset: Dataset,
        version: &str,
        book: &str,
        chapter: u16,
    ) -> Result<Vec<VerseRecord>> {
        let book_id = self.book_id(book)?;
        self.verse_range(dataset, version, book, book_id, chapter, 1, u16::MAX)
    }

    /// Verses `first..=last` of one chapter of one version
    #[allow(clippy::too_many_arguments)]
    pub fn verse_range(
        &self,
        dataset: Dataset,
        version: &str,
        book: &str,
        book_id: u16,
        chapter: u16,
        first: u16,
        last: u16,
    ) -> Result<Vec<VerseRecord>> {
        let sql = format!(
            r#"
            SELECT id, chapter, verse, text, version FROM {}.verses
            WHERE book_id = ?1 AND chapter = ?2 AND verse BETWEEN ?3 AND ?4 AND version = ?5
            ORDER BY verse
            "#,
            dataset.schema()
        );
        self.query(
            &[dataset],
            &sql,
            params![book_id, chapter, first, last, version],
            |row| {
                Ok(VerseRecord {
                    id: row.get(0)?,
                    book: book.to_string(),
                    chapter: row.get(1)?,
                    verse: row.get(2)?,
                    text: row.get(3)?,
                    version: row.get(4)?,
                })
            },
        )
    }

    /// Distinct versions stored in a text dataset, in first-seen order
    pub fn versions_in(&self, dataset: Dataset) -> Result<Vec<String>> {
        let sql = format!(
            "SELECT version FROM {}.verses GROUP BY version ORDER BY MIN(id)",
            dataset.schema()
        );
        self.query(&[dataset], &sql, [], |row| row.get(0))
    }

    /// Commentary modules ordered by abbreviation
    pub fn commentary_modules(&self) -> Result<Vec<CommentaryModule>> {
        self.query(
            &[Dataset::Commentaries],
            "SELECT id, abbreviation, name FROM commentaries.commentaries ORDER BY abbreviation",
            [],
            CommentaryModule::from_row,
        )
    }

    /// Modules commenting on each canonical verse in `first..=last`
    pub fn commentary_availability(&self, first: VerseId, last: VerseId) -> Result<Vec<CommentaryAvailability>> {
        let rows = self.query(
            &[Dataset::Commentaries],
            r#"
            SELECT DISTINCT e.verse_id, c.abbreviation, c.id
            FROM commentaries.commentary_entries e
            JOIN commentaries.commentaries c ON e.commentary_id = c.id
            WHERE e.verse_id BETWEEN ?1 AND ?2
            ORDER BY e.verse_id, c.id
            "#,
            params![first.get(), last.get()],
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)),
        )?;

        let mut result: Vec<CommentaryAvailability> = Vec::new();
        for (raw, abbreviation) in rows {
            let verse_id = VerseId::new(raw)?;
            if let Some(last) = result.last_mut().filter(|l| l.verse_id == verse_id) {
                last.abbreviations.push(abbreviation);
                continue;
            }
            result.push(CommentaryAvailability {
                verse_id,
                abbreviations: vec![abbreviation],
            });
        }
        Ok(result)
    }

    /// Entry text of a module (abbreviation matched case-insensitively) for a verse
    pub fn commentary_text(&self, abbreviation: &str, verse_id: VerseId) -> Result<Option<String>> {
        self.query_row(
            &[Dataset::Commentaries],
            r#"
            SELECT e.text FROM commentaries.commentary_entries e
            JOIN commentaries.commentaries c ON e.commentary_id = c.id
            WHERE lower(c.abbreviation) = lower(?1) AND e.verse_id = ?2
            LIMIT 1
            "#,
            params![abbreviation, verse_id.get()],
            |row| row.get(0),
        )
    }

    /// Outgoing cross references of a canonical verse
    pub fn cross_references(&self, from: VerseId) -> Result<Vec<CrossReference>> {
        let rows = self.query(
            &[Dataset::Extras],
            r#"
            SELECT from_verse_id, to_verse_id FROM extras.cross_references
            WHERE from_verse_id = ?1
            ORDER BY rowid
            "#,
            [from.get()],
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)),
        )?;

        let mut refs = Vec::with_capacity(rows.len());
        for (source, target) in rows {
            match VerseId::new(target) {
                Ok(to) => refs.push(CrossReference {
                    from: VerseId::new(source)?,
                    to,
                }),
                Err(e) => log::warn!("Skipping cross reference {} -> {}: {}", source, target, e),
            }
        }
        Ok(refs)
    }

    /// Lexicon definition by Strong's id
    pub fn lexicon_definition(&self, id: &str) -> Result<Option<String>> {
        let definition: Option<Option<String>> = self.query_row(
            &[Dataset::Extras],
            "SELECT definition FROM extras.lexicon WHERE id = ?1",
            [id.to_uppercase()],
            |row| row.get(0),
        )?;
        Ok(definition.flatten().filter(|d| !d.is_empty()))
    }

    /// Dictionary definition by topic (case-insensitive) and module
    pub fn dictionary_definition(&self, topic: &str, module: &str) -> Result<Option<String>> {
        let definition: Option<Option<String>> = self.query_row(
            &[Dataset::Extras],
            r#"
            SELECT definition FROM extras.dictionaries
            WHERE topic = ?1 COLLATE NOCASE AND module = ?2
            LIMIT 1
            "#,
            params![topic, module.to_uppercase()],
            |row| row.get(0),
        )?;
        Ok(definition.flatten().filter(|d| !d.is_empty()))
    }

    /// Lexicon ids starting with `prefix`, ascending
    pub fn lexicon_ids(&self, prefix: &str) -> Result<Vec<String>> {
        self.query(
            &[Dataset::Extras],
            "SELECT id FROM extras.lexicon WHERE id LIKE ?1 || '%' ORDER BY id ASC",
            [prefix],
            |row| row.get(0),
        )
    }

    /// Topics of a dictionary module, ascending
    pub fn dictionary_topics(&self, module: &str) -> Result<Vec<String>> {
        self.query(
            &[Dataset::Extras],
            "SELECT DISTINCT topic FROM extras.dictionaries WHERE module = ?1 ORDER BY topic ASC",
            [module.to_uppercase()],
            |row| row.get(0),
        )
    }

    /// Interlinear words of a canonical verse in position order
    pub fn verse_words(&self, verse_id: VerseId) -> Result<Vec<InterlinearWord>> {
        self.query(
            &[Dataset::Extras],
            r#"
            SELECT w.word, w.strongs_id, l.transliteration
            FROM extras.verse_words w
            LEFT JOIN extras.lexicon l ON w.strongs_id = l.id
            WHERE w.verse_id = ?1
            ORDER BY w.position ASC
            "#,
            [verse_id.get()],
            InterlinearWord::from_row,
        )
    }
}

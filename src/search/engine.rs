//! Scoped, paginated full-text search over `verses_fts`

use crate::config::SearchConfig;
use crate::error::{LuminaError, Result};
use crate::search::query::{Scope, SearchQuery};
use crate::storage::{Dataset, DatasetFederation};
use crate::text::{AllowListSanitizer, Sanitizer};
use rusqlite::params;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// One highlighted hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub book: String,
    pub chapter: u16,
    pub verse: u16,
    /// Sanitized verse text with matches wrapped in the configured mark markup
    pub text: String,
}

/// A page of results plus the total number of matches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPage {
    pub results: Vec<SearchResult>,
    pub count: usize,
}

impl SearchPage {
    pub fn empty() -> Self {
        Self {
            results: Vec::new(),
            count: 0,
        }
    }
}

/// Full-text search engine
pub struct SearchEngine<S = AllowListSanitizer> {
    federation: Arc<DatasetFederation>,
    config: SearchConfig,
    canonical_version: String,
    sanitizer: S,
}

impl SearchEngine<AllowListSanitizer> {
    pub fn new<V: Into<String>>(federation: Arc<DatasetFederation>, config: SearchConfig, canonical_version: V) -> Self {
        Self::with_sanitizer(federation, config, canonical_version, AllowListSanitizer)
    }
}

impl<S: Sanitizer> SearchEngine<S> {
    pub fn with_sanitizer<V: Into<String>>(
        federation: Arc<DatasetFederation>,
        config: SearchConfig,
        canonical_version: V,
        sanitizer: S,
    ) -> Self {
        Self {
            federation,
            config,
            canonical_version: canonical_version.into(),
            sanitizer,
        }
    }

    /// Build a query using the configured page size
    pub fn query<Q: Into<String>, V: Into<String>>(&self, raw: Q, version: V, scope: Scope, offset: usize) -> SearchQuery {
        SearchQuery::new(raw, version, scope, offset).with_limit(self.config.page_size)
    }

    /// Dataset holding a version's rows and index
    pub fn dataset_for(&self, version: &str) -> Dataset {
        if version == self.canonical_version {
            Dataset::Core
        } else {
            Dataset::Versions
        }
    }

    /// Book id bounds for a scope; a book scope is resolved against core
    fn bounds(&self, scope: &Scope) -> Result<(u16, u16)> {
        match scope {
            Scope::Book(name) => {
                let id = self.federation.book_id(name)?;
                Ok((id, id))
            }
            other => Ok(other.fixed_bounds().unwrap_or((1, crate::canon::BOOK_COUNT as u16))),
        }
    }

    /// Run a search; returns one page of results and the total match count.
    ///
    /// A query with nothing left after sanitization returns an empty page
    /// without touching any dataset.
    pub fn search(&self, query: &SearchQuery) -> Result<SearchPage> {
        if query.is_empty() {
            return Ok(SearchPage::empty());
        }

        let (first_book, last_book) = self.bounds(&query.scope)?;
        let dataset = self.dataset_for(&query.version);
        let schema = dataset.schema();
        let expression = query.match_expression();
        let limit = query.limit.min(self.config.page_size);
        let offset = i64::try_from(query.offset)
            .map_err(|_| LuminaError::InvalidRequest(format!("Invalid offset {}.", query.offset)))?;

        // Count and fetch share this predicate
        let predicate = "verses_fts MATCH ?1 AND version = ?2 AND book_id BETWEEN ?3 AND ?4";

        let count_sql = format!("SELECT COUNT(*) FROM {}.verses_fts WHERE {}", schema, predicate);
        let count: i64 = self
            .federation
            .query_row(
                &[dataset],
                &count_sql,
                params![expression, query.version, first_book, last_book],
                |row| row.get(0),
            )?
            .unwrap_or(0);

        let fetch_sql = format!(
            r#"
            SELECT book_id, chapter, verse, highlight(verses_fts, 0, ?5, ?6)
            FROM {}.verses_fts
            WHERE {}
            ORDER BY book_id, chapter, verse
            LIMIT ?7 OFFSET ?8
            "#,
            schema, predicate
        );
        let rows = self.federation.query(
            &[dataset],
            &fetch_sql,
            params![
                expression,
                query.version,
                first_book,
                last_book,
                self.config.highlight_open,
                self.config.highlight_close,
                limit as i64,
                offset,
            ],
            |row| {
                Ok((
                    row.get::<_, u16>(0)?,
                    row.get::<_, u16>(1)?,
                    row.get::<_, u16>(2)?,
                    row.get::<_, String>(3)?,
                ))
            },
        )?;

        let names: HashMap<u16, String> = if rows.is_empty() {
            HashMap::new()
        } else {
            self.federation
                .books()?
                .into_iter()
                .map(|b| (b.id, b.name))
                .collect()
        };

        let results = rows
            .into_iter()
            .map(|(book_id, chapter, verse, text)| SearchResult {
                book: names
                    .get(&book_id)
                    .cloned()
                    .unwrap_or_else(|| book_id.to_string()),
                chapter,
                verse,
                text: self.highlight(&text),
            })
            .collect::<Vec<_>>();

        log::debug!(
            "search '{}' in {} [{}]: {} of {} from offset {}",
            query.sanitized_query,
            query.version,
            query.scope,
            results.len(),
            count,
            query.offset
        );

        Ok(SearchPage {
            results,
            count: count.max(0) as usize,
        })
    }

    /// Sanitize first, then swap the sentinels for mark markup
    fn highlight(&self, raw: &str) -> String {
        self.sanitizer
            .sanitize(raw)
            .replace(&self.config.highlight_open, &self.config.mark_open)
            .replace(&self.config.highlight_close, &self.config.mark_close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::setup::{create_dataset, rebuild_search_index};
    use tempfile::{TempDir, tempdir};

    fn engine() -> (TempDir, SearchEngine) {
        let dir = tempdir().unwrap();
        let core = create_dataset(dir.path(), Dataset::Core).unwrap();
        core.execute_batch(
            r#"
            INSERT INTO verses VALUES (3, 1, 1, 3, 'And God said, Let there be light: and there was light.', 'KJV');
            INSERT INTO verses VALUES (4, 1, 1, 4, 'And God saw the <i>light</i>, that it was good.', 'KJV');
            INSERT INTO verses VALUES (26137, 43, 1, 5, 'And the light shineth in darkness<script>x()</script>', 'KJV');
            INSERT INTO verses VALUES (1, 1, 1, 1, 'In the beginning God created the heaven and the earth.', 'KJV');
            "#,
        )
        .unwrap();
        rebuild_search_index(&core).unwrap();
        drop(core);

        let federation = Arc::new(DatasetFederation::open_dir(dir.path()).unwrap());
        (dir, SearchEngine::new(federation, SearchConfig::default(), "KJV"))
    }

    #[test]
    fn test_empty_query_short_circuits() {
        let (_dir, engine) = engine();
        let page = engine.search(&engine.query("###", "NOPE", Scope::Book("Nowhere".into()), 0)).unwrap();
        assert_eq!(page, SearchPage::empty());
    }

    #[test]
    fn test_results_ordered_and_highlighted() {
        let (_dir, engine) = engine();
        let page = engine.search(&engine.query("light", "KJV", Scope::All, 0)).unwrap();

        assert_eq!(page.count, 3);
        let refs: Vec<_> = page.results.iter().map(|r| (r.book.as_str(), r.chapter, r.verse)).collect();
        assert_eq!(refs, vec![("Genesis", 1, 3), ("Genesis", 1, 4), ("John", 1, 5)]);

        assert!(page.results[0].text.contains("<mark>light</mark>"));
        assert!(page.results[1].text.contains("<i><mark>light</mark></i>"));
        assert!(!page.results[2].text.contains("script"));
        assert!(!page.results[2].text.contains("[[MARK]]"));
    }

    #[test]
    fn test_scopes() {
        let (_dir, engine) = engine();
        let count = |scope: Scope| engine.search(&engine.query("light", "KJV", scope, 0)).unwrap().count;

        assert_eq!(count(Scope::OldTestament), 2);
        assert_eq!(count(Scope::NewTestament), 1);
        assert_eq!(count(Scope::Book("John".into())), 1);
        assert_eq!(count(Scope::Book("Exodus".into())), 0);
        assert!(matches!(
            engine.search(&engine.query("light", "KJV", Scope::Book("Hezekiah".into()), 0)),
            Err(LuminaError::UnknownBook(_))
        ));
    }

    #[test]
    fn test_pagination_is_contiguous() {
        let (_dir, engine) = engine();
        let first = engine.search(&engine.query("light", "KJV", Scope::All, 0).with_limit(2)).unwrap();
        let second = engine.search(&engine.query("light", "KJV", Scope::All, 2).with_limit(2)).unwrap();

        assert_eq!(first.results.len(), 2);
        assert_eq!(second.results.len(), 1);
        assert_eq!(first.count, second.count);
        assert_eq!(second.results[0].book, "John");
    }

    #[test]
    fn test_operator_words_are_terms() {
        let (_dir, engine) = engine();
        let page = engine.search(&engine.query("light AND", "KJV", Scope::All, 0)).unwrap();
        assert_eq!(page.count, 3);
        assert!(engine.search(&engine.query("NOT", "KJV", Scope::All, 0)).is_ok());
    }

    #[test]
    fn test_offset_beyond_sqlite_range_rejected() {
        let (_dir, engine) = engine();
        let query = engine.query("light", "KJV", Scope::All, usize::MAX);
        assert!(matches!(engine.search(&query), Err(LuminaError::InvalidRequest(_))));

        let past_end = engine.search(&engine.query("light", "KJV", Scope::All, i64::MAX as usize)).unwrap();
        assert_eq!(past_end.count, 3);
        assert!(past_end.results.is_empty());
    }

    #[test]
    fn test_other_versions_need_their_dataset() {
        let (_dir, engine) = engine();
        assert_eq!(engine.dataset_for("KJV"), Dataset::Core);
        assert!(matches!(
            engine.search(&engine.query("light", "ASV", Scope::All, 0)),
            Err(LuminaError::DatasetUnavailable(_))
        ));
    }
}

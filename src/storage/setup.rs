//! Offline dataset tooling
//!
//! Creates dataset files with their schema and rebuilds full-text indexes.
//! Nothing here runs at request time; the federation only ever reads.

use crate::canon::BOOKS;
use crate::error::{LuminaError, Result};
use crate::storage::Dataset;
use crate::storage::schema::{self, SCHEMA_VERSION};
use rusqlite::{Connection, params};
use std::fs;
use std::path::Path;

/// Create (or open) the file for `dataset` inside `dir` and apply its schema.
///
/// Core also receives the 66-row `books` table. Returns a read-write
/// connection for loading rows.
pub fn create_dataset<P: AsRef<Path>>(dir: P, dataset: Dataset) -> Result<Connection> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let path = dir.join(dataset.file_name());
    let mut conn = Connection::open(&path)
        .map_err(|e| LuminaError::Storage(format!("Failed to create {}: {}", path.display(), e)))?;

    for batch in schema::statements(dataset) {
        conn.execute_batch(batch).map_err(|e| {
            LuminaError::Storage(format!("Failed to apply {} schema: {}", dataset, e))
        })?;
    }

    conn.pragma_update(None, "user_version", SCHEMA_VERSION)
        .map_err(|e| LuminaError::Storage(format!("Failed to set schema version: {}", e)))?;

    if dataset == Dataset::Core {
        insert_books(&mut conn)?;
    }

    log::info!(
        "Initialized {} dataset at {} with schema version {}",
        dataset,
        path.display(),
        SCHEMA_VERSION
    );
    Ok(conn)
}

fn insert_books(conn: &mut Connection) -> Result<()> {
    let tx = conn
        .transaction()
        .map_err(|e| LuminaError::Storage(format!("Failed to start transaction: {}", e)))?;

    {
        let mut stmt = tx
            .prepare("INSERT OR REPLACE INTO books (id, name, book_number) VALUES (?1, ?2, ?1)")
            .map_err(|e| LuminaError::Storage(format!("Failed to prepare statement: {}", e)))?;

        for (i, book) in BOOKS.iter().enumerate() {
            stmt.execute(params![i as i64 + 1, book.name])
                .map_err(|e| LuminaError::Storage(format!("Failed to insert book {}: {}", book.name, e)))?;
        }
    }

    tx.commit()
        .map_err(|e| LuminaError::Storage(format!("Failed to commit transaction: {}", e)))?;
    Ok(())
}

/// Rebuild `verses_fts` from `verses`; returns the number of indexed rows
pub fn rebuild_search_index(conn: &Connection) -> Result<usize> {
    conn.execute_batch(schema::CREATE_VERSES_FTS_TABLE)
        .map_err(|e| LuminaError::Storage(format!("Failed to create search index: {}", e)))?;

    conn.execute("DELETE FROM verses_fts", [])
        .map_err(|e| LuminaError::Storage(format!("Failed to clear search index: {}", e)))?;

    let indexed = conn
        .execute(
            r#"
            INSERT INTO verses_fts (rowid, text, book_id, chapter, verse, version)
            SELECT id, text, book_id, chapter, verse, version FROM verses
            "#,
            [],
        )
        .map_err(|e| LuminaError::Storage(format!("Failed to populate search index: {}", e)))?;

    log::info!("Indexed {} verses for full-text search", indexed);
    Ok(indexed)
}

/// Open an existing dataset file read-write and rebuild its search index
pub fn reindex<P: AsRef<Path>>(dir: P, dataset: Dataset) -> Result<usize> {
    if !schema::has_search_index(dataset) {
        return Err(LuminaError::InvalidRequest(format!(
            "dataset '{}' has no search index",
            dataset
        )));
    }

    let path = dir.as_ref().join(dataset.file_name());
    if !path.is_file() {
        return Err(LuminaError::DatasetUnavailable(format!(
            "{} does not exist",
            path.display()
        )));
    }

    let conn = Connection::open(&path)
        .map_err(|e| LuminaError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;
    rebuild_search_index(&conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_create_core_inserts_books() {
        let dir = tempdir().unwrap();
        let conn = create_dataset(dir.path(), Dataset::Core).unwrap();

        let count: i64 = conn.query_row("SELECT COUNT(*) FROM books", [], |r| r.get(0)).unwrap();
        assert_eq!(count, 66);
        let name: String = conn
            .query_row("SELECT name FROM books WHERE id = 40", [], |r| r.get(0))
            .unwrap();
        assert_eq!(name, "Matthew");
        let version: u32 = conn.query_row("PRAGMA user_version", [], |r| r.get(0)).unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn test_create_is_repeatable() {
        let dir = tempdir().unwrap();
        create_dataset(dir.path(), Dataset::Core).unwrap();
        let conn = create_dataset(dir.path(), Dataset::Core).unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM books", [], |r| r.get(0)).unwrap();
        assert_eq!(count, 66);
    }

    #[test]
    fn test_rebuild_search_index() {
        let dir = tempdir().unwrap();
        let conn = create_dataset(dir.path(), Dataset::Versions).unwrap();
        conn.execute(
            "INSERT INTO verses (id, book_id, chapter, verse, text, version) VALUES (1, 1, 1, 1, 'In the beginning', 'ASV')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO verses (id, book_id, chapter, verse, text, version) VALUES (2, 1, 1, 2, 'And the earth was waste', 'ASV')",
            [],
        )
        .unwrap();

        assert_eq!(rebuild_search_index(&conn).unwrap(), 2);
        assert_eq!(rebuild_search_index(&conn).unwrap(), 2);

        let hits: i64 = conn
            .query_row("SELECT COUNT(*) FROM verses_fts WHERE verses_fts MATCH 'beginnings'", [], |r| r.get(0))
            .unwrap();
        assert_eq!(hits, 1);
    }

    #[test]
    fn test_reindex_rejects_datasets_without_text() {
        let dir = tempdir().unwrap();
        create_dataset(dir.path(), Dataset::Extras).unwrap();
        assert!(matches!(
            reindex(dir.path(), Dataset::Extras),
            Err(LuminaError::InvalidRequest(_))
        ));
        assert!(matches!(
            reindex(dir.path(), Dataset::Versions),
            Err(LuminaError::DatasetUnavailable(_))
        ));
    }
}

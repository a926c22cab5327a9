//! Shared dataset fixture for integration tests
//!
//! Builds real dataset files in a temporary directory through
//! `storage::setup`, the same path the `init` command uses.

#![allow(dead_code)]

use lumina_rs::canon::{VerseId, VerseIndex};
use lumina_rs::storage::setup::{create_dataset, rebuild_search_index};
use lumina_rs::storage::{Dataset, DatasetFederation};
use lumina_rs::{Config, StudyService};
use rusqlite::params;
use std::sync::Arc;
use tempfile::TempDir;

/// Core verses whose text contains "light": the first 300 verses of Genesis
/// plus Matthew 1:1-15
pub const OT_LIGHT: std::ops::RangeInclusive<u32> = 1..=300;
pub const NT_LIGHT: std::ops::RangeInclusive<u32> = 23146..=23160;

pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn federation(&self) -> Arc<DatasetFederation> {
        Arc::new(DatasetFederation::open_dir(self.dir.path()).unwrap())
    }

    pub fn service(&self) -> StudyService {
        let config = Config::with_data_dir(self.dir.path());
        StudyService::open(config).unwrap()
    }

    pub fn remove(&self, dataset: Dataset) {
        std::fs::remove_file(self.dir.path().join(dataset.file_name())).unwrap();
    }
}

fn verse_text(id: u32, book: &str, chapter: u16, verse: u16) -> String {
    if OT_LIGHT.contains(&id) || NT_LIGHT.contains(&id) {
        format!("{} {}:{} and there was light", book, chapter, verse)
    } else {
        format!("{} {}:{} plain text", book, chapter, verse)
    }
}

fn build_core(dir: &TempDir) {
    let index = VerseIndex::global();
    let mut conn = create_dataset(dir.path(), Dataset::Core).unwrap();
    let tx = conn.transaction().unwrap();
    {
        let mut stmt = tx
            .prepare("INSERT INTO verses (id, book_id, chapter, verse, text, version) VALUES (?1, ?2, ?3, ?4, ?5, 'KJV')")
            .unwrap();
        for id in VerseId::all() {
            let r = index.from_id(id);
            let book_id = index.book_number(&r.book).unwrap();
            let text = if id.get() == 1 {
                "In the beginning <b>God</b> created the heaven and the earth, and light<script>x()</script>".to_string()
            } else {
                verse_text(id.get(), &r.book, r.chapter, r.verse)
            };
            stmt.execute(params![id.get(), book_id, r.chapter, r.verse, text]).unwrap();
        }
    }
    tx.commit().unwrap();
    rebuild_search_index(&conn).unwrap();
}

fn build_versions(dir: &TempDir) {
    let conn = create_dataset(dir.path(), Dataset::Versions).unwrap();
    conn.execute_batch(
        r#"
        INSERT INTO verses VALUES (1, 43, 1, 1, 'In the beginning was the Word', 'ASV');
        INSERT INTO verses VALUES (2, 43, 1, 2, 'The same was in the beginning with God.', 'ASV');
        INSERT INTO verses VALUES (3, 43, 1, 3, 'All things were made through him.', 'ASV');
        INSERT INTO verses VALUES (4, 43, 1, 4, 'In him was life; and the life was the light of men.', 'ASV');
        INSERT INTO verses VALUES (5, 43, 1, 1, 'In the beginning was the Word', 'KJV');
        "#,
    )
    .unwrap();
    rebuild_search_index(&conn).unwrap();
}

fn build_commentaries(dir: &TempDir) {
    let conn = create_dataset(dir.path(), Dataset::Commentaries).unwrap();
    conn.execute_batch(
        "INSERT INTO commentaries VALUES (1, 'mhc', 'Matthew Henry');
         INSERT INTO commentaries VALUES (2, 'jfb', 'Jamieson, Fausset, Brown');",
    )
    .unwrap();
    conn.execute(
        "INSERT INTO commentary_entries VALUES (1, 1, 1, ?1)",
        ["\x07In the beginning.\x07 Compare \x035A6A\x03 and (0001); see »31«."],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO commentary_entries VALUES (2, 2, 1, 'The creation <em>of all</em> things.')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO commentary_entries VALUES (3, 1, 3, '\x03FFFF\x03 unresolvable')",
        [],
    )
    .unwrap();
}

fn build_extras(dir: &TempDir) {
    let conn = create_dataset(dir.path(), Dataset::Extras).unwrap();
    conn.execute_batch(
        r#"
        INSERT INTO cross_references VALUES (1, 23146);
        INSERT INTO cross_references VALUES (1, 3);
        INSERT INTO lexicon VALUES ('H430', 'elohiym', 'God; see <b>gods</b>');
        INSERT INTO lexicon VALUES ('H7225', 'reshiyth', 'beginning, chief');
        INSERT INTO lexicon VALUES ('G3056', 'logos', 'word');
        INSERT INTO dictionaries VALUES ('Light', 'The first creation, cf. »3«.', 'EASTON');
        INSERT INTO dictionaries VALUES ('Aaron', 'Brother of Moses.', 'EASTON');
        INSERT INTO dictionaries VALUES ('Abba', 'Father.', 'SMITH');
        INSERT INTO verse_words VALUES (1, 1, 'In the beginning', 'H7225');
        INSERT INTO verse_words VALUES (1, 2, 'God', 'H430');
        INSERT INTO verse_words VALUES (1, 3, 'created', 'H1254');
        INSERT INTO verse_words VALUES (1, 4, 'the heaven', NULL);
        "#,
    )
    .unwrap();
}

/// Every dataset installed
pub fn full() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    build_core(&dir);
    build_versions(&dir);
    build_commentaries(&dir);
    build_extras(&dir);
    Fixture { dir }
}

/// Only core installed
pub fn core_only() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    build_core(&dir);
    Fixture { dir }
}

//! Dataset schema definitions
//!
//! Each dataset is its own SQLite file, so the DDL is unqualified; queries
//! qualify tables with [`Dataset::schema`](crate::storage::Dataset::schema).

use crate::storage::Dataset;

/// Dataset schema version, stored in `PRAGMA user_version`
pub const SCHEMA_VERSION: u32 = 1;

/// SQL for creating the books table (core only)
pub const CREATE_BOOKS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS books (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    book_number INTEGER
);
"#;

/// SQL for creating the verses table (core and versions)
pub const CREATE_VERSES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS verses (
    id INTEGER PRIMARY KEY,
    book_id INTEGER NOT NULL,
    chapter INTEGER NOT NULL,
    verse INTEGER NOT NULL,
    text TEXT NOT NULL,
    version TEXT NOT NULL
);
"#;

/// SQL for creating the full-text index over verses
pub const CREATE_VERSES_FTS_TABLE: &str = r#"
CREATE VIRTUAL TABLE IF NOT EXISTS verses_fts USING fts5(
    text,
    book_id UNINDEXED,
    chapter UNINDEXED,
    verse UNINDEXED,
    version UNINDEXED,
    tokenize = 'porter'
);
"#;

/// SQL for creating the commentary module table
pub const CREATE_COMMENTARIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS commentaries (
    id INTEGER PRIMARY KEY,
    abbreviation TEXT NOT NULL,
    name TEXT
);
"#;

/// SQL for creating the commentary entry table
pub const CREATE_COMMENTARY_ENTRIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS commentary_entries (
    id INTEGER PRIMARY KEY,
    commentary_id INTEGER NOT NULL,
    verse_id INTEGER NOT NULL,
    text TEXT NOT NULL
);
"#;

/// SQL for creating the cross reference table
pub const CREATE_CROSS_REFERENCES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS cross_references (
    from_verse_id INTEGER NOT NULL,
    to_verse_id INTEGER NOT NULL
);
"#;

/// SQL for creating the Strong's lexicon table
pub const CREATE_LEXICON_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS lexicon (
    id TEXT PRIMARY KEY,
    transliteration TEXT,
    definition TEXT
);
"#;

/// SQL for creating the topical dictionary table
pub const CREATE_DICTIONARIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS dictionaries (
    topic TEXT NOT NULL,
    definition TEXT,
    module TEXT NOT NULL
);
"#;

/// SQL for creating the interlinear word table
pub const CREATE_VERSE_WORDS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS verse_words (
    verse_id INTEGER NOT NULL,
    position INTEGER NOT NULL,
    word TEXT NOT NULL,
    strongs_id TEXT
);
"#;

pub const CREATE_CORE_INDEXES: &str = r#"
CREATE INDEX IF NOT EXISTS idx_books_name ON books(name);
CREATE INDEX IF NOT EXISTS idx_books_number ON books(book_number);
CREATE INDEX IF NOT EXISTS idx_verses_ref ON verses(book_id, chapter, verse);
"#;

pub const CREATE_VERSIONS_INDEXES: &str = r#"
CREATE INDEX IF NOT EXISTS idx_verses_ref ON verses(book_id, chapter, verse);
CREATE INDEX IF NOT EXISTS idx_verses_version ON verses(version);
"#;

pub const CREATE_COMMENTARIES_INDEXES: &str = r#"
CREATE INDEX IF NOT EXISTS idx_commentary_entries_verse ON commentary_entries(verse_id);
CREATE INDEX IF NOT EXISTS idx_commentaries_abbreviation ON commentaries(abbreviation);
"#;

pub const CREATE_EXTRAS_INDEXES: &str = r#"
CREATE INDEX IF NOT EXISTS idx_cross_references_from ON cross_references(from_verse_id);
CREATE INDEX IF NOT EXISTS idx_dictionaries_topic ON dictionaries(topic, module);
CREATE INDEX IF NOT EXISTS idx_lexicon_transliteration ON lexicon(transliteration);
CREATE INDEX IF NOT EXISTS idx_verse_words_verse ON verse_words(verse_id, position);
"#;

/// DDL batches for a dataset, tables first, then indexes
pub fn statements(dataset: Dataset) -> &'static [&'static str] {
    match dataset {
        Dataset::Core => &[
            CREATE_BOOKS_TABLE,
            CREATE_VERSES_TABLE,
            CREATE_VERSES_FTS_TABLE,
            CREATE_CORE_INDEXES,
        ],
        Dataset::Versions => &[
            CREATE_VERSES_TABLE,
            CREATE_VERSES_FTS_TABLE,
            CREATE_VERSIONS_INDEXES,
        ],
        Dataset::Commentaries => &[
            CREATE_COMMENTARIES_TABLE,
            CREATE_COMMENTARY_ENTRIES_TABLE,
            CREATE_COMMENTARIES_INDEXES,
        ],
        Dataset::Extras => &[
            CREATE_CROSS_REFERENCES_TABLE,
            CREATE_LEXICON_TABLE,
            CREATE_DICTIONARIES_TABLE,
            CREATE_VERSE_WORDS_TABLE,
            CREATE_EXTRAS_INDEXES,
        ],
    }
}

/// Whether a dataset carries a `verses_fts` index
pub fn has_search_index(dataset: Dataset) -> bool {
    matches!(dataset, Dataset::Core | Dataset::Versions)
}

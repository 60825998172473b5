//! v001 -- Initial schema creation.
//!
//! A single `documents` table holds every collection. Document bodies are
//! JSON objects; `rowid` gives the insertion order used by full-collection
//! reads and filtered look-ups.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    collection TEXT NOT NULL,             -- 'items', 'offers', 'purchases'
    id         TEXT NOT NULL,             -- UUID v4, generated by the store
    data       TEXT NOT NULL,             -- JSON object
    created_at TEXT NOT NULL,             -- ISO-8601 / RFC-3339
    updated_at TEXT NOT NULL,

    PRIMARY KEY (collection, id)
);

CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}

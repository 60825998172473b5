//! Database connection management.
//!
//! The [`Database`] struct owns a [`rusqlite::Connection`] and guarantees that
//! migrations are run before any other operation.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use rusqlite::Connection;
use tuckshop_shared::credentials::ServiceAccountKey;

use crate::error::{Result, StoreError};
use crate::migrations;

/// Wrapper around a [`rusqlite::Connection`].
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the document store of the project named by the
    /// service-account key.
    ///
    /// The database file is placed in the platform-appropriate data directory:
    /// - Linux:   `~/.local/share/tuckshop/<project_id>.db`
    /// - macOS:   `~/Library/Application Support/com.tuckshop.tuckshop/<project_id>.db`
    /// - Windows: `{FOLDERID_RoamingAppData}\tuckshop\tuckshop\data\<project_id>.db`
    pub fn new(key: &ServiceAccountKey) -> Result<Self> {
        let project_dirs =
            ProjectDirs::from("com", "tuckshop", "tuckshop").ok_or(StoreError::NoDataDir)?;

        let data_dir = project_dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        let db_path = data_dir.join(format!("{}.db", key.project_id));

        tracing::info!(
            path = %db_path.display(),
            project = %key.project_id,
            "opening document store"
        );

        Self::open_at(&db_path)
    }

    /// Open (or create) a database at an explicit path.
    ///
    /// Used for tests and for the `TUCKSHOP_DB_PATH` override.
    pub fn open_at(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        conn.pragma_update(None, "journal_mode", "WAL")?;

        migrations::run_migrations(&conn)?;

        Ok(Self { conn })
    }

    /// Return a reference to the underlying `rusqlite::Connection`.
    ///
    /// Callers should prefer the collection API; direct access is for
    /// ad-hoc queries in tests and migrations.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Return the filesystem path of the open database (if any).
    pub fn path(&self) -> Option<PathBuf> {
        self.conn.path().map(PathBuf::from)
    }
}

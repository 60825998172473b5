use thiserror::Error;

/// Errors produced by the store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite error.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Failed to determine a platform data directory.
    #[error("Could not determine application data directory")]
    NoDataDir,

    /// Generic I/O error (e.g. creating the database directory).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// No document with the requested id exists in the collection.
    #[error("Document not found")]
    NotFound,

    /// Migration failure.
    #[error("Migration error: {0}")]
    Migration(String),

    /// A stored document could not be (de)serialized.
    #[error("Malformed document: {0}")]
    Json(#[from] serde_json::Error),

    /// A stored document is valid JSON but not the expected shape.
    #[error("Malformed document {id}: {reason}")]
    MalformedDocument { id: String, reason: String },

    /// A filter used an unsupported field path or value.
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;

//! Collection-scoped document CRUD.
//!
//! A [`Collection`] is a cheap borrowed view over one named collection of the
//! `documents` table. Reads come back in insertion order; updates are field
//! merges (RFC 7396 semantics, so a JSON `null` removes a field).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, Connection};
use serde_json::Value;
use uuid::Uuid;

use crate::database::Database;
use crate::error::{Result, StoreError};

/// Body of a document: a JSON object.
pub type Fields = serde_json::Map<String, Value>;

const SELECT_COLUMNS: &str = "SELECT id, data, created_at, updated_at FROM documents";

/// A stored document together with its store-managed metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: Uuid,
    pub data: Fields,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.data.get(field).and_then(Value::as_str)
    }
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Comparison operator of a single-field filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
}

impl FilterOp {
    fn sql(self) -> &'static str {
        match self {
            FilterOp::Eq => "=",
            FilterOp::NotEq => "!=",
            FilterOp::Lt => "<",
            FilterOp::Le => "<=",
            FilterOp::Gt => ">",
            FilterOp::Ge => ">=",
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            FilterOp::Eq => "==",
            FilterOp::NotEq => "!=",
            FilterOp::Lt => "<",
            FilterOp::Le => "<=",
            FilterOp::Gt => ">",
            FilterOp::Ge => ">=",
        }
    }
}

impl FromStr for FilterOp {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "==" => Ok(FilterOp::Eq),
            "!=" => Ok(FilterOp::NotEq),
            "<" => Ok(FilterOp::Lt),
            "<=" => Ok(FilterOp::Le),
            ">" => Ok(FilterOp::Gt),
            ">=" => Ok(FilterOp::Ge),
            other => Err(StoreError::InvalidFilter(format!("unknown operator '{other}'"))),
        }
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// `where(field, op, value)` over one top-level (or dotted) field.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub value: Value,
}

impl Filter {
    pub fn new(field: impl Into<String>, op: FilterOp, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOp::Eq, value)
    }

    fn json_path(&self) -> Result<String> {
        let valid = !self.field.is_empty()
            && self.field.split('.').all(|segment| {
                !segment.is_empty()
                    && segment.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
            });
        if !valid {
            return Err(StoreError::InvalidFilter(format!(
                "unsupported field path '{}'",
                self.field
            )));
        }
        Ok(format!("$.{}", self.field))
    }

    fn sql_value(&self) -> Result<SqlValue> {
        match &self.value {
            Value::String(s) => Ok(SqlValue::Text(s.clone())),
            Value::Bool(b) => Ok(SqlValue::Integer(i64::from(*b))),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(SqlValue::Integer(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(SqlValue::Real(f))
                } else {
                    Err(StoreError::InvalidFilter(format!("unsupported number {n}")))
                }
            }
            other => Err(StoreError::InvalidFilter(format!(
                "cannot compare against {other}"
            ))),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.op, self.value)
    }
}

// ---------------------------------------------------------------------------
// Collection
// ---------------------------------------------------------------------------

/// Borrowed handle on one named collection.
pub struct Collection<'db> {
    conn: &'db Connection,
    name: String,
}

impl Database {
    /// Handle on the collection called `name`. Collections exist implicitly.
    pub fn collection(&self, name: &str) -> Collection<'_> {
        Collection {
            conn: self.conn(),
            name: name.to_string(),
        }
    }
}

impl<'db> Collection<'db> {
    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    /// Append a new document with a store-generated id.
    pub fn add(&self, data: Fields) -> Result<Document> {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let body = serde_json::to_string(&data)?;

        self.conn.execute(
            "INSERT INTO documents (collection, id, data, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![self.name, id.to_string(), body, now.to_rfc3339()],
        )?;

        tracing::debug!(collection = %self.name, id = %id, "document added");

        Ok(Document {
            id,
            data,
            created_at: now,
            updated_at: now,
        })
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// Fetch a single document by id.
    pub fn get(&self, id: Uuid) -> Result<Document> {
        self.conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE collection = ?1 AND id = ?2"),
                params![self.name, id.to_string()],
                row_to_document,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })
    }

    /// Every document of the collection, in insertion order.
    pub fn stream(&self) -> Result<Vec<Document>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SELECT_COLUMNS} WHERE collection = ?1 ORDER BY rowid ASC"
        ))?;

        let rows = stmt.query_map(params![self.name], row_to_document)?;

        let mut documents = Vec::new();
        for row in rows {
            documents.push(row?);
        }
        Ok(documents)
    }

    /// Documents matching a single-field filter, in insertion order.
    ///
    /// Comparison is type-strict: a string never equals a number. Documents
    /// without the field never match.
    pub fn filter(&self, filter: &Filter) -> Result<Vec<Document>> {
        let path = filter.json_path()?;
        let value = filter.sql_value()?;

        tracing::debug!(collection = %self.name, %filter, "filtering documents");

        let mut stmt = self.conn.prepare(&format!(
            "{SELECT_COLUMNS}
             WHERE collection = ?1 AND json_extract(data, ?2) {} ?3
             ORDER BY rowid ASC",
            filter.op.sql()
        ))?;

        let rows = stmt.query_map(params![self.name, path, value], row_to_document)?;

        let mut documents = Vec::new();
        for row in rows {
            documents.push(row?);
        }
        Ok(documents)
    }

    pub fn count(&self) -> Result<usize> {
        let n: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM documents WHERE collection = ?1",
            params![self.name],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(n).unwrap_or_default())
    }

    // ------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------

    /// Merge `fields` into an existing document and return the result.
    pub fn update(&self, id: Uuid, fields: Fields) -> Result<Document> {
        let patch = serde_json::to_string(&fields)?;

        let affected = self.conn.execute(
            "UPDATE documents
             SET data = json_patch(data, ?3), updated_at = ?4
             WHERE collection = ?1 AND id = ?2",
            params![self.name, id.to_string(), patch, Utc::now().to_rfc3339()],
        )?;

        if affected == 0 {
            return Err(StoreError::NotFound);
        }

        tracing::debug!(collection = %self.name, id = %id, "document updated");

        self.get(id)
    }

    // ------------------------------------------------------------------
    // Delete
    // ------------------------------------------------------------------

    /// Delete a document by id.  Returns `true` if a document was deleted.
    pub fn delete(&self, id: Uuid) -> Result<bool> {
        let affected = self.conn.execute(
            "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
            params![self.name, id.to_string()],
        )?;

        if affected > 0 {
            tracing::debug!(collection = %self.name, id = %id, "document deleted");
        }
        Ok(affected > 0)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map a `rusqlite::Row` to a [`Document`].
fn row_to_document(row: &rusqlite::Row<'_>) -> rusqlite::Result<Document> {
    let id_str: String = row.get(0)?;
    let data_str: String = row.get(1)?;
    let created_str: String = row.get(2)?;
    let updated_str: String = row.get(3)?;

    let id = Uuid::parse_str(&id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let data: Fields = serde_json::from_str(&data_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Document {
        id,
        data,
        created_at: parse_timestamp(2, &created_str)?,
        updated_at: parse_timestamp(3, &updated_str)?,
    })
}

fn parse_timestamp(column: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(e))
        })
}

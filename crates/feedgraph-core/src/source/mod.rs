//! # Record Store
//!
//! Read-only tabular access to the export. The core only needs
//! `query_table(name) -> rows with named columns`; where the rows come
//! from is up to the implementation.
//!
//! - `SqliteStore`: an export database file, opened read-only
//! - `MemoryStore`: tables held in memory

mod schema;
mod sqlite;

pub use schema::{CommentColumns, ContactColumns, FeedColumns, SourceSchema};
pub use sqlite::SqliteStore;

use crate::FeedGraphError;
use std::collections::BTreeMap;

// =============================================================================
// FIELD
// =============================================================================

/// A single cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Field {
    /// Render the cell as an identity or join key.
    ///
    /// Integer and text keys from different tables compare equal when they
    /// print the same, which is how the export mixes them. `Null` has no key.
    #[must_use]
    pub fn as_key(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Integer(v) => Some(v.to_string()),
            Self::Real(v) => Some(v.to_string()),
            Self::Text(s) => Some(s.clone()),
            Self::Blob(b) => Some(String::from_utf8_lossy(b).into_owned()),
        }
    }

    /// Check if the cell is SQL NULL.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<&str> for Field {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Field {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for Field {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl<T: Into<Field>> From<Option<T>> for Field {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

// =============================================================================
// TABLE
// =============================================================================

/// An ordered set of rows sharing one list of column names.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    name: String,
    columns: Vec<String>,
    rows: Vec<Vec<Field>>,
}

impl Table {
    /// Create an empty table with the given columns.
    #[must_use]
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row. Short rows are padded with `Null`, long rows truncated.
    pub fn push_row(&mut self, mut row: Vec<Field>) {
        row.resize(self.columns.len(), Field::Null);
        self.rows.push(row);
    }

    /// Builder form of `push_row`.
    #[must_use]
    pub fn with_row(mut self, row: Vec<Field>) -> Self {
        self.push_row(row);
        self
    }

    /// The table name this data was read from.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column names in source order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in source order.
    #[must_use]
    pub fn rows(&self) -> &[Vec<Field>] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Find a column by name, ignoring ASCII case like SQLite does.
    pub fn column_index(&self, column: &str) -> Result<usize, FeedGraphError> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(column))
            .ok_or_else(|| FeedGraphError::MissingColumn {
                table: self.name.clone(),
                column: column.to_string(),
            })
    }
}

// =============================================================================
// RECORD STORE TRAIT
// =============================================================================

/// Read-only query capability over named tables.
///
/// A missing table or unreadable store is reported as an error value;
/// implementations never abort the process.
pub trait RecordStore {
    fn query_table(&self, table: &str) -> Result<Table, FeedGraphError>;
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn query_table(&self, table: &str) -> Result<Table, FeedGraphError> {
        (**self).query_table(table)
    }
}

// =============================================================================
// MEMORY STORE
// =============================================================================

/// Tables held in memory, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: BTreeMap<String, Table>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a table under its own name.
    pub fn insert(&mut self, table: Table) {
        self.tables.insert(table.name.clone(), table);
    }

    /// Builder form of `insert`.
    #[must_use]
    pub fn with_table(mut self, table: Table) -> Self {
        self.insert(table);
        self
    }
}

impl RecordStore for MemoryStore {
    fn query_table(&self, table: &str) -> Result<Table, FeedGraphError> {
        self.tables
            .get(table)
            .cloned()
            .ok_or_else(|| FeedGraphError::SourceUnavailable(format!("no such table: {}", table)))
    }
}

// =============================================================================
// TESTS
// =============================================================================

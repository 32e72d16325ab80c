//! SQLite-backed record store.
//!
//! # Invariants
//! - The database is opened read-only; the export is never modified.
//! - A file that does not exist is an error, never an empty database.

use super::{Field, RecordStore, Table};
use crate::FeedGraphError;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Read-only view of one export database file.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Open an existing database file read-only.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FeedGraphError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(FeedGraphError::SourceUnavailable(format!(
                "database '{}' does not exist",
                path.display()
            )));
        }

        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags).map_err(|e| {
            FeedGraphError::SourceUnavailable(format!("cannot open '{}': {}", path.display(), e))
        })?;
        conn.busy_timeout(Duration::from_secs(5)).map_err(|e| {
            FeedGraphError::SourceUnavailable(format!("cannot configure '{}': {}", path.display(), e))
        })?;

        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// Wrap an already-open connection (for example an in-memory database).
    #[must_use]
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn, path: None }
    }

    /// The file this store reads, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn describe(&self) -> String {
        self.path
            .as_ref()
            .map_or_else(|| ":memory:".to_string(), |p| p.display().to_string())
    }
}

/// Quote an identifier for interpolation into SQL.
fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn to_field(value: ValueRef<'_>) -> Field {
    match value {
        ValueRef::Null => Field::Null,
        ValueRef::Integer(v) => Field::Integer(v),
        ValueRef::Real(v) => Field::Real(v),
        ValueRef::Text(bytes) => Field::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Field::Blob(bytes.to_vec()),
    }
}

impl RecordStore for SqliteStore {
    fn query_table(&self, table: &str) -> Result<Table, FeedGraphError> {
        let unavailable = |e: rusqlite::Error| {
            FeedGraphError::SourceUnavailable(format!(
                "cannot read table '{}' from '{}': {}",
                table,
                self.describe(),
                e
            ))
        };

        let sql = format!("SELECT * FROM {}", quote_identifier(table));
        let mut stmt = self.conn.prepare(&sql).map_err(unavailable)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();

        let mut result = Table::new(table, columns);
        let mut rows = stmt.query([]).map_err(unavailable)?;
        while let Some(row) = rows.next().map_err(unavailable)? {
            let mut fields = Vec::with_capacity(width);
            for i in 0..width {
                fields.push(to_field(row.get_ref(i).map_err(unavailable)?));
            }
            result.push_row(fields);
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_store() -> SqliteStore {
        let conn = Connection::open_in_memory().expect("open");
        conn.execute_batch(
            "CREATE TABLE FeedsV20 (FeedId INTEGER, UserName TEXT);
             INSERT INTO FeedsV20 VALUES (2, 'u2');
             INSERT INTO FeedsV20 VALUES (1, 'u1');
             INSERT INTO FeedsV20 VALUES (3, NULL);",
        )
        .expect("seed");
        SqliteStore::from_connection(conn)
    }

    #[test]
    fn query_returns_rows_in_store_order() {
        let table = memory_store().query_table("FeedsV20").expect("query");
        assert_eq!(table.columns(), ["FeedId", "UserName"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.rows()[0][0], Field::Integer(2));
        assert_eq!(table.rows()[1][1], Field::Text("u1".to_string()));
        assert!(table.rows()[2][1].is_null());
    }

    #[test]
    fn missing_table_is_source_unavailable() {
        let err = memory_store().query_table("CommentV20").expect_err("missing");
        assert!(matches!(err, FeedGraphError::SourceUnavailable(_)));
    }

    #[test]
    fn hostile_table_name_is_quoted() {
        let err = memory_store()
            .query_table("FeedsV20; DROP TABLE FeedsV20")
            .expect_err("no such table");
        assert!(matches!(err, FeedGraphError::SourceUnavailable(_)));
        assert!(memory_store().query_table("FeedsV20").is_ok());
    }

    #[test]
    fn open_missing_file_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = SqliteStore::open(dir.path().join("absent.db")).expect_err("missing");
        assert!(matches!(err, FeedGraphError::SourceUnavailable(_)));
    }

    #[test]
    fn open_existing_file_reads_tables() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("Sns.db");
        {
            let conn = Connection::open(&path).expect("create");
            conn.execute_batch(
                "CREATE TABLE CommentV20 (FeedId INTEGER, FromUserName TEXT);
                 INSERT INTO CommentV20 VALUES (1, 'u9');",
            )
            .expect("seed");
        }

        let store = SqliteStore::open(&path).expect("open");
        assert_eq!(store.path(), Some(path.as_path()));
        let table = store.query_table("CommentV20").expect("query");
        assert_eq!(table.len(), 1);
    }
}

//! # Identity Resolver
//!
//! Maps opaque account identifiers to display labels.
//!
//! - Only contacts with a non-empty display override become entries
//! - Lookup is total: unknown identifiers resolve to themselves
//! - No side effects

use crate::source::{ContactColumns, RecordStore, Table};
use crate::{FeedGraphError, Label, UserId};
use std::collections::BTreeMap;

/// Identifier → label mapping built from the contacts table.
#[derive(Debug, Clone, Default)]
pub struct IdentityResolver {
    labels: BTreeMap<UserId, Label>,
}

impl IdentityResolver {
    /// Create an empty resolver (every identifier resolves to itself).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(identifier, override)` pairs.
    ///
    /// Pairs without an override, or with an empty one, are dropped.
    /// A repeated identifier keeps the last override seen.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Option<V>)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut labels = BTreeMap::new();
        for (id, remark) in pairs {
            let Some(remark) = remark.map(Into::into) else {
                continue;
            };
            if remark.is_empty() {
                continue;
            }
            labels.insert(UserId::new(id), Label::new(remark));
        }
        Self { labels }
    }

    /// Build from a contacts table.
    ///
    /// A row is dropped if its identifier or nickname is null, or if it
    /// lacks an override. A missing column is an error.
    pub fn from_table(table: &Table, columns: &ContactColumns) -> Result<Self, FeedGraphError> {
        let id_col = table.column_index(&columns.user_id)?;
        let nickname_col = table.column_index(&columns.nickname)?;
        let remark_col = table.column_index(&columns.remark)?;

        let pairs = table.rows().iter().filter_map(|row| {
            if row[nickname_col].is_null() {
                return None;
            }
            let id = row[id_col].as_key()?;
            Some((id, row[remark_col].as_key()))
        });

        Ok(Self::from_pairs(pairs))
    }

    /// Query the contacts table from a store and build the resolver.
    pub fn from_store<S: RecordStore>(
        store: &S,
        columns: &ContactColumns,
    ) -> Result<Self, FeedGraphError> {
        let table = store.query_table(&columns.table)?;
        Self::from_table(&table, columns)
    }

    /// Resolve an identifier to its label, falling back to the identifier.
    #[must_use]
    pub fn resolve(&self, id: &UserId) -> Label {
        self.labels.get(id).cloned().unwrap_or_else(|| Label::from(id))
    }

    /// Number of override entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================

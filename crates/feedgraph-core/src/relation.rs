//! # Relation Extractor
//!
//! Joins feed records with their comments to produce one `Relation` per
//! commented feed.
//!
//! - Feeds with no comments produce nothing
//! - Commenters keep comment-table row order, repeats included
//! - Output equals the naive per-feed scan; the index is only a speedup

use crate::source::{CommentColumns, FeedColumns, RecordStore, Table};
use crate::{FeedGraphError, FeedId, Label, Relation, UserId};
use std::collections::BTreeMap;

// =============================================================================
// RECORDS
// =============================================================================

/// One posted item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRecord {
    pub feed_id: FeedId,
    pub poster: UserId,
}

impl FeedRecord {
    #[must_use]
    pub fn new(feed_id: impl Into<String>, poster: impl Into<String>) -> Self {
        Self {
            feed_id: FeedId::new(feed_id),
            poster: UserId::new(poster),
        }
    }
}

/// One comment on a feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRecord {
    pub feed_id: FeedId,
    pub commenter: UserId,
}

impl CommentRecord {
    #[must_use]
    pub fn new(feed_id: impl Into<String>, commenter: impl Into<String>) -> Self {
        Self {
            feed_id: FeedId::new(feed_id),
            commenter: UserId::new(commenter),
        }
    }
}

// =============================================================================
// TIMELINE
// =============================================================================

/// Feeds and comments read from the timeline tables.
///
/// Rows with a null key cell are skipped and counted in `skipped_rows`.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    pub feeds: Vec<FeedRecord>,
    pub comments: Vec<CommentRecord>,
    pub skipped_rows: usize,
}

impl Timeline {
    /// Parse both tables.
    pub fn from_tables(
        feeds: &Table,
        feed_columns: &FeedColumns,
        comments: &Table,
        comment_columns: &CommentColumns,
    ) -> Result<Self, FeedGraphError> {
        let (feeds, skipped_feeds) = key_pairs(feeds, &feed_columns.feed_id, &feed_columns.poster)?;
        let (comments, skipped_comments) = key_pairs(
            comments,
            &comment_columns.feed_id,
            &comment_columns.commenter,
        )?;

        Ok(Self {
            feeds: feeds
                .into_iter()
                .map(|(id, poster)| FeedRecord::new(id, poster))
                .collect(),
            comments: comments
                .into_iter()
                .map(|(id, commenter)| CommentRecord::new(id, commenter))
                .collect(),
            skipped_rows: skipped_feeds.saturating_add(skipped_comments),
        })
    }

    /// Query both tables from a store and parse them.
    pub fn from_store<S: RecordStore>(
        store: &S,
        feed_columns: &FeedColumns,
        comment_columns: &CommentColumns,
    ) -> Result<Self, FeedGraphError> {
        let feeds = store.query_table(&feed_columns.table)?;
        let comments = store.query_table(&comment_columns.table)?;
        Self::from_tables(&feeds, feed_columns, &comments, comment_columns)
    }
}

/// Extract `(a, b)` key pairs from two columns, skipping rows with a null.
fn key_pairs(
    table: &Table,
    a: &str,
    b: &str,
) -> Result<(Vec<(String, String)>, usize), FeedGraphError> {
    let a_col = table.column_index(a)?;
    let b_col = table.column_index(b)?;

    let mut pairs = Vec::with_capacity(table.len());
    let mut skipped = 0usize;
    for row in table.rows() {
        match (row[a_col].as_key(), row[b_col].as_key()) {
            (Some(x), Some(y)) => pairs.push((x, y)),
            _ => skipped = skipped.saturating_add(1),
        }
    }
    Ok((pairs, skipped))
}

// =============================================================================
// EXTRACTOR
// =============================================================================

/// Builds relations from feeds and comments.
pub struct RelationExtractor;

impl RelationExtractor {
    /// Produce one relation per feed row that has at least one comment.
    ///
    /// `resolve` maps identifiers to labels and is applied to the poster and
    /// every commenter. Relations follow feed row order.
    pub fn extract<F>(feeds: &[FeedRecord], comments: &[CommentRecord], resolve: F) -> Vec<Relation>
    where
        F: Fn(&UserId) -> Label,
    {
        let index = Self::index_comments(comments, &resolve);

        feeds
            .iter()
            .filter_map(|feed| {
                let commenters = index.get(&feed.feed_id)?;
                Some(Relation::new(resolve(&feed.poster), commenters.clone()))
            })
            .collect()
    }

    /// Group resolved commenters by feed id, keeping row order within a feed.
    fn index_comments<F>(comments: &[CommentRecord], resolve: &F) -> BTreeMap<FeedId, Vec<Label>>
    where
        F: Fn(&UserId) -> Label,
    {
        let mut index: BTreeMap<FeedId, Vec<Label>> = BTreeMap::new();
        for comment in comments {
            index
                .entry(comment.feed_id.clone())
                .or_default()
                .push(resolve(&comment.commenter));
        }
        index
    }
}

// =============================================================================
// TESTS
// =============================================================================

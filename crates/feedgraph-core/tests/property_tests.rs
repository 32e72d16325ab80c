//! # Property-Based Tests
//!
//! Merge, persistence, and join invariants checked with proptest.

use feedgraph_core::{
    CommentRecord, FeedRecord, GraphFile, GraphMerger, IdentityResolver, Label, Relation,
    RelationExtractor, SocialGraph, UserId, export_canonical,
};
use proptest::collection::vec;
use proptest::prelude::*;
use std::collections::BTreeSet;

// =============================================================================
// STRATEGIES & HELPERS
// =============================================================================

fn label() -> impl Strategy<Value = String> {
    "[a-f]{1,2}"
}

fn relations() -> impl Strategy<Value = Vec<Relation>> {
    vec(
        (label(), vec(label(), 1..5)).prop_map(|(poster, commenters)| {
            Relation::new(
                Label::new(poster),
                commenters.into_iter().map(Label::new).collect(),
            )
        }),
        0..12,
    )
}

fn relation_edges(relations: &[Relation]) -> BTreeSet<(Label, Label)> {
    let mut edges = BTreeSet::new();
    for relation in relations {
        for commenter in &relation.commenters {
            let (a, b) = (commenter.clone(), relation.poster.clone());
            edges.insert(if a <= b { (a, b) } else { (b, a) });
        }
    }
    edges
}

/// Reference join: scan every comment for every feed.
fn naive_join(
    feeds: &[FeedRecord],
    comments: &[CommentRecord],
    resolver: &IdentityResolver,
) -> Vec<Relation> {
    feeds
        .iter()
        .filter_map(|feed| {
            let commenters: Vec<Label> = comments
                .iter()
                .filter(|c| c.feed_id == feed.feed_id)
                .map(|c| resolver.resolve(&c.commenter))
                .collect();
            if commenters.is_empty() {
                None
            } else {
                Some(Relation::new(resolver.resolve(&feed.poster), commenters))
            }
        })
        .collect()
}

/// One full merge-and-persist pass against a graph file.
fn run_once(file: &GraphFile, relations: &[Relation], me: &Label) -> SocialGraph {
    let prior = file.load_or_empty().expect("load");
    let (graph, _) = GraphMerger::apply(prior, relations, Some(me));
    file.save(&graph).expect("save");
    graph
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Running twice on unchanged input rewrites the same persisted bytes.
    #[test]
    fn rerun_is_idempotent(relations in relations(), me in label()) {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = GraphFile::new(dir.path().join("graph.fgx"));
        let me = Label::new(me);

        let first = run_once(&file, &relations, &me);
        let bytes_first = std::fs::read(file.path()).expect("read");

        let second = run_once(&file, &relations, &me);
        let bytes_second = std::fs::read(file.path()).expect("read");

        prop_assert_eq!(first.labels(), second.labels());
        prop_assert_eq!(first.edge_labels(), second.edge_labels());
        prop_assert_eq!(bytes_first, bytes_second);
    }

    /// The local account's label never survives a merge.
    #[test]
    fn self_is_always_excluded(
        relations in relations(),
        me in label(),
        as_poster in any::<bool>()
    ) {
        let me = Label::new(me);
        let mut relations = relations;
        if as_poster {
            relations.push(Relation::new(me.clone(), vec![Label::new("zz")]));
        } else {
            relations.push(Relation::new(Label::new("zz"), vec![me.clone()]));
        }

        let (graph, _) = GraphMerger::apply(SocialGraph::new(), &relations, Some(&me));

        prop_assert!(!graph.contains_label(&me));
        prop_assert!(graph.edge_labels().iter().all(|(a, b)| a != &me && b != &me));
    }

    /// Merging more relations never loses earlier edges.
    #[test]
    fn merge_accumulates(r1 in relations(), r2 in relations()) {
        let (g1, _) = GraphMerger::merge(SocialGraph::new(), &r1);
        let bytes = export_canonical(&g1).expect("export");
        let reloaded = feedgraph_core::import_canonical(&bytes).expect("import");

        let (g2, _) = GraphMerger::merge(reloaded, &r2);

        let expected: BTreeSet<_> = g1.edge_labels().union(&relation_edges(&r2)).cloned().collect();
        prop_assert_eq!(g2.edge_labels(), expected);
        prop_assert!(g1.labels().is_subset(&g2.labels()));
    }

    /// Identifiers without an override resolve to themselves.
    #[test]
    fn unknown_ids_resolve_to_raw(known in vec(("[a-c]{3}", "[A-Z]{1,4}"), 0..6), unknown in "[x-z]{3}") {
        let resolver = IdentityResolver::from_pairs(known.into_iter().map(|(k, v)| (k, Some(v))));
        let id = UserId::new(unknown.clone());
        prop_assert_eq!(resolver.resolve(&id), Label::new(unknown));
    }

    /// The indexed join matches the naive per-feed scan exactly.
    #[test]
    fn indexed_join_matches_naive(
        feeds in vec(("[0-4]", "[a-d]"), 0..8),
        comments in vec(("[0-6]", "[a-f]"), 0..16),
        overrides in vec(("[a-f]", proptest::option::of("[A-C]{0,2}")), 0..4)
    ) {
        let feeds: Vec<_> = feeds.into_iter().map(|(f, u)| FeedRecord::new(f, u)).collect();
        let comments: Vec<_> = comments.into_iter().map(|(f, u)| CommentRecord::new(f, u)).collect();
        let resolver = IdentityResolver::from_pairs(overrides);

        let indexed = RelationExtractor::extract(&feeds, &comments, |id| resolver.resolve(id));
        let naive = naive_join(&feeds, &comments, &resolver);

        prop_assert_eq!(indexed, naive);
    }
}

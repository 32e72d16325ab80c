//! # Graph Merger
//!
//! Folds relations into a graph and removes the local account's node.
//!
//! Every step takes the graph by value and hands it back, so a run reads
//! as `load -> merge -> exclude_self -> persist` with no shared aliasing.

use crate::graph::SocialGraph;
use crate::{Label, Relation};

/// Outcome of the self-exclusion step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelfExclusion {
    /// No local identity was supplied.
    #[default]
    Skipped,
    /// The local account's label was not in the graph.
    Absent,
    /// The node was removed along with this many edges.
    Removed { edges: usize },
}

/// Counters describing one merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeReport {
    pub relations: usize,
    pub nodes_added: usize,
    pub edges_added: usize,
    pub self_exclusion: SelfExclusion,
}

/// Merge-and-exclude operations over `SocialGraph` values.
pub struct GraphMerger;

impl GraphMerger {
    /// Add every relation's poster, commenters, and commenter–poster edges.
    ///
    /// Relations are applied in order. Existing nodes and edges are left
    /// as they are, so merging the same relations twice changes nothing.
    pub fn merge(mut graph: SocialGraph, relations: &[Relation]) -> (SocialGraph, MergeReport) {
        let nodes_before = graph.node_count();
        let mut edges_added = 0usize;

        for relation in relations {
            let poster = graph.ensure_node(&relation.poster);
            for commenter in &relation.commenters {
                let commenter = graph.ensure_node(commenter);
                if graph.ensure_edge(commenter, poster) {
                    edges_added = edges_added.saturating_add(1);
                }
            }
        }

        let report = MergeReport {
            relations: relations.len(),
            nodes_added: graph.node_count().saturating_sub(nodes_before),
            edges_added,
            self_exclusion: SelfExclusion::Skipped,
        };
        (graph, report)
    }

    /// Remove the local account's node and its edges if present.
    pub fn exclude_self(mut graph: SocialGraph, self_label: &Label) -> (SocialGraph, SelfExclusion) {
        let outcome = match graph.remove_node(self_label) {
            Some(edges) => SelfExclusion::Removed { edges },
            None => SelfExclusion::Absent,
        };
        (graph, outcome)
    }

    /// Merge, then exclude the local account when one is given.
    ///
    /// Exclusion runs on every call, so a previously persisted graph that
    /// somehow holds the self node is cleaned even if no new edge touches it.
    pub fn apply(
        graph: SocialGraph,
        relations: &[Relation],
        self_label: Option<&Label>,
    ) -> (SocialGraph, MergeReport) {
        let (graph, mut report) = Self::merge(graph, relations);
        let Some(label) = self_label else {
            return (graph, report);
        };
        let (graph, outcome) = Self::exclude_self(graph, label);
        report.self_exclusion = outcome;
        (graph, report)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn l(s: &str) -> Label {
        Label::new(s)
    }

    fn relation(poster: &str, commenters: &[&str]) -> Relation {
        Relation::new(l(poster), commenters.iter().map(|c| l(c)).collect())
    }

    #[test]
    fn merge_adds_poster_commenters_and_edges() {
        let (graph, report) =
            GraphMerger::merge(SocialGraph::new(), &[relation("Ann", &["u2", "u3"])]);

        assert_eq!(graph.node_count(), 3);
        assert!(graph.contains_edge(&l("u2"), &l("Ann")));
        assert!(graph.contains_edge(&l("u3"), &l("Ann")));
        assert_eq!(report.nodes_added, 3);
        assert_eq!(report.edges_added, 2);
    }

    #[test]
    fn repeated_commenter_adds_one_edge() {
        let (graph, report) =
            GraphMerger::merge(SocialGraph::new(), &[relation("Ann", &["u2", "u2", "u2"])]);

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(report.edges_added, 1);
    }

    #[test]
    fn merge_is_idempotent() {
        let relations = [relation("Ann", &["u2"]), relation("u2", &["u3", "Ann"])];
        let (once, _) = GraphMerger::merge(SocialGraph::new(), &relations);
        let (twice, report) = GraphMerger::merge(once.clone(), &relations);

        assert_eq!(once, twice);
        assert_eq!(report.nodes_added, 0);
        assert_eq!(report.edges_added, 0);
    }

    #[test]
    fn scenario_self_removed_with_both_edges() {
        let (graph, report) = GraphMerger::apply(
            SocialGraph::new(),
            &[relation("Ann", &["u2", "u3"])],
            Some(&l("Ann")),
        );

        assert_eq!(graph.labels().into_iter().collect::<Vec<_>>(), vec![l("u2"), l("u3")]);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(report.self_exclusion, SelfExclusion::Removed { edges: 2 });
    }

    #[test]
    fn self_absent_is_reported() {
        let (_, report) =
            GraphMerger::apply(SocialGraph::new(), &[relation("a", &["b"])], Some(&l("me")));
        assert_eq!(report.self_exclusion, SelfExclusion::Absent);
    }

    #[test]
    fn prior_self_node_is_cleaned_without_new_relations() {
        let mut prior = SocialGraph::new();
        prior.connect(&l("me"), &l("friend"));

        let (graph, report) = GraphMerger::apply(prior, &[], Some(&l("me")));

        assert!(!graph.contains_label(&l("me")));
        assert!(graph.contains_label(&l("friend")));
        assert_eq!(report.self_exclusion, SelfExclusion::Removed { edges: 1 });
    }

    #[test]
    fn no_self_label_skips_exclusion() {
        let (graph, report) = GraphMerger::apply(SocialGraph::new(), &[relation("a", &["b"])], None);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(report.self_exclusion, SelfExclusion::Skipped);
    }
}

//! # Batch Pipeline
//!
//! One invocation = one linear transform:
//!
//! ```text
//! load graph -> resolve identities -> extract relations -> merge
//!            -> exclude self -> persist -> render
//! ```
//!
//! The local account id is required: without it the own node could end
//! up in the graph, so the run fails with a configuration error before
//! anything is read or written.
//!
//! With no persisted graph yet, `source.seed_gexf` (if set and present)
//! supplies the prior state.
//!
//! Either the merged graph is persisted in full or the previous file is
//! left exactly as it was. Rendering happens after persisting, so a render
//! failure is reported but the persisted graph stands.

use crate::config::Config;
use feedgraph_core::{
    ErrorKind, FeedGraphError, GraphFile, GraphMerger, HtmlRenderer, IdentityResolver, Label,
    MergeReport, RecordStore, RelationExtractor, RenderSink, SelfExclusion, SocialGraph,
    SqliteStore, Timeline, UserId, load_gexf,
};
use std::fmt;
use std::path::PathBuf;
use std::time::Instant;

// =============================================================================
// RUN RESULT
// =============================================================================

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// The rendered artifact.
    pub artifact: PathBuf,
    /// The persisted graph file.
    pub graph_path: PathBuf,
    pub nodes: usize,
    pub edges: usize,
    /// Source rows dropped for a null key cell.
    pub skipped_rows: usize,
    pub report: MergeReport,
}

/// Outcome of a run; never a panic, never an escaped error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    Success(RunSummary),
    Failure { kind: ErrorKind, message: String },
}

impl RunStatus {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

impl From<&FeedGraphError> for RunStatus {
    fn from(err: &FeedGraphError) -> Self {
        Self::Failure {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl From<Result<RunSummary, FeedGraphError>> for RunStatus {
    fn from(result: Result<RunSummary, FeedGraphError>) -> Self {
        match result {
            Ok(summary) => Self::Success(summary),
            Err(e) => Self::from(&e),
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(s) => write!(
                f,
                "Comment network generated: {} ({} people, {} connections)",
                s.artifact.display(),
                s.nodes,
                s.edges
            ),
            Self::Failure { kind, message } => {
                write!(f, "Comment network failed [{}]: {}", kind, message)
            }
        }
    }
}

// =============================================================================
// PIPELINE
// =============================================================================

/// The configured batch.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Override the local account identifier.
    #[must_use]
    pub fn with_self_id(mut self, self_id: impl Into<String>) -> Self {
        self.config.account.self_id = Some(self_id.into());
        self
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run against the configured SQLite databases and HTML output.
    pub fn run(&self) -> RunStatus {
        let status = RunStatus::from(self.try_run());
        match &status {
            RunStatus::Success(_) => tracing::info!("{}", status),
            RunStatus::Failure { kind, message } => {
                tracing::error!(kind = %kind, "Run failed: {}", message);
            }
        }
        status
    }

    /// Like [`Pipeline::run`], but keeps the error value.
    pub fn try_run(&self) -> Result<RunSummary, FeedGraphError> {
        let source = &self.config.source;
        self.self_id()?;
        let contacts = SqliteStore::open(&source.contacts_db)?;
        tracing::debug!(path = ?contacts.path(), "Opened contacts database");
        let timeline = SqliteStore::open(&source.timeline_db)?;
        tracing::debug!(path = ?timeline.path(), "Opened timeline database");

        let renderer = HtmlRenderer::new(&self.config.output.html);
        self.run_with(&contacts, &timeline, &renderer)
    }

    /// The configured local account, or a configuration error.
    fn self_id(&self) -> Result<UserId, FeedGraphError> {
        self.config
            .account
            .self_id
            .as_deref()
            .map(UserId::new)
            .ok_or_else(|| {
                FeedGraphError::InvalidConfig(
                    "account.self_id is not set; add it to feedgraph.toml or pass --self-id"
                        .to_string(),
                )
            })
    }

    /// Prior state from `source.seed_gexf`, used only while no persisted
    /// graph exists.
    fn seed(&self) -> Result<Option<SocialGraph>, FeedGraphError> {
        let Some(path) = &self.config.source.seed_gexf else {
            return Ok(None);
        };
        let seeded = load_gexf(path)?;
        if seeded.is_some() {
            tracing::info!(path = %path.display(), "Seeding from GEXF graph");
        }
        Ok(seeded)
    }

    /// Run against arbitrary stores and sink.
    pub fn run_with<C, T>(
        &self,
        contacts: &C,
        timeline: &T,
        sink: &dyn RenderSink,
    ) -> Result<RunSummary, FeedGraphError>
    where
        C: RecordStore,
        T: RecordStore,
    {
        let started = Instant::now();
        let schema = &self.config.source.schema;
        let self_id = self.self_id()?;

        // Load first: a corrupt file aborts before any work.
        let graph_file = GraphFile::new(&self.config.output.graph);
        let prior = match graph_file.load()? {
            Some(g) => Some(g),
            None => self.seed()?,
        };
        match &prior {
            Some(g) => tracing::info!(
                path = %graph_file.path().display(),
                nodes = g.node_count(),
                edges = g.edge_count(),
                "Loaded persisted graph"
            ),
            None => tracing::info!(
                path = %graph_file.path().display(),
                "No persisted graph, starting empty"
            ),
        }

        let resolver = IdentityResolver::from_store(contacts, &schema.contacts)?;
        tracing::info!(overrides = resolver.len(), "Resolved contacts");

        let timeline = Timeline::from_store(timeline, &schema.feeds, &schema.comments)?;
        if timeline.skipped_rows > 0 {
            tracing::warn!(
                skipped = timeline.skipped_rows,
                "Skipped timeline rows with empty key cells"
            );
        }

        let relations = RelationExtractor::extract(&timeline.feeds, &timeline.comments, |id| {
            resolver.resolve(id)
        });
        tracing::info!(
            feeds = timeline.feeds.len(),
            comments = timeline.comments.len(),
            relations = relations.len(),
            "Extracted relations"
        );

        let self_label: Label = resolver.resolve(&self_id);
        let (graph, report) =
            GraphMerger::apply(prior.unwrap_or_default(), &relations, Some(&self_label));
        match report.self_exclusion {
            SelfExclusion::Removed { edges } => {
                tracing::info!(label = %self_label, edges, "Removed own node");
            }
            SelfExclusion::Absent | SelfExclusion::Skipped => {
                tracing::debug!(label = %self_label, "Own node not present");
            }
        }
        tracing::info!(
            nodes_added = report.nodes_added,
            edges_added = report.edges_added,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Merged graph"
        );

        graph_file.save(&graph)?;
        tracing::info!(path = %graph_file.path().display(), "Persisted graph");

        let artifact = sink.render(&graph)?;
        tracing::info!(
            path = %artifact.display(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Rendered comment network"
        );

        Ok(RunSummary {
            artifact,
            graph_path: graph_file.path().to_path_buf(),
            nodes: graph.node_count(),
            edges: graph.edge_count(),
            skipped_rows: timeline.skipped_rows,
            report,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

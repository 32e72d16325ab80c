//! # Configuration
//!
//! `feedgraph.toml` in the working directory. Every key is optional; an
//! absent file means all defaults.
//!
//! ```toml
//! [source]
//! contacts_db = "Msg/MicroMsg.db"
//! timeline_db = "Msg/Sns.db"
//!
//! [account]
//! self_id = "wxid_me"
//!
//! [output]
//! graph = "graph.fgx"
//! html = "comment_network.html"
//! ```

use feedgraph_core::primitives::{CONTACTS_DB, GRAPH_FILE, RENDER_FILE, TIMELINE_DB};
use feedgraph_core::{FeedGraphError, SourceSchema};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Well-known configuration file name.
pub const CONFIG_FILE: &str = "feedgraph.toml";

/// Written by `feedgraph init`.
pub const DEFAULT_CONFIG: &str = r#"# feedgraph configuration

[source]
# Relative paths resolve against the directory feedgraph runs in; point
# these at the decrypted export (e.g. "app/DataBase/Msg/MicroMsg.db").
# Database holding the contacts table
contacts_db = "Msg/MicroMsg.db"
# Database holding the feeds and comments tables
timeline_db = "Msg/Sns.db"
# GEXF graph (e.g. an earlier networkx graph.gexf) to start from when
# output.graph does not exist yet
# seed_gexf = "graph.gexf"

# Table and column names, if your export differs
# [source.schema.contacts]
# table = "Contact"
# user_id = "UserName"
# nickname = "NickName"
# remark = "Remark"
#
# [source.schema.feeds]
# table = "FeedsV20"
# feed_id = "FeedId"
# poster = "UserName"
#
# [source.schema.comments]
# table = "CommentV20"
# feed_id = "FeedId"
# commenter = "FromUserName"

[account]
# Your own account identifier; its node is kept out of the graph
# self_id = "wxid_xxxxxxxx"

[output]
graph = "graph.fgx"
html = "comment_network.html"
"#;

// =============================================================================
// SECTIONS
// =============================================================================

/// Where the export lives and how its tables are named.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    pub contacts_db: PathBuf,
    pub timeline_db: PathBuf,
    pub seed_gexf: Option<PathBuf>,
    pub schema: SourceSchema,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            contacts_db: PathBuf::from(CONTACTS_DB),
            timeline_db: PathBuf::from(TIMELINE_DB),
            seed_gexf: None,
            schema: SourceSchema::default(),
        }
    }
}

/// The local account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccountConfig {
    pub self_id: Option<String>,
}

/// Artifact locations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub graph: PathBuf,
    pub html: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            graph: PathBuf::from(GRAPH_FILE),
            html: PathBuf::from(RENDER_FILE),
        }
    }
}

// =============================================================================
// CONFIG
// =============================================================================

/// Full application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub source: SourceConfig,
    pub account: AccountConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Load from `path`, or return defaults if the file does not exist.
    pub fn load(path: &Path) -> Result<Self, FeedGraphError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text).map_err(|e| match e {
                FeedGraphError::InvalidConfig(msg) => {
                    FeedGraphError::InvalidConfig(format!("{}: {}", path.display(), msg))
                }
                other => other,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(FeedGraphError::InvalidConfig(format!(
                "cannot read '{}': {}",
                path.display(),
                e
            ))),
        }
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(text: &str) -> Result<Self, FeedGraphError> {
        let config: Self =
            toml::from_str(text).map_err(|e| FeedGraphError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that can never produce a run.
    pub fn validate(&self) -> Result<(), FeedGraphError> {
        self.source.schema.validate()?;
        if self.account.self_id.as_deref() == Some("") {
            return Err(FeedGraphError::InvalidConfig(
                "account.self_id must not be empty".to_string(),
            ));
        }
        if self
            .source
            .seed_gexf
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            return Err(FeedGraphError::InvalidConfig(
                "source.seed_gexf must not be empty".to_string(),
            ));
        }
        for (key, path) in [
            ("source.contacts_db", &self.source.contacts_db),
            ("source.timeline_db", &self.source.timeline_db),
            ("output.graph", &self.output.graph),
            ("output.html", &self.output.html),
        ] {
            if path.as_os_str().is_empty() {
                return Err(FeedGraphError::InvalidConfig(format!(
                    "{} must not be empty",
                    key
                )));
            }
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_text_parses_to_defaults() {
        let config = Config::from_toml(DEFAULT_CONFIG).expect("parse");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn empty_document_is_defaults() {
        assert_eq!(Config::from_toml("").expect("parse"), Config::default());
    }

    #[test]
    fn empty_self_id_rejected() {
        let result = Config::from_toml("[account]\nself_id = \"\"\n");
        assert!(matches!(result, Err(FeedGraphError::InvalidConfig(_))));
    }

    #[test]
    fn seed_gexf_path_is_read() {
        let config = Config::from_toml("[source]\nseed_gexf = \"graph.gexf\"\n").expect("parse");
        assert_eq!(config.source.seed_gexf, Some(PathBuf::from("graph.gexf")));
        assert!(Config::from_toml("[source]\nseed_gexf = \"\"\n").is_err());
    }
}

//! Physical table and column names for the three logical tables.
//!
//! Defaults match the chat-app export layout; every name can be
//! overridden from configuration.

use crate::FeedGraphError;
use serde::{Deserialize, Serialize};

/// Contacts table: identifier, nickname, and display override (the
/// user-assigned remark).
///
/// The nickname is never used as a label, but a contact whose nickname
/// is null is not a usable entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContactColumns {
    pub table: String,
    pub user_id: String,
    pub nickname: String,
    pub remark: String,
}

impl Default for ContactColumns {
    fn default() -> Self {
        Self {
            table: "Contact".to_string(),
            user_id: "UserName".to_string(),
            nickname: "NickName".to_string(),
            remark: "Remark".to_string(),
        }
    }
}

/// Feeds table: feed identifier, poster identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedColumns {
    pub table: String,
    pub feed_id: String,
    pub poster: String,
}

impl Default for FeedColumns {
    fn default() -> Self {
        Self {
            table: "FeedsV20".to_string(),
            feed_id: "FeedId".to_string(),
            poster: "UserName".to_string(),
        }
    }
}

/// Comments table: owning feed identifier, commenter identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommentColumns {
    pub table: String,
    pub feed_id: String,
    pub commenter: String,
}

impl Default for CommentColumns {
    fn default() -> Self {
        Self {
            table: "CommentV20".to_string(),
            feed_id: "FeedId".to_string(),
            commenter: "FromUserName".to_string(),
        }
    }
}

/// The full source layout.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceSchema {
    pub contacts: ContactColumns,
    pub feeds: FeedColumns,
    pub comments: CommentColumns,
}

impl SourceSchema {
    /// Reject empty table or column names.
    pub fn validate(&self) -> Result<(), FeedGraphError> {
        let names = [
            ("contacts.table", &self.contacts.table),
            ("contacts.user_id", &self.contacts.user_id),
            ("contacts.nickname", &self.contacts.nickname),
            ("contacts.remark", &self.contacts.remark),
            ("feeds.table", &self.feeds.table),
            ("feeds.feed_id", &self.feeds.feed_id),
            ("feeds.poster", &self.feeds.poster),
            ("comments.table", &self.comments.table),
            ("comments.feed_id", &self.comments.feed_id),
            ("comments.commenter", &self.comments.commenter),
        ];
        for (key, value) in names {
            if value.trim().is_empty() {
                return Err(FeedGraphError::InvalidConfig(format!(
                    "schema name '{}' must not be empty",
                    key
                )));
            }
        }
        Ok(())
    }
}

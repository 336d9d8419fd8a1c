//! Topic-level enums and the current-revision pointer aggregate.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::ObjectId;

/// Generates `as_str`/`parse` and `Display` for a string-backed column enum.
macro_rules! string_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub const fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            pub fn parse(value: &str) -> Option<Self> {
                match value {
                    $($text => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicKind {
    Discussion,
    Knowledge,
}
string_enum!(TopicKind { Discussion => "discussion", Knowledge => "knowledge" });

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicStatus {
    Available,
    Closed,
}
string_enum!(TopicStatus { Available => "available", Closed => "closed" });

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardStatus {
    Active,
    Disabled,
}
string_enum!(BoardStatus { Active => "active", Disabled => "disabled" });

/// Whether a post is still live or has been folded into a wiki revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostMergeState {
    Active,
    Archived,
}
string_enum!(PostMergeState { Active => "active", Archived => "archived" });

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocLinkType {
    #[default]
    Related,
}
string_enum!(DocLinkType { Related => "related" });

// ---------------------------------------------------------------------------
// Revision pointer
// ---------------------------------------------------------------------------

/// A topic's current wiki revision pointer.
///
/// The pointer is overwritten unconditionally; history order lives in the
/// revisions' parent chain, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicAggregate {
    pub id: ObjectId,
    current_revision_id: Option<ObjectId>,
}

impl TopicAggregate {
    pub fn new(id: impl Into<ObjectId>, current_revision_id: Option<ObjectId>) -> Self {
        Self {
            id: id.into(),
            current_revision_id: current_revision_id.filter(|r| !r.is_empty()),
        }
    }

    pub fn current_revision_id(&self) -> Option<&str> {
        self.current_revision_id.as_deref()
    }

    pub fn apply_wiki_revision(&mut self, revision_id: &str) -> Result<(), CoreError> {
        if revision_id.is_empty() {
            return Err(CoreError::RevisionRequired);
        }
        self.current_revision_id = Some(revision_id.to_owned());
        Ok(())
    }
}

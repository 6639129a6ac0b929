//! Read-only view of a content item, as seen by the decision engine.

use serde::{Deserialize, Serialize};

use quillpress_core::{AccountId, ContentId};

/// Content lifecycle status.
///
/// `Archived` is terminal with respect to publishing: archived content cannot
/// be resurrected to published here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl core::fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ContentStatus::Draft => write!(f, "draft"),
            ContentStatus::Published => write!(f, "published"),
            ContentStatus::Archived => write!(f, "archived"),
        }
    }
}

/// Projection of a content item for authorization decisions.
///
/// The decision engine treats this as input and never mutates it; the status
/// change itself is owned by the content module outside this core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentView {
    pub id: ContentId,
    pub owner: AccountId,
    pub status: ContentStatus,
}

impl ContentView {
    pub fn new(id: ContentId, owner: AccountId, status: ContentStatus) -> Self {
        Self { id, owner, status }
    }
}

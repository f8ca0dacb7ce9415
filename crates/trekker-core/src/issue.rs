//! Issue facts produced by viewing an issue and shared through memory.

use serde::{Deserialize, Serialize};

use crate::identifiers::IssueKey;

/// Facts about an issue remembered after it was successfully viewed.
///
/// Stored by value: memories hand out clones, never shared references.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Issue {
    pub key: IssueKey,
    pub editable: bool,
    /// Server-assigned internal identifier
    pub id: u64,
    #[serde(rename = "type")]
    pub issue_type: String,
}

/// Read-only view of a rendered issue.
///
/// Implemented by driver page handles so memories can derive facts from
/// whatever artifact an action produced without depending on the driver.
pub trait IssueView: Send + Sync {
    fn issue_key(&self) -> &IssueKey;

    fn issue_id(&self) -> u64;

    fn is_editable(&self) -> bool;

    fn issue_type(&self) -> String;

    /// Snapshot the view into an owned [`Issue`]
    fn to_issue(&self) -> Issue {
        Issue {
            key: self.issue_key().clone(),
            editable: self.is_editable(),
            id: self.issue_id(),
            issue_type: self.issue_type(),
        }
    }
}

impl IssueView for Issue {
    fn issue_key(&self) -> &IssueKey {
        &self.key
    }

    fn issue_id(&self) -> u64 {
        self.id
    }

    fn is_editable(&self) -> bool {
        self.editable
    }

    fn issue_type(&self) -> String {
        self.issue_type.clone()
    }

    fn to_issue(&self) -> Issue {
        self.clone()
    }
}

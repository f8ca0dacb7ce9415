//! # Trekker Core
//!
//! Core traits and types for Trekker journey actions.
//! This crate provides the building blocks shared by every simulated user step:
//! validated identifiers, the memory slots that let independently scheduled
//! actions hand facts to one another, the [`Action`] capability and the error
//! taxonomy.

pub mod action;
pub mod error;
pub mod identifiers;
pub mod issue;
pub mod memory;
pub mod validation;

pub use action::{Action, SEARCH_WITH_JQL, VIEW_ISSUE};
pub use error::{ActionError, ActionResult, DriverError, DriverResult, EnvironmentError};
pub use identifiers::{ActionKey, ExecutionId, IssueKey};
pub use issue::{Issue, IssueView};
pub use memory::{
    AdaptiveIssueKeyMemory, AdaptiveIssueMemory, AdaptiveJqlMemory, IssueKeyMemory, IssueMemory,
    JqlMemory, LastIssueKeyMemory, ScalarSlot, SetSlot,
};
pub use validation::{IdentifierRules, ValidationError};

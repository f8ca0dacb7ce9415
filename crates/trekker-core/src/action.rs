//! # Action
//!
//! One simulated user-journey step. Each concrete action holds its own
//! dependencies (memories, driver handle, meter) and exposes a single `run`.

use async_trait::async_trait;

use crate::error::ActionResult;
use crate::identifiers::ActionKey;

pub static VIEW_ISSUE: ActionKey = ActionKey::from_static("View Issue");
pub static SEARCH_WITH_JQL: ActionKey = ActionKey::from_static("Search with JQL");

/// A single step of a journey.
///
/// `run` returns `Ok(())` both when the step completed and when it was
/// skipped because a prerequisite fact was missing from memory. Only
/// main-flow failures (environment or driver) are returned as errors.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use trekker_core::{Action, ActionKey, ActionResult};
///
/// struct Idle;
///
/// #[async_trait]
/// impl Action for Idle {
///     fn key(&self) -> &ActionKey {
///         static IDLE: ActionKey = ActionKey::from_static("Idle");
///         &IDLE
///     }
///
///     async fn run(&self) -> ActionResult<()> {
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Action: Send + Sync {
    /// Label of this action kind
    fn key(&self) -> &ActionKey;

    /// Perform the step once
    async fn run(&self) -> ActionResult<()>;
}

//! # Journey memory
//!
//! Shared, typed fact containers that let independently scheduled actions
//! hand state to one another. No action may assume another one ran: every
//! `recall` returns `None` while nothing has been remembered, and that is a
//! normal reason to skip a step, not an error.
//!
//! Memories are constructed once at journey start and passed as `Arc`
//! handles into every action constructor. All of them are safe to share
//! between concurrently running virtual users. A read-decide-write sequence
//! is not atomic, so a step may act on a slightly stale fact.
//!
//! | Memory                     | Slot        | `remember` semantics            |
//! |----------------------------|-------------|---------------------------------|
//! | [`AdaptiveIssueKeyMemory`] | [`SetSlot`] | merge, recall picks at random   |
//! | [`LastIssueKeyMemory`]     | [`ScalarSlot`] | replace with the batch's last key |
//! | [`AdaptiveIssueMemory`]    | [`SetSlot`] | merge, recall picks at random   |
//! | [`AdaptiveJqlMemory`]      | [`SetSlot`] | merge; `observe` derives queries |

mod issue_keys;
mod issues;
mod jql;
mod slot;

pub use issue_keys::{AdaptiveIssueKeyMemory, LastIssueKeyMemory};
pub use issues::AdaptiveIssueMemory;
pub use jql::AdaptiveJqlMemory;
pub use slot::{ScalarSlot, SetSlot};

use std::sync::{Mutex, PoisonError};

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::identifiers::IssueKey;
use crate::issue::{Issue, IssueView};

/// Keys of issues known to exist.
pub trait IssueKeyMemory: Send + Sync {
    fn recall(&self) -> Option<IssueKey>;

    fn remember(&self, keys: Vec<IssueKey>);
}

/// Facts about issues that were viewed successfully.
pub trait IssueMemory: Send + Sync {
    fn recall(&self) -> Option<Issue> {
        self.recall_matching(&|_| true)
    }

    fn recall_matching(&self, filter: &dyn Fn(&Issue) -> bool) -> Option<Issue>;

    fn remember(&self, issues: Vec<Issue>);
}

/// Search context: JQL queries worth running.
pub trait JqlMemory: Send + Sync {
    fn recall(&self) -> Option<String>;

    fn remember(&self, queries: Vec<String>);

    /// Derive queries from an issue that was just viewed
    fn observe(&self, issue: &dyn IssueView);
}

/// Random source shared by the adaptive memories.
#[derive(Debug)]
pub(crate) struct SharedRng(Mutex<StdRng>);

impl SharedRng {
    pub(crate) fn from_os() -> Self {
        Self(Mutex::new(StdRng::from_os_rng()))
    }

    pub(crate) fn seeded(seed: u64) -> Self {
        Self(Mutex::new(StdRng::seed_from_u64(seed)))
    }

    pub(crate) fn with<R>(&self, f: impl FnOnce(&mut StdRng) -> R) -> R {
        let mut rng = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut rng)
    }
}

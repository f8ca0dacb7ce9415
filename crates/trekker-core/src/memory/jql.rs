use tracing::trace;

use super::{JqlMemory, SetSlot, SharedRng};
use crate::issue::IssueView;

/// Learns search queries from the issues a journey has seen.
///
/// Observing issue `ABC-1` of type `Bug` adds `project = ABC` and
/// `project = ABC AND issuetype = "Bug"`.
#[derive(Debug)]
pub struct AdaptiveJqlMemory {
    queries: SetSlot<String>,
    rng: SharedRng,
}

impl Default for AdaptiveJqlMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl AdaptiveJqlMemory {
    pub fn new() -> Self {
        Self {
            queries: SetSlot::new(),
            rng: SharedRng::from_os(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            queries: SetSlot::new(),
            rng: SharedRng::seeded(seed),
        }
    }

    /// Start with a known set of queries
    pub fn with_queries<I, S>(self, queries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.queries.remember(queries.into_iter().map(Into::into));
        self
    }

    /// Every known query, sorted
    pub fn all(&self) -> Vec<String> {
        self.queries.recall_all()
    }
}

fn derive_queries(issue: &dyn IssueView) -> Vec<String> {
    let project = issue.issue_key().project().to_string();
    let issue_type = issue.issue_type().replace('"', "\\\"");
    let mut queries = vec![format!("project = {project}")];
    if !issue_type.trim().is_empty() {
        queries.push(format!("project = {project} AND issuetype = \"{issue_type}\""));
    }
    queries
}

impl JqlMemory for AdaptiveJqlMemory {
    fn recall(&self) -> Option<String> {
        self.rng.with(|rng| self.queries.recall_random(rng))
    }

    fn remember(&self, queries: Vec<String>) {
        self.queries.remember(queries);
    }

    fn observe(&self, issue: &dyn IssueView) {
        let derived = derive_queries(issue);
        trace!(issue = %issue.issue_key(), count = derived.len(), "Observed issue for JQL");
        self.queries.remember(derived);
    }
}

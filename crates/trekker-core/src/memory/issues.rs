use super::{IssueMemory, SetSlot, SharedRng};
use crate::issue::Issue;

/// Remembers viewed issues and recalls a random one, optionally filtered.
#[derive(Debug)]
pub struct AdaptiveIssueMemory {
    issues: SetSlot<Issue>,
    rng: SharedRng,
}

impl Default for AdaptiveIssueMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl AdaptiveIssueMemory {
    pub fn new() -> Self {
        Self {
            issues: SetSlot::new(),
            rng: SharedRng::from_os(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            issues: SetSlot::new(),
            rng: SharedRng::seeded(seed),
        }
    }

    /// Every remembered issue, sorted by key
    pub fn all(&self) -> Vec<Issue> {
        self.issues.recall_all()
    }
}

impl IssueMemory for AdaptiveIssueMemory {
    fn recall_matching(&self, filter: &dyn Fn(&Issue) -> bool) -> Option<Issue> {
        self.rng
            .with(|rng| self.issues.recall_matching(rng, |issue| filter(issue)))
    }

    fn remember(&self, issues: Vec<Issue>) {
        self.issues.remember(issues);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifiers::IssueKey;

    fn issue(key: &str, editable: bool) -> Issue {
        Issue {
            key: IssueKey::parse(key).unwrap(),
            editable,
            id: 1,
            issue_type: "Task".to_string(),
        }
    }

    #[test]
    fn recall_is_none_until_something_is_remembered() {
        let memory = AdaptiveIssueMemory::seeded(3);
        assert_eq!(memory.recall(), None);
        memory.remember(vec![issue("ABC-1", true)]);
        assert_eq!(memory.recall(), Some(issue("ABC-1", true)));
    }

    #[test]
    fn recall_matching_filters_candidates() {
        let memory = AdaptiveIssueMemory::seeded(3);
        memory.remember(vec![issue("ABC-1", false), issue("ABC-2", true)]);
        for _ in 0..10 {
            let editable = memory.recall_matching(&|i| i.editable).unwrap();
            assert_eq!(editable.key.as_str(), "ABC-2");
        }
    }

    #[test]
    fn identical_records_collapse() {
        let memory = AdaptiveIssueMemory::new();
        memory.remember(vec![issue("ABC-1", true)]);
        memory.remember(vec![issue("ABC-1", true)]);
        assert_eq!(memory.all().len(), 1);
    }
}

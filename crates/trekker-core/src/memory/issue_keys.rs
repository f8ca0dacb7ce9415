use tracing::trace;

use super::{IssueKeyMemory, ScalarSlot, SetSlot, SharedRng};
use crate::identifiers::IssueKey;

/// Remembers every key it is given and recalls one at random.
#[derive(Debug)]
pub struct AdaptiveIssueKeyMemory {
    keys: SetSlot<IssueKey>,
    rng: SharedRng,
}

impl Default for AdaptiveIssueKeyMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl AdaptiveIssueKeyMemory {
    pub fn new() -> Self {
        Self {
            keys: SetSlot::new(),
            rng: SharedRng::from_os(),
        }
    }

    /// Memory whose random recall sequence is reproducible
    pub fn seeded(seed: u64) -> Self {
        Self {
            keys: SetSlot::new(),
            rng: SharedRng::seeded(seed),
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl IssueKeyMemory for AdaptiveIssueKeyMemory {
    fn recall(&self) -> Option<IssueKey> {
        self.rng.with(|rng| self.keys.recall_random(rng))
    }

    fn remember(&self, keys: Vec<IssueKey>) {
        trace!(count = keys.len(), "Remembering issue keys");
        self.keys.remember(keys);
    }
}

/// Remembers only the most recent key.
///
/// Each `remember` replaces the slot with the last key of the batch; an
/// empty batch leaves the current key in place.
#[derive(Debug, Default)]
pub struct LastIssueKeyMemory {
    key: ScalarSlot<IssueKey>,
}

impl LastIssueKeyMemory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IssueKeyMemory for LastIssueKeyMemory {
    fn recall(&self) -> Option<IssueKey> {
        self.key.recall()
    }

    fn remember(&self, keys: Vec<IssueKey>) {
        if let Some(last) = keys.into_iter().last() {
            self.key.remember(last);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(raw: &[&str]) -> Vec<IssueKey> {
        raw.iter().map(|k| IssueKey::parse(k).unwrap()).collect()
    }

    #[test]
    fn adaptive_memory_is_empty_until_told() {
        let memory = AdaptiveIssueKeyMemory::new();
        assert_eq!(memory.recall(), None);
        memory.remember(keys(&["ABC-1", "ABC-2"]));
        let recalled = memory.recall().unwrap();
        assert!(["ABC-1", "ABC-2"].contains(&recalled.as_str()));
    }

    #[test]
    fn seeded_adaptive_memories_recall_identically() {
        let first = AdaptiveIssueKeyMemory::seeded(7);
        let second = AdaptiveIssueKeyMemory::seeded(7);
        let batch = keys(&["A-1", "A-2", "A-3", "A-4", "A-5"]);
        first.remember(batch.clone());
        second.remember(batch.into_iter().rev().collect());

        let a: Vec<_> = (0..20).map(|_| first.recall()).collect();
        let b: Vec<_> = (0..20).map(|_| second.recall()).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn last_memory_keeps_final_key_of_batch() {
        let memory = LastIssueKeyMemory::new();
        assert_eq!(memory.recall(), None);
        memory.remember(keys(&["ABC-1", "ABC-9"]));
        assert_eq!(memory.recall().unwrap().as_str(), "ABC-9");
        memory.remember(Vec::new());
        assert_eq!(memory.recall().unwrap().as_str(), "ABC-9");
    }
}

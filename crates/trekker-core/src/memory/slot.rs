use std::hash::Hash;
use std::sync::{Arc, PoisonError, RwLock};

use dashmap::DashSet;
use rand::Rng;
use rand::seq::{IndexedRandom, IteratorRandom};

/// Slot holding zero or one value, shared by cloning the handle.
///
/// `remember` replaces the current value (last write wins). Reads never
/// block on a writer for longer than the write itself and never fail: a lock
/// poisoned by a panicking writer is recovered rather than surfaced.
///
/// # Example
///
/// ```rust
/// use trekker_core::ScalarSlot;
///
/// let slot = ScalarSlot::new();
/// assert_eq!(slot.recall(), None);
/// slot.remember("ABC-1".to_string());
/// slot.remember("ABC-2".to_string());
/// assert_eq!(slot.recall().as_deref(), Some("ABC-2"));
/// ```
#[derive(Debug)]
pub struct ScalarSlot<T> {
    value: Arc<RwLock<Option<T>>>,
}

impl<T> Clone for ScalarSlot<T> {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
        }
    }
}

impl<T> Default for ScalarSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ScalarSlot<T> {
    /// Create an empty slot
    pub fn new() -> Self {
        Self {
            value: Arc::new(RwLock::new(None)),
        }
    }

    /// Replace the current value
    pub fn remember(&self, value: T) {
        let mut slot = self.value.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(value);
    }

    /// Forget the current value
    pub fn clear(&self) {
        let mut slot = self.value.write().unwrap_or_else(PoisonError::into_inner);
        *slot = None;
    }
}

impl<T: Clone> ScalarSlot<T> {
    /// Copy of the current value, `None` while nothing was remembered
    pub fn recall(&self) -> Option<T> {
        self.value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Slot holding a set of values with concurrent additive merge.
///
/// Writers from several journeys may `remember` at the same time; each
/// write only ever adds. Duplicate values collapse into one entry.
///
/// Random recall indexes the values in first-insertion order, so a seeded
/// journey that remembers the same values in the same order recalls the
/// same sequence, and a recall costs no more than one pick.
#[derive(Debug)]
pub struct SetSlot<T: Eq + Hash> {
    members: Arc<DashSet<T>>,
    order: Arc<RwLock<Vec<T>>>,
}

impl<T: Eq + Hash> Clone for SetSlot<T> {
    fn clone(&self) -> Self {
        Self {
            members: Arc::clone(&self.members),
            order: Arc::clone(&self.order),
        }
    }
}

impl<T: Eq + Hash> Default for SetSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Eq + Hash> SetSlot<T> {
    /// Create an empty slot
    pub fn new() -> Self {
        Self {
            members: Arc::new(DashSet::new()),
            order: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl<T: Eq + Hash + Clone> SetSlot<T> {
    /// Merge values into the set
    pub fn remember<I>(&self, values: I)
    where
        I: IntoIterator<Item = T>,
    {
        let fresh: Vec<T> = values
            .into_iter()
            .filter(|value| self.members.insert(value.clone()))
            .collect();
        if !fresh.is_empty() {
            self.order
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .extend(fresh);
        }
    }

    /// Uniformly random remembered value matching `predicate`
    pub fn recall_matching<R, P>(&self, rng: &mut R, predicate: P) -> Option<T>
    where
        R: Rng + ?Sized,
        P: Fn(&T) -> bool,
    {
        let order = self.order.read().unwrap_or_else(PoisonError::into_inner);
        order.iter().filter(|value| predicate(value)).choose(rng).cloned()
    }

    /// Uniformly random remembered value
    pub fn recall_random<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<T> {
        let order = self.order.read().unwrap_or_else(PoisonError::into_inner);
        order.choose(rng).cloned()
    }
}

impl<T: Eq + Hash + Clone + Ord> SetSlot<T> {
    /// Sorted copy of every remembered value
    pub fn recall_all(&self) -> Vec<T> {
        let mut all = self
            .order
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        all.sort();
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::thread;

    #[test]
    fn scalar_slot_starts_empty_and_keeps_last_write() {
        let slot = ScalarSlot::new();
        assert_eq!(slot.recall(), None::<u32>);
        slot.remember(1);
        slot.remember(2);
        assert_eq!(slot.recall(), Some(2));
        slot.clear();
        assert_eq!(slot.recall(), None);
    }

    #[test]
    fn scalar_slot_clones_share_state() {
        let slot = ScalarSlot::new();
        let other = slot.clone();
        other.remember("x".to_string());
        assert_eq!(slot.recall().as_deref(), Some("x"));
    }

    #[test]
    fn scalar_slot_survives_poisoned_lock() {
        let slot = ScalarSlot::new();
        slot.remember(7);
        let poisoner = slot.clone();
        let _ = thread::spawn(move || {
            let _guard = poisoner.value.write().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert_eq!(slot.recall(), Some(7));
        slot.remember(8);
        assert_eq!(slot.recall(), Some(8));
    }

    #[test]
    fn set_slot_merges_and_deduplicates() {
        let slot = SetSlot::new();
        slot.remember(vec![3, 1]);
        slot.remember(vec![1, 2]);
        assert_eq!(slot.recall_all(), vec![1, 2, 3]);
        assert_eq!(slot.len(), 3);
    }

    #[test]
    fn set_slot_recall_on_empty_is_none() {
        let slot: SetSlot<u32> = SetSlot::new();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(slot.is_empty());
        assert_eq!(slot.recall_random(&mut rng), None);
        assert_eq!(slot.recall_matching(&mut rng, |_| true), None);
    }

    #[test]
    fn set_slot_recall_matching_respects_predicate() {
        let slot = SetSlot::new();
        slot.remember(1..=10);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let even = slot.recall_matching(&mut rng, |v| v % 2 == 0).unwrap();
            assert_eq!(even % 2, 0);
        }
        assert_eq!(slot.recall_matching(&mut rng, |v| *v > 10), None);
    }

    #[test]
    fn set_slot_seeded_recall_follows_insertion_not_hash_order() {
        let forward = SetSlot::new();
        let again = SetSlot::new();
        forward.remember((0..1_000).map(|i| format!("KEY-{i}")));
        again.remember((0..1_000).map(|i| format!("KEY-{i}")));

        let mut a = StdRng::seed_from_u64(9);
        let mut b = StdRng::seed_from_u64(9);
        for _ in 0..100 {
            assert_eq!(forward.recall_random(&mut a), again.recall_random(&mut b));
        }
    }

    #[test]
    fn set_slot_index_stays_in_step_with_members() {
        let slot = SetSlot::new();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let slot = slot.clone();
                thread::spawn(move || slot.remember(0..50))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(slot.len(), 50);
        assert_eq!(slot.order.read().unwrap().len(), 50);
        assert_eq!(slot.recall_all(), (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn set_slot_concurrent_writers_lose_nothing() {
        let slot = SetSlot::new();
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let slot = slot.clone();
                thread::spawn(move || slot.remember((0..100).map(move |i| t * 100 + i)))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(slot.len(), 800);
    }
}

//! Fixed-capacity entity slots
//!
//! Each entity kind lives in a [`SlotArena`] whose capacity never changes.
//! Slots carry an explicit `active` flag; inserting picks a slot according to
//! the arena's [`AllocPolicy`]. Under [`AllocPolicy::RoundRobin`] the write
//! cursor wraps and overwrites whatever it lands on, live or not. That loss
//! is reported through [`Insertion::overwrote`] rather than hidden.

use serde::{Deserialize, Serialize};

/// Index of a slot within its arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(usize);

impl SlotId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// How [`SlotArena::insert`] chooses a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AllocPolicy {
    /// Always write at the cursor, overwriting live entities on wraparound
    #[default]
    RoundRobin,
    /// Take the first inactive slot at or after the cursor; overwrite the
    /// cursor slot only when every slot is live
    PreferInactive,
}

/// Result of an insertion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Insertion {
    pub id: SlotId,
    /// A live entity occupied the slot and was replaced
    pub overwrote: bool,
}

#[derive(Debug, Clone)]
struct Slot<T> {
    active: bool,
    value: T,
}

/// Fixed-capacity arena of entity slots
#[derive(Debug, Clone)]
pub struct SlotArena<T> {
    slots: Vec<Slot<T>>,
    cursor: usize,
    policy: AllocPolicy,
}

impl<T: Default> SlotArena<T> {
    /// Create an arena with `capacity` inactive slots (at least one)
    pub fn new(capacity: usize, policy: AllocPolicy) -> Self {
        let capacity = capacity.max(1);
        let slots = (0..capacity)
            .map(|_| Slot {
                active: false,
                value: T::default(),
            })
            .collect();
        Self {
            slots,
            cursor: 0,
            policy,
        }
    }

    /// Place an entity and mark its slot active
    pub fn insert(&mut self, value: T) -> Insertion {
        let capacity = self.slots.len();
        let index = match self.policy {
            AllocPolicy::RoundRobin => self.cursor,
            AllocPolicy::PreferInactive => (0..capacity)
                .map(|offset| (self.cursor + offset) % capacity)
                .find(|&i| !self.slots[i].active)
                .unwrap_or(self.cursor),
        };
        self.cursor = (index + 1) % capacity;

        let slot = &mut self.slots[index];
        let overwrote = slot.active;
        slot.active = true;
        slot.value = value;

        Insertion {
            id: SlotId(index),
            overwrote,
        }
    }

    /// Deactivate every slot and rewind the cursor
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.active = false;
            slot.value = T::default();
        }
        self.cursor = 0;
    }
}

impl<T> SlotArena<T> {
    /// Mark a slot free. Returns false if it was already inactive.
    pub fn deactivate(&mut self, id: SlotId) -> bool {
        match self.slots.get_mut(id.0) {
            Some(slot) if slot.active => {
                slot.active = false;
                true
            }
            _ => false,
        }
    }

    pub fn is_active(&self, id: SlotId) -> bool {
        self.slots.get(id.0).is_some_and(|s| s.active)
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.slots
            .get(id.0)
            .filter(|s| s.active)
            .map(|s| &s.value)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.slots
            .get_mut(id.0)
            .filter(|s| s.active)
            .map(|s| &mut s.value)
    }

    /// Active entities in slot order
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.active)
            .map(|(i, s)| (SlotId(i), &s.value))
    }

    /// Active entities in slot order, mutably
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (SlotId, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter(|(_, s)| s.active)
            .map(|(i, s)| (SlotId(i), &mut s.value))
    }

    /// Deactivate every active entity for which `keep` returns false.
    /// Returns how many were deactivated.
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) -> usize {
        let mut removed = 0;
        for slot in self.slots.iter_mut().filter(|s| s.active) {
            if !keep(&slot.value) {
                slot.active = false;
                removed += 1;
            }
        }
        removed
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.active).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_round_robin_wraps_and_overwrites_live_slots() {
        let mut arena: SlotArena<u32> = SlotArena::new(3, AllocPolicy::RoundRobin);
        for v in 0..3 {
            let ins = arena.insert(v);
            assert_eq!(ins.id.index(), v as usize);
            assert!(!ins.overwrote);
        }

        // Fourth insert lands on slot 0, which is still live
        let ins = arena.insert(99);
        assert_eq!(ins.id.index(), 0);
        assert!(ins.overwrote);
        assert_eq!(arena.get(ins.id), Some(&99));
        assert_eq!(arena.active_count(), 3);
    }

    #[test]
    fn test_round_robin_ignores_free_slots() {
        let mut arena: SlotArena<u32> = SlotArena::new(3, AllocPolicy::RoundRobin);
        let first = arena.insert(1).id;
        arena.insert(2);
        arena.deactivate(first);

        // Cursor is at 2, so the freed slot 0 is not reused yet
        let ins = arena.insert(3);
        assert_eq!(ins.id.index(), 2);
        assert!(!ins.overwrote);
    }

    #[test]
    fn test_prefer_inactive_reuses_free_slot() {
        let mut arena: SlotArena<u32> = SlotArena::new(3, AllocPolicy::PreferInactive);
        let a = arena.insert(1).id;
        arena.insert(2);
        arena.insert(3);
        arena.deactivate(a);

        let ins = arena.insert(4);
        assert_eq!(ins.id, a);
        assert!(!ins.overwrote);
    }

    #[test]
    fn test_prefer_inactive_overwrites_when_full() {
        let mut arena: SlotArena<u32> = SlotArena::new(2, AllocPolicy::PreferInactive);
        arena.insert(1);
        arena.insert(2);
        let ins = arena.insert(3);
        assert_eq!(ins.id.index(), 0);
        assert!(ins.overwrote);
    }

    #[test]
    fn test_inactive_slots_are_hidden() {
        let mut arena: SlotArena<u32> = SlotArena::new(4, AllocPolicy::RoundRobin);
        let id = arena.insert(7).id;
        assert!(arena.deactivate(id));
        assert!(!arena.deactivate(id));
        assert!(arena.get(id).is_none());
        assert!(arena.get_mut(id).is_none());
        assert_eq!(arena.iter().count(), 0);
    }

    #[test]
    fn test_retain_counts_removed() {
        let mut arena: SlotArena<u32> = SlotArena::new(5, AllocPolicy::RoundRobin);
        for v in 0..5 {
            arena.insert(v);
        }
        assert_eq!(arena.retain(|v| v % 2 == 0), 2);
        let left: Vec<u32> = arena.iter().map(|(_, v)| *v).collect();
        assert_eq!(left, vec![0, 2, 4]);
    }

    #[test]
    fn test_clear_rewinds_cursor() {
        let mut arena: SlotArena<u32> = SlotArena::new(3, AllocPolicy::RoundRobin);
        arena.insert(1);
        arena.insert(2);
        arena.clear();
        assert_eq!(arena.active_count(), 0);
        assert_eq!(arena.insert(5).id.index(), 0);
    }

    proptest! {
        #[test]
        fn active_count_never_exceeds_capacity(
            capacity in 1usize..16,
            ops in proptest::collection::vec((any::<bool>(), 0usize..16), 0..64),
            prefer in any::<bool>(),
        ) {
            let policy = if prefer { AllocPolicy::PreferInactive } else { AllocPolicy::RoundRobin };
            let mut arena: SlotArena<usize> = SlotArena::new(capacity, policy);
            for (insert, n) in ops {
                if insert {
                    let ins = arena.insert(n);
                    prop_assert!(ins.id.index() < capacity);
                    prop_assert!(arena.is_active(ins.id));
                } else {
                    let target = arena.iter().nth(n % capacity).map(|(id, _)| id);
                    if let Some(id) = target {
                        arena.deactivate(id);
                    }
                }
                prop_assert!(arena.active_count() <= capacity);
            }
        }

        #[test]
        fn prefer_inactive_never_overwrites_with_free_slots(
            capacity in 1usize..16,
            live in 0usize..16,
        ) {
            let mut arena: SlotArena<usize> = SlotArena::new(capacity, AllocPolicy::PreferInactive);
            for n in 0..live.min(capacity - 1) {
                arena.insert(n);
            }
            prop_assert!(!arena.insert(0).overwrote);
        }
    }
}

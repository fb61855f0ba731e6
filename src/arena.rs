//! Slab-backed node storage whose keys go stale when their slot is freed.
//!
//! The containers link their nodes and blocks through [`Key`]s rather than
//! references.  Each stored value is tagged with a stamp drawn from a counter
//! that only ever increases, so a key to a freed slot is rejected even after
//! the slab hands the same index out again.

use slab::Slab;
use std::ops::{Index, IndexMut};
use std::sync::atomic::{AtomicU64, Ordering};

/// A handle to a value stored in an [`Arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Key {
    index: usize,
    stamp: u64,
}

#[derive(Clone)]
struct Slot<T> {
    stamp: u64,
    value: T,
}

#[derive(Clone)]
pub(crate) struct Arena<T> {
    slab: Slab<Slot<T>>,
    next_stamp: u64,
}

impl<T> Arena<T> {
    pub(crate) fn new() -> Self {
        Arena {
            slab: Slab::new(),
            next_stamp: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.slab.len()
    }

    pub(crate) fn insert(&mut self, value: T) -> Key {
        let stamp = self.next_stamp;
        self.next_stamp += 1;
        let index = self.slab.insert(Slot { stamp, value });
        Key { index, stamp }
    }

    pub(crate) fn remove(&mut self, key: Key) -> Option<T> {
        if !self.contains(key) {
            return None;
        }
        Some(self.slab.remove(key.index).value)
    }

    pub(crate) fn contains(&self, key: Key) -> bool {
        self.slab
            .get(key.index)
            .map_or(false, |slot| slot.stamp == key.stamp)
    }

    pub(crate) fn get(&self, key: Key) -> Option<&T> {
        match self.slab.get(key.index) {
            Some(slot) if slot.stamp == key.stamp => Some(&slot.value),
            _ => None,
        }
    }

    pub(crate) fn get_mut(&mut self, key: Key) -> Option<&mut T> {
        match self.slab.get_mut(key.index) {
            Some(slot) if slot.stamp == key.stamp => Some(&mut slot.value),
            _ => None,
        }
    }

    /// Drops every value.  Stamps keep counting, so no old key survives.
    pub(crate) fn clear(&mut self) {
        self.slab.clear();
    }

    /// Mutable references to the values behind `order`, in that order.
    ///
    /// # Panics
    ///
    /// Panics if a key is stale or repeated.
    pub(crate) fn get_many_mut(&mut self, order: &[Key]) -> Vec<&mut T> {
        let mut slots: Vec<Option<(u64, &mut T)>> = Vec::new();
        for (index, slot) in self.slab.iter_mut() {
            if slots.len() <= index {
                slots.resize_with(index + 1, || None);
            }
            slots[index] = Some((slot.stamp, &mut slot.value));
        }

        order
            .iter()
            .map(|key| match slots.get_mut(key.index).and_then(Option::take) {
                Some((stamp, value)) if stamp == key.stamp => value,
                _ => panic!("stale or repeated arena key {:?}", key),
            })
            .collect()
    }
}

impl<T> Index<Key> for Arena<T> {
    type Output = T;

    fn index(&self, key: Key) -> &T {
        match self.get(key) {
            Some(v) => v,
            None => panic!("stale arena key {:?}", key),
        }
    }
}

impl<T> IndexMut<Key> for Arena<T> {
    fn index_mut(&mut self, key: Key) -> &mut T {
        match self.get_mut(key) {
            Some(v) => v,
            None => panic!("stale arena key {:?}", key),
        }
    }
}

/// Hands out a distinct id to every container instance, including clones.
pub(crate) fn next_owner_id() -> u64 {
    static NEXT: AtomicU64 = AtomicU64::new(1);
    NEXT.fetch_add(1, Ordering::Relaxed)
}

//! SlotHashMap: host map with generational slot tokens and a debug probe guard.
//!
//! Records live in a `SlotMap`; a `hashbrown::HashTable` indexes their slot
//! keys by the hash stored alongside each record. A successful lookup yields a
//! `Slot`, which later accesses resolve in O(1) without touching the index or
//! the hasher. A failed lookup yields the hash it computed, so a following
//! insert places the record without hashing or probing again.

use crate::reentrancy::ProbeGuard;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::HashTable;
use slotmap::{DefaultKey, SlotMap};
use std::collections::hash_map::RandomState;

/// Token naming one record of a [`SlotHashMap`].
///
/// Tokens are generational: once the record is removed the token never
/// resolves again, even if its storage is reused by a later insert.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Slot(DefaultKey);

impl Slot {
    pub(crate) fn new(k: DefaultKey) -> Self {
        Slot(k)
    }
    pub(crate) fn raw(&self) -> DefaultKey {
        self.0
    }

    pub fn key<'a, K, V, S>(&self, map: &'a SlotHashMap<K, V, S>) -> Option<&'a K> {
        map.slots.get(self.0).map(|r| &r.key)
    }

    pub fn value<'a, K, V, S>(&self, map: &'a SlotHashMap<K, V, S>) -> Option<&'a V> {
        map.slots.get(self.0).map(|r| &r.value)
    }

    pub fn value_mut<'a, K, V, S>(&self, map: &'a mut SlotHashMap<K, V, S>) -> Option<&'a mut V> {
        map.slots.get_mut(self.0).map(|r| &mut r.value)
    }
}

/// Outcome of the single lookup behind `entry()`.
#[derive(Copy, Clone, Debug)]
pub(crate) enum Probe {
    Found(Slot),
    Absent { hash: u64 },
}

#[derive(Debug)]
pub(crate) struct Record<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    hash: u64,
}

pub struct SlotHashMap<K, V, S = RandomState> {
    hasher: S,
    index: HashTable<DefaultKey>,
    pub(crate) slots: SlotMap<DefaultKey, Record<K, V>>,
    guard: ProbeGuard,
}

impl<K, V> SlotHashMap<K, V> {
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, RandomState::new())
    }
}

impl<K, V> Default for SlotHashMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over immutable records of a `SlotHashMap`.
pub struct Iter<'a, K, V> {
    it: slotmap::basic::Iter<'a, DefaultKey, Record<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (Slot, &'a K, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(k, r)| (Slot::new(k), &r.key, &r.value))
    }
}

/// Iterator over records of a `SlotHashMap` with mutable values.
pub struct IterMut<'a, K, V> {
    it: slotmap::basic::IterMut<'a, DefaultKey, Record<K, V>>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (Slot, &'a K, &'a mut V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it
            .next()
            .map(|(k, r)| (Slot::new(k), &r.key, &mut r.value))
    }
}

// Structural operations. None of these run `K: Hash` or `K: Eq`.
impl<K, V, S> SlotHashMap<K, V, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_capacity_and_hasher(0, hasher)
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            hasher,
            index: HashTable::with_capacity(capacity),
            slots: SlotMap::with_capacity_and_key(capacity),
            guard: ProbeGuard::new(),
        }
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        self.index.clear();
        self.slots.clear();
    }

    /// Insert a record whose key is known to be absent.
    ///
    /// `hash` must be the hash of `key` under this map's hasher, as returned
    /// by `probe`. The index is extended without any equality checks.
    pub(crate) fn add(&mut self, hash: u64, key: K, value: V) -> Slot {
        let _g = self.guard.enter("add");
        let k = self.slots.insert(Record { key, value, hash });
        let slots = &self.slots;
        let _ = self.index.insert_unique(hash, k, |&kk| {
            slots.get(kk).map(|r| r.hash).unwrap_or(0)
        });
        Slot::new(k)
    }

    /// Remove the record named by `slot`, using its stored hash to unlink it
    /// from the index. Returns `None` for a stale token.
    pub fn remove_slot(&mut self, slot: Slot) -> Option<(K, V)> {
        let _g = self.guard.enter("remove_slot");
        let k = slot.raw();
        let record = self.slots.remove(k)?;
        if let Ok(found) = self.index.find_entry(record.hash, |&kk| kk == k) {
            let _ = found.remove();
        }
        Some((record.key, record.value))
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            it: self.slots.iter(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            it: self.slots.iter_mut(),
        }
    }
}

// Lookups. These hash the query and compare keys while probing.
impl<K, V, S> SlotHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    /// The one hash + probe behind `entry()`.
    pub(crate) fn probe<Q>(&self, q: &Q) -> Probe
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.guard.enter("probe");
        let hash = self.make_hash(q);
        match self.index.find(hash, |&k| {
            self.slots
                .get(k)
                .map(|r| r.key.borrow() == q)
                .unwrap_or(false)
        }) {
            Some(&k) => Probe::Found(Slot::new(k)),
            None => Probe::Absent { hash },
        }
    }

    pub fn find<Q>(&self, q: &Q) -> Option<Slot>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.probe(q) {
            Probe::Found(slot) => Some(slot),
            Probe::Absent { .. } => None,
        }
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find(q).is_some()
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let slot = self.find(q)?;
        self.slots.get(slot.raw()).map(|r| &r.value)
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let slot = self.find(q)?;
        self.slots.get_mut(slot.raw()).map(|r| &mut r.value)
    }

    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let slot = self.find(q)?;
        self.remove_slot(slot).map(|(_, v)| v)
    }
}

impl<K, V, S> fmt::Debug for SlotHashMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(_, k, v)| (k, v)))
            .finish()
    }
}

//! Entry: the result of one lookup, and the map methods that produce it.
//!
//! `SlotHashMap::entry` hashes and probes once. The outcome is kept in the
//! variant: an occupied entry holds the slot of the record, a vacant entry
//! holds the owned key and its hash. Every operation below acts on that cached
//! outcome; none of them looks the key up again.

use crate::error::EntryError;
use crate::occupied_entry::OccupiedEntry;
use crate::slot_hash_map::{Probe, SlotHashMap};
use crate::vacant_entry::VacantEntry;
use core::fmt;
use core::future::Future;
use core::hash::{BuildHasher, Hash};
use std::collections::hash_map::RandomState;
use tracing::{debug, trace};

/// A view into a single key of a [`SlotHashMap`], present or absent.
///
/// Built by [`SlotHashMap::entry`]. Holds the map's exclusive borrow, so the
/// cached lookup stays valid for as long as the entry exists.
pub enum Entry<'a, K, V, S = RandomState> {
    Occupied(OccupiedEntry<'a, K, V, S>),
    Vacant(VacantEntry<'a, K, V, S>),
}

impl<'a, K, V, S> Entry<'a, K, V, S> {
    /// The key of the entry: the stored key when occupied, the looked-up key
    /// when vacant.
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(o) => o.key(),
            Entry::Vacant(v) => v.key(),
        }
    }

    pub fn is_occupied(&self) -> bool {
        matches!(self, Entry::Occupied(_))
    }

    pub fn is_vacant(&self) -> bool {
        matches!(self, Entry::Vacant(_))
    }

    /// Update the value in place if occupied. A vacant entry is returned
    /// unchanged, so a following `or_insert*` still applies.
    pub fn and_modify<F>(self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        match self {
            Entry::Occupied(mut o) => {
                f(o.get_mut());
                Entry::Occupied(o)
            }
            vacant => vacant,
        }
    }

    /// Replace the value with `f(current)` if occupied.
    pub fn and_replace_with<F>(self, f: F) -> Self
    where
        F: FnOnce(&V) -> V,
    {
        match self {
            Entry::Occupied(mut o) => {
                let next = f(o.get());
                o.insert(next);
                Entry::Occupied(o)
            }
            vacant => vacant,
        }
    }

    /// Return the existing value, or insert `default` if vacant.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(o) => o.into_mut(),
            Entry::Vacant(v) => v.insert(default),
        }
    }

    /// Like `or_insert`, but `default` only runs when the entry is vacant.
    pub fn or_insert_with<F>(self, default: F) -> &'a mut V
    where
        F: FnOnce() -> V,
    {
        match self {
            Entry::Occupied(o) => o.into_mut(),
            Entry::Vacant(v) => v.insert(default()),
        }
    }

    /// Like `or_insert_with`, with the key passed to the factory.
    pub fn or_insert_with_key<F>(self, default: F) -> &'a mut V
    where
        F: FnOnce(&K) -> V,
    {
        match self {
            Entry::Occupied(o) => o.into_mut(),
            Entry::Vacant(v) => {
                let value = default(v.key());
                v.insert(value)
            }
        }
    }

    pub fn or_default(self) -> &'a mut V
    where
        V: Default,
    {
        self.or_insert_with(V::default)
    }

    /// Like `or_insert_with` for a fallible factory. On error nothing is
    /// inserted and the error is returned as is.
    pub fn or_try_insert_with<F, E>(self, default: F) -> Result<&'a mut V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        match self {
            Entry::Occupied(o) => Ok(o.into_mut()),
            Entry::Vacant(v) => {
                let value = default()?;
                Ok(v.insert(value))
            }
        }
    }

    /// Set the value regardless of state and return the occupied entry.
    pub fn insert_entry(self, value: V) -> OccupiedEntry<'a, K, V, S> {
        match self {
            Entry::Occupied(mut o) => {
                o.insert(value);
                o
            }
            Entry::Vacant(v) => v.insert_entry(value),
        }
    }

    /// Narrow to the occupied handle, failing with `KeyNotFound` if vacant.
    pub fn into_occupied(self) -> Result<OccupiedEntry<'a, K, V, S>, EntryError> {
        match self {
            Entry::Occupied(o) => Ok(o),
            Entry::Vacant(_) => {
                debug!("into_occupied called on a vacant entry");
                Err(EntryError::KeyNotFound)
            }
        }
    }

    /// Narrow to the vacant handle, failing with `InvalidState` if occupied.
    pub fn into_vacant(self) -> Result<VacantEntry<'a, K, V, S>, EntryError> {
        match self {
            Entry::Vacant(v) => Ok(v),
            Entry::Occupied(_) => {
                debug!("into_vacant called on an occupied entry");
                Err(EntryError::InvalidState)
            }
        }
    }

    /// Narrow to the occupied handle, or get the entry back unchanged.
    pub fn try_into_occupied(self) -> Result<OccupiedEntry<'a, K, V, S>, Self> {
        match self {
            Entry::Occupied(o) => Ok(o),
            vacant => Err(vacant),
        }
    }

    /// Narrow to the vacant handle, or get the entry back unchanged.
    pub fn try_into_vacant(self) -> Result<VacantEntry<'a, K, V, S>, Self> {
        match self {
            Entry::Vacant(v) => Ok(v),
            occupied => Err(occupied),
        }
    }

    /// Run exactly one of the two branches, picked by the cached state.
    pub fn either<T, O, F>(self, on_occupied: O, on_vacant: F) -> T
    where
        O: FnOnce(OccupiedEntry<'a, K, V, S>) -> T,
        F: FnOnce(VacantEntry<'a, K, V, S>) -> T,
    {
        match self {
            Entry::Occupied(o) => on_occupied(o),
            Entry::Vacant(v) => on_vacant(v),
        }
    }

    /// The stored value, or `KeyNotFound` if vacant.
    pub fn into_value_mut(self) -> Result<&'a mut V, EntryError> {
        self.into_occupied().map(OccupiedEntry::into_mut)
    }

    /// Remove the record, or `KeyNotFound` if vacant.
    pub fn remove(self) -> Result<V, EntryError> {
        self.into_occupied().map(OccupiedEntry::remove)
    }

    /// Remove the record if occupied.
    pub fn try_remove(self) -> Option<V> {
        match self {
            Entry::Occupied(o) => Some(o.remove()),
            Entry::Vacant(_) => None,
        }
    }
}

impl<K, V, S> fmt::Debug for Entry<'_, K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Occupied(o) => f.debug_tuple("Entry").field(o).finish(),
            Entry::Vacant(v) => f.debug_tuple("Entry").field(v).finish(),
        }
    }
}

impl<K, V, S> SlotHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Look `key` up once and return an entry for in-place manipulation.
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V, S> {
        match self.probe(&key) {
            Probe::Found(slot) => {
                trace!(len = self.len(), "entry lookup: occupied");
                Entry::Occupied(OccupiedEntry::new(self, slot))
            }
            Probe::Absent { hash } => {
                trace!(hash, len = self.len(), "entry lookup: vacant");
                Entry::Vacant(VacantEntry::new(self, hash, key))
            }
        }
    }

    /// Return the value for `key`, inserting `default` if absent.
    pub fn get_or_insert(&mut self, key: K, default: V) -> &mut V {
        self.entry(key).or_insert(default)
    }

    /// Set `key` to `value`, returning the previous value if there was one.
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        match self.entry(key) {
            Entry::Occupied(mut o) => Some(o.replace(value)),
            Entry::Vacant(v) => {
                v.insert(value);
                None
            }
        }
    }

    /// Return the value for `key`, or insert the output of an async factory.
    ///
    /// No entry is held while the factory's future runs: the key is probed,
    /// the future is awaited only if the key was absent, and the value is then
    /// inserted through a fresh `entry()` call. The vacant path therefore
    /// probes twice. The `&mut` borrow keeps other code off the map while the
    /// future is pending; the map is not `Send`, so this gives no protection
    /// against other threads. A failing future inserts nothing.
    pub async fn get_or_try_insert_with_async<F, Fut, E>(
        &mut self,
        key: K,
        factory: F,
    ) -> Result<&mut V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(slot) = self.find(&key) {
            return Ok(&mut self.slots[slot.raw()].value);
        }
        let value = factory().await?;
        Ok(self.entry(key).or_insert(value))
    }

    /// Like `get_or_try_insert_with_async`, with the key passed to the
    /// factory. The returned future must not borrow the key.
    pub async fn get_or_try_insert_with_key_async<F, Fut, E>(
        &mut self,
        key: K,
        factory: F,
    ) -> Result<&mut V, E>
    where
        F: FnOnce(&K) -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(slot) = self.find(&key) {
            return Ok(&mut self.slots[slot.raw()].value);
        }
        let value = factory(&key).await?;
        Ok(self.entry(key).or_insert(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn map_with(pairs: &[(&str, i32)]) -> SlotHashMap<String, i32> {
        let mut m = SlotHashMap::new();
        for (k, v) in pairs {
            m.set((*k).to_string(), *v);
        }
        m
    }

    #[test]
    fn entry_reports_state() {
        let mut m = map_with(&[("key", 42)]);
        {
            let e = m.entry("key".to_string());
            assert!(e.is_occupied());
            assert!(!e.is_vacant());
            assert_eq!(e.key(), "key");
        }

        let e = m.entry("other".to_string());
        assert!(e.is_vacant());
        assert!(!e.is_occupied());
        assert_eq!(e.key(), "other");
    }

    #[test]
    fn and_modify_updates_occupied_and_stays_occupied() {
        let mut m = map_with(&[("key", 42)]);
        let e = m.entry("key".to_string()).and_modify(|v| *v += 1);
        assert!(e.is_occupied());
        assert_eq!(*e.into_value_mut().unwrap(), 43);
        assert_eq!(m.get("key"), Some(&43));
    }

    #[test]
    fn and_modify_on_vacant_is_noop() {
        let mut m = map_with(&[]);
        let calls = Cell::new(0);
        let e = m.entry("key".to_string()).and_modify(|_| calls.set(calls.get() + 1));
        assert!(e.is_vacant());
        drop(e);
        assert_eq!(calls.get(), 0);
        assert!(m.is_empty());
    }

    #[test]
    fn and_replace_with_uses_current_value() {
        let mut m: SlotHashMap<String, String> = SlotHashMap::new();
        m.set("k".to_string(), "a".to_string());
        m.entry("k".to_string())
            .and_replace_with(|s| format!("{s}b"))
            .or_insert_with(String::new);
        assert_eq!(m.get("k").map(String::as_str), Some("ab"));
    }

    #[test]
    fn or_insert_keeps_existing_value() {
        let mut m = map_with(&[("key", 42)]);
        assert_eq!(*m.entry("key".to_string()).or_insert(43), 42);
        assert_eq!(m.get("key"), Some(&42));
    }

    #[test]
    fn or_insert_with_key_sees_key() {
        let mut m = map_with(&[]);
        let v = *m.entry("k".to_string()).or_insert_with_key(|k| k.len() as i32);
        assert_eq!(v, 1);
        assert_eq!(m.get("k"), Some(&1));
    }

    #[test]
    fn or_default_inserts_default() {
        let mut m: SlotHashMap<String, Option<String>> = SlotHashMap::new();
        assert_eq!(*m.entry("key".to_string()).or_default(), None);
        assert_eq!(m.get("key"), Some(&None));
    }

    #[test]
    fn or_try_insert_with_error_inserts_nothing() {
        let mut m = map_with(&[]);
        let res: Result<&mut i32, &str> = m.entry("key".to_string()).or_try_insert_with(|| Err("boom"));
        assert_eq!(res.unwrap_err(), "boom");
        assert!(!m.contains_key("key"));

        let res: Result<&mut i32, &str> = m.entry("key".to_string()).or_try_insert_with(|| Ok(5));
        assert_eq!(*res.unwrap(), 5);
    }

    #[test]
    fn insert_entry_sets_either_state() {
        let mut m = map_with(&[("old", 1)]);
        assert_eq!(*m.entry("old".to_string()).insert_entry(2).get(), 2);
        assert_eq!(*m.entry("new".to_string()).insert_entry(3).get(), 3);
        assert_eq!(m.get("old"), Some(&2));
        assert_eq!(m.get("new"), Some(&3));
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn narrowing_errors() {
        let mut m = map_with(&[("key", 1)]);
        assert_eq!(
            m.entry("missing".to_string()).into_occupied().unwrap_err(),
            EntryError::KeyNotFound
        );
        assert_eq!(
            m.entry("key".to_string()).into_vacant().unwrap_err(),
            EntryError::InvalidState
        );
    }

    #[test]
    fn try_into_hands_entry_back_on_mismatch() {
        let mut m = map_with(&[("key", 1)]);
        let back = match m.entry("key".to_string()).try_into_vacant() {
            Ok(_) => panic!("key is present"),
            Err(e) => e,
        };
        assert!(back.is_occupied());
        assert_eq!(back.try_into_occupied().ok().map(|o| *o.get()), Some(1));

        let back = match m.entry("missing".to_string()).try_into_occupied() {
            Ok(_) => panic!("key is absent"),
            Err(e) => e,
        };
        assert_eq!(*back.try_into_vacant().ok().unwrap().insert(9), 9);
        assert_eq!(m.get("missing"), Some(&9));
    }

    #[test]
    fn either_runs_one_branch() {
        let mut m = map_with(&[("key", 5)]);
        let seen = m
            .entry("key".to_string())
            .either(|o| format!("occupied {}", o.get()), |v| format!("vacant {}", v.key()));
        assert_eq!(seen, "occupied 5");

        m.entry("new".to_string()).either(
            |_| panic!("new is absent"),
            |v| {
                v.insert(1);
            },
        );
        assert_eq!(m.get("new"), Some(&1));
    }

    #[test]
    fn remove_and_try_remove() {
        let mut m = map_with(&[("a", 1), ("b", 2)]);
        assert_eq!(m.entry("a".to_string()).remove(), Ok(1));
        assert_eq!(m.entry("a".to_string()).remove(), Err(EntryError::KeyNotFound));
        assert_eq!(m.entry("b".to_string()).try_remove(), Some(2));
        assert_eq!(m.entry("b".to_string()).try_remove(), None);
        assert!(m.is_empty());
    }

    #[test]
    fn set_and_get_or_insert() {
        let mut m = map_with(&[]);
        assert_eq!(m.set("k".to_string(), 1), None);
        assert_eq!(m.set("k".to_string(), 2), Some(1));
        assert_eq!(*m.get_or_insert("k".to_string(), 3), 2);
        assert_eq!(*m.get_or_insert("j".to_string(), 4), 4);
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn entry_debug_shows_state() {
        let mut m = map_with(&[("key", 1)]);
        assert_eq!(
            format!("{:?}", m.entry("key".to_string())),
            r#"Entry(OccupiedEntry { key: "key", value: 1 })"#
        );
        assert_eq!(
            format!("{:?}", m.entry("new".to_string())),
            r#"Entry(VacantEntry("new"))"#
        );
    }
}

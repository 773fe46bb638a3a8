//! OccupiedEntry: proof that a key is present, addressed by its slot.

use crate::slot_hash_map::{Slot, SlotHashMap};
use core::fmt;
use tracing::trace;

/// A view into a present record of a [`SlotHashMap`].
///
/// Holds the slot token found by the lookup; every access resolves it
/// directly, without hashing the key again.
pub struct OccupiedEntry<'a, K, V, S> {
    map: &'a mut SlotHashMap<K, V, S>,
    slot: Slot,
}

impl<'a, K, V, S> OccupiedEntry<'a, K, V, S> {
    pub(crate) fn new(map: &'a mut SlotHashMap<K, V, S>, slot: Slot) -> Self {
        Self { map, slot }
    }

    pub fn slot(&self) -> Slot {
        self.slot
    }

    /// The key stored in the map.
    pub fn key(&self) -> &K {
        &self.map.slots[self.slot.raw()].key
    }

    pub fn get(&self) -> &V {
        &self.map.slots[self.slot.raw()].value
    }

    pub fn get_mut(&mut self) -> &mut V {
        &mut self.map.slots[self.slot.raw()].value
    }

    /// Convert into a mutable reference bound to the map borrow.
    pub fn into_mut(self) -> &'a mut V {
        &mut self.map.slots[self.slot.raw()].value
    }

    /// Overwrite the stored value, returning a reference to the new value.
    pub fn insert(&mut self, value: V) -> &mut V {
        let stored = self.get_mut();
        *stored = value;
        stored
    }

    /// Overwrite the stored value, returning the previous one.
    pub fn replace(&mut self, value: V) -> V {
        core::mem::replace(self.get_mut(), value)
    }

    /// Remove the record and return its value.
    pub fn remove(self) -> V {
        self.remove_entry().1
    }

    /// Remove the record and return its key and value.
    pub fn remove_entry(self) -> (K, V) {
        let removed = self
            .map
            .remove_slot(self.slot)
            .expect("occupied entry must refer to a live slot");
        trace!(len = self.map.len(), "removed through occupied entry");
        removed
    }
}

impl<K, V, S> fmt::Debug for OccupiedEntry<'_, K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OccupiedEntry")
            .field("key", self.key())
            .field("value", self.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::{Entry, SlotHashMap};

    fn occupied_map() -> SlotHashMap<String, i32> {
        let mut m = SlotHashMap::new();
        m.set("key".to_string(), 42);
        m
    }

    #[test]
    fn key_and_value_read_the_stored_record() {
        let mut m = occupied_map();
        let o = m.entry("key".to_string()).into_occupied().unwrap();
        assert_eq!(o.key(), "key");
        assert_eq!(*o.get(), 42);
    }

    #[test]
    fn insert_overwrites_and_returns_new_value() {
        let mut m = occupied_map();
        let mut o = m.entry("key".to_string()).into_occupied().unwrap();
        assert_eq!(*o.insert(100), 100);
        assert_eq!(*o.get(), 100);
        assert_eq!(m.get("key"), Some(&100));
    }

    #[test]
    fn replace_returns_previous_value() {
        let mut m = occupied_map();
        let mut o = m.entry("key".to_string()).into_occupied().unwrap();
        assert_eq!(o.replace(7), 42);
        assert_eq!(m.get("key"), Some(&7));
    }

    #[test]
    fn remove_returns_value_and_drops_key() {
        let mut m = occupied_map();
        let o = m.entry("key".to_string()).into_occupied().unwrap();
        assert_eq!(o.remove(), 42);
        assert!(!m.contains_key("key"));
        assert!(m.is_empty());
    }

    #[test]
    fn remove_entry_returns_pair() {
        let mut m = occupied_map();
        let o = m.entry("key".to_string()).into_occupied().unwrap();
        assert_eq!(o.remove_entry(), ("key".to_string(), 42));
        assert!(!m.contains_key("key"));
    }

    #[test]
    fn slot_matches_find() {
        let mut m = occupied_map();
        let expected = m.find("key").unwrap();
        match m.entry("key".to_string()) {
            Entry::Occupied(o) => assert_eq!(o.slot(), expected),
            Entry::Vacant(_) => panic!("expected occupied entry"),
        }
    }

    #[test]
    fn into_mut_outlives_the_handle() {
        let mut m = occupied_map();
        let v = m.entry("key".to_string()).into_occupied().unwrap().into_mut();
        *v += 1;
        assert_eq!(m.get("key"), Some(&43));
    }
}

//! VacantEntry: proof that a key is absent, carrying the hash of the lookup.

use crate::occupied_entry::OccupiedEntry;
use crate::slot_hash_map::SlotHashMap;
use core::fmt;
use tracing::trace;

/// A view into a missing key of a [`SlotHashMap`].
///
/// Inserting through it adds the record with the hash computed by the
/// lookup; the key is neither hashed nor compared again.
pub struct VacantEntry<'a, K, V, S> {
    map: &'a mut SlotHashMap<K, V, S>,
    hash: u64,
    key: K,
}

impl<'a, K, V, S> VacantEntry<'a, K, V, S> {
    pub(crate) fn new(map: &'a mut SlotHashMap<K, V, S>, hash: u64, key: K) -> Self {
        Self { map, hash, key }
    }

    /// The key that was looked up.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Take ownership of the key without inserting.
    pub fn into_key(self) -> K {
        self.key
    }

    /// Insert `value` and return a mutable reference to it.
    pub fn insert(self, value: V) -> &'a mut V {
        self.insert_entry(value).into_mut()
    }

    /// Insert `value` and return an occupied entry for further updates.
    pub fn insert_entry(self, value: V) -> OccupiedEntry<'a, K, V, S> {
        let VacantEntry { map, hash, key } = self;
        let slot = map.add(hash, key, value);
        trace!(hash, len = map.len(), "inserted through vacant entry");
        OccupiedEntry::new(map, slot)
    }
}

impl<K, V, S> fmt::Debug for VacantEntry<'_, K, V, S>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("VacantEntry").field(self.key()).finish()
    }
}

//! slot-entry: a single-lookup Entry API over a slot-token hash map.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: look a key up once, then insert, update or remove through the
//!   result of that lookup without hashing or probing again.
//! - Layers:
//!   - SlotHashMap<K, V, S>: host map. Records live in a `SlotMap`; a
//!     `hashbrown::HashTable` indexes their generational keys by a hash
//!     stored with each record. Lookups yield either a `Slot` or the hash
//!     they computed; includes a debug-only probe guard.
//!   - OccupiedEntry / VacantEntry: leaf handles. An occupied entry holds
//!     the `Slot` of a present record; a vacant entry holds the owned key
//!     and its hash. Each exposes only the operations valid in its state.
//!   - Entry: the two-variant union returned by `SlotHashMap::entry`, with
//!     chaining (`and_modify`, `or_insert*`), narrowing (`into_*`,
//!     `try_into_*`) and total dispatch (`either`).
//!
//! Constraints
//! - Single-threaded: the map is `!Send`/`!Sync`.
//! - One call to the map's `BuildHasher` per `entry()`, however many
//!   operations follow. Index growth rehashes from stored hashes, never
//!   from `K: Hash`.
//! - Handles borrow the map mutably for their whole lifetime; two live
//!   handles over one map, or iteration under a live handle, do not compile.
//! - Leaf handles have private fields and no `Default`; they come only from
//!   a lookup or from inserting through a vacant entry.
//!
//! Narrowing errors
//! - `into_occupied` on a vacant entry fails with `EntryError::KeyNotFound`;
//!   `into_vacant` on an occupied entry fails with `EntryError::InvalidState`.
//!   The library itself never relies on these: `either`, `try_into_*` and
//!   the `or_*` family are total.
//! - Fallible factories insert nothing when they fail.
//!
//! Reentrancy
//! - User code runs inside the map only through `K: Eq`/`K: Hash` while
//!   probing. Re-entering the map from there panics in debug builds.
//!   Closures handed to entry operations cannot reach the map at all: it is
//!   exclusively borrowed by the entry.
//!
//! Async factories
//! - `get_or_try_insert_with_async` never holds an entry across an await;
//!   it probes, awaits the factory only when the key is absent, then
//!   inserts through a fresh `entry()`. That path probes twice.

mod entry;
mod entry_proptest;
mod error;
mod occupied_entry;
mod reentrancy;
pub mod slot_hash_map;
mod vacant_entry;

// Public surface
pub use entry::Entry;
pub use error::EntryError;
pub use occupied_entry::OccupiedEntry;
pub use reentrancy::{ProbeGuard, ProbeScope};
pub use slot_hash_map::{Slot, SlotHashMap};
pub use vacant_entry::VacantEntry;

#![cfg(test)]

// Property tests for the entry API kept inside the crate so they can reach
// slot internals.

use crate::{Entry, EntryError, SlotHashMap};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::cell::Cell;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::{BuildHasher, Hasher};

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Pool-indexed operations: indices shrink to earlier keys, the pool shrinks,
// and op lists shrink in length.
#[derive(Clone, Debug)]
enum Op {
    OrInsert(usize, i32),
    OrInsertWith(usize, i32),
    Upsert(usize, i32, i32),
    InsertEntry(usize, i32),
    Remove(usize),
    IntoOccupied(usize),
    IntoVacant(usize),
    Either(usize, i32),
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::OrInsert(i, v)),
            (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::OrInsertWith(i, v)),
            (idx.clone(), any::<i32>(), any::<i32>()).prop_map(|(i, d, v)| Op::Upsert(i, d, v)),
            (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::InsertEntry(i, v)),
            idx.clone().prop_map(Op::Remove),
            idx.clone().prop_map(Op::IntoOccupied),
            idx.clone().prop_map(Op::IntoVacant),
            (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Either(i, v)),
            Just(Op::Iterate),
        ];
        proptest::collection::vec(op, 1..60).prop_map(move |ops| (pool.clone(), ops))
    })
}

// State-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - The state reported by `entry()` matches key presence in the model.
// - `or_insert*` keep existing values and run factories only when vacant.
// - `and_modify(..).or_insert(..)` updates present keys and inserts absent ones.
// - `insert_entry` always leaves the key present with the new value.
// - Removal through an entry returns the model's value and drops the key.
// - Narrowing fails exactly when the state does not match, changing nothing.
// - `len`/`is_empty` and the key set track the model after each op.
fn run_state_machine<S: BuildHasher>(
    sut: &mut SlotHashMap<Key, i32, S>,
    pool: &[String],
    ops: Vec<Op>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<Key, i32> = HashMap::new();
    let factory_calls = Cell::new(0usize);

    for op in ops {
        match op {
            Op::OrInsert(i, v) => {
                let k = Key(pool[i].clone());
                let expected = *model.entry(k.clone()).or_insert(v);
                let got = *sut.entry(k).or_insert(v);
                prop_assert_eq!(got, expected);
            }
            Op::OrInsertWith(i, v) => {
                let k = Key(pool[i].clone());
                let present = model.contains_key(&k);
                let before = factory_calls.get();
                let got = *sut.entry(k.clone()).or_insert_with(|| {
                    factory_calls.set(factory_calls.get() + 1);
                    v
                });
                let expected = *model.entry(k).or_insert(v);
                prop_assert_eq!(got, expected);
                let ran = factory_calls.get() - before;
                prop_assert_eq!(ran, usize::from(!present), "factory runs only when vacant");
            }
            Op::Upsert(i, d, v) => {
                let k = Key(pool[i].clone());
                let got = *sut
                    .entry(k.clone())
                    .and_modify(|x| *x = x.wrapping_add(d))
                    .or_insert(v);
                let expected = *model
                    .entry(k)
                    .and_modify(|x| *x = x.wrapping_add(d))
                    .or_insert(v);
                prop_assert_eq!(got, expected);
            }
            Op::InsertEntry(i, v) => {
                let k = Key(pool[i].clone());
                let o = sut.entry(k.clone()).insert_entry(v);
                prop_assert_eq!(o.key(), &k);
                prop_assert_eq!(*o.get(), v);
                model.insert(k, v);
            }
            Op::Remove(i) => {
                let k = Key(pool[i].clone());
                let got = sut.entry(k.clone()).try_remove();
                prop_assert_eq!(got, model.remove(&k));
                prop_assert!(!sut.contains_key(pool[i].as_str()));
            }
            Op::IntoOccupied(i) => {
                let k = Key(pool[i].clone());
                match sut.entry(k.clone()).into_occupied() {
                    Ok(o) => {
                        prop_assert_eq!(Some(o.get()), model.get(&k));
                    }
                    Err(e) => {
                        prop_assert_eq!(e, EntryError::KeyNotFound);
                        prop_assert!(!model.contains_key(&k));
                    }
                }
            }
            Op::IntoVacant(i) => {
                let k = Key(pool[i].clone());
                match sut.entry(k.clone()).into_vacant() {
                    Ok(v) => {
                        prop_assert!(!model.contains_key(&k));
                        prop_assert_eq!(v.key(), &k);
                    }
                    Err(e) => {
                        prop_assert_eq!(e, EntryError::InvalidState);
                        prop_assert!(model.contains_key(&k));
                    }
                }
            }
            Op::Either(i, v) => {
                // Remove if present, insert if absent.
                let k = Key(pool[i].clone());
                let removed = sut.entry(k.clone()).either(
                    |o| Some(o.remove()),
                    |vac| {
                        vac.insert(v);
                        None
                    },
                );
                match model.remove(&k) {
                    Some(old) => {
                        prop_assert_eq!(removed, Some(old));
                    }
                    None => {
                        prop_assert_eq!(removed, None);
                        model.insert(k, v);
                    }
                }
            }
            Op::Iterate => {
                let s_keys: BTreeSet<_> = sut.iter().map(|(_, k, _)| k.clone()).collect();
                let m_keys: BTreeSet<_> = model.keys().cloned().collect();
                prop_assert_eq!(s_keys, m_keys);
            }
        }

        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        for (k, v) in &model {
            let is_occupied = matches!(sut.entry(k.clone()), Entry::Occupied(_));
            prop_assert!(is_occupied);
            prop_assert_eq!(sut.get(k.0.as_str()), Some(v));
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_entry_state_machine((pool, ops) in arb_scenario()) {
        let mut sut: SlotHashMap<Key, i32> = SlotHashMap::new();
        run_state_machine(&mut sut, &pool, ops)?;
    }
}

// Collision variant using a constant hasher to stress equality resolution.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

// Same invariants as above under worst-case collisions: every record shares
// one hash, so slot unlinking on removal must pick the right index entry.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_entry_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        let mut sut: SlotHashMap<Key, i32, ConstBuildHasher> =
            SlotHashMap::with_hasher(ConstBuildHasher);
        run_state_machine(&mut sut, &pool, ops)?;
    }
}

use proptest::prelude::*;
use slot_entry::SlotHashMap;
use std::collections::HashMap;

// Model a counter workload on SlotHashMap and check it against std's HashMap.
// Each op is "bump key k by d, starting at s if absent", expressed as one
// `and_modify(..).or_insert(..)` chain, plus occasional removals.
proptest! {
    #[test]
    fn prop_counter_chains_match_model(keys in 1usize..=5, ops in proptest::collection::vec((0u8..=3u8, 0usize..100usize, -50i64..50i64), 1..100)) {
        let mut m: SlotHashMap<String, i64> = SlotHashMap::new();
        let mut model: HashMap<String, i64> = HashMap::new();

        for (op, raw_k, d) in ops {
            let key = format!("k{}", raw_k % keys);
            match op {
                // Bump or start
                0 | 1 => {
                    let got = *m.entry(key.clone()).and_modify(|v| *v += d).or_insert(d * 2);
                    let want = *model.entry(key.clone()).and_modify(|v| *v += d).or_insert(d * 2);
                    prop_assert_eq!(got, want);
                }
                // Remove through a narrowed entry when present
                2 => {
                    let got = m.entry(key.clone()).into_occupied().ok().map(|o| o.remove());
                    prop_assert_eq!(got, model.remove(&key));
                }
                // Read-only lookup through the entry
                3 => {
                    let e = m.entry(key.clone());
                    prop_assert_eq!(e.is_occupied(), model.contains_key(&key));
                }
                _ => unreachable!(),
            }

            prop_assert_eq!(m.get(key.as_str()), model.get(&key));
        }

        prop_assert_eq!(m.len(), model.len());
    }
}

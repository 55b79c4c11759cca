// Property tests for LinearHash kept inside the crate so they can check
// bucket placement directly.

use crate::config::Config;
use crate::linear_hash::LinearHash;
use proptest::prelude::*;
use std::collections::HashMap;

// Pool-indexed operations shrink well: indices shrink toward earlier keys
// and op lists shrink in length.
#[derive(Clone, Debug)]
enum Op {
    Put(usize, i32),
    Get(usize),
    Delete(usize),
    Mutate(usize, i32),
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z0-9]{0,6}", 1..=24).prop_flat_map(|pool| {
        let idx = 0..pool.len();
        let op = prop_oneof![
            3 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Put(i, v)),
            1 => idx.clone().prop_map(Op::Get),
            2 => idx.clone().prop_map(Op::Delete),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| Op::Mutate(i, d)),
        ];
        proptest::collection::vec(op, 1..200).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn run_against_model<H: crate::Digest>(
    mut sut: LinearHash<i32, H>,
    pool: &[String],
    ops: Vec<Op>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<String, i32> = HashMap::new();
    for op in ops {
        match op {
            Op::Put(i, v) => {
                let k = &pool[i];
                prop_assert_eq!(sut.put(k.as_str(), v), model.insert(k.clone(), v));
            }
            Op::Get(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.get(k), model.get(k));
            }
            Op::Delete(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.delete(k), model.remove(k));
            }
            Op::Mutate(i, d) => {
                let k = &pool[i];
                match (sut.get_mut(k), model.get_mut(k)) {
                    (Some(s), Some(m)) => {
                        *s = s.wrapping_add(d);
                        *m = m.wrapping_add(d);
                    }
                    (None, None) => {}
                    (s, m) => {
                        prop_assert!(false, "presence mismatch: {:?} vs {:?}", s, m);
                    }
                }
            }
        }

        // Post-conditions after each op: size parity and placement.
        prop_assert_eq!(sut.len(), model.len());
        sut.assert_consistent();
    }
    for (k, v) in &model {
        prop_assert_eq!(sut.get(k), Some(v));
    }
    Ok(())
}

// Property: LinearHash behaves like std::collections::HashMap for any
// operation sequence, and after every operation each live key sits in the
// bucket the address function names.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario(), cap in 1usize..12, chain in 1usize..5) {
        let sut: LinearHash<i32> = Config::new()
            .initial_capacity(cap)
            .max_chain_length(chain)
            .build()
            .unwrap();
        run_against_model(sut, &pool, ops)?;
    }

    // Same model check with every key colliding.
    #[test]
    fn prop_state_machine_constant_digest((pool, ops) in arb_scenario()) {
        let sut = Config::new()
            .initial_capacity(3)
            .max_chain_length(2)
            .digest(|_: &str| 7u64)
            .build()
            .unwrap();
        run_against_model(sut, &pool, ops)?;
    }
}

// Property: inserting N distinct keys and deleting them again, in any
// order, restores (modulus, split_pointer, capacity).
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_split_unsplit_symmetry(
        n in 1usize..400,
        cap in 1usize..20,
        chain in 1usize..6,
        seed in any::<u64>(),
        order in any::<proptest::sample::Index>(),
    ) {
        let mut sut: LinearHash<usize> = Config::new()
            .initial_capacity(cap)
            .max_chain_length(chain)
            .seed(seed)
            .build()
            .unwrap();
        let start = sut.geometry();

        for i in 0..n {
            sut.put(format!("key-{i}"), i);
        }
        sut.assert_consistent();

        // Delete in a rotated and strided order derived from `order`.
        let offset = order.index(n);
        let stride = [1, 3, 7, 11].into_iter().find(|s| gcd(*s, n) == 1).unwrap_or(1);
        for j in 0..n {
            let i = (offset + j * stride) % n;
            prop_assert_eq!(sut.delete(&format!("key-{i}")), Some(i));
        }
        prop_assert!(sut.is_empty());
        prop_assert_eq!(sut.geometry(), start);
        sut.assert_consistent();
    }
}

fn gcd(a: usize, b: usize) -> usize {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

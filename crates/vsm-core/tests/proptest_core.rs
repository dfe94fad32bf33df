//! Property-based tests for the ledger and crafting invariants.
//!
//! Uses proptest to generate random operation sequences against a plain
//! model of the stock, then checks the engine agrees with the model and
//! never leaves a partial change behind.

use proptest::prelude::*;
use std::collections::BTreeMap;
use vsm_core::inventory::{Inventory, Transaction};
use vsm_core::product::Product;
use vsm_core::test_utils::*;

// ===========================================================================
// Generators
// ===========================================================================

fn product(i: u8) -> Product {
    Product::new(format!("p{i}"))
}

#[derive(Debug, Clone)]
enum LedgerOp {
    Register(u8),
    Add(u8, u32),
    Remove(u8, u32),
    Deregister(u8),
}

fn arb_ops(max_ops: usize) -> impl Strategy<Value = Vec<LedgerOp>> {
    proptest::collection::vec(
        prop_oneof![
            (0..4u8).prop_map(LedgerOp::Register),
            (0..4u8, 0..20u32).prop_map(|(p, q)| LedgerOp::Add(p, q)),
            (0..4u8, 0..20u32).prop_map(|(p, q)| LedgerOp::Remove(p, q)),
            (0..4u8).prop_map(LedgerOp::Deregister),
        ],
        1..=max_ops,
    )
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The ledger matches a simple model after every step, and failed
    /// operations change nothing.
    #[test]
    fn ledger_matches_model(ops in arb_ops(60)) {
        let mut inv = Inventory::new();
        let mut model: BTreeMap<Product, u32> = BTreeMap::new();

        for op in ops {
            let before = inv.snapshot();
            let ok = match op {
                LedgerOp::Register(p) => {
                    inv.register(product(p));
                    model.entry(product(p)).or_insert(0);
                    true
                }
                LedgerOp::Add(p, q) => {
                    let ok = inv.add(&product(p), q).is_ok();
                    prop_assert_eq!(ok, q > 0 && model.contains_key(&product(p)));
                    if ok {
                        *model.get_mut(&product(p)).unwrap() += q;
                    }
                    ok
                }
                LedgerOp::Remove(p, q) => {
                    let have = model.get(&product(p)).copied().unwrap_or(0);
                    let ok = inv.remove(&product(p), q).is_ok();
                    prop_assert_eq!(ok, q > 0 && have >= q);
                    if ok {
                        *model.get_mut(&product(p)).unwrap() -= q;
                    }
                    ok
                }
                LedgerOp::Deregister(p) => {
                    let have = model.get(&product(p)).copied().unwrap_or(0);
                    let ok = inv.deregister(&product(p)).is_ok();
                    prop_assert_eq!(ok, have == 0);
                    if ok {
                        model.remove(&product(p));
                    }
                    ok
                }
            };
            if !ok {
                prop_assert_eq!(&inv.snapshot(), &before);
            }
            prop_assert_eq!(&inv.snapshot(), &model);
        }
    }

    /// Registering twice is the same as registering once.
    #[test]
    fn register_is_idempotent(stocked in 0..50u32) {
        let mut once = Inventory::new();
        once.register(product(0));
        if stocked > 0 {
            once.add(&product(0), stocked).unwrap();
        }
        let mut twice = once.clone();
        twice.register(product(0));
        prop_assert_eq!(once, twice);
    }

    /// add(k) then remove(k) restores the previous quantity.
    #[test]
    fn add_then_remove_restores(start in 0..1_000u32, k in 1..1_000u32) {
        let mut inv = Inventory::new();
        inv.register(product(1));
        if start > 0 {
            inv.add(&product(1), start).unwrap();
        }
        inv.add(&product(1), k).unwrap();
        inv.remove(&product(1), k).unwrap();
        prop_assert_eq!(inv.quantity_of(&product(1)), start);
    }

    /// A transaction either applies in full or leaves the ledger as it was.
    #[test]
    fn transactions_are_atomic(
        levels in proptest::collection::vec(0..10u32, 3),
        consume in proptest::collection::vec(1..12u32, 3),
        produce in 1..5u32,
    ) {
        let mut inv = Inventory::new();
        for (i, q) in levels.iter().enumerate() {
            inv.register(product(i as u8));
            if *q > 0 {
                inv.add(&product(i as u8), *q).unwrap();
            }
        }
        inv.register(product(9));
        let before = inv.snapshot();

        let mut tx = Transaction::new();
        for (i, q) in consume.iter().enumerate() {
            tx.consume(product(i as u8), *q);
        }
        tx.produce(product(9), produce);

        let feasible = levels.iter().zip(&consume).all(|(s, c)| s >= c);
        let result = inv.apply(&tx);
        prop_assert_eq!(result.is_ok(), feasible);
        if feasible {
            for (i, (s, c)) in levels.iter().zip(&consume).enumerate() {
                prop_assert_eq!(inv.quantity_of(&product(i as u8)), s - c);
            }
            prop_assert_eq!(inv.quantity_of(&product(9)), produce);
        } else {
            prop_assert_eq!(inv.snapshot(), before);
        }
    }

    /// An infeasible craft never changes stock; a batch completes exactly
    /// as many crafts as the scarcest input allows.
    #[test]
    fn craft_is_all_or_nothing(
        iron_stock in 0..30u32,
        copper_stock in 0..30u32,
        iron_need in 1..5i32,
        copper_need in 1..5i32,
        efficiency in prop_oneof![
            0.0..=200.0f64,
            Just(100.0 / 3.0),
            Just(200.0 / 3.0),
            (0..=200u32).prop_map(f64::from),
        ],
        runs in 0..20u32,
    ) {
        let mut proc = make_recipe(
            "Assembler",
            efficiency,
            &[(iron(), -iron_need), (copper(), -copper_need), (gear(), 3)],
        );
        if iron_stock > 0 {
            proc.add(&iron(), iron_stock).unwrap();
        }
        if copper_stock > 0 {
            proc.add(&copper(), copper_stock).unwrap();
        }

        let possible = (iron_stock / iron_need as u32).min(copper_stock / copper_need as u32);
        let done = proc.craft_batch(runs).unwrap();
        prop_assert_eq!(done, runs.min(possible));

        let per_craft = (3.0 * efficiency / 100.0).floor() as u32;
        prop_assert_eq!(proc.quantity_of(&gear()), done * per_craft);
        prop_assert_eq!(proc.quantity_of(&iron()), iron_stock - done * iron_need as u32);

        if !proc.can_craft() {
            let before = proc.snapshot();
            prop_assert!(proc.craft().is_err());
            prop_assert_eq!(proc.snapshot(), before);
        }
    }
}

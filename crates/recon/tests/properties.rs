use std::collections::{BTreeMap, HashSet};

use proptest::prelude::*;

use fogowatch_model::{FieldValue, Record, Snapshot};
use fogowatch_recon::reconcile;

// -------------------------------------------------------------------------
// Example-based properties
// -------------------------------------------------------------------------

fn record(id: i64, man: i64, status: &str) -> Record {
    Record::new(id).with_field("man", man).with_field("status", status)
}

#[test]
fn reconcile_against_self_is_empty() {
    let snapshot = Snapshot::new(vec![
        record(1, 5, "em curso"),
        record(2, 0, "conclusao"),
        record(3, 12, "em curso"),
    ]);
    let set = reconcile(&snapshot, &snapshot);
    assert!(set.is_empty());
}

#[test]
fn swapping_snapshots_swaps_appeared_and_disappeared() {
    let old = Snapshot::new(vec![record(1, 5, "a"), record(2, 1, "b")]);
    let new = Snapshot::new(vec![record(2, 3, "b"), record(3, 9, "c")]);

    let forward = reconcile(&old, &new);
    let backward = reconcile(&new, &old);

    let ids = |records: &[Record]| records.iter().map(|r| r.id).collect::<Vec<_>>();
    assert_eq!(ids(&forward.appeared), ids(&backward.disappeared));
    assert_eq!(ids(&forward.disappeared), ids(&backward.appeared));

    // Same changed ids, deltas reversed.
    assert_eq!(forward.changed.len(), 1);
    assert_eq!(backward.changed.len(), 1);
    assert_eq!(forward.changed[0].record.id, backward.changed[0].record.id);
    let fwd = &forward.changed[0].delta["man"];
    let bwd = &backward.changed[0].delta["man"];
    assert_eq!(fwd.old, bwd.new);
    assert_eq!(fwd.new, bwd.old);
}

// -------------------------------------------------------------------------
// Property tests
// -------------------------------------------------------------------------

/// Records drawn from a small id space so snapshots overlap often.
fn arb_snapshot() -> impl Strategy<Value = Snapshot> {
    prop::collection::btree_map(0i64..12, (0i64..6, 0i64..4), 0..10).prop_map(|records| {
        records
            .into_iter()
            .map(|(id, (man, terrain))| {
                Record::new(id)
                    .with_field("man", man)
                    .with_field("terrain", terrain)
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn idempotent(snapshot in arb_snapshot()) {
        prop_assert!(reconcile(&snapshot, &snapshot).is_empty());
    }

    #[test]
    fn symmetric(old in arb_snapshot(), new in arb_snapshot()) {
        let forward = reconcile(&old, &new);
        let backward = reconcile(&new, &old);

        let ids = |records: &[Record]| records.iter().map(|r| r.id).collect::<HashSet<_>>();
        prop_assert_eq!(ids(&forward.appeared), ids(&backward.disappeared));
        prop_assert_eq!(ids(&forward.disappeared), ids(&backward.appeared));

        let fwd_changed: BTreeMap<i64, _> = forward
            .changed
            .iter()
            .map(|c| (c.record.id, c.delta.clone()))
            .collect();
        let bwd_changed: BTreeMap<i64, _> = backward
            .changed
            .iter()
            .map(|c| (c.record.id, c.delta.clone()))
            .collect();
        prop_assert_eq!(
            fwd_changed.keys().collect::<Vec<_>>(),
            bwd_changed.keys().collect::<Vec<_>>()
        );
        for (id, fwd_delta) in &fwd_changed {
            let bwd_delta = &bwd_changed[id];
            for (field, change) in fwd_delta {
                prop_assert_eq!(&change.old, &bwd_delta[field].new);
                prop_assert_eq!(&change.new, &bwd_delta[field].old);
            }
        }
    }

    #[test]
    fn complete(old in arb_snapshot(), new in arb_snapshot()) {
        let set = reconcile(&old, &new);

        let appeared: HashSet<i64> = set.appeared.iter().map(|r| r.id).collect();
        let disappeared: HashSet<i64> = set.disappeared.iter().map(|r| r.id).collect();
        let changed: HashSet<i64> = set.changed.iter().map(|c| c.record.id).collect();

        // Buckets are disjoint.
        prop_assert!(appeared.is_disjoint(&disappeared));
        prop_assert!(appeared.is_disjoint(&changed));
        prop_assert!(disappeared.is_disjoint(&changed));

        let old_ids: HashSet<i64> = old.iter().map(|r| r.id).collect();
        let new_ids: HashSet<i64> = new.iter().map(|r| r.id).collect();

        for id in old_ids.union(&new_ids) {
            let in_old = old_ids.contains(id);
            let in_new = new_ids.contains(id);
            match (in_old, in_new) {
                (false, true) => prop_assert!(appeared.contains(id)),
                (true, false) => prop_assert!(disappeared.contains(id)),
                (true, true) => {
                    let old_rec = old.iter().find(|r| r.id == *id).unwrap();
                    let new_rec = new.iter().find(|r| r.id == *id).unwrap();
                    let differs = new_rec
                        .fields()
                        .any(|(name, value)| old_rec.get(name) != Some(value));
                    prop_assert_eq!(changed.contains(id), differs);
                    prop_assert!(!appeared.contains(id) && !disappeared.contains(id));
                }
                (false, false) => unreachable!(),
            }
        }
    }

    #[test]
    fn deltas_never_empty(old in arb_snapshot(), new in arb_snapshot()) {
        for c in &reconcile(&old, &new).changed {
            prop_assert!(!c.delta.is_empty());
            for (field, change) in &c.delta {
                prop_assert_ne!(&change.old, &change.new);
                prop_assert_eq!(Some(&change.new), c.record.get(field));
            }
        }
    }

    #[test]
    fn type_drift_is_not_a_change(ids in prop::collection::hash_set(0i64..10, 1..6)) {
        // Same logical values, one side ingested as strings/floats — after
        // canonicalization both sides compare equal.
        let as_int: Snapshot = ids
            .iter()
            .map(|id| fogowatch_model::canonicalize(Record::new(*id).with_field("man", 3)))
            .collect();
        let as_text: Snapshot = ids
            .iter()
            .map(|id| fogowatch_model::canonicalize(Record::new(*id).with_field("man", "3")))
            .collect();
        prop_assert!(reconcile(&as_int, &as_text).is_empty());
    }
}

// -------------------------------------------------------------------------
// Sanity: canonical values inside deltas
// -------------------------------------------------------------------------

#[test]
fn delta_values_are_canonical() {
    let old = Snapshot::new(vec![fogowatch_model::canonicalize(
        Record::new(1).with_field("man", "5"),
    )]);
    let new = Snapshot::new(vec![fogowatch_model::canonicalize(
        Record::new(1).with_field("man", 7.0),
    )]);

    let set = reconcile(&old, &new);
    assert_eq!(set.changed.len(), 1);
    let change = &set.changed[0].delta["man"];
    assert_eq!(change.old, FieldValue::Int(5));
    assert_eq!(change.new, FieldValue::Int(7));
}

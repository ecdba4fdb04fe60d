use std::collections::HashMap;

use fogowatch_model::{ChangeSet, ChangedRecord, Delta, FieldChange, FieldValue, Record, Snapshot};

/// Classify the differences between two snapshots.
///
/// Hash-indexed by identity key, O(n+m). Output order is deterministic:
/// `appeared` and `changed` follow the new snapshot's order, `disappeared`
/// follows the old snapshot's order.
pub fn reconcile(old: &Snapshot, new: &Snapshot) -> ChangeSet {
    let old_by_id: HashMap<i64, &Record> = old.iter().map(|r| (r.id, r)).collect();
    let new_by_id: HashMap<i64, &Record> = new.iter().map(|r| (r.id, r)).collect();

    let mut appeared = Vec::new();
    let mut changed = Vec::new();
    for record in new {
        match old_by_id.get(&record.id) {
            None => appeared.push(record.clone()),
            Some(prev) => {
                let delta = diff_fields(prev, record);
                if !delta.is_empty() {
                    changed.push(ChangedRecord {
                        record: record.clone(),
                        delta,
                    });
                }
            }
        }
    }

    let disappeared = old
        .iter()
        .filter(|r| !new_by_id.contains_key(&r.id))
        .cloned()
        .collect();

    ChangeSet {
        appeared,
        disappeared,
        changed,
    }
}

/// Field-by-field inequality, restricted to fields present on the new
/// record. A field the old record lacks is reported with an empty old
/// value rather than dropped.
fn diff_fields(old: &Record, new: &Record) -> Delta {
    let mut delta = Delta::new();
    for (name, value) in new.fields() {
        let old_value = old.get(name).cloned().unwrap_or_else(|| FieldValue::text(""));
        if old_value != *value {
            delta.insert(
                name.to_string(),
                FieldChange {
                    old: old_value,
                    new: value.clone(),
                },
            );
        }
    }
    delta
}

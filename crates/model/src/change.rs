use std::collections::BTreeMap;

use serde::Serialize;

use crate::record::Record;
use crate::value::FieldValue;

/// Old/new value pair for one field of a changed record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldChange {
    pub old: FieldValue,
    pub new: FieldValue,
}

/// Per-field changes for one record, in field-name order. Never empty —
/// a record with an empty delta is simply not classified as changed.
pub type Delta = BTreeMap<String, FieldChange>;

/// A record present in both snapshots whose fields differ.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangedRecord {
    pub record: Record,
    pub delta: Delta,
}

/// Classification of two snapshots' differences.
///
/// Built fresh each poll cycle and discarded after rendering; only the new
/// snapshot is persisted to become the next cycle's "old" side.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChangeSet {
    pub appeared: Vec<Record>,
    pub disappeared: Vec<Record>,
    pub changed: Vec<ChangedRecord>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.appeared.is_empty() && self.disappeared.is_empty() && self.changed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.appeared.len() + self.disappeared.len() + self.changed.len()
    }
}

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::value::FieldValue;

/// One fire-event observation, keyed by a stable identity.
///
/// Fields are an immutable name → value mapping; there is no in-place
/// mutation API. Rendering and canonicalization build new values instead
/// of rewriting this one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: i64,
    #[serde(flatten)]
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            fields: BTreeMap::new(),
        }
    }

    pub fn from_fields(id: i64, fields: BTreeMap<String, FieldValue>) -> Self {
        Self { id, fields }
    }

    /// Builder-style field insertion, used at ingest and in tests.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(FieldValue::as_text)
    }

    pub fn float(&self, name: &str) -> Option<f64> {
        self.fields.get(name).and_then(FieldValue::as_float)
    }

    /// The freeform location string, empty when absent.
    pub fn location(&self) -> &str {
        self.text("location").unwrap_or("")
    }

    /// Fields in name order (deterministic).
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// The full set of records observed at one poll cycle.
///
/// Order is preserved from the source; membership and identity are what
/// matter. Identity keys are unique — `new` keeps the first record per id
/// and drops later duplicates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(Vec<Record>);

impl Snapshot {
    pub fn new(records: Vec<Record>) -> Self {
        let mut seen = HashSet::new();
        Self(records.into_iter().filter(|r| seen.insert(r.id)).collect())
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn records(&self) -> &[Record] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Record> for Snapshot {
    fn from_iter<T: IntoIterator<Item = Record>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

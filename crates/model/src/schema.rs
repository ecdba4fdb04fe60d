//! Canonical value type per known field.
//!
//! The upstream feed is loose about types — counts arrive as numbers in one
//! payload and strings in the next. Each known field gets one canonical
//! kind, applied at ingest and at snapshot load, so type drift across
//! snapshots can never surface as a spurious delta.

use std::collections::BTreeMap;

use crate::record::Record;
use crate::value::FieldValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Int,
    Float,
    Text,
}

/// Canonical kind for a known field name; `None` for unknown fields,
/// which pass through untouched.
pub fn field_kind(name: &str) -> Option<FieldKind> {
    match name {
        "man" | "terrain" | "meios_aquaticos" | "aerial" => Some(FieldKind::Int),
        "lat" | "lng" => Some(FieldKind::Float),
        "datetime" | "status" | "location" | "district" | "concelho" | "freguesia"
        | "natureza" => Some(FieldKind::Text),
        _ => None,
    }
}

/// Rebuild a record with every known field coerced to its canonical kind.
pub fn canonicalize(record: Record) -> Record {
    let id = record.id;
    let fields: BTreeMap<String, FieldValue> = record
        .fields()
        .map(|(name, value)| {
            let value = match field_kind(name) {
                Some(kind) => coerce(kind, value.clone()),
                None => value.clone(),
            };
            (name.to_string(), value)
        })
        .collect();
    Record::from_fields(id, fields)
}

/// Best-effort coercion. A value that cannot be read as the target kind is
/// kept as-is rather than dropped (fail-soft).
fn coerce(kind: FieldKind, value: FieldValue) -> FieldValue {
    match (kind, &value) {
        (FieldKind::Int, FieldValue::Int(_)) => value,
        (FieldKind::Int, FieldValue::Float(f)) => FieldValue::Int(f.0 as i64),
        (FieldKind::Int, FieldValue::Text(s)) => match parse_int(s) {
            Some(n) => FieldValue::Int(n),
            None => value,
        },
        (FieldKind::Float, FieldValue::Float(_)) => value,
        (FieldKind::Float, FieldValue::Int(n)) => FieldValue::float(*n as f64),
        (FieldKind::Float, FieldValue::Text(s)) => match s.trim().parse::<f64>() {
            Ok(f) => FieldValue::float(f),
            Err(_) => value,
        },
        (FieldKind::Text, FieldValue::Text(_)) => value,
        (FieldKind::Text, other) => FieldValue::Text(other.to_string()),
    }
}

fn parse_int(s: &str) -> Option<i64> {
    let s = s.trim();
    s.parse::<i64>()
        .ok()
        .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
}

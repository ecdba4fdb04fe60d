//! Projection of the raw feed payload into canonical records.

use chrono::NaiveDateTime;
use serde_json::Value;
use tracing::warn;

use fogowatch_model::{canonicalize, FieldValue, Record, Snapshot};

use crate::client::FeedError;

const TEXT_FIELDS: &[&str] = &[
    "status",
    "location",
    "district",
    "concelho",
    "freguesia",
    "natureza",
];
const INT_FIELDS: &[&str] = &["man", "terrain", "meios_aquaticos", "aerial"];
const FLOAT_FIELDS: &[&str] = &["lat", "lng"];

/// Validate the `{success, data}` envelope and ingest every record.
///
/// Records without a usable id are skipped with a warning; duplicate ids
/// within one payload keep the first occurrence.
pub fn snapshot_from_payload(payload: &Value) -> Result<Snapshot, FeedError> {
    if !payload["success"].as_bool().unwrap_or(false) {
        return Err(FeedError::Unsuccessful);
    }
    let data = payload["data"]
        .as_array()
        .ok_or_else(|| FeedError::Parse("missing data array".to_string()))?;

    let mut records = Vec::with_capacity(data.len());
    for entry in data {
        match record_from_value(entry) {
            Some(record) => records.push(record),
            None => warn!("skipping feed record without usable id"),
        }
    }

    let before = records.len();
    let snapshot = Snapshot::new(records);
    if snapshot.len() < before {
        warn!(dropped = before - snapshot.len(), "duplicate ids in feed payload");
    }
    Ok(snapshot)
}

fn record_from_value(entry: &Value) -> Option<Record> {
    let id = int_value(&entry["id"])?;
    let mut record = Record::new(id);

    if let (Some(date), Some(hour)) = (entry["date"].as_str(), entry["hour"].as_str()) {
        record = record.with_field("datetime", FieldValue::text(combine_datetime(date, hour)));
    }
    for name in TEXT_FIELDS {
        if let Some(s) = entry[*name].as_str() {
            record = record.with_field(*name, FieldValue::text(s));
        }
    }
    for name in INT_FIELDS {
        if let Some(n) = int_value(&entry[*name]) {
            record = record.with_field(*name, FieldValue::Int(n));
        }
    }
    for name in FLOAT_FIELDS {
        if let Some(f) = float_value(&entry[*name]) {
            record = record.with_field(*name, FieldValue::float(f));
        }
    }

    Some(canonicalize(record))
}

/// Feed timestamps arrive split as `date` (`%d-%m-%Y`) and `hour` (`%H:%M`);
/// stored ISO-ish so snapshots sort naturally. An unparseable pair keeps the
/// raw concatenation (fail-soft).
fn combine_datetime(date: &str, hour: &str) -> String {
    let raw = format!("{date} {hour}");
    match NaiveDateTime::parse_from_str(&raw, "%d-%m-%Y %H:%M") {
        Ok(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => raw,
    }
}

/// The feed is loose about numeric types: accept numbers and numeric strings.
fn int_value(v: &Value) -> Option<i64> {
    if let Some(n) = v.as_i64() {
        return Some(n);
    }
    if let Some(f) = v.as_f64() {
        return Some(f as i64);
    }
    v.as_str().and_then(|s| s.trim().parse().ok())
}

fn float_value(v: &Value) -> Option<f64> {
    if let Some(f) = v.as_f64() {
        return Some(f);
    }
    v.as_str().and_then(|s| s.trim().parse().ok())
}

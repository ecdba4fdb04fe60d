//! Rendering: field labels, record bodies, delta highlighting, and the
//! (subject, body) pairs handed to the notification boundary.
//!
//! Pure formatting — builds new label/value sequences, never mutates the
//! source record.

use fogowatch_model::{ChangeSet, ChangedRecord, FieldChange, Record};

/// Internal field name → human-readable label, in display order.
/// Unknown fields pass through unmodified and render after these.
const FIELD_LABELS: &[(&str, &str)] = &[
    ("datetime", "Data"),
    ("status", "Estado"),
    ("location", "Localização"),
    ("district", "Distrito"),
    ("concelho", "Concelho"),
    ("freguesia", "Freguesia"),
    ("man", "Operacionais"),
    ("terrain", "Terrestres"),
    ("meios_aquaticos", "Meios Aquáticos"),
    ("aerial", "Meios Aéreos"),
    ("natureza", "Natureza"),
    ("lat", "Latitude"),
    ("lng", "Longitude"),
];

/// Label for a field name; unknown names pass through (fail-soft).
pub fn label_for(field: &str) -> &str {
    FIELD_LABELS
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, label)| *label)
        .unwrap_or(field)
}

/// Field names of a record in display order: the label table's order for
/// known fields, then any unknown fields in name order. `id` is never
/// rendered (records have it as identity, not as a field).
fn display_order(record: &Record) -> Vec<&str> {
    let mut names: Vec<&str> = FIELD_LABELS
        .iter()
        .map(|(name, _)| *name)
        .filter(|&name| record.get(name).is_some())
        .collect();
    names.extend(
        record
            .fields()
            .map(|(name, _)| name)
            .filter(|name| !FIELD_LABELS.iter().any(|(known, _)| known == name)),
    );
    names
}

/// Ordered (label, display value) sequence for one record.
pub fn render_record(record: &Record) -> Vec<(String, String)> {
    display_order(record)
        .into_iter()
        .map(|name| {
            let value = record.get(name).map(|v| v.to_string()).unwrap_or_default();
            (label_for(name).to_string(), title_case(&value))
        })
        .collect()
}

/// (label, display value) for one changed field: old marked as removed,
/// new marked as added, old always before new.
pub fn render_delta(field: &str, change: &FieldChange) -> (String, String) {
    let value = format!(
        "<span style='color: red;font-weight: bold;'>{}</span> / <span style='color: green;font-weight: bold;'>{}</span>",
        change.old, change.new
    );
    (label_for(field).to_string(), value)
}

/// Uppercase the first character of each word, leaving the rest of the
/// word untouched. Words carrying a scheme separator (URLs) are left
/// entirely alone.
pub fn title_case(value: &str) -> String {
    value
        .split(' ')
        .map(|word| {
            if word.contains("://") {
                return word.to_string();
            }
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Subject + HTML body for a record that appeared in the new snapshot.
pub fn compose_appeared(record: &Record) -> (String, String) {
    (subject("NOVO FOGO", record), body_lines(render_record(record)))
}

/// Subject + HTML body for a record no longer reported.
pub fn compose_disappeared(record: &Record) -> (String, String) {
    (subject("TERMINADO FOGO", record), body_lines(render_record(record)))
}

/// Subject + HTML body for a changed record; changed fields render with
/// the old/new highlighting in place of the plain value.
pub fn compose_changed(changed: &ChangedRecord) -> (String, String) {
    let record = &changed.record;
    let lines = display_order(record)
        .into_iter()
        .map(|name| match changed.delta.get(name) {
            Some(change) => render_delta(name, change),
            None => {
                let value = record.get(name).map(|v| v.to_string()).unwrap_or_default();
                (label_for(name).to_string(), title_case(&value))
            }
        })
        .collect();
    (subject("UPDATE", record), body_lines(lines))
}

/// Render a whole change set in notification order: appeared, disappeared,
/// then changed.
pub fn compose_all(set: &ChangeSet) -> Vec<(String, String)> {
    let mut out = Vec::with_capacity(set.total());
    out.extend(set.appeared.iter().map(compose_appeared));
    out.extend(set.disappeared.iter().map(compose_disappeared));
    out.extend(set.changed.iter().map(compose_changed));
    out
}

fn subject(prefix: &str, record: &Record) -> String {
    format!("{prefix} - {}", record.location())
}

fn body_lines(lines: Vec<(String, String)>) -> String {
    lines
        .into_iter()
        .map(|(label, value)| format!("<b>{label}</b> - {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

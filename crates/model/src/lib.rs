//! `fogowatch-model` — shared data model for the fire-record watcher.
//!
//! Records, snapshots, and the change-set vocabulary every other crate
//! speaks. No IO, no HTTP.

pub mod change;
pub mod record;
pub mod schema;
pub mod value;

pub use change::{ChangeSet, ChangedRecord, Delta, FieldChange};
pub use record::{Record, Snapshot};
pub use schema::{canonicalize, field_kind, FieldKind};
pub use value::FieldValue;

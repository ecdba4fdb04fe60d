//! `fogowatch-store` — the persisted snapshot between poll cycles.
//!
//! One JSON array of records, written atomically (tmp + rename). A missing
//! or corrupt file downgrades to an empty snapshot: the next cycle then
//! reports every relevant record as appeared instead of failing.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use fogowatch_model::{canonicalize, Record, Snapshot};

/// Error type for snapshot writes. Reads never error — they downgrade.
#[derive(Debug)]
pub enum StoreError {
    Io(String),
    Serialize(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(msg) => write!(f, "IO error: {msg}"),
            StoreError::Serialize(msg) => write!(f, "serialize error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the previous snapshot. Missing file = empty snapshot, not an
    /// error. Unreadable or invalid content = empty snapshot with a warning.
    /// Loaded records are re-canonicalized so old files written before a
    /// schema change cannot reintroduce type drift.
    pub fn load(&self) -> Snapshot {
        if !self.path.exists() {
            return Snapshot::empty();
        }

        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "cannot read snapshot file; treating as empty");
                return Snapshot::empty();
            }
        };

        match serde_json::from_str::<Vec<Record>>(&raw) {
            Ok(records) => Snapshot::new(records.into_iter().map(canonicalize).collect()),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "corrupt snapshot file; treating as empty");
                Snapshot::empty()
            }
        }
    }

    /// Replace-on-write: serialize to `<path>.tmp`, then rename over the
    /// target so a crash mid-write never leaves a half-written snapshot.
    pub fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| StoreError::Io(e.to_string()))?;
            }
        }

        let json = serde_json::to_string_pretty(snapshot.records())
            .map_err(|e| StoreError::Serialize(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| StoreError::Io(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| StoreError::Io(e.to_string()))?;
        Ok(())
    }
}

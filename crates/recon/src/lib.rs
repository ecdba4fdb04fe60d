//! `fogowatch-recon` — change detection over fire-record snapshots.
//!
//! Pure engine crate: receives pre-loaded snapshots, returns classified
//! changes and rendered notifications. No IO, no HTTP.

pub mod engine;
pub mod error;
pub mod format;
pub mod relevance;

pub use engine::reconcile;
pub use error::ReconError;
pub use relevance::{haversine_km, GeoPoint, RelevanceConfig};

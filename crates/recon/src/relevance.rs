//! Relevance predicate: is a record close enough to the watch area, or
//! does it name a watched location?

use serde::Deserialize;

use fogowatch_model::{Record, Snapshot};

use crate::error::ReconError;

const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Watch-area configuration. Immutable once loaded; threaded explicitly
/// into the pipeline, never read as ambient state.
#[derive(Debug, Clone, Deserialize)]
pub struct RelevanceConfig {
    pub center: GeoPoint,
    pub max_distance_km: f64,
    #[serde(default)]
    pub locations: Vec<String>,
}

impl Default for RelevanceConfig {
    fn default() -> Self {
        Self {
            center: GeoPoint {
                lat: 39.3604,
                lng: -9.1580,
            },
            max_distance_km: 30.0,
            locations: Vec::new(),
        }
    }
}

impl RelevanceConfig {
    pub fn from_toml(raw: &str) -> Result<Self, ReconError> {
        let config: Self = toml::from_str(raw).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.max_distance_km < 0.0 {
            return Err(ReconError::ConfigValidation(format!(
                "max_distance_km must be >= 0, got {}",
                self.max_distance_km
            )));
        }
        if !(-90.0..=90.0).contains(&self.center.lat) {
            return Err(ReconError::ConfigValidation(format!(
                "center latitude out of range: {}",
                self.center.lat
            )));
        }
        if !(-180.0..=180.0).contains(&self.center.lng) {
            return Err(ReconError::ConfigValidation(format!(
                "center longitude out of range: {}",
                self.center.lng
            )));
        }
        Ok(())
    }

    /// True iff the record is within `max_distance_km` of the center OR any
    /// configured location is a substring of its location text. Logical OR:
    /// a record far away but naming a watched location still qualifies.
    pub fn is_relevant(&self, record: &Record) -> bool {
        self.within_range(record) || self.matches_location(record)
    }

    /// Distance arm. A record without both coordinates never passes here.
    /// The threshold check uses the unrounded distance; rounding is for
    /// display only, so a point exactly at the boundary stays relevant.
    fn within_range(&self, record: &Record) -> bool {
        let (Some(lat), Some(lng)) = (record.float("lat"), record.float("lng")) else {
            return false;
        };
        haversine_km(self.center, GeoPoint { lat, lng }) <= self.max_distance_km
    }

    /// Case-sensitive substring match against the location text.
    fn matches_location(&self, record: &Record) -> bool {
        let location = record.location();
        self.locations.iter().any(|l| location.contains(l.as_str()))
    }

    /// Retain relevant records, preserving order.
    pub fn filter(&self, snapshot: &Snapshot) -> Snapshot {
        snapshot
            .iter()
            .filter(|r| self.is_relevant(r))
            .cloned()
            .collect()
    }
}

/// Great-circle distance in kilometers, unrounded.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// 2-decimal rounding for display. Never used for threshold checks.
pub fn rounded_km(distance: f64) -> f64 {
    (distance * 100.0).round() / 100.0
}

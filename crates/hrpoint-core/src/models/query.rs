use crate::models::point::{LonLat, RiskPoint};
use serde::{Deserialize, Serialize};

/// Arguments of a nearby search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyQuery {
    /// Reference coordinate used only for the reported distance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locpoint: Option<LonLat>,

    /// Search anchor ("gravity point")
    pub grvpoint: LonLat,

    /// Search radius in fractional degrees
    pub delta: f64,
}

impl NearbyQuery {
    pub fn new(grvpoint: LonLat, delta: f64) -> Self {
        Self { locpoint: None, grvpoint, delta }
    }

    pub fn with_locpoint(mut self, locpoint: LonLat) -> Self {
        self.locpoint = Some(locpoint);
        self
    }
}

/// One enriched nearby-search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyPoint {
    /// Insertion time relative to now, e.g. "3 hours ago"
    pub time: String,
    pub title: String,
    pub locpoint: LonLat,
    pub radius: i64,
    pub risk: i64,
    /// Kilometers from the query's `locpoint`; null without one
    pub distance: Option<String>,
}

/// Risk zone containing a queried location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearMatch {
    pub point: RiskPoint,
    /// Meters between the queried location and the zone center
    pub distance_m: f64,
}

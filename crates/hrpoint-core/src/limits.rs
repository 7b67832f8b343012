//! Bounds applied to risk points and proximity queries.

use crate::error::{HrPointError, Result};
use serde::{Deserialize, Serialize};

pub const HRPOINT_RADIUS_MIN: i64 = 10;
pub const HRPOINT_RADIUS_MAX: i64 = 50_000;
pub const HRPOINT_RISK_MIN: i64 = 1;
pub const HRPOINT_RISK_MAX: i64 = 10;
pub const HRPOINT_ADD_BATCH_MIN: usize = 1;
pub const HRPOINT_ADD_BATCH_MAX: usize = 1000;
pub const HRPOINT_NEARBY_MAX_POINTS: usize = 100;
/// Kilometers; nearby distances up to this value keep two decimals
pub const HRPOINT_MAX_DISTANCE_KM: f64 = 10.0;
pub const MEDIUM_STRING_MAX_LEN: usize = 128;
/// Degrees
pub const DELTA_MAX: f64 = 1.0;

/// Configurable limits.
///
/// Every field is optional when deserialized; missing fields take the
/// `HRPOINT_*` defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub radius_min: i64,
    pub radius_max: i64,
    pub risk_min: i64,
    pub risk_max: i64,
    pub add_batch_min: usize,
    pub add_batch_max: usize,
    pub near_by_max_points: usize,
    pub max_distance_km: f64,
    pub title_max_len: usize,
    pub delta_max: f64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            radius_min: HRPOINT_RADIUS_MIN,
            radius_max: HRPOINT_RADIUS_MAX,
            risk_min: HRPOINT_RISK_MIN,
            risk_max: HRPOINT_RISK_MAX,
            add_batch_min: HRPOINT_ADD_BATCH_MIN,
            add_batch_max: HRPOINT_ADD_BATCH_MAX,
            near_by_max_points: HRPOINT_NEARBY_MAX_POINTS,
            max_distance_km: HRPOINT_MAX_DISTANCE_KM,
            title_max_len: MEDIUM_STRING_MAX_LEN,
            delta_max: DELTA_MAX,
        }
    }
}

impl Limits {
    /// Reject limit sets that no record or query could satisfy
    pub fn validate(&self) -> Result<()> {
        if self.radius_min < 0 || self.radius_min > self.radius_max {
            return Err(invalid("radius", "radius_min must be >= 0 and <= radius_max"));
        }
        if self.risk_min > self.risk_max {
            return Err(invalid("risk", "risk_min must be <= risk_max"));
        }
        if self.add_batch_min == 0 || self.add_batch_min > self.add_batch_max {
            return Err(invalid(
                "add_batch",
                "add_batch_min must be >= 1 and <= add_batch_max",
            ));
        }
        if self.near_by_max_points == 0 {
            return Err(invalid("near_by_max_points", "must be at least 1"));
        }
        if !(self.max_distance_km.is_finite() && self.max_distance_km > 0.0) {
            return Err(invalid("max_distance_km", "must be a positive number"));
        }
        if self.title_max_len == 0 {
            return Err(invalid("title_max_len", "must be at least 1"));
        }
        if !(self.delta_max.is_finite() && self.delta_max > 0.0) {
            return Err(invalid("delta_max", "must be a positive number"));
        }
        Ok(())
    }
}

fn invalid(key: &str, reason: &str) -> HrPointError {
    HrPointError::ConfigInvalid { key: format!("limits.{}", key), reason: reason.to_string() }
}

//! Risk point documents and batch-insert records.

use crate::error::{HrPointError, Result};
use geojson::{feature::Id, Feature, JsonObject};
use serde::{Deserialize, Serialize};

/// Coordinate pair in `[longitude, latitude]` order
pub type LonLat = [f64; 2];

/// Store-assigned risk point identifier
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct RiskPointId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GeoPointKind {
    #[default]
    Point,
}

/// GeoJSON point, `{"type": "Point", "coordinates": [lon, lat]}`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "type")]
    pub kind: GeoPointKind,
    pub coordinates: LonLat,
}

impl GeoPoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { kind: GeoPointKind::Point, coordinates: [lon, lat] }
    }

    pub fn lon(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn lat(&self) -> f64 {
        self.coordinates[1]
    }

    pub fn to_geo(&self) -> geo::Point<f64> {
        geo::Point::new(self.lon(), self.lat())
    }
}

impl From<LonLat> for GeoPoint {
    fn from(coordinates: LonLat) -> Self {
        Self::new(coordinates[0], coordinates[1])
    }
}

/// A persisted danger zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskPoint {
    pub id: RiskPointId,
    /// Unix timestamp (seconds) of insertion
    pub inserted_time: i64,
    pub title: String,
    pub location: GeoPoint,
    /// Zone radius in meters
    pub radius: i64,
    pub risk: i64,
}

impl RiskPoint {
    pub fn locpoint(&self) -> LonLat {
        self.location.coordinates
    }

    /// Render as a GeoJSON feature with the zone attributes as properties
    pub fn to_feature(&self) -> Feature {
        let mut properties = JsonObject::new();
        properties.insert("title".to_string(), self.title.clone().into());
        properties.insert("radius".to_string(), self.radius.into());
        properties.insert("risk".to_string(), self.risk.into());
        properties.insert("inserted_time".to_string(), self.inserted_time.into());

        Feature {
            bbox: None,
            geometry: Some(geojson::Geometry::new(geojson::Value::Point(vec![
                self.location.lon(),
                self.location.lat(),
            ]))),
            id: Some(Id::Number(self.id.0.into())),
            properties: Some(properties),
            foreign_members: None,
        }
    }
}

/// One record of a batch insert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRiskPoint {
    pub title: String,
    pub locpoint: LonLat,
    pub radius: i64,
    pub risk: i64,
}

impl NewRiskPoint {
    pub fn new(title: impl Into<String>, locpoint: LonLat, radius: i64, risk: i64) -> Self {
        Self { title: title.into(), locpoint, radius, risk }
    }

    /// Copy with surrounding whitespace removed from the title
    pub fn normalized(&self) -> Self {
        Self { title: self.title.trim().to_string(), ..self.clone() }
    }

    /// Document ready for insertion, stamped with `inserted_time`
    pub fn into_draft(self, inserted_time: i64) -> RiskPointDraft {
        RiskPointDraft {
            inserted_time,
            title: self.title,
            location: GeoPoint::from(self.locpoint),
            radius: self.radius,
            risk: self.risk,
        }
    }
}

/// Risk point document before the store assigns its id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskPointDraft {
    pub inserted_time: i64,
    pub title: String,
    pub location: GeoPoint,
    pub radius: i64,
    pub risk: i64,
}

impl RiskPointDraft {
    pub fn into_risk_point(self, id: RiskPointId) -> RiskPoint {
        RiskPoint {
            id,
            inserted_time: self.inserted_time,
            title: self.title,
            location: self.location,
            radius: self.radius,
            risk: self.risk,
        }
    }
}

/// JSON array of new risk points
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchInsertRequest {
    pub points: Vec<NewRiskPoint>,
}

impl BatchInsertRequest {
    pub fn new(points: Vec<NewRiskPoint>) -> Self {
        Self { points }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| HrPointError::Serialization(e.to_string()))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

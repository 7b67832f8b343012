use async_trait::async_trait;
use hrpoint_core::limits::Limits;
use hrpoint_core::models::{LonLat, RiskPoint, RiskPointDraft, RiskPointId};
use hrpoint_core::PersistenceError;
use serde::{Deserialize, Serialize};

pub type EngineResult<T> = std::result::Result<T, PersistenceError>;

/// Kind of index declared on a collection field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexKind {
    /// Geographic index over points on a sphere
    Sphere2d,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSpec {
    pub field: String,
    pub kind: IndexKind,
}

impl IndexSpec {
    pub fn sphere_2d(field: impl Into<String>) -> Self {
        Self { field: field.into(), kind: IndexKind::Sphere2d }
    }
}

/// Constraints the engine enforces on every inserted document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionSchema {
    pub title_max_len: usize,
    pub radius_min: i64,
    pub radius_max: i64,
    pub risk_min: i64,
    pub risk_max: i64,
}

impl CollectionSchema {
    pub fn from_limits(limits: &Limits) -> Self {
        Self {
            title_max_len: limits.title_max_len,
            radius_min: limits.radius_min,
            radius_max: limits.radius_max,
            risk_min: limits.risk_min,
            risk_max: limits.risk_max,
        }
    }

    /// Describe the first constraint the document breaks
    pub fn check(&self, doc: &RiskPointDraft) -> Option<String> {
        if doc.title.is_empty() || doc.title.chars().count() > self.title_max_len {
            return Some(format!("title length must be 1..={}", self.title_max_len));
        }
        let [lon, lat] = doc.location.coordinates;
        if !(lon.is_finite() && lat.is_finite())
            || !(-180.0..=180.0).contains(&lon)
            || !(-90.0..=90.0).contains(&lat)
        {
            return Some(format!("location [{}, {}] is not a valid [lon, lat] point", lon, lat));
        }
        if doc.radius < self.radius_min || doc.radius > self.radius_max {
            return Some(format!(
                "radius {} outside {}..={}",
                doc.radius, self.radius_min, self.radius_max
            ));
        }
        if doc.risk < self.risk_min || doc.risk > self.risk_max {
            return Some(format!("risk {} outside {}..={}", doc.risk, self.risk_min, self.risk_max));
        }
        None
    }
}

/// Everything needed to create a collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionSpec {
    pub name: String,
    pub schema: CollectionSchema,
    pub indexes: Vec<IndexSpec>,
}

/// Nearest-first spatial query
#[derive(Debug, Clone, PartialEq)]
pub struct GeoNearQuery {
    /// Anchor in `[lon, lat]` order
    pub near: LonLat,
    /// Meters; unbounded when `None`
    pub max_distance_m: Option<f64>,
    pub limit: usize,
    /// Applied to the meter distance reported in each hit
    pub distance_multiplier: f64,
}

impl GeoNearQuery {
    pub fn new(near: LonLat) -> Self {
        Self { near, max_distance_m: None, limit: usize::MAX, distance_multiplier: 1.0 }
    }

    pub fn with_max_distance(mut self, meters: f64) -> Self {
        self.max_distance_m = Some(meters);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_distance_multiplier(mut self, multiplier: f64) -> Self {
        self.distance_multiplier = multiplier;
        self
    }
}

/// A document with its computed distance from the query anchor
#[derive(Debug, Clone, PartialEq)]
pub struct GeoNearHit {
    pub point: RiskPoint,
    pub distance: f64,
}

/// Transactional session handed out by an engine
#[async_trait]
pub trait Session: Send + Sync {
    /// Keep every write made through this session
    async fn commit(self) -> EngineResult<()>;

    /// Revert every write made through this session
    async fn abort(self) -> EngineResult<()>;
}

/// Port for the persistence engine backing the risk point collection
#[async_trait]
pub trait SpatialEngine: Send + Sync {
    type Session: Session;

    /// Start a transactional session
    async fn start_session(&self) -> EngineResult<Self::Session>;

    async fn collection_exists(&self, name: &str) -> EngineResult<bool>;

    /// Create a collection; fails with `CollectionExists` if it is already there
    async fn create_collection(&self, spec: &CollectionSpec) -> EngineResult<()>;

    /// Create the index unless present; returns whether it was created
    async fn ensure_index(&self, collection: &str, index: &IndexSpec) -> EngineResult<bool>;

    async fn list_indexes(&self, collection: &str) -> EngineResult<Vec<IndexSpec>>;

    /// Replace the collection schema; returns whether it changed.
    /// Stored documents are not re-checked.
    async fn update_schema(&self, collection: &str, schema: &CollectionSchema)
        -> EngineResult<bool>;

    /// Insert all documents or none
    async fn insert_many(
        &self,
        collection: &str,
        docs: Vec<RiskPointDraft>,
        session: Option<&Self::Session>,
    ) -> EngineResult<Vec<RiskPointId>>;

    /// Delete every document; returns how many were removed
    async fn delete_all(
        &self,
        collection: &str,
        session: Option<&Self::Session>,
    ) -> EngineResult<u64>;

    /// Documents ordered by distance from `query.near`, nearest first
    async fn geo_near(&self, collection: &str, query: &GeoNearQuery)
        -> EngineResult<Vec<GeoNearHit>>;

    /// All documents in insertion order
    async fn find_all(&self, collection: &str) -> EngineResult<Vec<RiskPoint>>;
}

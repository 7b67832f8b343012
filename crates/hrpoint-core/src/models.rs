pub mod point;
pub mod query;

pub use point::{
    BatchInsertRequest, GeoPoint, GeoPointKind, LonLat, NewRiskPoint, RiskPoint, RiskPointDraft,
    RiskPointId,
};
pub use query::{NearMatch, NearbyPoint, NearbyQuery};

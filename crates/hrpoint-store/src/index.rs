//! 2D-sphere index over risk point locations.
//!
//! Locations are indexed as unit vectors on the sphere. Euclidean (chord)
//! distance between unit vectors grows monotonically with great-circle
//! distance, so a chord-radius lookup in the R-tree finds exactly the
//! candidates within a surface distance.

use hrpoint_core::distance::{haversine_distance_m, EARTH_RADIUS_M};
use hrpoint_core::models::{LonLat, RiskPointId};
use rstar::{PointDistance, RTree, RTreeObject, AABB};

/// Indexed location with its document id
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedLocation {
    pub id: RiskPointId,
    pub lonlat: LonLat,
    position: [f64; 3],
}

impl IndexedLocation {
    pub fn new(id: RiskPointId, lonlat: LonLat) -> Self {
        Self { id, lonlat, position: to_unit_vector(lonlat) }
    }
}

impl RTreeObject for IndexedLocation {
    type Envelope = AABB<[f64; 3]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

impl PointDistance for IndexedLocation {
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        let dx = self.position[0] - point[0];
        let dy = self.position[1] - point[1];
        let dz = self.position[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

/// Slack added to the candidate radius; the exact cut uses great-circle distance
const CHORD_EPSILON: f64 = 1e-9;

/// Squared chord length on the unit sphere for a surface distance in meters
fn chord_2(meters: f64) -> f64 {
    let angle = (meters / EARTH_RADIUS_M).min(std::f64::consts::PI);
    let chord = 2.0 * (angle / 2.0).sin();
    chord * chord
}

/// Map `[lon, lat]` degrees onto the unit sphere
fn to_unit_vector(lonlat: LonLat) -> [f64; 3] {
    let lon = lonlat[0].to_radians();
    let lat = lonlat[1].to_radians();
    [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
}

/// Spatial index answering nearest-first queries on the sphere
#[derive(Clone, Default)]
pub struct SphereIndex {
    tree: RTree<IndexedLocation>,
}

impl std::fmt::Debug for SphereIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SphereIndex").field("len", &self.len()).finish()
    }
}

impl SphereIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from existing locations
    pub fn from_locations(locations: impl IntoIterator<Item = (RiskPointId, LonLat)>) -> Self {
        let indexed: Vec<IndexedLocation> = locations
            .into_iter()
            .map(|(id, lonlat)| IndexedLocation::new(id, lonlat))
            .collect();

        Self { tree: RTree::bulk_load(indexed) }
    }

    pub fn insert(&mut self, id: RiskPointId, lonlat: LonLat) {
        self.tree.insert(IndexedLocation::new(id, lonlat));
    }

    /// Ids with their great-circle distance in meters, nearest first,
    /// limited to `max_distance_m`
    pub fn nearest_within(
        &self,
        near: LonLat,
        max_distance_m: Option<f64>,
    ) -> Vec<(RiskPointId, f64)> {
        let max = max_distance_m.unwrap_or(f64::INFINITY);
        let center = to_unit_vector(near);

        let mut hits: Vec<(RiskPointId, f64)> = self
            .tree
            .locate_within_distance(center, chord_2(max) + CHORD_EPSILON)
            .map(|indexed| (indexed.id, haversine_distance_m(near, indexed.lonlat)))
            .filter(|(_, distance)| *distance <= max)
            .collect();

        hits.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        hits
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    pub fn clear(&mut self) {
        self.tree = RTree::new();
    }
}

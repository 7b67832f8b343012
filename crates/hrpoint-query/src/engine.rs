use chrono::{DateTime, Utc};
use hrpoint_core::distance::{delta_to_meters, haversine_distance_km};
use hrpoint_core::error::Result;
use hrpoint_core::limits::Limits;
use hrpoint_core::locale::Locale;
use hrpoint_core::models::{NearbyPoint, NearbyQuery};
use hrpoint_core::time::relative_from_unix;
use hrpoint_core::validation::GeoPointValidator;
use hrpoint_store::ports::{GeoNearHit, GeoNearQuery, SpatialEngine};
use hrpoint_store::RISK_POINT_COLLECTION;
use std::sync::Arc;

use crate::format::format_distance_km;

/// Converts engine meters to the kilometers reported by nearby search
const KM_MULTIPLIER: f64 = 0.001;

/// Nearby search around a gravity point
pub struct ProximityQueryEngine<E: SpatialEngine> {
    engine: Arc<E>,
    validator: GeoPointValidator,
}

impl<E: SpatialEngine> ProximityQueryEngine<E> {
    pub fn new(engine: Arc<E>, limits: Limits, locale: Locale) -> Self {
        Self { engine, validator: GeoPointValidator::new(limits, locale) }
    }

    /// Run a nearby search relative to the current time
    pub async fn get_near_points(&self, query: &NearbyQuery) -> Result<Vec<NearbyPoint>> {
        self.get_near_points_at(query, Utc::now()).await
    }

    /// Run a nearby search, rendering insertion times relative to `now`
    pub async fn get_near_points_at(
        &self,
        query: &NearbyQuery,
        now: DateTime<Utc>,
    ) -> Result<Vec<NearbyPoint>> {
        self.validator.validate_nearby_query(query)?;
        let limits = self.validator.limits();

        let geo_query = GeoNearQuery::new(query.grvpoint)
            .with_max_distance(delta_to_meters(query.delta))
            .with_limit(limits.near_by_max_points)
            .with_distance_multiplier(KM_MULTIPLIER);
        tracing::debug!("geo_near {:?}", geo_query);

        let hits = self.engine.geo_near(RISK_POINT_COLLECTION, &geo_query).await?;
        tracing::debug!("Nearby search returned {} points", hits.len());

        Ok(hits.into_iter().map(|hit| self.enrich(hit, query, now)).collect())
    }

    fn enrich(&self, hit: GeoNearHit, query: &NearbyQuery, now: DateTime<Utc>) -> NearbyPoint {
        let point = hit.point;
        let distance = query.locpoint.map(|locpoint| {
            let km = haversine_distance_km(locpoint, point.locpoint());
            format_distance_km(km, self.validator.limits().max_distance_km)
        });

        NearbyPoint {
            time: relative_from_unix(point.inserted_time, now),
            locpoint: point.locpoint(),
            title: point.title,
            radius: point.radius,
            risk: point.risk,
            distance,
        }
    }
}

//! Risk point store: batch insert, truncate, and zone lookup.

use hrpoint_core::error::Result;
use hrpoint_core::limits::Limits;
use hrpoint_core::locale::Locale;
use hrpoint_core::models::{LonLat, NearMatch, NewRiskPoint, RiskPoint, RiskPointId};
use hrpoint_core::time::unix_now;
use hrpoint_core::validation::{GeoPointValidator, PointRef};
use std::sync::Arc;

use crate::lifecycle::RISK_POINT_COLLECTION;
use crate::ports::{GeoNearQuery, SpatialEngine};

/// Sole writer of the risk point collection
pub struct RiskPointStore<E: SpatialEngine> {
    engine: Arc<E>,
    validator: GeoPointValidator,
}

impl<E: SpatialEngine> Clone for RiskPointStore<E> {
    fn clone(&self) -> Self {
        Self { engine: Arc::clone(&self.engine), validator: self.validator.clone() }
    }
}

impl<E: SpatialEngine> RiskPointStore<E> {
    pub fn new(engine: Arc<E>, limits: Limits, locale: Locale) -> Self {
        Self { engine, validator: GeoPointValidator::new(limits, locale) }
    }

    pub fn engine(&self) -> &Arc<E> {
        &self.engine
    }

    pub fn limits(&self) -> &Limits {
        self.validator.limits()
    }

    /// Validate and insert a batch.
    ///
    /// With `preserve_existing = false` the collection is truncated first,
    /// inside `session` when one is given. Nothing is written if validation
    /// or the truncate fails.
    pub async fn add_batch(
        &self,
        records: &[NewRiskPoint],
        preserve_existing: bool,
        session: Option<&E::Session>,
    ) -> Result<Vec<RiskPointId>> {
        let records: Vec<NewRiskPoint> = records.iter().map(NewRiskPoint::normalized).collect();
        self.validator.validate_batch(&records)?;

        if !preserve_existing {
            self.truncate(session).await?;
        }

        let inserted_time = unix_now();
        let drafts = records.into_iter().map(|r| r.into_draft(inserted_time)).collect();
        let ids = self.engine.insert_many(RISK_POINT_COLLECTION, drafts, session).await?;

        tracing::info!(
            "Inserted {} risk points (preserve_existing={})",
            ids.len(),
            preserve_existing
        );
        Ok(ids)
    }

    /// Delete every risk point; returns how many were removed
    pub async fn truncate(&self, session: Option<&E::Session>) -> Result<u64> {
        let removed = self.engine.delete_all(RISK_POINT_COLLECTION, session).await?;
        tracing::info!("Truncated {} risk points", removed);
        Ok(removed)
    }

    /// Find the risk zone containing `locpoint`.
    ///
    /// Only the nearest point within the maximum radius is considered; it
    /// matches when `locpoint` lies inside its own radius.
    pub async fn get_near_point(&self, locpoint: LonLat) -> Result<Option<NearMatch>> {
        self.validator.validate_locpoint(&locpoint, PointRef::LocationPoint)?;

        let query = GeoNearQuery::new(locpoint)
            .with_max_distance(self.limits().radius_max as f64)
            .with_limit(1);
        tracing::debug!("geo_near {:?}", query);

        let hit = self.engine.geo_near(RISK_POINT_COLLECTION, &query).await?.into_iter().next();

        Ok(hit.and_then(|hit| {
            (hit.distance <= hit.point.radius as f64)
                .then(|| NearMatch { point: hit.point, distance_m: hit.distance })
        }))
    }

    /// Every stored risk point in insertion order
    pub async fn all_points(&self) -> Result<Vec<RiskPoint>> {
        Ok(self.engine.find_all(RISK_POINT_COLLECTION).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::initialize;
    use crate::memory::MemorySpatialEngine;
    use crate::ports::Session;
    use hrpoint_core::validation::Violation;
    use hrpoint_core::{HrPointError, PersistenceError};

    async fn store() -> RiskPointStore<MemorySpatialEngine> {
        let engine = Arc::new(MemorySpatialEngine::new());
        initialize(engine.as_ref(), &Limits::default()).await.unwrap();
        RiskPointStore::new(engine, Limits::default(), Locale::En)
    }

    fn sample_batch() -> Vec<NewRiskPoint> {
        vec![
            NewRiskPoint::new("USP University", [-47.898274, -22.002302], 5000, 10),
            NewRiskPoint::new("Pereire Lopes", [-47.900327, -22.002320], 1000, 5),
            NewRiskPoint::new("Parque do Kartódromo", [-47.898825, -21.998878], 2000, 10),
        ]
    }

    #[tokio::test]
    async fn test_add_batch_and_read_back() {
        let store = store().await;
        let ids = store.add_batch(&sample_batch(), true, None).await.unwrap();
        assert_eq!(ids.len(), 3);

        let points = store.all_points().await.unwrap();
        assert_eq!(points[0].locpoint(), [-47.898274, -22.002302]);
        assert_eq!(points[2].title, "Parque do Kartódromo");
    }

    #[tokio::test]
    async fn test_invalid_batch_leaves_collection_unchanged() {
        let store = store().await;
        store.add_batch(&sample_batch(), true, None).await.unwrap();

        let mut batch = sample_batch();
        batch[1].risk = 99;
        let err = store.add_batch(&batch, false, None).await.unwrap_err();

        match err {
            HrPointError::WrongDataFormat(e) => {
                assert!(matches!(e.violation, Violation::Risk { index: 1, .. }))
            }
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(store.all_points().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_replace_vs_preserve() {
        let store = store().await;
        store.add_batch(&sample_batch(), true, None).await.unwrap();

        let extra = vec![NewRiskPoint::new("Extra", [-47.89, -21.99], 500, 2)];
        store.add_batch(&extra, true, None).await.unwrap();
        assert_eq!(store.all_points().await.unwrap().len(), 4);

        store.add_batch(&extra, false, None).await.unwrap();
        let points = store.all_points().await.unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].title, "Extra");
    }

    #[tokio::test]
    async fn test_replace_inside_aborted_session_keeps_old_points() {
        let store = store().await;
        store.add_batch(&sample_batch(), true, None).await.unwrap();

        let session = store.engine().start_session().await.unwrap();
        let extra = vec![NewRiskPoint::new("Extra", [-47.89, -21.99], 500, 2)];
        store.add_batch(&extra, false, Some(&session)).await.unwrap();
        session.abort().await.unwrap();

        assert_eq!(store.all_points().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_titles_are_trimmed() {
        let store = store().await;
        let batch = vec![NewRiskPoint::new("  Padded  ", [1.0, 1.0], 100, 1)];
        store.add_batch(&batch, true, None).await.unwrap();
        assert_eq!(store.all_points().await.unwrap()[0].title, "Padded");
    }

    #[tokio::test]
    async fn test_get_near_point_inside_zone() {
        let store = store().await;
        let batch = vec![NewRiskPoint::new("A", [-47.8982, -22.0023], 5000, 10)];
        store.add_batch(&batch, false, None).await.unwrap();

        let found = store.get_near_point([-47.8982, -22.0023]).await.unwrap().unwrap();
        assert_eq!(found.point.title, "A");
        assert_eq!(found.distance_m, 0.0);
    }

    #[tokio::test]
    async fn test_get_near_point_outside_radius_is_none() {
        let store = store().await;
        let batch = vec![NewRiskPoint::new("Small", [0.0, 0.0], 100, 1)];
        store.add_batch(&batch, false, None).await.unwrap();

        // ~1.1 km away, zone radius is 100 m
        assert!(store.get_near_point([0.01, 0.0]).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_near_point_only_checks_nearest() {
        let store = store().await;
        let batch = vec![
            NewRiskPoint::new("Small", [0.0, 0.0], 100, 1),
            NewRiskPoint::new("Large", [0.02, 0.0], 50_000, 1),
        ];
        store.add_batch(&batch, false, None).await.unwrap();

        // Nearest is "Small" and does not contain the point; "Large" would
        assert!(store.get_near_point([0.005, 0.0]).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_near_point_validates_input() {
        let store = store().await;
        let err = store.get_near_point([0.0, 95.0]).await.unwrap_err();
        assert!(err.is_wrong_data_format());
    }

    #[tokio::test]
    async fn test_failed_truncate_aborts_insert() {
        let store = store().await;
        store.add_batch(&sample_batch(), true, None).await.unwrap();

        let other = MemorySpatialEngine::new();
        let foreign = other.start_session().await.unwrap();
        let extra = vec![NewRiskPoint::new("Extra", [-47.89, -21.99], 500, 2)];
        let err = store.add_batch(&extra, false, Some(&foreign)).await.unwrap_err();

        assert!(matches!(err, HrPointError::Persistence(PersistenceError::SessionFailed(_))));
        let titles: Vec<_> = store.all_points().await.unwrap().into_iter().map(|p| p.title).collect();
        assert_eq!(titles, vec!["USP University", "Pereire Lopes", "Parque do Kartódromo"]);
    }

    #[tokio::test]
    async fn test_operations_before_initialize_fail_with_persistence_error() {
        let store = RiskPointStore::new(
            Arc::new(MemorySpatialEngine::new()),
            Limits::default(),
            Locale::En,
        );
        let err = store.truncate(None).await.unwrap_err();
        assert!(matches!(err, HrPointError::Persistence(_)));
    }
}

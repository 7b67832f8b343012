//! Nearby search over a populated in-memory engine

use chrono::{Duration, Utc};
use hrpoint_core::distance::{delta_to_meters, haversine_distance_m};
use hrpoint_core::limits::Limits;
use hrpoint_core::models::{NearbyQuery, NewRiskPoint};
use hrpoint_core::Locale;
use hrpoint_query::ProximityQueryEngine;
use hrpoint_store::{initialize, MemorySpatialEngine, RiskPointStore};
use proptest::prelude::*;
use std::sync::Arc;

async fn populated(
    batch: &[NewRiskPoint],
    limits: Limits,
) -> ProximityQueryEngine<MemorySpatialEngine> {
    let engine = Arc::new(MemorySpatialEngine::new());
    initialize(engine.as_ref(), &limits).await.unwrap();
    RiskPointStore::new(Arc::clone(&engine), limits.clone(), Locale::En)
        .add_batch(batch, true, None)
        .await
        .unwrap();
    ProximityQueryEngine::new(engine, limits, Locale::En)
}

fn sao_carlos_batch() -> Vec<NewRiskPoint> {
    vec![
        NewRiskPoint::new("USP University", [-47.898274, -22.002302], 5000, 10),
        NewRiskPoint::new("Pereire Lopes", [-47.900327, -22.002320], 1000, 5),
        NewRiskPoint::new("Parque do Kartódromo", [-47.898825, -21.998878], 2000, 10),
        NewRiskPoint::new("Cemitério Nossa Senhora do Carmo", [-47.890929, -21.998400], 1000, 10),
        NewRiskPoint::new("Praça Geraldo Eugenio T. Pizza", [-47.894427, -21.999275], 1000, 10),
    ]
}

#[tokio::test]
async fn test_campus_neighbourhood() {
    let engine = populated(&sao_carlos_batch(), Limits::default()).await;
    let query = NearbyQuery::new([-47.898274, -22.002302], 0.01).with_locpoint([-47.898274, -22.002302]);

    let results = engine.get_near_points(&query).await.unwrap();
    assert_eq!(results.len(), 5);
    assert_eq!(results[0].title, "USP University");
    assert_eq!(results[0].distance.as_deref(), Some("0"));
    for result in &results[1..] {
        let distance = result.distance.as_deref().unwrap();
        assert_eq!(distance.split('.').nth(1).map(str::len), Some(2), "got {}", distance);
    }
}

#[tokio::test]
async fn test_empty_collection_returns_nothing() {
    let storage = Arc::new(MemorySpatialEngine::new());
    initialize(storage.as_ref(), &Limits::default()).await.unwrap();
    let engine = ProximityQueryEngine::new(storage, Limits::default(), Locale::En);
    let results = engine.get_near_points(&NearbyQuery::new([0.0, 0.0], 1.0)).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_time_is_relative_to_given_instant() {
    let engine = populated(&sao_carlos_batch(), Limits::default()).await;
    let later = Utc::now() + Duration::hours(3);

    let results = engine
        .get_near_points_at(&NearbyQuery::new([-47.898274, -22.002302], 0.01), later)
        .await
        .unwrap();
    assert!(results.iter().all(|r| r.time == "3 hours ago"));
}

#[tokio::test]
async fn test_oversized_delta_is_rejected() {
    let engine = populated(&sao_carlos_batch(), Limits::default()).await;
    let err = engine.get_near_points(&NearbyQuery::new([0.0, 0.0], 5.0)).await.unwrap_err();
    assert!(err.is_wrong_data_format());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_results_are_bounded_and_ordered(
        points in prop::collection::vec((-0.5f64..0.5, -0.5f64..0.5), 1..60),
        grv in (-0.5f64..0.5, -0.5f64..0.5),
        delta in 0.01f64..1.0,
        max_points in 1usize..20,
    ) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async {
            let batch: Vec<_> = points
                .iter()
                .enumerate()
                .map(|(i, (lon, lat))| NewRiskPoint::new(format!("Z{}", i), [*lon, *lat], 100, 1))
                .collect();
            let limits = Limits { near_by_max_points: max_points, ..Limits::default() };
            let engine = populated(&batch, limits).await;

            let grv = [grv.0, grv.1];
            let results = engine.get_near_points(&NearbyQuery::new(grv, delta)).await.unwrap();

            let in_range = batch
                .iter()
                .filter(|p| haversine_distance_m(grv, p.locpoint) <= delta_to_meters(delta))
                .count();
            assert!(results.len() <= max_points);
            assert_eq!(results.len(), in_range.min(max_points));

            let distances: Vec<f64> =
                results.iter().map(|r| haversine_distance_m(grv, r.locpoint)).collect();
            assert!(distances.windows(2).all(|w| w[0] <= w[1]));
            assert!(distances.iter().all(|d| *d <= delta_to_meters(delta)));
        });
    }
}

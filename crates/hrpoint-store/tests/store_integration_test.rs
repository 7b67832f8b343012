//! Integration tests for the risk point store over the in-memory engine

use hrpoint_core::limits::Limits;
use hrpoint_core::models::NewRiskPoint;
use hrpoint_core::{HrPointError, Locale};
use hrpoint_store::{initialize, MemorySpatialEngine, RiskPointStore, Session, SpatialEngine};
use proptest::prelude::*;
use std::sync::Arc;

async fn new_store() -> RiskPointStore<MemorySpatialEngine> {
    let engine = Arc::new(MemorySpatialEngine::new());
    initialize(engine.as_ref(), &Limits::default()).await.unwrap();
    RiskPointStore::new(engine, Limits::default(), Locale::En)
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
async fn test_single_point_example() {
    let store = new_store().await;
    let batch = vec![NewRiskPoint::new("A", [-47.8982, -22.0023], 5000, 10)];
    store.add_batch(&batch, false, None).await.unwrap();

    let found = store.get_near_point([-47.8982, -22.0023]).await.unwrap();
    assert_eq!(found.map(|m| m.point.title), Some("A".to_string()));
}

#[tokio::test]
async fn test_batch_of_max_size_accepted() {
    let store = new_store().await;
    let batch: Vec<_> = (0..1000)
        .map(|i| NewRiskPoint::new(format!("P{}", i), [i as f64 / 10.0, 0.0], 100, 1))
        .collect();
    store.add_batch(&batch, true, None).await.unwrap();
    assert_eq!(store.all_points().await.unwrap().len(), 1000);

    let too_many: Vec<_> = batch.iter().cloned().chain(batch.iter().take(1).cloned()).collect();
    let err = store.add_batch(&too_many, true, None).await.unwrap_err();
    assert!(err.is_wrong_data_format());
    assert_eq!(store.all_points().await.unwrap().len(), 1000);
}

#[tokio::test]
async fn test_nearest_zone_chosen_among_overlaps() {
    let store = new_store().await;
    store.add_batch(&sao_carlos_batch(), false, None).await.unwrap();

    // Standing on Pereire Lopes: nearest center, inside its 1 km radius
    let found = store.get_near_point([-47.900327, -22.002320]).await.unwrap().unwrap();
    assert_eq!(found.point.title, "Pereire Lopes");
}

#[tokio::test]
async fn test_nothing_found_far_away() {
    let store = new_store().await;
    store.add_batch(&sao_carlos_batch(), false, None).await.unwrap();

    assert!(store.get_near_point([-46.6333, -23.5505]).await.unwrap().is_none());
}

#[tokio::test]
async fn test_committed_replace_session() {
    let store = new_store().await;
    store.add_batch(&sao_carlos_batch(), false, None).await.unwrap();

    let session = store.engine().start_session().await.unwrap();
    let replacement = vec![NewRiskPoint::new("Only", [10.0, 10.0], 100, 1)];
    store.add_batch(&replacement, false, Some(&session)).await.unwrap();
    session.commit().await.unwrap();

    let points = store.all_points().await.unwrap();
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].title, "Only");
}

#[tokio::test]
async fn test_validation_error_is_localized() {
    let engine = Arc::new(MemorySpatialEngine::new());
    initialize(engine.as_ref(), &Limits::default()).await.unwrap();
    let store = RiskPointStore::new(engine, Limits::default(), Locale::PtBr);

    let err = store.add_batch(&[], true, None).await.unwrap_err();
    match err {
        HrPointError::WrongDataFormat(e) => {
            assert!(e.message.starts_with("Formato de dados incorreto"))
        }
        other => panic!("unexpected error: {}", other),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_valid_batches_round_trip(
        coords in prop::collection::vec((-180.0f64..=180.0, -90.0f64..=90.0), 1..40),
        radius in 10i64..=50_000,
        risk in 1i64..=10,
    ) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async {
            let store = new_store().await;
            let batch: Vec<_> = coords
                .iter()
                .enumerate()
                .map(|(i, c)| NewRiskPoint::new(format!("Z{}", i), [c.0, c.1], radius, risk))
                .collect();

            store.add_batch(&batch, true, None).await.unwrap();
            let stored = store.all_points().await.unwrap();

            assert_eq!(stored.len(), batch.len());
            for (new, stored) in batch.iter().zip(stored.iter()) {
                assert_eq!(stored.locpoint(), new.locpoint);
            }
        });
    }

    #[test]
    fn prop_get_near_point_matches_brute_force(
        zones in prop::collection::vec((-1.0f64..1.0, -1.0f64..1.0, 10i64..=50_000), 1..20),
        probe in (-1.0f64..1.0, -1.0f64..1.0),
    ) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async {
            let store = new_store().await;
            let batch: Vec<_> = zones
                .iter()
                .map(|(lon, lat, radius)| NewRiskPoint::new("Z", [*lon, *lat], *radius, 1))
                .collect();
            store.add_batch(&batch, true, None).await.unwrap();

            let probe = [probe.0, probe.1];
            let nearest = batch
                .iter()
                .map(|p| (p, hrpoint_core::distance::haversine_distance_m(probe, p.locpoint)))
                .filter(|(_, d)| *d <= 50_000.0)
                .min_by(|a, b| a.1.total_cmp(&b.1));
            let expected = nearest.filter(|(p, d)| *d <= p.radius as f64).map(|(p, _)| p.locpoint);

            let found = store.get_near_point(probe).await.unwrap().map(|m| m.point.locpoint());
            assert_eq!(found, expected);
        });
    }
}

//! Startup registration of the risk point collection.

use hrpoint_core::error::Result;
use hrpoint_core::limits::Limits;
use hrpoint_core::PersistenceError;

use crate::ports::{CollectionSchema, CollectionSpec, IndexSpec, SpatialEngine};

pub const RISK_POINT_COLLECTION: &str = "doc_hrpoint";
pub const LOCATION_FIELD: &str = "location";

/// What `initialize` had to create
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InitReport {
    pub collection_created: bool,
    pub index_created: bool,
    /// Existing collection had a schema built from different limits
    pub schema_updated: bool,
}

/// Collection definition with its schema and 2D-sphere index on `location`
pub fn risk_point_collection_spec(limits: &Limits) -> CollectionSpec {
    CollectionSpec {
        name: RISK_POINT_COLLECTION.to_string(),
        schema: CollectionSchema::from_limits(limits),
        indexes: vec![IndexSpec::sphere_2d(LOCATION_FIELD)],
    }
}

/// Make sure the collection and its spatial index exist and the schema matches
/// `limits`. Safe to call on every start.
pub async fn initialize<E: SpatialEngine>(engine: &E, limits: &Limits) -> Result<InitReport> {
    let spec = risk_point_collection_spec(limits);
    let mut report = InitReport::default();

    if !engine.collection_exists(&spec.name).await? {
        match engine.create_collection(&spec).await {
            Ok(()) => {
                tracing::info!("Created collection {}", spec.name);
                report.collection_created = true;
            }
            // Created concurrently between the check and the create
            Err(PersistenceError::CollectionExists { .. }) => {}
            Err(e) => return Err(e.into()),
        }
    }

    if !report.collection_created && engine.update_schema(&spec.name, &spec.schema).await? {
        tracing::info!("Updated schema of {} to the configured limits", spec.name);
        report.schema_updated = true;
    }

    for index in &spec.indexes {
        if engine.ensure_index(&spec.name, index).await? {
            tracing::info!("Created {:?} index on {}.{}", index.kind, spec.name, index.field);
            report.index_created = true;
        }
    }

    Ok(report)
}

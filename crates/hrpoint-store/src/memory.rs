//! In-memory spatial engine for development, testing, and the CLI data file.
//!
//! Writes made through a session are applied immediately and recorded in the
//! session's undo log. Aborting (or dropping) the session reverts exactly
//! those writes; writes made by other callers in the meantime are kept.

use async_trait::async_trait;
use hrpoint_core::models::{RiskPoint, RiskPointDraft, RiskPointId};
use hrpoint_core::PersistenceError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;

use crate::index::SphereIndex;
use crate::ports::{
    CollectionSchema, CollectionSpec, EngineResult, GeoNearHit, GeoNearQuery, IndexKind,
    IndexSpec, Session, SpatialEngine,
};

#[derive(Debug, Clone)]
struct MemoryCollection {
    schema: CollectionSchema,
    indexes: Vec<IndexSpec>,
    points: BTreeMap<RiskPointId, RiskPoint>,
    /// Present once a 2D-sphere index is declared
    sphere: Option<SphereIndex>,
}

impl MemoryCollection {
    fn new(spec: &CollectionSpec) -> Self {
        let mut collection = Self {
            schema: spec.schema.clone(),
            indexes: Vec::new(),
            points: BTreeMap::new(),
            sphere: None,
        };
        for index in &spec.indexes {
            collection.add_index(index);
        }
        collection
    }

    fn add_index(&mut self, index: &IndexSpec) -> bool {
        if self.indexes.contains(index) {
            return false;
        }
        match index.kind {
            IndexKind::Sphere2d => {
                self.sphere = Some(SphereIndex::from_locations(
                    self.points.values().map(|p| (p.id, p.locpoint())),
                ));
            }
        }
        self.indexes.push(index.clone());
        true
    }

    fn rebuild_sphere(&mut self) {
        if self.sphere.is_some() {
            self.sphere = Some(SphereIndex::from_locations(
                self.points.values().map(|p| (p.id, p.locpoint())),
            ));
        }
    }
}

#[derive(Debug, Clone, Default)]
struct EngineState {
    collections: BTreeMap<String, MemoryCollection>,
    next_id: u64,
}

impl EngineState {
    fn collection(&self, name: &str) -> EngineResult<&MemoryCollection> {
        self.collections
            .get(name)
            .ok_or_else(|| PersistenceError::CollectionNotFound { name: name.to_string() })
    }

    fn collection_mut(&mut self, name: &str) -> EngineResult<&mut MemoryCollection> {
        self.collections
            .get_mut(name)
            .ok_or_else(|| PersistenceError::CollectionNotFound { name: name.to_string() })
    }
}

/// On-disk form of the engine state
#[derive(Debug, Serialize, Deserialize)]
struct StoredState {
    next_id: u64,
    collections: Vec<StoredCollection>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredCollection {
    name: String,
    schema: CollectionSchema,
    indexes: Vec<IndexSpec>,
    points: Vec<RiskPoint>,
}

/// In-memory implementation of SpatialEngine
#[derive(Debug, Clone, Default)]
pub struct MemorySpatialEngine {
    state: Arc<RwLock<EngineState>>,
}

impl MemorySpatialEngine {
    /// Create an empty engine
    pub fn new() -> Self {
        Self::default()
    }

    /// Load engine state from a JSON data file; a missing file yields an empty engine
    pub async fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("Data file {} not found, starting empty", path.display());
            return Ok(Self::new());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| storage_error(format!("Failed to read {}: {}", path.display(), e)))?;
        let stored: StoredState = serde_json::from_str(&content)
            .map_err(|e| storage_error(format!("Failed to parse {}: {}", path.display(), e)))?;

        let mut state = EngineState { collections: BTreeMap::new(), next_id: stored.next_id };
        for stored_collection in stored.collections {
            let mut collection = MemoryCollection {
                schema: stored_collection.schema,
                indexes: Vec::new(),
                points: stored_collection.points.into_iter().map(|p| (p.id, p)).collect(),
                sphere: None,
            };
            for index in &stored_collection.indexes {
                collection.add_index(index);
            }
            state.collections.insert(stored_collection.name, collection);
        }

        Ok(Self { state: Arc::new(RwLock::new(state)) })
    }

    /// Write engine state to a JSON data file
    pub async fn save(&self, path: impl AsRef<Path>) -> EngineResult<()> {
        let path = path.as_ref();
        let json = {
            let state = self.state.read().await;
            let stored = StoredState {
                next_id: state.next_id,
                collections: state
                    .collections
                    .iter()
                    .map(|(name, c)| StoredCollection {
                        name: name.clone(),
                        schema: c.schema.clone(),
                        indexes: c.indexes.clone(),
                        points: c.points.values().cloned().collect(),
                    })
                    .collect(),
            };
            serde_json::to_string_pretty(&stored)
                .map_err(|e| storage_error(format!("Failed to serialize state: {}", e)))?
        };

        tokio::fs::write(path, json)
            .await
            .map_err(|e| storage_error(format!("Failed to write {}: {}", path.display(), e)))
    }

    fn check_session(&self, session: Option<&MemorySession>) -> EngineResult<()> {
        match session {
            Some(s) if !Arc::ptr_eq(&s.engine.state, &self.state) => Err(
                PersistenceError::SessionFailed("session belongs to another engine".to_string()),
            ),
            _ => Ok(()),
        }
    }
}

fn storage_error(message: String) -> PersistenceError {
    PersistenceError::Storage(message)
}

/// A write made inside a session, with what is needed to revert it
#[derive(Debug)]
enum UndoOp {
    Inserted { collection: String, ids: Vec<RiskPointId> },
    Deleted { collection: String, points: Vec<RiskPoint> },
}

impl UndoOp {
    fn revert(self, state: &mut EngineState) {
        match self {
            UndoOp::Inserted { collection, ids } => {
                if let Some(target) = state.collections.get_mut(&collection) {
                    for id in &ids {
                        target.points.remove(id);
                    }
                    target.rebuild_sphere();
                }
            }
            UndoOp::Deleted { collection, points } => {
                if let Some(target) = state.collections.get_mut(&collection) {
                    target.points.extend(points.into_iter().map(|p| (p.id, p)));
                    target.rebuild_sphere();
                }
            }
        }
    }
}

/// Revert logged writes, newest first
fn revert_all(state: &mut EngineState, ops: Vec<UndoOp>) {
    for op in ops.into_iter().rev() {
        op.revert(state);
    }
}

/// Undo-log session for MemorySpatialEngine
#[derive(Debug)]
pub struct MemorySession {
    undo: Mutex<Vec<UndoOp>>,
    engine: MemorySpatialEngine,
}

impl MemorySession {
    fn record(&self, op: UndoOp) {
        self.undo.lock().unwrap_or_else(|e| e.into_inner()).push(op);
    }

    fn take_undo(&mut self) -> Vec<UndoOp> {
        std::mem::take(self.undo.get_mut().unwrap_or_else(|e| e.into_inner()))
    }
}

#[async_trait]
impl Session for MemorySession {
    async fn commit(mut self) -> EngineResult<()> {
        self.take_undo();
        Ok(())
    }

    async fn abort(mut self) -> EngineResult<()> {
        let ops = self.take_undo();
        if !ops.is_empty() {
            revert_all(&mut *self.engine.state.write().await, ops);
        }
        Ok(())
    }
}

impl Drop for MemorySession {
    /// Roll back a session that was neither committed nor aborted
    fn drop(&mut self) {
        let ops = self.take_undo();
        if ops.is_empty() {
            return;
        }
        if let Ok(mut state) = self.engine.state.try_write() {
            revert_all(&mut state, ops);
            return;
        }

        // Lock is held elsewhere: finish the rollback once it is released
        let state = Arc::clone(&self.engine.state);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    revert_all(&mut *state.write().await, ops);
                });
            }
            Err(_) => tracing::error!(
                "Dropped session could not roll back {} writes: engine busy outside a runtime",
                ops.len()
            ),
        }
    }
}

#[async_trait]
impl SpatialEngine for MemorySpatialEngine {
    type Session = MemorySession;

    async fn start_session(&self) -> EngineResult<MemorySession> {
        Ok(MemorySession { undo: Mutex::new(Vec::new()), engine: self.clone() })
    }

    async fn collection_exists(&self, name: &str) -> EngineResult<bool> {
        Ok(self.state.read().await.collections.contains_key(name))
    }

    async fn create_collection(&self, spec: &CollectionSpec) -> EngineResult<()> {
        let mut state = self.state.write().await;
        if state.collections.contains_key(&spec.name) {
            return Err(PersistenceError::CollectionExists { name: spec.name.clone() });
        }
        state.collections.insert(spec.name.clone(), MemoryCollection::new(spec));
        Ok(())
    }

    async fn ensure_index(&self, collection: &str, index: &IndexSpec) -> EngineResult<bool> {
        let mut state = self.state.write().await;
        Ok(state.collection_mut(collection)?.add_index(index))
    }

    async fn list_indexes(&self, collection: &str) -> EngineResult<Vec<IndexSpec>> {
        let state = self.state.read().await;
        Ok(state.collection(collection)?.indexes.clone())
    }

    async fn update_schema(
        &self,
        collection: &str,
        schema: &CollectionSchema,
    ) -> EngineResult<bool> {
        let mut state = self.state.write().await;
        let target = state.collection_mut(collection)?;
        if target.schema == *schema {
            return Ok(false);
        }
        target.schema = schema.clone();
        Ok(true)
    }

    async fn insert_many(
        &self,
        collection: &str,
        docs: Vec<RiskPointDraft>,
        session: Option<&MemorySession>,
    ) -> EngineResult<Vec<RiskPointId>> {
        self.check_session(session)?;
        let mut state = self.state.write().await;

        let target = state.collection(collection)?;
        for (i, doc) in docs.iter().enumerate() {
            if let Some(reason) = target.schema.check(doc) {
                return Err(PersistenceError::SchemaViolation {
                    collection: collection.to_string(),
                    reason: format!("document {}: {}", i, reason),
                });
            }
        }

        let first_id = state.next_id;
        state.next_id += docs.len() as u64;

        let target = state.collection_mut(collection)?;
        let mut ids = Vec::with_capacity(docs.len());
        for (offset, doc) in docs.into_iter().enumerate() {
            let id = RiskPointId(first_id + offset as u64);
            let point = doc.into_risk_point(id);
            if let Some(sphere) = target.sphere.as_mut() {
                sphere.insert(id, point.locpoint());
            }
            target.points.insert(id, point);
            ids.push(id);
        }

        if let Some(session) = session {
            session.record(UndoOp::Inserted { collection: collection.to_string(), ids: ids.clone() });
        }
        Ok(ids)
    }

    async fn delete_all(
        &self,
        collection: &str,
        session: Option<&MemorySession>,
    ) -> EngineResult<u64> {
        self.check_session(session)?;
        let mut state = self.state.write().await;

        let target = state.collection_mut(collection)?;
        let points = std::mem::take(&mut target.points);
        let removed = points.len() as u64;
        if let Some(sphere) = target.sphere.as_mut() {
            sphere.clear();
        }

        if let Some(session) = session {
            session.record(UndoOp::Deleted {
                collection: collection.to_string(),
                points: points.into_values().collect(),
            });
        }
        Ok(removed)
    }

    async fn geo_near(
        &self,
        collection: &str,
        query: &GeoNearQuery,
    ) -> EngineResult<Vec<GeoNearHit>> {
        let state = self.state.read().await;
        let target = state.collection(collection)?;
        let sphere = target.sphere.as_ref().ok_or_else(|| {
            storage_error(format!("unable to find a 2dsphere index on {}", collection))
        })?;

        Ok(sphere
            .nearest_within(query.near, query.max_distance_m)
            .into_iter()
            .filter_map(|(id, meters)| {
                target.points.get(&id).map(|point| GeoNearHit {
                    point: point.clone(),
                    distance: meters * query.distance_multiplier,
                })
            })
            .take(query.limit)
            .collect())
    }

    async fn find_all(&self, collection: &str) -> EngineResult<Vec<RiskPoint>> {
        let state = self.state.read().await;
        Ok(state.collection(collection)?.points.values().cloned().collect())
    }
}

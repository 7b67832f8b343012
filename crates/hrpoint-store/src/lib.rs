//! HRPoint Store - Persistence port, adapters, and the risk point store
//!
//! This crate defines the spatial engine port, an in-memory engine with a
//! 2D-sphere index, the risk point store built on top of it, and the
//! collection lifecycle run at startup.

pub mod index;
pub mod lifecycle;
pub mod memory;
pub mod ports;
pub mod store;

pub use lifecycle::{initialize, InitReport, RISK_POINT_COLLECTION};
pub use memory::{MemorySession, MemorySpatialEngine};
pub use ports::{GeoNearHit, GeoNearQuery, Session, SpatialEngine};
pub use store::RiskPointStore;

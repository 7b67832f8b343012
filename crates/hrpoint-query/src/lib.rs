//! HRPoint Query - Proximity search over stored risk points

pub mod engine;
pub mod format;

pub use engine::ProximityQueryEngine;

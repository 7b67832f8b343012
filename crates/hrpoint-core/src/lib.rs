//! HRPoint Core - Domain models, validation, and configuration
//!
//! This crate contains the domain types for high-risk points, the input
//! validator, distance helpers, and the layered configuration shared by the
//! store, query, and CLI crates.

pub mod config;
pub mod distance;
pub mod error;
pub mod limits;
pub mod locale;
pub mod models;
pub mod time;
pub mod validation;

pub use error::{HrPointError, PersistenceError, Result};
pub use limits::Limits;
pub use locale::Locale;

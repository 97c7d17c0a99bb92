//! Marker deduplication and timeline range engine for the ZigZag event map.
//!
//! The crate turns a flat list of dated map points plus a selected date
//! interval into a render partition: which points collapse into close
//! clusters, which location pins get nudged away from coincident projects,
//! and whether ordinary points should be clustered at all. The interval
//! itself is driven by a pointer-based range slider and survives short
//! reloads through a key-value store.

pub mod config;
pub mod controller;
pub mod error;
pub mod geo;
pub mod io;
pub mod model;

pub use config::Settings;
pub use controller::MapController;
pub use error::{Error, Result};

//! Prediction Fusion Service
//!
//! One fusion cycle: for every location with a current sensor reading,
//! run each loaded hazard adapter over its feature subset, assemble a
//! `HazardPrediction`, and upsert it by `location_id`. Adapters are loaded
//! once per run (via `PredictorRegistry`); a failing hazard is recorded as
//! unavailable while the remaining hazards still persist.

mod service;

pub use service::{fuse_reading, run_fusion, FusionSummary};

use thiserror::Error;

/// Run-level fusion errors. Per-location and per-hazard failures are
/// isolated inside the cycle and never surface here.
#[derive(Debug, Error)]
pub enum FusionError {
    #[error("failed to fetch current readings: {0}")]
    Storage(#[from] storage::StorageError),
}

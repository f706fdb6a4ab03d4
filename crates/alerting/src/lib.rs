//! Alerting System
//!
//! Fixed threshold bands per hazard, evaluated deterministically over
//! fused predictions to produce per-location alert bundles.

pub mod catalog;
mod engine;

pub use engine::{build_bundles, evaluate, AlertBundle};

//! Storage Layer
//!
//! SQLite persistence with repository pattern. Readings and predictions
//! are keyed by `location_id` with upsert semantics; one "latest" row per
//! location, overwritten each cycle.

mod records;
mod repository;

pub use records::{HazardPrediction, Location, SensorReading};
pub use repository::Repository;

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Could not reach the database at all; fatal for a run, nothing was
    /// written.
    #[error("database connection failed: {0}")]
    Connection(#[source] sqlx::Error),
    #[error("schema migration failed: {0}")]
    Migration(#[source] sqlx::Error),
    #[error("database query failed: {0}")]
    Query(#[from] sqlx::Error),
}

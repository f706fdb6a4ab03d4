//! Hazard Model Adapters
//!
//! Wraps the four independently trained hazard models (algal bloom risk,
//! cyclone category, sea-level rise, illegal-dumping quantity) behind a
//! uniform `Predictor` contract for the fusion service.

mod adapters;
mod artifact;
mod forest;
mod registry;

pub use adapters::{
    BloomRiskPredictor, CycloneCategoryPredictor, DumpingQuantityPredictor, Hazard,
    PredictionOutput, Predictor, SeaLevelRisePredictor,
};
pub use artifact::ModelArtifact;
pub use forest::{constant_classifier, constant_regressor, Forest, Model, Node, CYCLONE_CLASSES};
pub use registry::{ArtifactPaths, PredictorRegistry};

use std::path::PathBuf;
use thiserror::Error;

/// Errors while loading a persisted model artifact
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact unreadable: {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("artifact corrupt: {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("feature schema mismatch: expected {expected:?}, artifact has {found:?}")]
    SchemaMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error("malformed model in {path:?}: {reason}")]
    Malformed { path: PathBuf, reason: String },
}

/// Errors during prediction
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PredictError {
    #[error("model not loaded")]
    ModelNotLoaded,
    #[error("invalid feature vector: expected {expected} values, got {actual}")]
    FeatureShape { expected: usize, actual: usize },
}

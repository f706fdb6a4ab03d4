//! Persisted model artifact loading.
//!
//! Each trained model ships as a JSON document holding the forest itself
//! plus the feature schema it was trained on. Loading verifies that the
//! recorded `feature_names` agree, in content and order, with the schema
//! the calling adapter expects; a model trained against a different column
//! layout must be rejected rather than silently mis-applied.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::forest::Model;
use crate::ArtifactError;

/// On-disk layout of a trained model artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub model: Model,
    pub feature_names: Vec<String>,
    pub target_name: String,
}

impl ModelArtifact {
    /// Read and verify an artifact against the adapter's expected schema.
    pub fn load(
        path: &Path,
        expected_features: &[&str],
        expected_target: &str,
    ) -> Result<Self, ArtifactError> {
        let bytes = fs::read(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let artifact: ModelArtifact =
            serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        if artifact.feature_names != expected_features {
            return Err(ArtifactError::SchemaMismatch {
                expected: expected_features.iter().map(|s| s.to_string()).collect(),
                found: artifact.feature_names,
            });
        }
        if artifact.target_name != expected_target {
            return Err(ArtifactError::Malformed {
                path: path.to_path_buf(),
                reason: format!(
                    "target is {:?}, expected {:?}",
                    artifact.target_name, expected_target
                ),
            });
        }
        artifact
            .model
            .validate(expected_features.len())
            .map_err(|reason| ArtifactError::Malformed {
                path: path.to_path_buf(),
                reason,
            })?;

        debug!(path = %path.display(), target = %artifact.target_name, "model artifact loaded");
        Ok(artifact)
    }
}

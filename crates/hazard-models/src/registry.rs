//! Per-run predictor registry.
//!
//! All four adapters are loaded once at the start of a fusion run and the
//! registry is passed by reference into the fusion service. A hazard whose
//! artifact fails to load stays empty for the run; its predictions are
//! recorded as unavailable rather than defaulted.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::adapters::{
    BloomRiskPredictor, CycloneCategoryPredictor, DumpingQuantityPredictor, SeaLevelRisePredictor,
};

/// Filesystem locations of the four trained model artifacts.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub bloom: PathBuf,
    pub cyclone: PathBuf,
    pub sea_level: PathBuf,
    pub dumping: PathBuf,
}

/// The adapters available for one fusion run.
#[derive(Debug, Default)]
pub struct PredictorRegistry {
    pub bloom: Option<BloomRiskPredictor>,
    pub cyclone: Option<CycloneCategoryPredictor>,
    pub sea_level: Option<SeaLevelRisePredictor>,
    pub dumping: Option<DumpingQuantityPredictor>,
}

impl PredictorRegistry {
    /// Load every artifact, keeping whichever adapters succeed.
    ///
    /// Load failures are logged per hazard; the caller decides whether a
    /// partially loaded registry is acceptable (an empty one never is).
    pub fn load(paths: &ArtifactPaths) -> Self {
        let mut registry = Self::default();

        let mut bloom = BloomRiskPredictor::new();
        match bloom.load(&paths.bloom) {
            Ok(()) => registry.bloom = Some(bloom),
            Err(e) => warn!(hazard = "algal_bloom", "model unavailable this run: {e}"),
        }

        let mut cyclone = CycloneCategoryPredictor::new();
        match cyclone.load(&paths.cyclone) {
            Ok(()) => registry.cyclone = Some(cyclone),
            Err(e) => warn!(hazard = "cyclone", "model unavailable this run: {e}"),
        }

        let mut sea_level = SeaLevelRisePredictor::new();
        match sea_level.load(&paths.sea_level) {
            Ok(()) => registry.sea_level = Some(sea_level),
            Err(e) => warn!(hazard = "sea_level_rise", "model unavailable this run: {e}"),
        }

        let mut dumping = DumpingQuantityPredictor::new();
        match dumping.load(&paths.dumping) {
            Ok(()) => registry.dumping = Some(dumping),
            Err(e) => warn!(hazard = "illegal_dumping", "model unavailable this run: {e}"),
        }

        info!(loaded = registry.loaded_count(), "predictor registry built");
        registry
    }

    pub fn loaded_count(&self) -> usize {
        [
            self.bloom.is_some(),
            self.cyclone.is_some(),
            self.sea_level.is_some(),
            self.dumping.is_some(),
        ]
        .iter()
        .filter(|loaded| **loaded)
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.loaded_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::ModelArtifact;
    use crate::forest::{constant_classifier, constant_regressor};

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("registry-{}-{}", std::process::id(), name));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write(path: &PathBuf, artifact: &ModelArtifact) {
        std::fs::write(path, serde_json::to_vec(artifact).unwrap()).unwrap();
    }

    #[test]
    fn missing_artifacts_leave_slots_empty() {
        let dir = temp_dir("missing");
        let paths = ArtifactPaths {
            bloom: dir.join("bloom.json"),
            cyclone: dir.join("cyclone.json"),
            sea_level: dir.join("slr.json"),
            dumping: dir.join("dumping.json"),
        };
        let registry = PredictorRegistry::load(&paths);
        assert!(registry.is_empty());
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn partial_load_keeps_working_adapters() {
        let dir = temp_dir("partial");
        let paths = ArtifactPaths {
            bloom: dir.join("bloom.json"),
            cyclone: dir.join("cyclone.json"),
            sea_level: dir.join("slr.json"),
            dumping: dir.join("dumping.json"),
        };
        write(
            &paths.bloom,
            &ModelArtifact {
                model: constant_regressor(0.4),
                feature_names: BloomRiskPredictor::FEATURES
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                target_name: BloomRiskPredictor::TARGET.into(),
            },
        );
        write(
            &paths.cyclone,
            &ModelArtifact {
                model: constant_classifier(2),
                feature_names: CycloneCategoryPredictor::FEATURES
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                target_name: CycloneCategoryPredictor::TARGET.into(),
            },
        );

        let registry = PredictorRegistry::load(&paths);
        assert_eq!(registry.loaded_count(), 2);
        assert!(registry.bloom.is_some());
        assert!(registry.cyclone.is_some());
        assert!(registry.sea_level.is_none());
        assert!(registry.dumping.is_none());
        std::fs::remove_dir_all(dir).ok();
    }
}

//! Coastal Multi-Hazard Pipeline
//!
//! Orchestrates one fusion-then-alert run: connect storage, build the
//! predictor registry, fuse predictions for every location, evaluate the
//! threshold bands, and export the alert feed.

mod settings;

pub use settings::{ModelPaths, Settings};

use thiserror::Error;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use fusion::{FusionError, FusionSummary};
use hazard_models::PredictorRegistry;
use storage::{Repository, StorageError};

/// Run-level pipeline errors. Anything here aborted the run; per-location
/// degradation is handled inside the fusion cycle instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("storage unavailable: {0}")]
    Storage(#[from] StorageError),
    #[error("no hazard model could be loaded")]
    NoPredictors,
    #[error("fusion cycle failed: {0}")]
    Fusion(#[from] FusionError),
    #[error("feed export failed: {0}")]
    Export(#[from] feed_export::ExportError),
    #[error("configuration invalid: {0}")]
    Config(#[from] config::ConfigError),
}

/// What one completed run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    pub fusion: FusionSummary,
    /// Locations present in the exported feed.
    pub locations_exported: usize,
    /// Total alerts across all bundles.
    pub alerts_emitted: usize,
}

/// Initialize logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    // A second init (e.g. in tests) keeps the first subscriber.
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Execute one fusion-then-alert run.
///
/// Storage is acquired at run start and released on every exit path. A
/// connection failure aborts before any write; an empty predictor
/// registry aborts before the fusion cycle mutates anything.
pub async fn run(settings: &Settings) -> Result<RunReport, PipelineError> {
    let repo = Repository::connect(&settings.database_url)
        .await
        .map_err(PipelineError::Storage)?;
    let result = run_with_repo(&repo, settings).await;
    repo.close().await;
    result
}

async fn run_with_repo(repo: &Repository, settings: &Settings) -> Result<RunReport, PipelineError> {
    // Registry first: a run with zero usable models aborts before any
    // mutation, including schema setup.
    let registry = PredictorRegistry::load(&settings.artifact_paths());
    if registry.is_empty() {
        return Err(PipelineError::NoPredictors);
    }

    repo.migrate().await?;

    let summary = fusion::run_fusion(&registry, repo).await?;

    let rows = repo.predictions_with_locations().await?;
    let bundles = alerting::build_bundles(&rows);
    feed_export::write_feed(&bundles, &settings.feed_path)?;

    let report = RunReport {
        fusion: summary,
        locations_exported: bundles.len(),
        alerts_emitted: bundles.iter().map(|b| b.alerts.len()).sum(),
    };
    info!(
        locations = report.locations_exported,
        alerts = report.alerts_emitted,
        "run complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use hazard_models::{
        constant_classifier, constant_regressor, BloomRiskPredictor, CycloneCategoryPredictor,
        DumpingQuantityPredictor, ModelArtifact, SeaLevelRisePredictor,
    };
    use std::fs;
    use std::path::PathBuf;
    use storage::{Location, SensorReading};

    fn work_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("pipeline-{}-{}", std::process::id(), name));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_artifact(path: &PathBuf, artifact: &ModelArtifact) {
        fs::write(path, serde_json::to_vec(artifact).unwrap()).unwrap();
    }

    fn artifact(
        model: hazard_models::Model,
        features: &[&str],
        target: &str,
    ) -> ModelArtifact {
        ModelArtifact {
            model,
            feature_names: features.iter().map(|s| s.to_string()).collect(),
            target_name: target.to_string(),
        }
    }

    fn settings_for(dir: &PathBuf) -> Settings {
        Settings {
            database_url: format!("sqlite://{}?mode=rwc", dir.join("coastal.db").display()),
            feed_path: dir.join("ml_data.json"),
            models: ModelPaths {
                bloom: dir.join("bloom.json"),
                cyclone: dir.join("cyclone.json"),
                sea_level: dir.join("sea_level.json"),
                dumping: dir.join("dumping.json"),
            },
        }
    }

    fn write_all_artifacts(settings: &Settings) {
        write_artifact(
            &settings.models.bloom,
            &artifact(
                constant_regressor(0.6),
                &BloomRiskPredictor::FEATURES,
                BloomRiskPredictor::TARGET,
            ),
        );
        write_artifact(
            &settings.models.cyclone,
            &artifact(
                constant_classifier(4),
                &CycloneCategoryPredictor::FEATURES,
                CycloneCategoryPredictor::TARGET,
            ),
        );
        write_artifact(
            &settings.models.sea_level,
            &artifact(
                constant_regressor(10.0),
                &SeaLevelRisePredictor::FEATURES,
                SeaLevelRisePredictor::TARGET,
            ),
        );
        write_artifact(
            &settings.models.dumping,
            &artifact(
                constant_regressor(30.0),
                &DumpingQuantityPredictor::FEATURES,
                DumpingQuantityPredictor::TARGET,
            ),
        );
    }

    async fn seed(settings: &Settings) {
        let repo = Repository::connect(&settings.database_url).await.unwrap();
        repo.migrate().await.unwrap();
        repo.insert_location(&Location {
            location_id: "LOC001".to_string(),
            name: "Bay Point".to_string(),
        })
        .await
        .unwrap();
        repo.upsert_reading(&SensorReading {
            location_id: "LOC001".to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            chlorophyll_a: 20.0,
            dissolved_oxygen: 4.0,
            water_temp: 28.0,
            turbidity: 22.0,
            wind_speed: 12.0,
            pressure: 1005.0,
            sea_surface_temp: 27.5,
            wave_height: 1.2,
            rainfall_rate: 3.0,
            water_level: 65.2,
            suspended_solids: 80.0,
        })
        .await
        .unwrap();
        repo.close().await;
    }

    #[tokio::test]
    async fn full_run_produces_feed() {
        let dir = work_dir("full-run");
        let settings = settings_for(&dir);
        write_all_artifacts(&settings);
        seed(&settings).await;

        let report = run(&settings).await.unwrap();
        assert_eq!(report.fusion.locations, 1);
        assert_eq!(report.locations_exported, 1);
        // bloom 0.6 -> low-bloom (every [0,1] score sits under the 20
        // threshold), cyclone 4 -> severe, sea level 10 -> stress;
        // dumping 30 falls in the alert-free gap.
        assert_eq!(report.alerts_emitted, 3);

        let feed: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&settings.feed_path).unwrap()).unwrap();
        assert_eq!(feed[0]["location_id"], "LOC001");
        assert_eq!(feed[0]["location"], "Bay Point");
        let alerts = feed[0]["alerts"].as_array().unwrap();
        assert_eq!(alerts.len(), 3);
        assert!(alerts[0].as_str().unwrap().starts_with("Algal levels too low"));

        fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn run_without_any_model_aborts_before_writes() {
        let dir = work_dir("no-models");
        let settings = settings_for(&dir);
        seed(&settings).await;

        let err = run(&settings).await.unwrap_err();
        assert!(matches!(err, PipelineError::NoPredictors));
        assert!(!settings.feed_path.exists());

        let repo = Repository::connect(&settings.database_url).await.unwrap();
        repo.migrate().await.unwrap();
        assert!(repo.predictions_with_locations().await.unwrap().is_empty());
        repo.close().await;

        fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn bad_database_url_is_a_connection_error() {
        let dir = work_dir("bad-db");
        let settings = Settings {
            database_url: "sqlite:///definitely/missing/dir/x.db".to_string(),
            ..settings_for(&dir)
        };
        write_all_artifacts(&settings);

        let err = run(&settings).await.unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Storage(StorageError::Connection(_))
        ));
        fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn two_runs_emit_identical_feeds() {
        let dir = work_dir("idempotent");
        let settings = settings_for(&dir);
        write_all_artifacts(&settings);
        seed(&settings).await;

        run(&settings).await.unwrap();
        let first = fs::read_to_string(&settings.feed_path).unwrap();
        run(&settings).await.unwrap();
        let second = fs::read_to_string(&settings.feed_path).unwrap();
        assert_eq!(first, second);

        fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn degraded_run_still_exports_a_feed() {
        let dir = work_dir("degraded");
        let settings = settings_for(&dir);
        // Only the cyclone model is present.
        write_artifact(
            &settings.models.cyclone,
            &artifact(
                constant_classifier(2),
                &CycloneCategoryPredictor::FEATURES,
                CycloneCategoryPredictor::TARGET,
            ),
        );
        seed(&settings).await;

        let report = run(&settings).await.unwrap();
        assert_eq!(report.fusion.unavailable_predictions, 3);
        assert_eq!(report.alerts_emitted, 1);

        let feed: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&settings.feed_path).unwrap()).unwrap();
        let alerts = feed[0]["alerts"].as_array().unwrap();
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].as_str().unwrap().contains("Category 1–2"));

        fs::remove_dir_all(dir).ok();
    }
}

//! Pipeline configuration.
//!
//! Layered: built-in defaults, then an optional `coastal.toml`, then
//! `COASTAL_*` environment variables (`__` as section separator, e.g.
//! `COASTAL_MODELS__BLOOM=/opt/models/bloom.json`).

use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use hazard_models::ArtifactPaths;

/// Paths to the four trained model artifacts.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelPaths {
    pub bloom: PathBuf,
    pub cyclone: PathBuf,
    pub sea_level: PathBuf,
    pub dumping: PathBuf,
}

/// Everything one run needs.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub feed_path: PathBuf,
    pub models: ModelPaths,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("database_url", "sqlite://coastal.db?mode=rwc")?
            .set_default("feed_path", "ml_data.json")?
            .set_default("models.bloom", "models/algal_bloom_model.json")?
            .set_default("models.cyclone", "models/cyclone_category_model.json")?
            .set_default("models.sea_level", "models/sea_level_rise_model.json")?
            .set_default("models.dumping", "models/dumping_model.json")?
            .add_source(File::with_name("coastal").required(false))
            .add_source(Environment::with_prefix("COASTAL").separator("__"))
            .build()?
            .try_deserialize()
    }

    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths {
            bloom: self.models.bloom.clone(),
            cyclone: self.models.cyclone.clone(),
            sea_level: self.models.sea_level.clone(),
            dumping: self.models.dumping.clone(),
        }
    }
}

//! Predictor adapters, one per hazard.
//!
//! Each adapter owns an optionally loaded model and declares its own
//! feature schema. The fusion service drives all four through the
//! `Predictor` trait and never sees the model internals.

use std::path::Path;

use crate::artifact::ModelArtifact;
use crate::forest::{Model, CYCLONE_CLASSES};
use crate::{ArtifactError, PredictError};

/// The four coastal hazards covered by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hazard {
    Bloom,
    Cyclone,
    SeaLevelRise,
    Dumping,
}

impl Hazard {
    pub fn as_str(&self) -> &'static str {
        match self {
            Hazard::Bloom => "algal_bloom",
            Hazard::Cyclone => "cyclone",
            Hazard::SeaLevelRise => "sea_level_rise",
            Hazard::Dumping => "illegal_dumping",
        }
    }
}

/// Normalized adapter output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PredictionOutput {
    /// A scalar prediction (risk score, rise, quantity).
    Score(f64),
    /// A categorical prediction with the max class probability attached.
    Category { category: u8, confidence: f64 },
}

impl PredictionOutput {
    pub fn score(self) -> Option<f64> {
        match self {
            PredictionOutput::Score(v) => Some(v),
            PredictionOutput::Category { .. } => None,
        }
    }

    pub fn category(self) -> Option<(u8, f64)> {
        match self {
            PredictionOutput::Category {
                category,
                confidence,
            } => Some((category, confidence)),
            PredictionOutput::Score(_) => None,
        }
    }
}

/// Uniform contract over the four trained hazard models: map a fixed-size
/// numeric feature vector to one prediction.
pub trait Predictor {
    fn hazard(&self) -> Hazard;
    fn feature_names(&self) -> &'static [&'static str];
    fn predict(&self, features: &[f64]) -> Result<PredictionOutput, PredictError>;
}

fn check_shape(expected: usize, features: &[f64]) -> Result<(), PredictError> {
    if features.len() != expected {
        return Err(PredictError::FeatureShape {
            expected,
            actual: features.len(),
        });
    }
    Ok(())
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let f = 10f64.powi(decimals as i32);
    (value * f).round() / f
}

/// Algal bloom risk regressor. Output clamped to `[0, 1]`.
#[derive(Debug, Default)]
pub struct BloomRiskPredictor {
    model: Option<Model>,
}

impl BloomRiskPredictor {
    pub const FEATURES: [&'static str; 4] =
        ["chlorophyll_a_ug_l", "do_mg_l", "water_temp_c", "turbidity_ntu"];
    pub const TARGET: &'static str = "bloom_risk_score";

    pub fn new() -> Self {
        Self { model: None }
    }

    /// Wrap an already constructed model (tests, embedded defaults).
    pub fn with_model(model: Model) -> Self {
        Self { model: Some(model) }
    }

    pub fn load(&mut self, path: &Path) -> Result<(), ArtifactError> {
        let artifact = ModelArtifact::load(path, &Self::FEATURES, Self::TARGET)?;
        self.model = Some(artifact.model);
        Ok(())
    }
}

impl Predictor for BloomRiskPredictor {
    fn hazard(&self) -> Hazard {
        Hazard::Bloom
    }

    fn feature_names(&self) -> &'static [&'static str] {
        &Self::FEATURES
    }

    fn predict(&self, features: &[f64]) -> Result<PredictionOutput, PredictError> {
        let model = self.model.as_ref().ok_or(PredictError::ModelNotLoaded)?;
        check_shape(Self::FEATURES.len(), features)?;
        let score = model.predict_value(features).clamp(0.0, 1.0);
        Ok(PredictionOutput::Score(score))
    }
}

/// Saffir-Simpson cyclone category classifier.
///
/// Confidence (max class probability) is computed alongside the category;
/// the fusion step persists only the category today but downstream
/// consumers may use both.
#[derive(Debug, Default)]
pub struct CycloneCategoryPredictor {
    model: Option<Model>,
}

impl CycloneCategoryPredictor {
    pub const FEATURES: [&'static str; 4] =
        ["wind_speed_ms", "pressure_hpa", "sst_celsius", "wave_height_m"];
    pub const TARGET: &'static str = "saffir_simpson_category";

    pub fn new() -> Self {
        Self { model: None }
    }

    pub fn with_model(model: Model) -> Self {
        Self { model: Some(model) }
    }

    pub fn load(&mut self, path: &Path) -> Result<(), ArtifactError> {
        let artifact = ModelArtifact::load(path, &Self::FEATURES, Self::TARGET)?;
        self.model = Some(artifact.model);
        Ok(())
    }

    /// Human-readable label for a Saffir-Simpson category.
    pub fn category_description(category: u8) -> &'static str {
        match category {
            0 => "Tropical Depression/Storm",
            1 => "Category 1 Hurricane",
            2 => "Category 2 Hurricane",
            3 => "Category 3 Major Hurricane",
            4 => "Category 4 Major Hurricane",
            _ => "Category 5 Catastrophic Hurricane",
        }
    }
}

impl Predictor for CycloneCategoryPredictor {
    fn hazard(&self) -> Hazard {
        Hazard::Cyclone
    }

    fn feature_names(&self) -> &'static [&'static str] {
        &Self::FEATURES
    }

    fn predict(&self, features: &[f64]) -> Result<PredictionOutput, PredictError> {
        let model = self.model.as_ref().ok_or(PredictError::ModelNotLoaded)?;
        check_shape(Self::FEATURES.len(), features)?;
        let probs = model.predict_proba(features);
        let (category, confidence) = probs
            .iter()
            .copied()
            .enumerate()
            .fold((0usize, 0.0f64), |best, (i, p)| {
                if p > best.1 {
                    (i, p)
                } else {
                    best
                }
            });
        debug_assert!(category < CYCLONE_CLASSES);
        Ok(PredictionOutput::Category {
            category: category as u8,
            confidence,
        })
    }
}

/// Sea-level rise regressor. Output in centimeters, rounded to 1 decimal.
#[derive(Debug, Default)]
pub struct SeaLevelRisePredictor {
    model: Option<Model>,
}

impl SeaLevelRisePredictor {
    pub const FEATURES: [&'static str; 2] = ["water_level_cm", "rainfall_mm_hr"];
    pub const TARGET: &'static str = "sea_level_rise";

    pub fn new() -> Self {
        Self { model: None }
    }

    pub fn with_model(model: Model) -> Self {
        Self { model: Some(model) }
    }

    pub fn load(&mut self, path: &Path) -> Result<(), ArtifactError> {
        let artifact = ModelArtifact::load(path, &Self::FEATURES, Self::TARGET)?;
        self.model = Some(artifact.model);
        Ok(())
    }
}

impl Predictor for SeaLevelRisePredictor {
    fn hazard(&self) -> Hazard {
        Hazard::SeaLevelRise
    }

    fn feature_names(&self) -> &'static [&'static str] {
        &Self::FEATURES
    }

    fn predict(&self, features: &[f64]) -> Result<PredictionOutput, PredictError> {
        let model = self.model.as_ref().ok_or(PredictError::ModelNotLoaded)?;
        check_shape(Self::FEATURES.len(), features)?;
        Ok(PredictionOutput::Score(round_to(
            model.predict_value(features),
            1,
        )))
    }
}

/// Illegal-dumping quantity regressor. Output in kilograms, rounded to 2
/// decimals.
#[derive(Debug, Default)]
pub struct DumpingQuantityPredictor {
    model: Option<Model>,
}

impl DumpingQuantityPredictor {
    pub const FEATURES: [&'static str; 3] = ["tss_mg_l", "turbidity_ntu", "do_mg_l"];
    pub const TARGET: &'static str = "dumping_quantity";

    pub fn new() -> Self {
        Self { model: None }
    }

    pub fn with_model(model: Model) -> Self {
        Self { model: Some(model) }
    }

    pub fn load(&mut self, path: &Path) -> Result<(), ArtifactError> {
        let artifact = ModelArtifact::load(path, &Self::FEATURES, Self::TARGET)?;
        self.model = Some(artifact.model);
        Ok(())
    }
}

impl Predictor for DumpingQuantityPredictor {
    fn hazard(&self) -> Hazard {
        Hazard::Dumping
    }

    fn feature_names(&self) -> &'static [&'static str] {
        &Self::FEATURES
    }

    fn predict(&self, features: &[f64]) -> Result<PredictionOutput, PredictError> {
        let model = self.model.as_ref().ok_or(PredictError::ModelNotLoaded)?;
        check_shape(Self::FEATURES.len(), features)?;
        Ok(PredictionOutput::Score(
            round_to(model.predict_value(features), 2).max(0.0),
        ))
    }
}

//! Fusion cycle implementation.

use tracing::{error, info, warn};

use hazard_models::{PredictionOutput, Predictor, PredictorRegistry};
use storage::{HazardPrediction, Repository, SensorReading};

use crate::FusionError;

/// Counters for one fusion cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FusionSummary {
    /// Locations with a current reading that were processed.
    pub locations: usize,
    /// Individual hazard predictions recorded as unavailable.
    pub unavailable_predictions: usize,
    /// Locations whose upsert failed (logged, cycle continued).
    pub write_failures: usize,
}

/// Invoke one adapter, logging any failure and mapping it to "unavailable".
fn run_adapter(
    predictor: Option<&dyn Predictor>,
    features: &[f64],
    location_id: &str,
) -> Option<PredictionOutput> {
    let predictor = predictor?;
    match predictor.predict(features) {
        Ok(output) => Some(output),
        Err(e) => {
            warn!(
                location_id,
                hazard = predictor.hazard().as_str(),
                "prediction unavailable: {e}"
            );
            None
        }
    }
}

/// Fuse one reading into a `HazardPrediction`.
///
/// Feature subsets are extracted by named field, matching each adapter's
/// declared schema order. Hazards without a loaded adapter, or whose
/// adapter fails, come out as `None`.
pub fn fuse_reading(registry: &PredictorRegistry, reading: &SensorReading) -> HazardPrediction {
    let location_id = reading.location_id.as_str();

    // [chlorophyll_a_ug_l, do_mg_l, water_temp_c, turbidity_ntu]
    let bloom_risk_score = run_adapter(
        registry.bloom.as_ref().map(|p| p as &dyn Predictor),
        &[
            reading.chlorophyll_a,
            reading.dissolved_oxygen,
            reading.water_temp,
            reading.turbidity,
        ],
        location_id,
    )
    .and_then(PredictionOutput::score);

    // [wind_speed_ms, pressure_hpa, sst_celsius, wave_height_m]
    let cyclone_category = run_adapter(
        registry.cyclone.as_ref().map(|p| p as &dyn Predictor),
        &[
            reading.wind_speed,
            reading.pressure,
            reading.sea_surface_temp,
            reading.wave_height,
        ],
        location_id,
    )
    .and_then(PredictionOutput::category)
    .map(|(category, _confidence)| category);

    // [water_level_cm, rainfall_mm_hr]
    let sea_level_rise = run_adapter(
        registry.sea_level.as_ref().map(|p| p as &dyn Predictor),
        &[reading.water_level, reading.rainfall_rate],
        location_id,
    )
    .and_then(PredictionOutput::score);

    // [tss_mg_l, turbidity_ntu, do_mg_l]
    let dumping_quantity = run_adapter(
        registry.dumping.as_ref().map(|p| p as &dyn Predictor),
        &[
            reading.suspended_solids,
            reading.turbidity,
            reading.dissolved_oxygen,
        ],
        location_id,
    )
    .and_then(PredictionOutput::score);

    HazardPrediction {
        location_id: reading.location_id.clone(),
        dumping_quantity,
        cyclone_category,
        sea_level_rise,
        bloom_risk_score,
    }
}

fn unavailable_count(prediction: &HazardPrediction) -> usize {
    [
        prediction.dumping_quantity.is_none(),
        prediction.cyclone_category.is_none(),
        prediction.sea_level_rise.is_none(),
        prediction.bloom_risk_score.is_none(),
    ]
    .iter()
    .filter(|missing| **missing)
    .count()
}

/// Run one full fusion cycle over every location with a current reading.
pub async fn run_fusion(
    registry: &PredictorRegistry,
    repo: &Repository,
) -> Result<FusionSummary, FusionError> {
    let readings = repo.current_readings().await?;
    let mut summary = FusionSummary::default();

    for reading in &readings {
        let prediction = fuse_reading(registry, reading);
        summary.locations += 1;
        summary.unavailable_predictions += unavailable_count(&prediction);

        if let Err(e) = repo.upsert_prediction(&prediction).await {
            error!(
                location_id = %prediction.location_id,
                "prediction write failed, continuing: {e}"
            );
            summary.write_failures += 1;
        }
    }

    info!(
        locations = summary.locations,
        unavailable = summary.unavailable_predictions,
        write_failures = summary.write_failures,
        "fusion cycle complete"
    );
    Ok(summary)
}

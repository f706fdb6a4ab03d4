//! Threshold Alert Engine
//!
//! Deterministic mapping from a fused `HazardPrediction` to an ordered
//! alert list. Bands are evaluated in a fixed order (dumping, bloom,
//! cyclone, sea level), each band independently, with strict comparisons:
//! a value exactly at a band boundary triggers nothing, and a hazard whose
//! prediction is unavailable is skipped outright rather than coerced to a
//! default.

use serde::Serialize;
use tracing::debug;

use storage::{HazardPrediction, Location};

use crate::catalog;

/// All alerts for one location in evaluation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertBundle {
    pub location_id: String,
    pub location_name: String,
    pub alerts: Vec<&'static str>,
}

/// Evaluate every threshold band against one prediction.
///
/// The bloom thresholds (20/50/75) are inherited as-is from the upstream
/// rule set and assume a 0-100 score scale, while the bloom predictor
/// emits `[0, 1]`; with real model output only the `< 20` band can fire.
pub fn evaluate(prediction: &HazardPrediction) -> Vec<&'static str> {
    let mut alerts = Vec::new();

    if let Some(quantity) = prediction.dumping_quantity {
        if quantity > 50.0 && quantity < 200.0 {
            alerts.push(catalog::STRESS_WARNING);
        }
        if quantity > 200.0 {
            alerts.push(catalog::SEVERE_RISE_WARNING);
        }
    }

    if let Some(score) = prediction.bloom_risk_score {
        if score < 20.0 {
            alerts.push(catalog::BLOOM_LOW_WARNING);
        }
        if score > 50.0 && score < 75.0 {
            alerts.push(catalog::BLOOM_HIGH_WARNING);
        }
        if score > 75.0 {
            alerts.push(catalog::BLOOM_SEVERE_WARNING);
        }
    }

    if let Some(category) = prediction.cyclone_category {
        if (1..=2).contains(&category) {
            alerts.push(catalog::CYCLONE_MODERATE_WARNING);
        }
        if category >= 3 {
            alerts.push(catalog::CYCLONE_SEVERE_WARNING);
        }
    }

    if let Some(rise) = prediction.sea_level_rise {
        if rise > 5.0 && rise < 20.0 {
            alerts.push(catalog::STRESS_WARNING);
        }
        if rise > 20.0 {
            alerts.push(catalog::SEVERE_RISE_WARNING);
        }
    }

    alerts
}

/// Build one bundle per joined prediction row, preserving retrieval order.
///
/// Unavailable hazards are logged per location so "no prediction" stays
/// distinguishable from "no band matched" in diagnostics.
pub fn build_bundles(rows: &[(HazardPrediction, Location)]) -> Vec<AlertBundle> {
    rows.iter()
        .map(|(prediction, location)| {
            for (hazard, missing) in [
                ("illegal_dumping", prediction.dumping_quantity.is_none()),
                ("cyclone", prediction.cyclone_category.is_none()),
                ("sea_level_rise", prediction.sea_level_rise.is_none()),
                ("algal_bloom", prediction.bloom_risk_score.is_none()),
            ] {
                if missing {
                    debug!(
                        location_id = %location.location_id,
                        hazard,
                        "prediction unavailable, bands skipped"
                    );
                }
            }
            AlertBundle {
                location_id: location.location_id.clone(),
                location_name: location.name.clone(),
                alerts: evaluate(prediction),
            }
        })
        .collect()
}

//! Domain records persisted by the repository.
//!
//! Named-field structs throughout; column access never relies on
//! positional tuple order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A monitored coastal location. Reference data, maintained externally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Location {
    pub location_id: String,
    pub name: String,
}

/// Latest sensor telemetry for one location; overwritten each ingestion
/// cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SensorReading {
    pub location_id: String,
    pub timestamp: DateTime<Utc>,
    /// Chlorophyll-a concentration (ug/L)
    pub chlorophyll_a: f64,
    /// Dissolved oxygen (mg/L)
    pub dissolved_oxygen: f64,
    /// Water temperature (deg C)
    pub water_temp: f64,
    /// Turbidity (NTU)
    pub turbidity: f64,
    /// Wind speed (m/s)
    pub wind_speed: f64,
    /// Atmospheric pressure (hPa)
    pub pressure: f64,
    /// Sea surface temperature (deg C)
    pub sea_surface_temp: f64,
    /// Significant wave height (m)
    pub wave_height: f64,
    /// Rainfall rate (mm/hr)
    pub rainfall_rate: f64,
    /// Water level (cm)
    pub water_level: f64,
    /// Total suspended solids (mg/L)
    pub suspended_solids: f64,
}

/// Fused model outputs for one location; overwritten each fusion cycle.
///
/// `None` means the hazard's prediction was unavailable this cycle (model
/// failed to load or predict). It is never a stand-in for a numeric zero,
/// which is a legitimate quantity or risk score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct HazardPrediction {
    pub location_id: String,
    /// Predicted illegal-dumping quantity (kg), >= 0
    pub dumping_quantity: Option<f64>,
    /// Saffir-Simpson category, 0..=5
    pub cyclone_category: Option<u8>,
    /// Predicted sea-level rise (cm)
    pub sea_level_rise: Option<f64>,
    /// Algal bloom risk score in [0, 1]
    pub bloom_risk_score: Option<f64>,
}

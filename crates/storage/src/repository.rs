//! Repository Implementation

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{FromRow, SqlitePool};
use tracing::{debug, info};

use crate::records::{HazardPrediction, Location, SensorReading};
use crate::StorageError;

/// Repository over a SQLite database.
///
/// A run acquires one repository at start and closes it on every exit
/// path; nothing holds the database open between runs. The pool is capped
/// at a single connection: the pipeline is a sequential batch, and one
/// connection keeps `sqlite::memory:` databases coherent in tests.
pub struct Repository {
    pool: SqlitePool,
}

/// Flattened row of the predictions/locations join.
#[derive(FromRow)]
struct JoinedRow {
    location_id: String,
    name: String,
    dumping_quantity: Option<f64>,
    cyclone_category: Option<u8>,
    sea_level_rise: Option<f64>,
    bloom_risk_score: Option<f64>,
}

impl Repository {
    /// Connect to the database at `url`.
    pub async fn connect(url: &str) -> Result<Self, StorageError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(url)
            .await
            .map_err(StorageError::Connection)?;
        info!(url, "storage connected");
        Ok(Self { pool })
    }

    /// Create tables if they do not exist yet.
    pub async fn migrate(&self) -> Result<(), StorageError> {
        let statements = [
            r#"
            CREATE TABLE IF NOT EXISTS locations (
                location_id TEXT PRIMARY KEY,
                name        TEXT NOT NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS sensor_readings (
                location_id      TEXT PRIMARY KEY,
                timestamp        TEXT NOT NULL,
                chlorophyll_a    REAL NOT NULL,
                dissolved_oxygen REAL NOT NULL,
                water_temp       REAL NOT NULL,
                turbidity        REAL NOT NULL,
                wind_speed       REAL NOT NULL,
                pressure         REAL NOT NULL,
                sea_surface_temp REAL NOT NULL,
                wave_height      REAL NOT NULL,
                rainfall_rate    REAL NOT NULL,
                water_level      REAL NOT NULL,
                suspended_solids REAL NOT NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS hazard_predictions (
                location_id      TEXT PRIMARY KEY,
                dumping_quantity REAL,
                cyclone_category INTEGER,
                sea_level_rise   REAL,
                bloom_risk_score REAL
            )
            "#,
        ];
        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(StorageError::Migration)?;
        }
        Ok(())
    }

    /// Insert or replace a reference location.
    pub async fn insert_location(&self, location: &Location) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO locations (location_id, name) VALUES (?, ?)
             ON CONFLICT(location_id) DO UPDATE SET name = excluded.name",
        )
        .bind(&location.location_id)
        .bind(&location.name)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Upsert the latest reading for a location.
    pub async fn upsert_reading(&self, reading: &SensorReading) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO sensor_readings (
                location_id, timestamp, chlorophyll_a, dissolved_oxygen,
                water_temp, turbidity, wind_speed, pressure, sea_surface_temp,
                wave_height, rainfall_rate, water_level, suspended_solids
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(location_id) DO UPDATE SET
                timestamp        = excluded.timestamp,
                chlorophyll_a    = excluded.chlorophyll_a,
                dissolved_oxygen = excluded.dissolved_oxygen,
                water_temp       = excluded.water_temp,
                turbidity        = excluded.turbidity,
                wind_speed       = excluded.wind_speed,
                pressure         = excluded.pressure,
                sea_surface_temp = excluded.sea_surface_temp,
                wave_height      = excluded.wave_height,
                rainfall_rate    = excluded.rainfall_rate,
                water_level      = excluded.water_level,
                suspended_solids = excluded.suspended_solids
            "#,
        )
        .bind(&reading.location_id)
        .bind(reading.timestamp)
        .bind(reading.chlorophyll_a)
        .bind(reading.dissolved_oxygen)
        .bind(reading.water_temp)
        .bind(reading.turbidity)
        .bind(reading.wind_speed)
        .bind(reading.pressure)
        .bind(reading.sea_surface_temp)
        .bind(reading.wave_height)
        .bind(reading.rainfall_rate)
        .bind(reading.water_level)
        .bind(reading.suspended_solids)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// All current readings, ordered by `location_id` for reproducible
    /// iteration.
    pub async fn current_readings(&self) -> Result<Vec<SensorReading>, StorageError> {
        let readings = sqlx::query_as::<_, SensorReading>(
            "SELECT * FROM sensor_readings ORDER BY location_id",
        )
        .fetch_all(&self.pool)
        .await?;
        debug!(count = readings.len(), "fetched current readings");
        Ok(readings)
    }

    /// Upsert the fused prediction for a location.
    pub async fn upsert_prediction(&self, prediction: &HazardPrediction) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO hazard_predictions (
                location_id, dumping_quantity, cyclone_category,
                sea_level_rise, bloom_risk_score
            ) VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(location_id) DO UPDATE SET
                dumping_quantity = excluded.dumping_quantity,
                cyclone_category = excluded.cyclone_category,
                sea_level_rise   = excluded.sea_level_rise,
                bloom_risk_score = excluded.bloom_risk_score
            "#,
        )
        .bind(&prediction.location_id)
        .bind(prediction.dumping_quantity)
        .bind(prediction.cyclone_category)
        .bind(prediction.sea_level_rise)
        .bind(prediction.bloom_risk_score)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Current predictions joined with their location metadata, ordered by
    /// `location_id`.
    pub async fn predictions_with_locations(
        &self,
    ) -> Result<Vec<(HazardPrediction, Location)>, StorageError> {
        let rows = sqlx::query_as::<_, JoinedRow>(
            r#"
            SELECT p.location_id, l.name, p.dumping_quantity,
                   p.cyclone_category, p.sea_level_rise, p.bloom_risk_score
            FROM hazard_predictions p
            JOIN locations l ON p.location_id = l.location_id
            ORDER BY p.location_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                (
                    HazardPrediction {
                        location_id: row.location_id.clone(),
                        dumping_quantity: row.dumping_quantity,
                        cyclone_category: row.cyclone_category,
                        sea_level_rise: row.sea_level_rise,
                        bloom_risk_score: row.bloom_risk_score,
                    },
                    Location {
                        location_id: row.location_id,
                        name: row.name,
                    },
                )
            })
            .collect())
    }

    /// Release the connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono::Utc;

    async fn test_repo() -> Repository {
        let repo = Repository::connect("sqlite::memory:").await.unwrap();
        repo.migrate().await.unwrap();
        repo
    }

    fn reading(location_id: &str, turbidity: f64) -> SensorReading {
        SensorReading {
            location_id: location_id.to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            chlorophyll_a: 20.0,
            dissolved_oxygen: 4.0,
            water_temp: 28.0,
            turbidity,
            wind_speed: 12.0,
            pressure: 1005.0,
            sea_surface_temp: 27.5,
            wave_height: 1.2,
            rainfall_rate: 3.0,
            water_level: 65.2,
            suspended_solids: 80.0,
        }
    }

    #[tokio::test]
    async fn reading_upsert_overwrites_by_location() {
        let repo = test_repo().await;
        repo.upsert_reading(&reading("LOC001", 22.0)).await.unwrap();
        repo.upsert_reading(&reading("LOC001", 55.0)).await.unwrap();

        let readings = repo.current_readings().await.unwrap();
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].turbidity, 55.0);
    }

    #[tokio::test]
    async fn readings_come_back_ordered_by_location() {
        let repo = test_repo().await;
        repo.upsert_reading(&reading("LOC002", 1.0)).await.unwrap();
        repo.upsert_reading(&reading("LOC001", 2.0)).await.unwrap();

        let readings = repo.current_readings().await.unwrap();
        assert_eq!(readings[0].location_id, "LOC001");
        assert_eq!(readings[1].location_id, "LOC002");
    }

    #[tokio::test]
    async fn prediction_upsert_preserves_unavailable_fields() {
        let repo = test_repo().await;
        let prediction = HazardPrediction {
            location_id: "LOC001".to_string(),
            dumping_quantity: None,
            cyclone_category: Some(4),
            sea_level_rise: Some(10.0),
            bloom_risk_score: Some(0.6),
        };
        repo.upsert_prediction(&prediction).await.unwrap();
        repo.insert_location(&Location {
            location_id: "LOC001".to_string(),
            name: "Bay Point".to_string(),
        })
        .await
        .unwrap();

        let rows = repo.predictions_with_locations().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0, prediction);
        assert_eq!(rows[0].1.name, "Bay Point");
    }

    #[tokio::test]
    async fn join_skips_predictions_without_location() {
        let repo = test_repo().await;
        repo.upsert_prediction(&HazardPrediction {
            location_id: "LOC009".to_string(),
            dumping_quantity: Some(10.0),
            cyclone_category: Some(0),
            sea_level_rise: Some(1.0),
            bloom_risk_score: Some(0.1),
        })
        .await
        .unwrap();

        assert!(repo.predictions_with_locations().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn second_upsert_overwrites_prediction() {
        let repo = test_repo().await;
        let mut prediction = HazardPrediction {
            location_id: "LOC001".to_string(),
            dumping_quantity: Some(120.5),
            cyclone_category: Some(1),
            sea_level_rise: Some(3.2),
            bloom_risk_score: Some(0.3),
        };
        repo.upsert_prediction(&prediction).await.unwrap();
        prediction.dumping_quantity = None;
        prediction.cyclone_category = Some(3);
        repo.upsert_prediction(&prediction).await.unwrap();

        repo.insert_location(&Location {
            location_id: "LOC001".to_string(),
            name: "Bay Point".to_string(),
        })
        .await
        .unwrap();
        let rows = repo.predictions_with_locations().await.unwrap();
        assert_eq!(rows[0].0.dumping_quantity, None);
        assert_eq!(rows[0].0.cyclone_category, Some(3));
    }
}

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::{str::FromStr, time::Duration};

use super::{
    ClimateData, DateRange, DateWindow, Error, Measurement, Precipitation, Station,
    TemperatureObservation, TemperatureStats,
};

/// Read-only access to a SQLite file holding the `measurement` and `station` tables.
///
/// Each query checks a connection out of the pool and hands it back when the
/// query finishes, whether it succeeded or not.
pub struct ClimateAccess {
    pool: SqlitePool,
}

impl ClimateAccess {
    pub async fn new(path: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))?
            .read_only(true)
            .pragma("busy_timeout", "5000")
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "MEMORY");

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open database at {}", path))?;

        let db = Self { pool };
        db.health_check().await?;
        db.verify_schema().await?;
        info!("SQLite database opened read-only at: {}", path);

        Ok(db)
    }

    /// Check database connectivity and integrity.
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("Database connectivity check failed")?;

        let result: String = sqlx::query_scalar("PRAGMA quick_check;")
            .fetch_one(&self.pool)
            .await
            .context("Database integrity check failed")?;
        if result != "ok" {
            return Err(anyhow::anyhow!(
                "Database integrity check failed: {}",
                result
            ));
        }

        Ok(())
    }

    /// Decode one row of each table into the declared row types, so a store
    /// with a different layout is rejected at startup instead of per request.
    pub async fn verify_schema(&self) -> Result<()> {
        let measurement: Option<Measurement> =
            sqlx::query_as("SELECT station, date, prcp, tobs FROM measurement LIMIT 1")
                .fetch_optional(&self.pool)
                .await
                .context("measurement table does not match the expected layout")?;
        debug!("sample measurement: {:?}", measurement);

        let station: Option<Station> = sqlx::query_as(
            "SELECT station, name, latitude, longitude, elevation FROM station LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await
        .context("station table does not match the expected layout")?;
        debug!("sample station: {:?}", station);

        Ok(())
    }
}

#[async_trait]
impl ClimateData for ClimateAccess {
    async fn date_range(&self) -> Result<DateRange, Error> {
        let (earliest, latest): (Option<String>, Option<String>) =
            sqlx::query_as("SELECT MIN(date), MAX(date) FROM measurement")
                .fetch_one(&self.pool)
                .await?;

        match (earliest, latest) {
            (Some(earliest), Some(latest)) => Ok(DateRange { earliest, latest }),
            _ => Err(Error::NoData),
        }
    }

    async fn latest_date(&self) -> Result<String, Error> {
        let latest: Option<String> = sqlx::query_scalar("SELECT MAX(date) FROM measurement")
            .fetch_one(&self.pool)
            .await?;

        latest.ok_or(Error::NoData)
    }

    async fn precipitation(&self, window: &DateWindow) -> Result<Vec<Precipitation>, Error> {
        debug!("precipitation between {} and {}", window.start, window.end);
        let rows = sqlx::query_as::<_, Precipitation>(
            "SELECT date, prcp FROM measurement WHERE date BETWEEN ? AND ?",
        )
        .bind(&window.start)
        .bind(&window.end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn stations(&self) -> Result<Vec<String>, Error> {
        let stations = sqlx::query_scalar::<_, String>(
            "SELECT station FROM measurement GROUP BY station",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(stations)
    }

    async fn temperature_observations(
        &self,
        window: &DateWindow,
    ) -> Result<Vec<TemperatureObservation>, Error> {
        debug!("tobs between {} and {}", window.start, window.end);
        let rows = sqlx::query_as::<_, TemperatureObservation>(
            "SELECT date, tobs FROM measurement WHERE date BETWEEN ? AND ?",
        )
        .bind(&window.start)
        .bind(&window.end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn temperature_stats_from(&self, start_date: &str) -> Result<TemperatureStats, Error> {
        let stats = sqlx::query_as::<_, TemperatureStats>(
            "SELECT MIN(tobs) AS min, AVG(tobs) AS avg, MAX(tobs) AS max
             FROM measurement WHERE date >= ?",
        )
        .bind(start_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }

    async fn temperature_stats_between(
        &self,
        start_date: &str,
        end_date: &str,
    ) -> Result<TemperatureStats, Error> {
        let stats = sqlx::query_as::<_, TemperatureStats>(
            "SELECT MIN(tobs) AS min, AVG(tobs) AS avg, MAX(tobs) AS max
             FROM measurement WHERE date >= ? AND date <= ?",
        )
        .bind(start_date)
        .bind(end_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }
}

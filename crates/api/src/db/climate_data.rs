use crate::DateWindow;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to query sqlite: {0}")]
    Query(#[from] sqlx::Error),
    #[error("Failed to parse date string: {0}")]
    DateParse(#[from] time::error::Parse),
    #[error("Failed to format date string: {0}")]
    DateFormat(#[from] time::error::Format),
    #[error("Date window out of range: {0}")]
    DateRange(String),
    #[error("no measurements available")]
    NoData,
}

/// Read-only access to the measurement/station table pair.
///
/// Every method issues a single query and holds no state between calls.
#[async_trait]
pub trait ClimateData: Send + Sync {
    /// Earliest and latest `date` over all measurements
    async fn date_range(&self) -> Result<DateRange, Error>;
    /// Latest `date` over all measurements
    async fn latest_date(&self) -> Result<String, Error>;
    async fn precipitation(&self, window: &DateWindow) -> Result<Vec<Precipitation>, Error>;
    /// Distinct station ids that have at least one measurement
    async fn stations(&self) -> Result<Vec<String>, Error>;
    async fn temperature_observations(
        &self,
        window: &DateWindow,
    ) -> Result<Vec<TemperatureObservation>, Error>;
    /// min/avg/max of `tobs` for `date >= start_date`
    async fn temperature_stats_from(&self, start_date: &str) -> Result<TemperatureStats, Error>;
    /// min/avg/max of `tobs` for `start_date <= date <= end_date`
    async fn temperature_stats_between(
        &self,
        start_date: &str,
        end_date: &str,
    ) -> Result<TemperatureStats, Error>;
}

/// Row of the `measurement` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Measurement {
    pub station: String,
    pub date: String,
    pub prcp: Option<f64>,
    pub tobs: Option<f64>,
}

/// Row of the `station` table, descriptive metadata only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Station {
    pub station: String,
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub elevation: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DateRange {
    pub earliest: String,
    pub latest: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Precipitation {
    #[schema(example = "2017-08-23")]
    pub date: String,
    /// Missing readings stay `null`
    pub prcp: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TemperatureObservation {
    pub date: String,
    pub tobs: Option<f64>,
}

/// Element of the flat `tobs` response: dates and temperatures alternate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum ObservationValue {
    Date(String),
    Temperature(Option<f64>),
}

/// Flattens rows into `[date, tobs, date, tobs, ...]`
pub fn flatten_observations(observations: Vec<TemperatureObservation>) -> Vec<ObservationValue> {
    observations
        .into_iter()
        .flat_map(|observation| {
            [
                ObservationValue::Date(observation.date),
                ObservationValue::Temperature(observation.tobs),
            ]
        })
        .collect()
}

/// Aggregate over the matching rows, all `None` when nothing matched
#[derive(Debug, Clone, Copy, PartialEq, Default, sqlx::FromRow)]
pub struct TemperatureStats {
    pub min: Option<f64>,
    pub avg: Option<f64>,
    pub max: Option<f64>,
}

impl TemperatureStats {
    /// Wire shape: `[min, avg, max]`
    pub fn to_flat(self) -> [Option<f64>; 3] {
        [self.min, self.avg, self.max]
    }
}

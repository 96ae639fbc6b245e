pub mod precipitation;
pub mod stations;
pub mod stats;
pub mod tobs;

pub use precipitation::precipitation;
pub use stations::stations;
pub use stats::{temperature_stats_between, temperature_stats_from};
pub use tobs::tobs;

use axum::http::StatusCode;

use crate::{ClimateData, DateWindow, Error};

/// Last 12 months ending on the latest measurement, re-queried on every call
pub async fn trailing_year_window(climate_db: &dyn ClimateData) -> Result<DateWindow, Error> {
    let latest = climate_db.latest_date().await?;
    DateWindow::trailing_year(&latest)
}

pub fn error_response(err: Error) -> (StatusCode, String) {
    match err {
        Error::NoData => (StatusCode::NOT_FOUND, err.to_string()),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to query climate data: {}", err),
        ),
    }
}

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Html};
use log::error;

use crate::{error_response, AppState, DateRange};

/// Route listing, date input format and the range of dates in the database
pub async fn index_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, (StatusCode, String)> {
    let range = state.climate_db.date_range().await.map_err(|e| {
        error!("error getting available date range: {}", e);
        error_response(e)
    })?;

    Ok(Html(route_listing(&range)))
}

pub fn route_listing(range: &DateRange) -> String {
    format!(
        "Available Routes:<br/>\
         /api/v1.0/precipitation<br/>\
         /api/v1.0/stations<br/>\
         /api/v1.0/tobs<br/>\
         /api/v1.0/start_date<br/>\
         /api/v1.0/start_date/end_date<br/>\
         <br>Note: dates are input in 'YYYY-MM-DD' format.<br>\
         <br>Database Date Range:<br>Earliest: {}<br>Latest: {}",
        range.earliest, range.latest
    )
}

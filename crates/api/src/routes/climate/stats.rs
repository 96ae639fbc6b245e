use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use log::{debug, error};
use std::sync::Arc;

use crate::{error_response, AppState};

// Dates are compared as strings and never validated, so a date that matches
// nothing yields [null, null, null] rather than an error.

#[utoipa::path(
    get,
    path = "/api/v1.0/{start_date}",
    params(
         ("start_date" = String, Path, description = "First date to include, YYYY-MM-DD"),
    ),
    responses(
        (status = OK, description = "[TMIN, TAVG, TMAX] for every date on or after start_date", content_type = "application/json", body = Vec<f64>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to calculate temperature stats")
    ))]
pub async fn temperature_stats_from(
    State(state): State<Arc<AppState>>,
    Path(start_date): Path<String>,
) -> Result<Json<[Option<f64>; 3]>, (StatusCode, String)> {
    debug!("temperature stats from {}", start_date);
    state
        .climate_db
        .temperature_stats_from(&start_date)
        .await
        .map(|stats| Json(stats.to_flat()))
        .map_err(|e| {
            error!("error calculating temperature stats from {}: {}", start_date, e);
            error_response(e)
        })
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start_date}/{end_date}",
    params(
         ("start_date" = String, Path, description = "First date to include, YYYY-MM-DD"),
         ("end_date" = String, Path, description = "Last date to include, YYYY-MM-DD"),
    ),
    responses(
        (status = OK, description = "[TMIN, TAVG, TMAX] for dates between start_date and end_date inclusive", content_type = "application/json", body = Vec<f64>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to calculate temperature stats")
    ))]
pub async fn temperature_stats_between(
    State(state): State<Arc<AppState>>,
    Path((start_date, end_date)): Path<(String, String)>,
) -> Result<Json<[Option<f64>; 3]>, (StatusCode, String)> {
    debug!("temperature stats from {} to {}", start_date, end_date);
    state
        .climate_db
        .temperature_stats_between(&start_date, &end_date)
        .await
        .map(|stats| Json(stats.to_flat()))
        .map_err(|e| {
            error!(
                "error calculating temperature stats from {} to {}: {}",
                start_date, end_date, e
            );
            error_response(e)
        })
}

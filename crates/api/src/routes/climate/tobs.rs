use axum::{extract::State, http::StatusCode, Json};
use log::error;
use std::sync::Arc;

use crate::{
    error_response, flatten_observations, trailing_year_window, AppState, ObservationValue,
};

/// Dates and temperatures come back interleaved in one flat array
#[utoipa::path(
    get,
    path = "/api/v1.0/tobs",
    responses(
        (status = OK, description = "Flat list alternating date and temperature observation for the last 12 months", content_type = "application/json", body = Vec<ObservationValue>),
        (status = NOT_FOUND, description = "No measurements available"),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to retrieve temperature observations")
    ))]
pub async fn tobs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ObservationValue>>, (StatusCode, String)> {
    let window = trailing_year_window(state.climate_db.as_ref())
        .await
        .map_err(|e| {
            error!("error computing tobs window: {}", e);
            error_response(e)
        })?;

    let observations = state
        .climate_db
        .temperature_observations(&window)
        .await
        .map_err(|e| {
            error!("error retrieving temperature observations: {}", e);
            error_response(e)
        })?;

    Ok(Json(flatten_observations(observations)))
}

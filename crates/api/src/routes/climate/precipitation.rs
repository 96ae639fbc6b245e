use axum::{extract::State, http::StatusCode, Json};
use log::error;
use std::sync::Arc;

use crate::{error_response, trailing_year_window, AppState, Precipitation};

#[utoipa::path(
    get,
    path = "/api/v1.0/precipitation",
    responses(
        (status = OK, description = "Precipitation for the 12 months ending on the latest measurement", content_type = "application/json", body = Vec<Precipitation>),
        (status = NOT_FOUND, description = "No measurements available"),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to retrieve precipitation")
    ))]
pub async fn precipitation(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Precipitation>>, (StatusCode, String)> {
    let window = trailing_year_window(state.climate_db.as_ref())
        .await
        .map_err(|e| {
            error!("error computing precipitation window: {}", e);
            error_response(e)
        })?;

    state
        .climate_db
        .precipitation(&window)
        .await
        .map(Json)
        .map_err(|e| {
            error!("error retrieving precipitation: {}", e);
            error_response(e)
        })
}

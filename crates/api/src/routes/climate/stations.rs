use axum::{extract::State, http::StatusCode, Json};
use log::error;
use std::sync::Arc;

use crate::{error_response, AppState};

#[utoipa::path(
    get,
    path = "/api/v1.0/stations",
    responses(
        (status = OK, description = "Ids of stations with at least one measurement", content_type = "application/json", body = Vec<String>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to retrieve stations")
    ))]
pub async fn stations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, (StatusCode, String)> {
    state.climate_db.stations().await.map(Json).map_err(|e| {
        error!("error retrieving stations: {}", e);
        error_response(e)
    })
}

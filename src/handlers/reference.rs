use super::common::{map_service_error, success_response};
use crate::{
    errors::ApiError,
    handlers::AppState,
    services::reference::{InitialData, SectionOption},
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
    Router,
};

#[utoipa::path(
    get,
    path = "/api/v1/initial-data",
    responses((status = 200, description = "Active plants, items, parameters and operations", body = InitialData)),
    tag = "reference"
)]
pub async fn initial_data(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let data = state
        .services
        .reference
        .initial_data()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(data))
}

#[utoipa::path(
    get,
    path = "/api/v1/factories/:plant_code/sections",
    params(("plant_code" = String, Path, description = "Plant code")),
    responses(
        (status = 200, description = "Sections of the factory", body = [SectionOption]),
        (status = 404, description = "Factory not found", body = crate::errors::ErrorResponse)
    ),
    tag = "reference"
)]
pub async fn factory_sections(
    State(state): State<AppState>,
    Path(plant_code): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let sections = state
        .services
        .reference
        .sections_by_factory(&plant_code)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(sections))
}

pub fn reference_routes() -> Router<AppState> {
    Router::new()
        .route("/initial-data", get(initial_data))
        .route("/factories/:plant_code/sections", get(factory_sections))
}

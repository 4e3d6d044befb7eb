use super::common::{
    created_response, map_service_error, no_content_response, query_params, success_response,
    validate_input,
};
use crate::{
    entities::inspection_schedule,
    errors::ApiError,
    handlers::AppState,
    services::schedules::{
        InspectionFilterRequest, InspectionFilterResponse, ScheduleInput, ScheduleListFilter,
    },
};
use axum::{
    extract::{rejection::QueryRejection, Json, Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use tracing::info;

#[utoipa::path(
    get,
    path = "/api/v1/inspectionschedules",
    params(ScheduleListFilter),
    responses((status = 200, description = "Active inspection schedules", body = [inspection_schedule::Model])),
    tag = "inspection-schedules"
)]
pub async fn list_schedules(
    State(state): State<AppState>,
    query: Result<Query<ScheduleListFilter>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = query_params(query)?;
    let schedules = state
        .services
        .schedules
        .list_schedules(&filter)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(schedules))
}

#[utoipa::path(
    get,
    path = "/api/v1/inspectionschedules/:id",
    params(("id" = i64, Path, description = "Inspection schedule ID")),
    responses(
        (status = 200, description = "Inspection schedule", body = inspection_schedule::Model),
        (status = 404, description = "Schedule not found", body = crate::errors::ErrorResponse)
    ),
    tag = "inspection-schedules"
)]
pub async fn get_schedule(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let schedule = state
        .services
        .schedules
        .get_schedule(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(schedule))
}

#[utoipa::path(
    post,
    path = "/api/v1/inspectionschedules",
    request_body = ScheduleInput,
    responses(
        (status = 201, description = "Inspection schedule created", body = inspection_schedule::Model),
        (status = 400, description = "Invalid request or unknown reference", body = crate::errors::ErrorResponse)
    ),
    tag = "inspection-schedules"
)]
pub async fn create_schedule(
    State(state): State<AppState>,
    Json(payload): Json<ScheduleInput>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let schedule = state
        .services
        .schedules
        .create_schedule(payload)
        .await
        .map_err(map_service_error)?;
    info!("Inspection schedule created: {}", schedule.id);
    Ok(created_response(schedule))
}

#[utoipa::path(
    put,
    path = "/api/v1/inspectionschedules/:id",
    params(("id" = i64, Path, description = "Inspection schedule ID")),
    request_body = ScheduleInput,
    responses(
        (status = 200, description = "Inspection schedule updated", body = inspection_schedule::Model),
        (status = 404, description = "Schedule not found", body = crate::errors::ErrorResponse)
    ),
    tag = "inspection-schedules"
)]
pub async fn update_schedule(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ScheduleInput>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let schedule = state
        .services
        .schedules
        .update_schedule(id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(schedule))
}

#[utoipa::path(
    delete,
    path = "/api/v1/inspectionschedules/:id",
    params(("id" = i64, Path, description = "Inspection schedule ID")),
    responses(
        (status = 204, description = "Inspection schedule deactivated"),
        (status = 404, description = "Schedule not found", body = crate::errors::ErrorResponse)
    ),
    tag = "inspection-schedules"
)]
pub async fn delete_schedule(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .schedules
        .delete_schedule(id)
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}

#[utoipa::path(
    post,
    path = "/api/v1/inspections/filter",
    request_body = InspectionFilterRequest,
    responses(
        (status = 200, description = "Matching schedules with master codes", body = InspectionFilterResponse)
    ),
    tag = "inspection-schedules"
)]
pub async fn filter_inspections(
    State(state): State<AppState>,
    Json(payload): Json<InspectionFilterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let response = state
        .services
        .schedules
        .filter_inspections(&payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(response))
}

pub fn schedule_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_schedules).post(create_schedule))
        .route(
            "/:id",
            get(get_schedule).put(update_schedule).delete(delete_schedule),
        )
}

pub fn inspection_routes() -> Router<AppState> {
    Router::new().route("/filter", post(filter_inspections))
}

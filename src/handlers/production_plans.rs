use super::common::{
    created_response, map_service_error, no_content_response, query_params, success_response,
    validate_input,
};
use crate::{
    entities::production_plan,
    errors::ApiError,
    handlers::AppState,
    services::production_plans::{OrderStatus, ProductionPlanFilter, ProductionPlanInput},
};
use axum::{
    extract::{rejection::QueryRejection, Json, Path, Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use tracing::info;

#[utoipa::path(
    get,
    path = "/api/v1/productionplanners",
    params(ProductionPlanFilter),
    responses((status = 200, description = "Active production plans", body = [production_plan::Model])),
    tag = "production-plans"
)]
pub async fn list_plans(
    State(state): State<AppState>,
    query: Result<Query<ProductionPlanFilter>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = query_params(query)?;
    let plans = state
        .services
        .production_plans
        .list_plans(&filter)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(plans))
}

#[utoipa::path(
    get,
    path = "/api/v1/productionplanners/:order_number",
    params(("order_number" = String, Path, description = "Production order number")),
    responses(
        (status = 200, description = "Production plan", body = production_plan::Model),
        (status = 404, description = "Production plan not found", body = crate::errors::ErrorResponse)
    ),
    tag = "production-plans"
)]
pub async fn get_plan(
    State(state): State<AppState>,
    Path(order_number): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let plan = state
        .services
        .production_plans
        .get_plan(&order_number)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(plan))
}

#[utoipa::path(
    post,
    path = "/api/v1/productionplanners",
    request_body = ProductionPlanInput,
    responses(
        (status = 201, description = "Production plan created", body = production_plan::Model),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 409, description = "Order number already exists", body = crate::errors::ErrorResponse)
    ),
    tag = "production-plans"
)]
pub async fn create_plan(
    State(state): State<AppState>,
    Json(payload): Json<ProductionPlanInput>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let plan = state
        .services
        .production_plans
        .create_plan(payload)
        .await
        .map_err(map_service_error)?;
    info!("Production plan created: {}", plan.order_number);
    Ok(created_response(plan))
}

#[utoipa::path(
    put,
    path = "/api/v1/productionplanners/:order_number",
    params(("order_number" = String, Path, description = "Production order number")),
    request_body = ProductionPlanInput,
    responses(
        (status = 200, description = "Production plan updated", body = production_plan::Model),
        (status = 404, description = "Production plan not found", body = crate::errors::ErrorResponse)
    ),
    tag = "production-plans"
)]
pub async fn update_plan(
    State(state): State<AppState>,
    Path(order_number): Path<String>,
    Json(payload): Json<ProductionPlanInput>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let plan = state
        .services
        .production_plans
        .update_plan(&order_number, payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(plan))
}

#[utoipa::path(
    delete,
    path = "/api/v1/productionplanners/:order_number",
    params(("order_number" = String, Path, description = "Production order number")),
    responses(
        (status = 204, description = "Production plan deactivated"),
        (status = 404, description = "Production plan not found", body = crate::errors::ErrorResponse)
    ),
    tag = "production-plans"
)]
pub async fn delete_plan(
    State(state): State<AppState>,
    Path(order_number): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .production_plans
        .delete_plan(&order_number)
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}

#[utoipa::path(
    get,
    path = "/api/v1/purchase-orders/:order_number/status",
    params(("order_number" = String, Path, description = "Production order number")),
    responses(
        (status = 200, description = "Order status", body = OrderStatus),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "production-plans"
)]
pub async fn order_status(
    State(state): State<AppState>,
    Path(order_number): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let status = state
        .services
        .production_plans
        .order_status(&order_number)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(status))
}

pub fn production_plan_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_plans).post(create_plan))
        .route(
            "/:order_number",
            get(get_plan).put(update_plan).delete(delete_plan),
        )
}

pub fn purchase_order_routes() -> Router<AppState> {
    Router::new().route("/:order_number/status", get(order_status))
}

use super::common::{
    created_response, map_service_error, no_content_response, query_params, success_response,
    validate_input,
};
use crate::{
    entities::{building_section, item_master, operation_master, parameter, plant},
    errors::ApiError,
    handlers::AppState,
    services::master_data::{
        BuildingInput, ItemInput, MasterListFilter, OperationInput, ParameterInput, PlantInput,
    },
};
use axum::{
    extract::{rejection::QueryRejection, Json, Path, Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use tracing::info;

// Plants

#[utoipa::path(
    get,
    path = "/api/v1/plants",
    responses((status = 200, description = "Active plants", body = [plant::Model])),
    tag = "master-data"
)]
pub async fn list_plants(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let plants = state
        .services
        .master_data
        .list_plants()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(plants))
}

#[utoipa::path(
    get,
    path = "/api/v1/plants/:id",
    params(("id" = i64, Path, description = "Plant ID")),
    responses(
        (status = 200, description = "Plant", body = plant::Model),
        (status = 404, description = "Plant not found", body = crate::errors::ErrorResponse)
    ),
    tag = "master-data"
)]
pub async fn get_plant(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let plant = state
        .services
        .master_data
        .get_plant(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(plant))
}

#[utoipa::path(
    post,
    path = "/api/v1/plants",
    request_body = PlantInput,
    responses(
        (status = 201, description = "Plant created", body = plant::Model),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 409, description = "Plant code already exists", body = crate::errors::ErrorResponse)
    ),
    tag = "master-data"
)]
pub async fn create_plant(
    State(state): State<AppState>,
    Json(payload): Json<PlantInput>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let plant = state
        .services
        .master_data
        .create_plant(payload)
        .await
        .map_err(map_service_error)?;
    info!("Plant created: {}", plant.plant_code);
    Ok(created_response(plant))
}

#[utoipa::path(
    put,
    path = "/api/v1/plants/:id",
    params(("id" = i64, Path, description = "Plant ID")),
    request_body = PlantInput,
    responses(
        (status = 200, description = "Plant updated", body = plant::Model),
        (status = 404, description = "Plant not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Plant code already exists", body = crate::errors::ErrorResponse)
    ),
    tag = "master-data"
)]
pub async fn update_plant(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<PlantInput>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let plant = state
        .services
        .master_data
        .update_plant(id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(plant))
}

#[utoipa::path(
    delete,
    path = "/api/v1/plants/:id",
    params(("id" = i64, Path, description = "Plant ID")),
    responses(
        (status = 204, description = "Plant deactivated"),
        (status = 404, description = "Plant not found", body = crate::errors::ErrorResponse)
    ),
    tag = "master-data"
)]
pub async fn delete_plant(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .master_data
        .delete_plant(id)
        .await
        .map_err(map_service_error)?;
    info!("Plant deactivated: {}", id);
    Ok(no_content_response())
}

// Buildings

#[utoipa::path(
    get,
    path = "/api/v1/buildingsectionlabs",
    params(MasterListFilter),
    responses((status = 200, description = "Active buildings", body = [building_section::Model])),
    tag = "master-data"
)]
pub async fn list_buildings(
    State(state): State<AppState>,
    query: Result<Query<MasterListFilter>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = query_params(query)?;
    let buildings = state
        .services
        .master_data
        .list_buildings(&filter)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(buildings))
}

#[utoipa::path(
    get,
    path = "/api/v1/buildingsectionlabs/:id",
    params(("id" = i64, Path, description = "Building ID")),
    responses(
        (status = 200, description = "Building", body = building_section::Model),
        (status = 404, description = "Building not found", body = crate::errors::ErrorResponse)
    ),
    tag = "master-data"
)]
pub async fn get_building(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let building = state
        .services
        .master_data
        .get_building(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(building))
}

#[utoipa::path(
    post,
    path = "/api/v1/buildingsectionlabs",
    request_body = BuildingInput,
    responses(
        (status = 201, description = "Building created", body = building_section::Model),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 409, description = "Building code already exists in plant", body = crate::errors::ErrorResponse)
    ),
    tag = "master-data"
)]
pub async fn create_building(
    State(state): State<AppState>,
    Json(payload): Json<BuildingInput>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let building = state
        .services
        .master_data
        .create_building(payload)
        .await
        .map_err(map_service_error)?;
    info!("Building created: {}", building.building_code);
    Ok(created_response(building))
}

#[utoipa::path(
    put,
    path = "/api/v1/buildingsectionlabs/:id",
    params(("id" = i64, Path, description = "Building ID")),
    request_body = BuildingInput,
    responses(
        (status = 200, description = "Building updated", body = building_section::Model),
        (status = 404, description = "Building not found", body = crate::errors::ErrorResponse)
    ),
    tag = "master-data"
)]
pub async fn update_building(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<BuildingInput>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let building = state
        .services
        .master_data
        .update_building(id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(building))
}

#[utoipa::path(
    delete,
    path = "/api/v1/buildingsectionlabs/:id",
    params(("id" = i64, Path, description = "Building ID")),
    responses(
        (status = 204, description = "Building deactivated"),
        (status = 404, description = "Building not found", body = crate::errors::ErrorResponse)
    ),
    tag = "master-data"
)]
pub async fn delete_building(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .master_data
        .delete_building(id)
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}

// Items

#[utoipa::path(
    get,
    path = "/api/v1/itemmasters",
    params(MasterListFilter),
    responses((status = 200, description = "Active items", body = [item_master::Model])),
    tag = "master-data"
)]
pub async fn list_items(
    State(state): State<AppState>,
    query: Result<Query<MasterListFilter>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = query_params(query)?;
    let items = state
        .services
        .master_data
        .list_items(&filter)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(items))
}

#[utoipa::path(
    get,
    path = "/api/v1/itemmasters/:id",
    params(("id" = i64, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Item", body = item_master::Model),
        (status = 404, description = "Item not found", body = crate::errors::ErrorResponse)
    ),
    tag = "master-data"
)]
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state
        .services
        .master_data
        .get_item(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(item))
}

#[utoipa::path(
    post,
    path = "/api/v1/itemmasters",
    request_body = ItemInput,
    responses(
        (status = 201, description = "Item created", body = item_master::Model),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 409, description = "Item code already exists", body = crate::errors::ErrorResponse)
    ),
    tag = "master-data"
)]
pub async fn create_item(
    State(state): State<AppState>,
    Json(payload): Json<ItemInput>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let item = state
        .services
        .master_data
        .create_item(payload)
        .await
        .map_err(map_service_error)?;
    info!("Item created: {}", item.item_code);
    Ok(created_response(item))
}

#[utoipa::path(
    put,
    path = "/api/v1/itemmasters/:id",
    params(("id" = i64, Path, description = "Item ID")),
    request_body = ItemInput,
    responses(
        (status = 200, description = "Item updated", body = item_master::Model),
        (status = 404, description = "Item not found", body = crate::errors::ErrorResponse)
    ),
    tag = "master-data"
)]
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ItemInput>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let item = state
        .services
        .master_data
        .update_item(id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(item))
}

#[utoipa::path(
    delete,
    path = "/api/v1/itemmasters/:id",
    params(("id" = i64, Path, description = "Item ID")),
    responses(
        (status = 204, description = "Item deactivated"),
        (status = 404, description = "Item not found", body = crate::errors::ErrorResponse)
    ),
    tag = "master-data"
)]
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .master_data
        .delete_item(id)
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}

// Operations

#[utoipa::path(
    get,
    path = "/api/v1/operationmasters",
    params(MasterListFilter),
    responses((status = 200, description = "Active operations", body = [operation_master::Model])),
    tag = "master-data"
)]
pub async fn list_operations(
    State(state): State<AppState>,
    query: Result<Query<MasterListFilter>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = query_params(query)?;
    let operations = state
        .services
        .master_data
        .list_operations(&filter)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(operations))
}

#[utoipa::path(
    get,
    path = "/api/v1/operationmasters/:id",
    params(("id" = i64, Path, description = "Operation ID")),
    responses(
        (status = 200, description = "Operation", body = operation_master::Model),
        (status = 404, description = "Operation not found", body = crate::errors::ErrorResponse)
    ),
    tag = "master-data"
)]
pub async fn get_operation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let operation = state
        .services
        .master_data
        .get_operation(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(operation))
}

#[utoipa::path(
    post,
    path = "/api/v1/operationmasters",
    request_body = OperationInput,
    responses(
        (status = 201, description = "Operation created", body = operation_master::Model),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 409, description = "Operation code already exists", body = crate::errors::ErrorResponse)
    ),
    tag = "master-data"
)]
pub async fn create_operation(
    State(state): State<AppState>,
    Json(payload): Json<OperationInput>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let operation = state
        .services
        .master_data
        .create_operation(payload)
        .await
        .map_err(map_service_error)?;
    info!("Operation created: {}", operation.operation_code);
    Ok(created_response(operation))
}

#[utoipa::path(
    put,
    path = "/api/v1/operationmasters/:id",
    params(("id" = i64, Path, description = "Operation ID")),
    request_body = OperationInput,
    responses(
        (status = 200, description = "Operation updated", body = operation_master::Model),
        (status = 404, description = "Operation not found", body = crate::errors::ErrorResponse)
    ),
    tag = "master-data"
)]
pub async fn update_operation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<OperationInput>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let operation = state
        .services
        .master_data
        .update_operation(id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(operation))
}

#[utoipa::path(
    delete,
    path = "/api/v1/operationmasters/:id",
    params(("id" = i64, Path, description = "Operation ID")),
    responses(
        (status = 204, description = "Operation deactivated"),
        (status = 404, description = "Operation not found", body = crate::errors::ErrorResponse)
    ),
    tag = "master-data"
)]
pub async fn delete_operation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .master_data
        .delete_operation(id)
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}

// Parameters

#[utoipa::path(
    get,
    path = "/api/v1/parameterlists",
    params(MasterListFilter),
    responses((status = 200, description = "Active parameters", body = [parameter::Model])),
    tag = "master-data"
)]
pub async fn list_parameters(
    State(state): State<AppState>,
    query: Result<Query<MasterListFilter>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = query_params(query)?;
    let parameters = state
        .services
        .master_data
        .list_parameters(&filter)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(parameters))
}

#[utoipa::path(
    get,
    path = "/api/v1/parameterlists/:id",
    params(("id" = i64, Path, description = "Parameter ID")),
    responses(
        (status = 200, description = "Parameter", body = parameter::Model),
        (status = 404, description = "Parameter not found", body = crate::errors::ErrorResponse)
    ),
    tag = "master-data"
)]
pub async fn get_parameter(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let parameter = state
        .services
        .master_data
        .get_parameter(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(parameter))
}

#[utoipa::path(
    post,
    path = "/api/v1/parameterlists",
    request_body = ParameterInput,
    responses(
        (status = 201, description = "Parameter created", body = parameter::Model),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 409, description = "Parameter already exists in plant", body = crate::errors::ErrorResponse)
    ),
    tag = "master-data"
)]
pub async fn create_parameter(
    State(state): State<AppState>,
    Json(payload): Json<ParameterInput>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let parameter = state
        .services
        .master_data
        .create_parameter(payload)
        .await
        .map_err(map_service_error)?;
    info!("Parameter created: {}", parameter.parameter_code);
    Ok(created_response(parameter))
}

#[utoipa::path(
    put,
    path = "/api/v1/parameterlists/:id",
    params(("id" = i64, Path, description = "Parameter ID")),
    request_body = ParameterInput,
    responses(
        (status = 200, description = "Parameter updated", body = parameter::Model),
        (status = 404, description = "Parameter not found", body = crate::errors::ErrorResponse)
    ),
    tag = "master-data"
)]
pub async fn update_parameter(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ParameterInput>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let parameter = state
        .services
        .master_data
        .update_parameter(id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(parameter))
}

#[utoipa::path(
    delete,
    path = "/api/v1/parameterlists/:id",
    params(("id" = i64, Path, description = "Parameter ID")),
    responses(
        (status = 204, description = "Parameter deactivated"),
        (status = 404, description = "Parameter not found", body = crate::errors::ErrorResponse)
    ),
    tag = "master-data"
)]
pub async fn delete_parameter(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .master_data
        .delete_parameter(id)
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}

pub fn plant_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_plants).post(create_plant))
        .route("/:id", get(get_plant).put(update_plant).delete(delete_plant))
}

pub fn building_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_buildings).post(create_building))
        .route(
            "/:id",
            get(get_building).put(update_building).delete(delete_building),
        )
}

pub fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_items).post(create_item))
        .route("/:id", get(get_item).put(update_item).delete(delete_item))
}

pub fn operation_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_operations).post(create_operation))
        .route(
            "/:id",
            get(get_operation)
                .put(update_operation)
                .delete(delete_operation),
        )
}

pub fn parameter_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_parameters).post(create_parameter))
        .route(
            "/:id",
            get(get_parameter)
                .put(update_parameter)
                .delete(delete_parameter),
        )
}

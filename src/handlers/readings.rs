use super::common::{map_service_error, non_blank, query_params, success_response};
use crate::{
    errors::ApiError,
    handlers::AppState,
    models::InspectionFamily,
    services::reading_chain::{ReadingFilters, ReadingSet},
};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::Deserialize;
use tracing::info;
use utoipa::IntoParams;

/// Query string of `GET /readings`. Master filters carry business codes.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReadingsQuery {
    /// `Inward`, `In-process` or `Final` (case-insensitive)
    pub inspection_type: Option<String>,
    /// Plant code
    pub plant_id: Option<String>,
    /// Building code
    pub building: Option<String>,
    pub item_code: Option<String>,
    /// Operation code
    pub operation: Option<String>,
    #[serde(alias = "inspection_parameter_name")]
    pub parameter_name: Option<String>,
    /// Order number (`io_no` for Inward, `po_no` otherwise)
    pub po_no: Option<String>,
}

impl From<ReadingsQuery> for ReadingFilters {
    fn from(query: ReadingsQuery) -> Self {
        Self {
            plant_code: non_blank(query.plant_id),
            building_code: non_blank(query.building),
            item_code: non_blank(query.item_code),
            operation_code: non_blank(query.operation),
            parameter_name: non_blank(query.parameter_name),
            order_number: non_blank(query.po_no),
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/readings",
    params(ReadingsQuery),
    responses(
        (status = 200, description = "Flattened inspection readings", body = ReadingSet),
        (status = 400, description = "Missing or unknown inspection type", body = crate::errors::ErrorResponse),
        (status = 500, description = "Storage or integrity fault", body = crate::errors::ErrorResponse)
    ),
    tag = "readings"
)]
pub async fn list_readings(
    State(state): State<AppState>,
    query: Result<Query<ReadingsQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let mut query = query_params(query)?;
    let family = InspectionFamily::from_request(query.inspection_type.take().as_deref())
        .map_err(map_service_error)?;
    let filters = ReadingFilters::from(query);

    let set = state
        .services
        .readings
        .resolve_readings(family, &filters)
        .await
        .map_err(map_service_error)?;

    info!(inspection_type = %family, count = set.count, "readings resolved");
    Ok(success_response(set))
}

pub fn reading_routes() -> Router<AppState> {
    Router::new().route("/", get(list_readings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_maps_http_names_to_filters() {
        let query = ReadingsQuery {
            inspection_type: Some("Inward".into()),
            plant_id: Some("P1".into()),
            building: Some(" ".into()),
            operation: Some("OP10".into()),
            parameter_name: Some("Width".into()),
            po_no: Some("IO-100".into()),
            ..Default::default()
        };
        let filters = ReadingFilters::from(query);
        assert_eq!(filters.plant_code.as_deref(), Some("P1"));
        assert!(filters.building_code.is_none());
        assert_eq!(filters.operation_code.as_deref(), Some("OP10"));
        assert_eq!(filters.order_number.as_deref(), Some("IO-100"));
    }
}

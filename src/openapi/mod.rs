use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Inspection API",
        version = "1.0.0",
        description = r#"
# Quality Inspection API

Master data, inspection schedules and inspection readings for inward,
in-process and final (first-article) inspection.

## Readings

`GET /api/v1/readings` walks schedule, reading and actual reading for one
inspection family and returns one flattened record per actual reading.
Master filters take business codes: `plant_id` is the plant code,
`building` the building code, `operation` the operation code and `po_no`
the order number of the reading.

## Error Handling

Errors share one body:

```json
{
  "error": "Bad Request",
  "message": "Invalid input: inspection_type is required",
  "request_id": "3f0c...",
  "timestamp": "2024-01-01T00:00:00Z"
}
```

Server faults add the underlying diagnostic in `details`.
        "#
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "readings", description = "Flattened inspection readings"),
        (name = "master-data", description = "Plants, buildings, items, operations and parameters"),
        (name = "inspection-schedules", description = "Standard inspection schedules"),
        (name = "production-plans", description = "Production orders"),
        (name = "reference", description = "Lookup lists for inspection entry"),
        (name = "health", description = "Liveness and readiness probes")
    ),
    paths(
        // Readings
        crate::handlers::readings::list_readings,

        // Master data
        crate::handlers::master_data::list_plants,
        crate::handlers::master_data::get_plant,
        crate::handlers::master_data::create_plant,
        crate::handlers::master_data::update_plant,
        crate::handlers::master_data::delete_plant,
        crate::handlers::master_data::list_buildings,
        crate::handlers::master_data::get_building,
        crate::handlers::master_data::create_building,
        crate::handlers::master_data::update_building,
        crate::handlers::master_data::delete_building,
        crate::handlers::master_data::list_items,
        crate::handlers::master_data::get_item,
        crate::handlers::master_data::create_item,
        crate::handlers::master_data::update_item,
        crate::handlers::master_data::delete_item,
        crate::handlers::master_data::list_operations,
        crate::handlers::master_data::get_operation,
        crate::handlers::master_data::create_operation,
        crate::handlers::master_data::update_operation,
        crate::handlers::master_data::delete_operation,
        crate::handlers::master_data::list_parameters,
        crate::handlers::master_data::get_parameter,
        crate::handlers::master_data::create_parameter,
        crate::handlers::master_data::update_parameter,
        crate::handlers::master_data::delete_parameter,

        // Schedules
        crate::handlers::schedules::list_schedules,
        crate::handlers::schedules::get_schedule,
        crate::handlers::schedules::create_schedule,
        crate::handlers::schedules::update_schedule,
        crate::handlers::schedules::delete_schedule,
        crate::handlers::schedules::filter_inspections,

        // Production plans
        crate::handlers::production_plans::list_plans,
        crate::handlers::production_plans::get_plan,
        crate::handlers::production_plans::create_plan,
        crate::handlers::production_plans::update_plan,
        crate::handlers::production_plans::delete_plan,
        crate::handlers::production_plans::order_status,

        // Reference
        crate::handlers::reference::initial_data,
        crate::handlers::reference::factory_sections,

        // Health
        crate::handlers::health::liveness_check,
        crate::handlers::health::readiness_check,
    ),
    components(
        schemas(
            crate::services::reading_chain::ReadingSet,
            crate::services::projection::FlattenedReading,
            crate::models::InspectionFamily,

            crate::services::master_data::PlantInput,
            crate::services::master_data::BuildingInput,
            crate::services::master_data::ItemInput,
            crate::services::master_data::OperationInput,
            crate::services::master_data::ParameterInput,

            crate::services::schedules::ScheduleInput,
            crate::services::schedules::InspectionFilterRequest,
            crate::services::schedules::InspectionFilterResponse,
            crate::services::schedules::InspectionSummary,

            crate::services::production_plans::ProductionPlanInput,
            crate::services::production_plans::OrderStatus,
            crate::services::production_plans::OrderItem,

            crate::services::reference::InitialData,
            crate::services::reference::SectionOption,

            // Error types
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

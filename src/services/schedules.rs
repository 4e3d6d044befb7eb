use chrono::Utc;
use sea_orm::{
    sea_query::Query, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    QueryFilter, Set,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::entities::{
    building_section, inspection_schedule, item_master, operation_master, parameter, plant,
};
use crate::errors::ServiceError;
use crate::models::{InspectionFamily, ItemCatalog};
use crate::repositories::inspection_chain::ScheduleRow;
use crate::repositories::records::{active, deactivate, find_active, SoftDeletable};
use crate::repositories::reference_data::{load_labels, parameter_ids_by_name_or_code};

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct ScheduleInput {
    pub plant_id: i64,
    pub building_id: i64,
    pub item_id: i64,
    pub operation_id: Option<i64>,
    pub parameter_id: i64,
    #[validate(length(max = 255))]
    pub end_store: Option<String>,
    #[validate(length(max = 255))]
    pub inspection_parameter_name: Option<String>,
    #[validate(length(max = 255))]
    pub short_text: Option<String>,
    /// `Inward` or `In-process` (any case) is stored canonically; other values
    /// are kept as given.
    #[validate(length(max = 255))]
    pub inspection_type: Option<String>,
    pub lsl: Option<f64>,
    pub target_value: Option<f64>,
    pub usl: Option<f64>,
    #[validate(range(min = 0))]
    pub sample_size: Option<i32>,
    #[validate(length(max = 255))]
    pub inspection_frequency: Option<String>,
    #[validate(length(max = 255))]
    pub inspection_method: Option<String>,
    #[validate(length(max = 450))]
    pub machine_type: Option<String>,
    #[validate(length(max = 255))]
    pub recording_type: Option<String>,
    #[validate(length(max = 100))]
    pub attachment_document: Option<String>,
    #[validate(length(max = 255))]
    pub control_limit: Option<String>,
    #[validate(length(max = 255))]
    pub likely_defects_classification: Option<String>,
    #[validate(length(max = 255))]
    pub remarks: Option<String>,
}

/// List filters; master filters take business codes.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ScheduleListFilter {
    /// Plant code
    pub plant_id: Option<String>,
    /// Building code
    pub building: Option<String>,
    pub item_code: Option<String>,
    pub inspection_type: Option<String>,
    /// Operation code
    pub operation: Option<String>,
    pub inspection_parameter_name: Option<String>,
    /// Accepted for compatibility; schedules carry no order number.
    pub po_no: Option<String>,
}

/// Body of `POST /inspections/filter`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InspectionFilterRequest {
    pub factory_id: Option<String>,
    pub item_code: Option<String>,
    pub operation: Option<String>,
    /// Parameter code or name
    pub parameter: Option<String>,
}

/// Schedule summary with master codes resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InspectionSummary {
    pub id: i64,
    pub inspection_parameter_name: Option<String>,
    pub lsl: Option<f64>,
    pub target_value: Option<f64>,
    pub usl: Option<f64>,
    pub sample_size: Option<i32>,
    pub inspection_frequency: Option<String>,
    pub inspection_method: Option<String>,
    pub recording_type: Option<String>,
    pub likely_defects_classification: Option<String>,
    pub remarks: Option<String>,
    pub item_code: Option<String>,
    pub operation_code: Option<String>,
    pub building_code: Option<String>,
    pub plant_code: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct InspectionFilterResponse {
    pub inspections: Vec<InspectionSummary>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Canonical spelling for the standard families' type tags.
fn canonical_inspection_type(value: Option<String>) -> Option<String> {
    let value = value?;
    match InspectionFamily::from_str(value.trim()) {
        Ok(family @ (InspectionFamily::Inward | InspectionFamily::InProcess)) => {
            Some(family.to_string())
        }
        _ => Some(value),
    }
}

/// Administration of standard inspection schedules and the schedule search
/// used by the inspection entry screens.
#[derive(Clone)]
pub struct ScheduleService {
    db: Arc<DatabaseConnection>,
}

impl ScheduleService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list_schedules(
        &self,
        filter: &ScheduleListFilter,
    ) -> Result<Vec<inspection_schedule::Model>, ServiceError> {
        use inspection_schedule::Column;

        let mut query = active::<inspection_schedule::Entity>();

        if let Some(code) = present(&filter.plant_id) {
            query = query.filter(
                Column::PlantId.in_subquery(
                    Query::select()
                        .column(plant::Column::Id)
                        .from(plant::Entity)
                        .and_where(plant::Column::PlantCode.eq(code))
                        .to_owned(),
                ),
            );
        }
        if let Some(code) = present(&filter.building) {
            query = query.filter(
                Column::BuildingId.in_subquery(
                    Query::select()
                        .column(building_section::Column::Id)
                        .from(building_section::Entity)
                        .and_where(building_section::Column::BuildingCode.eq(code))
                        .to_owned(),
                ),
            );
        }
        if let Some(code) = present(&filter.item_code) {
            query = query.filter(
                Column::ItemId.in_subquery(
                    Query::select()
                        .column(item_master::Column::Id)
                        .from(item_master::Entity)
                        .and_where(item_master::Column::ItemCode.eq(code))
                        .to_owned(),
                ),
            );
        }
        if let Some(code) = present(&filter.operation) {
            query = query.filter(
                Column::OperationId.in_subquery(
                    Query::select()
                        .column(operation_master::Column::Id)
                        .from(operation_master::Entity)
                        .and_where(operation_master::Column::OperationCode.eq(code))
                        .to_owned(),
                ),
            );
        }
        if let Some(tag) = present(&filter.inspection_type) {
            query = query.filter(Column::InspectionType.eq(tag));
        }
        if let Some(name) = present(&filter.inspection_parameter_name) {
            query = query.filter(Column::InspectionParameterName.eq(name));
        }
        if present(&filter.po_no).is_some() {
            debug!("po_no ignored for schedule listing");
        }

        query
            .all(self.db.as_ref())
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn get_schedule(&self, id: i64) -> Result<inspection_schedule::Model, ServiceError> {
        find_active::<inspection_schedule::Entity, _>(self.db.as_ref(), id)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("inspection schedule {} not found", id)))
    }

    async fn referenced<E: SoftDeletable>(&self, id: i64) -> Result<E::Model, ServiceError> {
        find_active::<E, _>(self.db.as_ref(), id)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::InvalidInput(format!("{} {} does not exist", E::LABEL, id)))
    }

    async fn check_references(&self, input: &ScheduleInput) -> Result<(), ServiceError> {
        self.referenced::<plant::Entity>(input.plant_id).await?;
        self.referenced::<building_section::Entity>(input.building_id)
            .await?;
        self.referenced::<item_master::Entity>(input.item_id).await?;
        self.referenced::<parameter::Entity>(input.parameter_id).await?;
        if let Some(operation_id) = input.operation_id {
            let operation = self
                .referenced::<operation_master::Entity>(operation_id)
                .await?;
            if operation.item_id != input.item_id {
                return Err(ServiceError::InvalidInput(format!(
                    "operation {} does not belong to item {}",
                    operation_id, input.item_id
                )));
            }
        }
        Ok(())
    }

    fn apply(model: &mut inspection_schedule::ActiveModel, input: ScheduleInput) {
        model.plant_id = Set(input.plant_id);
        model.building_id = Set(input.building_id);
        model.item_id = Set(input.item_id);
        model.operation_id = Set(input.operation_id);
        model.parameter_id = Set(input.parameter_id);
        model.end_store = Set(input.end_store);
        model.inspection_parameter_name = Set(input.inspection_parameter_name);
        model.short_text = Set(input.short_text);
        model.inspection_type = Set(canonical_inspection_type(input.inspection_type));
        model.lsl = Set(input.lsl);
        model.target_value = Set(input.target_value);
        model.usl = Set(input.usl);
        model.sample_size = Set(input.sample_size);
        model.inspection_frequency = Set(input.inspection_frequency);
        model.inspection_method = Set(input.inspection_method);
        model.machine_type = Set(input.machine_type);
        model.recording_type = Set(input.recording_type);
        model.attachment_document = Set(input.attachment_document);
        model.control_limit = Set(input.control_limit);
        model.likely_defects_classification = Set(input.likely_defects_classification);
        model.remarks = Set(input.remarks);
        model.updated_at = Set(Utc::now());
    }

    #[instrument(skip(self))]
    pub async fn create_schedule(
        &self,
        input: ScheduleInput,
    ) -> Result<inspection_schedule::Model, ServiceError> {
        input.validate()?;
        self.check_references(&input).await?;

        let mut model = inspection_schedule::ActiveModel {
            is_active: Set(true),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        Self::apply(&mut model, input);

        let model = model.insert(self.db.as_ref()).await.map_err(|e| {
            error!("Failed to create inspection schedule: {}", e);
            ServiceError::db_error(e)
        })?;
        info!(schedule_id = model.id, "inspection schedule created");
        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn update_schedule(
        &self,
        id: i64,
        input: ScheduleInput,
    ) -> Result<inspection_schedule::Model, ServiceError> {
        input.validate()?;
        let existing = self.get_schedule(id).await?;
        self.check_references(&input).await?;

        let mut model: inspection_schedule::ActiveModel = existing.into();
        Self::apply(&mut model, input);
        model
            .update(self.db.as_ref())
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn delete_schedule(&self, id: i64) -> Result<(), ServiceError> {
        let removed = deactivate::<inspection_schedule::Entity, _>(self.db.as_ref(), id)
            .await
            .map_err(ServiceError::db_error)?;
        if !removed {
            return Err(ServiceError::NotFound(format!(
                "inspection schedule {} not found",
                id
            )));
        }
        info!(schedule_id = id, "inspection schedule deactivated");
        Ok(())
    }

    /// Schedule search by factory, item, operation and parameter.
    ///
    /// An unknown factory yields no schedules rather than an error.
    #[instrument(skip(self))]
    pub async fn filter_inspections(
        &self,
        request: &InspectionFilterRequest,
    ) -> Result<InspectionFilterResponse, ServiceError> {
        use inspection_schedule::Column;

        let db = self.db.as_ref();
        let mut query = active::<inspection_schedule::Entity>();

        if let Some(factory) = present(&request.factory_id) {
            let found = plant::Entity::find()
                .filter(plant::Column::PlantCode.eq(factory))
                .filter(plant::Column::IsActive.eq(true))
                .one(db)
                .await?;
            match found {
                Some(plant) => query = query.filter(Column::PlantId.eq(plant.id)),
                None => {
                    debug!(factory_id = factory, "unknown factory");
                    return Ok(InspectionFilterResponse::default());
                }
            }
        }
        if let Some(code) = present(&request.item_code) {
            query = query.filter(
                Column::ItemId.in_subquery(
                    Query::select()
                        .column(item_master::Column::Id)
                        .from(item_master::Entity)
                        .and_where(item_master::Column::ItemCode.eq(code))
                        .to_owned(),
                ),
            );
        }
        if let Some(code) = present(&request.operation) {
            query = query.filter(
                Column::OperationId.in_subquery(
                    Query::select()
                        .column(operation_master::Column::Id)
                        .from(operation_master::Entity)
                        .and_where(operation_master::Column::OperationCode.eq(code))
                        .to_owned(),
                ),
            );
        }
        if let Some(value) = present(&request.parameter) {
            let ids = parameter_ids_by_name_or_code(db, value).await?;
            if ids.is_empty() {
                return Ok(InspectionFilterResponse::default());
            }
            query = query.filter(Condition::all().add(Column::ParameterId.is_in(ids)));
        }

        let schedules = query.all(db).await?;
        let rows: Vec<ScheduleRow> = schedules.iter().cloned().map(ScheduleRow::from).collect();
        let labels = load_labels(db, ItemCatalog::Standard, &rows).await?;

        let inspections = schedules
            .into_iter()
            .map(|s| InspectionSummary {
                item_code: labels.items.get(&s.item_id).map(|i| i.code.clone()),
                operation_code: s
                    .operation_id
                    .and_then(|id| labels.operations.get(&id))
                    .map(|o| o.code.clone()),
                building_code: labels.buildings.get(&s.building_id).map(|b| b.code.clone()),
                plant_code: labels.plants.get(&s.plant_id).map(|p| p.code.clone()),
                id: s.id,
                inspection_parameter_name: s.inspection_parameter_name,
                lsl: s.lsl,
                target_value: s.target_value,
                usl: s.usl,
                sample_size: s.sample_size,
                inspection_frequency: s.inspection_frequency,
                inspection_method: s.inspection_method,
                recording_type: s.recording_type,
                likely_defects_classification: s.likely_defects_classification,
                remarks: s.remarks,
            })
            .collect();

        Ok(InspectionFilterResponse { inspections })
    }
}

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::entities::{building_section, item_master, operation_master, parameter, plant};
use crate::errors::ServiceError;
use crate::repositories::records::{active, deactivate, find_active, SoftDeletable};

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct PlantInput {
    #[validate(length(min = 1, max = 255))]
    pub plant_code: String,
    #[validate(length(max = 255))]
    pub plant_name: Option<String>,
    pub plant_address: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct BuildingInput {
    pub plant_id: i64,
    #[validate(length(min = 1, max = 255))]
    pub building_code: String,
    #[validate(length(max = 255))]
    pub building_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct ItemInput {
    pub plant_id: i64,
    pub building_id: i64,
    #[validate(length(min = 1, max = 255))]
    pub item_code: String,
    #[validate(length(max = 255))]
    pub item_description: Option<String>,
    #[validate(length(max = 255))]
    pub unit: Option<String>,
    #[validate(length(max = 255))]
    pub item_type: Option<String>,
    #[validate(length(max = 255))]
    pub end_store: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct OperationInput {
    pub plant_id: i64,
    pub building_id: i64,
    pub item_id: i64,
    #[validate(length(min = 1, max = 255))]
    pub operation_code: String,
    #[validate(length(max = 255))]
    pub operation_name: Option<String>,
    #[validate(length(max = 255))]
    pub operation_description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct ParameterInput {
    pub plant_id: i64,
    #[validate(length(min = 1, max = 255))]
    pub parameter_code: String,
    #[validate(length(max = 255))]
    pub parameter_name: Option<String>,
    #[validate(length(max = 255))]
    pub parameter_description: Option<String>,
}

/// List filters for buildings, operations and parameters. Ids are master
/// primary keys.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MasterListFilter {
    pub plant: Option<i64>,
    pub building: Option<i64>,
    pub item: Option<i64>,
    pub item_type: Option<String>,
}

/// CRUD over the plant, building, item, operation and parameter masters.
///
/// Composite business keys are checked before writing so duplicates surface
/// as conflicts rather than storage errors.
#[derive(Clone)]
pub struct MasterDataService {
    db: Arc<DatabaseConnection>,
}

fn not_found<E: SoftDeletable>(id: i64) -> ServiceError {
    ServiceError::NotFound(format!("{} {} not found", E::LABEL, id))
}

impl MasterDataService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn get_active<E: SoftDeletable>(&self, id: i64) -> Result<E::Model, ServiceError> {
        find_active::<E, _>(self.db.as_ref(), id)
            .await
            .map_err(|e| {
                error!("Failed to load {} {}: {}", E::LABEL, id, e);
                ServiceError::db_error(e)
            })?
            .ok_or_else(|| not_found::<E>(id))
    }

    /// Referenced masters must exist and be active.
    async fn referenced<E: SoftDeletable>(&self, id: i64) -> Result<E::Model, ServiceError> {
        find_active::<E, _>(self.db.as_ref(), id)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::InvalidInput(format!("{} {} does not exist", E::LABEL, id))
            })
    }

    async fn remove<E: SoftDeletable>(&self, id: i64) -> Result<(), ServiceError> {
        let removed = deactivate::<E, _>(self.db.as_ref(), id)
            .await
            .map_err(ServiceError::db_error)?;
        if !removed {
            return Err(not_found::<E>(id));
        }
        info!("{} {} deactivated", E::LABEL, id);
        Ok(())
    }

    // Plants

    #[instrument(skip(self))]
    pub async fn list_plants(&self) -> Result<Vec<plant::Model>, ServiceError> {
        active::<plant::Entity>()
            .all(self.db.as_ref())
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn get_plant(&self, id: i64) -> Result<plant::Model, ServiceError> {
        self.get_active::<plant::Entity>(id).await
    }

    async fn ensure_plant_code_free(&self, code: &str, current: Option<i64>) -> Result<(), ServiceError> {
        let mut query = plant::Entity::find().filter(plant::Column::PlantCode.eq(code));
        if let Some(id) = current {
            query = query.filter(plant::Column::Id.ne(id));
        }
        if query.one(self.db.as_ref()).await?.is_some() {
            return Err(ServiceError::Conflict(format!("plant {} already exists", code)));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn create_plant(&self, input: PlantInput) -> Result<plant::Model, ServiceError> {
        input.validate()?;
        self.ensure_plant_code_free(&input.plant_code, None).await?;

        let now = Utc::now();
        let model = plant::ActiveModel {
            plant_code: Set(input.plant_code),
            plant_name: Set(input.plant_name),
            plant_address: Set(input.plant_address),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await
        .map_err(|e| {
            error!("Failed to create plant: {}", e);
            ServiceError::db_error(e)
        })?;

        info!(plant_id = model.id, "plant created");
        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn update_plant(&self, id: i64, input: PlantInput) -> Result<plant::Model, ServiceError> {
        input.validate()?;
        let existing = self.get_active::<plant::Entity>(id).await?;
        self.ensure_plant_code_free(&input.plant_code, Some(id)).await?;

        let mut model: plant::ActiveModel = existing.into();
        model.plant_code = Set(input.plant_code);
        model.plant_name = Set(input.plant_name);
        model.plant_address = Set(input.plant_address);
        model.updated_at = Set(Utc::now());
        model
            .update(self.db.as_ref())
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn delete_plant(&self, id: i64) -> Result<(), ServiceError> {
        self.remove::<plant::Entity>(id).await
    }

    // Buildings

    #[instrument(skip(self))]
    pub async fn list_buildings(
        &self,
        filter: &MasterListFilter,
    ) -> Result<Vec<building_section::Model>, ServiceError> {
        let mut query = active::<building_section::Entity>();
        if let Some(plant_id) = filter.plant {
            query = query.filter(building_section::Column::PlantId.eq(plant_id));
        }
        query
            .all(self.db.as_ref())
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn get_building(&self, id: i64) -> Result<building_section::Model, ServiceError> {
        self.get_active::<building_section::Entity>(id).await
    }

    async fn ensure_building_free(
        &self,
        input: &BuildingInput,
        current: Option<i64>,
    ) -> Result<(), ServiceError> {
        let mut query = building_section::Entity::find()
            .filter(building_section::Column::PlantId.eq(input.plant_id))
            .filter(building_section::Column::BuildingCode.eq(input.building_code.as_str()));
        if let Some(id) = current {
            query = query.filter(building_section::Column::Id.ne(id));
        }
        if query.one(self.db.as_ref()).await?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "building {} already exists in plant {}",
                input.building_code, input.plant_id
            )));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn create_building(
        &self,
        input: BuildingInput,
    ) -> Result<building_section::Model, ServiceError> {
        input.validate()?;
        self.referenced::<plant::Entity>(input.plant_id).await?;
        self.ensure_building_free(&input, None).await?;

        let now = Utc::now();
        let model = building_section::ActiveModel {
            plant_id: Set(input.plant_id),
            building_code: Set(input.building_code),
            building_name: Set(input.building_name),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await
        .map_err(|e| {
            error!("Failed to create building: {}", e);
            ServiceError::db_error(e)
        })?;

        info!(building_id = model.id, "building created");
        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn update_building(
        &self,
        id: i64,
        input: BuildingInput,
    ) -> Result<building_section::Model, ServiceError> {
        input.validate()?;
        let existing = self.get_active::<building_section::Entity>(id).await?;
        self.referenced::<plant::Entity>(input.plant_id).await?;
        self.ensure_building_free(&input, Some(id)).await?;

        let mut model: building_section::ActiveModel = existing.into();
        model.plant_id = Set(input.plant_id);
        model.building_code = Set(input.building_code);
        model.building_name = Set(input.building_name);
        model.updated_at = Set(Utc::now());
        model
            .update(self.db.as_ref())
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn delete_building(&self, id: i64) -> Result<(), ServiceError> {
        self.remove::<building_section::Entity>(id).await
    }

    // Items

    #[instrument(skip(self))]
    pub async fn list_items(
        &self,
        filter: &MasterListFilter,
    ) -> Result<Vec<item_master::Model>, ServiceError> {
        let mut query = active::<item_master::Entity>();
        if let Some(plant_id) = filter.plant {
            query = query.filter(item_master::Column::PlantId.eq(plant_id));
        }
        if let Some(building_id) = filter.building {
            query = query.filter(item_master::Column::BuildingId.eq(building_id));
        }
        if let Some(item_type) = filter.item_type.as_deref().filter(|t| !t.is_empty()) {
            query = query.filter(item_master::Column::ItemType.eq(item_type));
        }
        query
            .all(self.db.as_ref())
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn get_item(&self, id: i64) -> Result<item_master::Model, ServiceError> {
        self.get_active::<item_master::Entity>(id).await
    }

    /// The building must exist and sit in the item's plant.
    async fn check_item_references(&self, input: &ItemInput) -> Result<(), ServiceError> {
        self.referenced::<plant::Entity>(input.plant_id).await?;
        let building = self
            .referenced::<building_section::Entity>(input.building_id)
            .await?;
        if building.plant_id != input.plant_id {
            return Err(ServiceError::InvalidInput(format!(
                "building {} does not belong to plant {}",
                input.building_id, input.plant_id
            )));
        }
        Ok(())
    }

    async fn ensure_item_free(&self, input: &ItemInput, current: Option<i64>) -> Result<(), ServiceError> {
        let mut query = item_master::Entity::find()
            .filter(item_master::Column::PlantId.eq(input.plant_id))
            .filter(item_master::Column::BuildingId.eq(input.building_id))
            .filter(item_master::Column::ItemCode.eq(input.item_code.as_str()));
        if let Some(id) = current {
            query = query.filter(item_master::Column::Id.ne(id));
        }
        if query.one(self.db.as_ref()).await?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "item {} already exists in building {}",
                input.item_code, input.building_id
            )));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn create_item(&self, input: ItemInput) -> Result<item_master::Model, ServiceError> {
        input.validate()?;
        self.check_item_references(&input).await?;
        self.ensure_item_free(&input, None).await?;

        let now = Utc::now();
        let model = item_master::ActiveModel {
            plant_id: Set(input.plant_id),
            building_id: Set(input.building_id),
            item_code: Set(input.item_code),
            item_description: Set(input.item_description),
            unit: Set(input.unit),
            item_type: Set(input.item_type),
            end_store: Set(input.end_store),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await
        .map_err(|e| {
            error!("Failed to create item: {}", e);
            ServiceError::db_error(e)
        })?;

        info!(item_id = model.id, "item created");
        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn update_item(&self, id: i64, input: ItemInput) -> Result<item_master::Model, ServiceError> {
        input.validate()?;
        let existing = self.get_active::<item_master::Entity>(id).await?;
        self.check_item_references(&input).await?;
        self.ensure_item_free(&input, Some(id)).await?;

        let mut model: item_master::ActiveModel = existing.into();
        model.plant_id = Set(input.plant_id);
        model.building_id = Set(input.building_id);
        model.item_code = Set(input.item_code);
        model.item_description = Set(input.item_description);
        model.unit = Set(input.unit);
        model.item_type = Set(input.item_type);
        model.end_store = Set(input.end_store);
        model.updated_at = Set(Utc::now());
        model
            .update(self.db.as_ref())
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn delete_item(&self, id: i64) -> Result<(), ServiceError> {
        self.remove::<item_master::Entity>(id).await
    }

    // Operations

    #[instrument(skip(self))]
    pub async fn list_operations(
        &self,
        filter: &MasterListFilter,
    ) -> Result<Vec<operation_master::Model>, ServiceError> {
        let mut query = active::<operation_master::Entity>();
        if let Some(plant_id) = filter.plant {
            query = query.filter(operation_master::Column::PlantId.eq(plant_id));
        }
        if let Some(building_id) = filter.building {
            query = query.filter(operation_master::Column::BuildingId.eq(building_id));
        }
        if let Some(item_id) = filter.item {
            query = query.filter(operation_master::Column::ItemId.eq(item_id));
        }
        query
            .all(self.db.as_ref())
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn get_operation(&self, id: i64) -> Result<operation_master::Model, ServiceError> {
        self.get_active::<operation_master::Entity>(id).await
    }

    /// The item must exist and sit in the operation's building.
    async fn check_operation_references(&self, input: &OperationInput) -> Result<(), ServiceError> {
        self.referenced::<plant::Entity>(input.plant_id).await?;
        self.referenced::<building_section::Entity>(input.building_id)
            .await?;
        let item = self.referenced::<item_master::Entity>(input.item_id).await?;
        if item.building_id != input.building_id {
            return Err(ServiceError::InvalidInput(format!(
                "item {} does not belong to building {}",
                input.item_id, input.building_id
            )));
        }
        Ok(())
    }

    async fn ensure_operation_free(
        &self,
        input: &OperationInput,
        current: Option<i64>,
    ) -> Result<(), ServiceError> {
        let mut query = operation_master::Entity::find()
            .filter(operation_master::Column::BuildingId.eq(input.building_id))
            .filter(operation_master::Column::ItemId.eq(input.item_id))
            .filter(operation_master::Column::OperationCode.eq(input.operation_code.as_str()));
        if let Some(id) = current {
            query = query.filter(operation_master::Column::Id.ne(id));
        }
        if query.one(self.db.as_ref()).await?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "operation {} already exists for item {}",
                input.operation_code, input.item_id
            )));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn create_operation(
        &self,
        input: OperationInput,
    ) -> Result<operation_master::Model, ServiceError> {
        input.validate()?;
        self.check_operation_references(&input).await?;
        self.ensure_operation_free(&input, None).await?;

        let now = Utc::now();
        let model = operation_master::ActiveModel {
            plant_id: Set(input.plant_id),
            building_id: Set(input.building_id),
            item_id: Set(input.item_id),
            operation_code: Set(input.operation_code),
            operation_name: Set(input.operation_name),
            operation_description: Set(input.operation_description),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await
        .map_err(|e| {
            error!("Failed to create operation: {}", e);
            ServiceError::db_error(e)
        })?;

        info!(operation_id = model.id, "operation created");
        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn update_operation(
        &self,
        id: i64,
        input: OperationInput,
    ) -> Result<operation_master::Model, ServiceError> {
        input.validate()?;
        let existing = self.get_active::<operation_master::Entity>(id).await?;
        self.check_operation_references(&input).await?;
        self.ensure_operation_free(&input, Some(id)).await?;

        let mut model: operation_master::ActiveModel = existing.into();
        model.plant_id = Set(input.plant_id);
        model.building_id = Set(input.building_id);
        model.item_id = Set(input.item_id);
        model.operation_code = Set(input.operation_code);
        model.operation_name = Set(input.operation_name);
        model.operation_description = Set(input.operation_description);
        model.updated_at = Set(Utc::now());
        model
            .update(self.db.as_ref())
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn delete_operation(&self, id: i64) -> Result<(), ServiceError> {
        self.remove::<operation_master::Entity>(id).await
    }

    // Parameters

    #[instrument(skip(self))]
    pub async fn list_parameters(
        &self,
        filter: &MasterListFilter,
    ) -> Result<Vec<parameter::Model>, ServiceError> {
        let mut query = active::<parameter::Entity>();
        if let Some(plant_id) = filter.plant {
            query = query.filter(parameter::Column::PlantId.eq(plant_id));
        }
        query
            .all(self.db.as_ref())
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn get_parameter(&self, id: i64) -> Result<parameter::Model, ServiceError> {
        self.get_active::<parameter::Entity>(id).await
    }

    async fn ensure_parameter_free(
        &self,
        input: &ParameterInput,
        current: Option<i64>,
    ) -> Result<(), ServiceError> {
        let Some(name) = input.parameter_name.as_deref() else {
            return Ok(());
        };
        let mut query = parameter::Entity::find()
            .filter(parameter::Column::PlantId.eq(input.plant_id))
            .filter(parameter::Column::ParameterName.eq(name));
        if let Some(id) = current {
            query = query.filter(parameter::Column::Id.ne(id));
        }
        if query.one(self.db.as_ref()).await?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "parameter {} already exists in plant {}",
                name, input.plant_id
            )));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn create_parameter(
        &self,
        input: ParameterInput,
    ) -> Result<parameter::Model, ServiceError> {
        input.validate()?;
        self.referenced::<plant::Entity>(input.plant_id).await?;
        self.ensure_parameter_free(&input, None).await?;

        let now = Utc::now();
        let model = parameter::ActiveModel {
            plant_id: Set(input.plant_id),
            parameter_code: Set(input.parameter_code),
            parameter_name: Set(input.parameter_name),
            parameter_description: Set(input.parameter_description),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await
        .map_err(|e| {
            error!("Failed to create parameter: {}", e);
            ServiceError::db_error(e)
        })?;

        info!(parameter_id = model.id, "parameter created");
        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn update_parameter(
        &self,
        id: i64,
        input: ParameterInput,
    ) -> Result<parameter::Model, ServiceError> {
        input.validate()?;
        let existing = self.get_active::<parameter::Entity>(id).await?;
        self.referenced::<plant::Entity>(input.plant_id).await?;
        self.ensure_parameter_free(&input, Some(id)).await?;

        let mut model: parameter::ActiveModel = existing.into();
        model.plant_id = Set(input.plant_id);
        model.parameter_code = Set(input.parameter_code);
        model.parameter_name = Set(input.parameter_name);
        model.parameter_description = Set(input.parameter_description);
        model.updated_at = Set(Utc::now());
        model
            .update(self.db.as_ref())
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn delete_parameter(&self, id: i64) -> Result<(), ServiceError> {
        self.remove::<parameter::Entity>(id).await
    }
}

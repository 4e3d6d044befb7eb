use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;

use crate::entities::{building_section, item_master, operation_master, parameter, plant};
use crate::errors::ServiceError;
use crate::repositories::records::active;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PlantOption {
    pub id: i64,
    pub plant_code: String,
    pub plant_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ItemOption {
    pub id: i64,
    pub item_code: String,
    pub item_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ParameterOption {
    pub id: i64,
    pub parameter_code: String,
    pub parameter_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OperationOption {
    pub id: i64,
    pub operation_code: String,
    pub operation_name: Option<String>,
}

/// Lookup lists loaded once by the inspection entry screens.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct InitialData {
    pub plants: Vec<PlantOption>,
    pub items: Vec<ItemOption>,
    pub parameters: Vec<ParameterOption>,
    pub operations: Vec<OperationOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SectionOption {
    pub id: i64,
    pub building_code: String,
    pub building_name: Option<String>,
}

#[derive(Clone)]
pub struct ReferenceDataService {
    db: Arc<DatabaseConnection>,
}

impl ReferenceDataService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn initial_data(&self) -> Result<InitialData, ServiceError> {
        let db = self.db.as_ref();

        let plants = active::<plant::Entity>()
            .all(db)
            .await?
            .into_iter()
            .map(|p| PlantOption {
                id: p.id,
                plant_code: p.plant_code,
                plant_name: p.plant_name,
            })
            .collect();
        let items = active::<item_master::Entity>()
            .all(db)
            .await?
            .into_iter()
            .map(|i| ItemOption {
                id: i.id,
                item_code: i.item_code,
                item_description: i.item_description,
            })
            .collect();
        let parameters = active::<parameter::Entity>()
            .all(db)
            .await?
            .into_iter()
            .map(|p| ParameterOption {
                id: p.id,
                parameter_code: p.parameter_code,
                parameter_name: p.parameter_name,
            })
            .collect();
        let operations = active::<operation_master::Entity>()
            .all(db)
            .await?
            .into_iter()
            .map(|o| OperationOption {
                id: o.id,
                operation_code: o.operation_code,
                operation_name: o.operation_name,
            })
            .collect();

        Ok(InitialData {
            plants,
            items,
            parameters,
            operations,
        })
    }

    /// Sections of the plant with `plant_code`.
    #[instrument(skip(self))]
    pub async fn sections_by_factory(
        &self,
        plant_code: &str,
    ) -> Result<Vec<SectionOption>, ServiceError> {
        let db = self.db.as_ref();
        let plant = plant::Entity::find()
            .filter(plant::Column::PlantCode.eq(plant_code))
            .filter(plant::Column::IsActive.eq(true))
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("factory {} not found", plant_code)))?;

        let sections = active::<building_section::Entity>()
            .filter(building_section::Column::PlantId.eq(plant.id))
            .all(db)
            .await?
            .into_iter()
            .map(|s| SectionOption {
                id: s.id,
                building_code: s.building_code,
                building_name: s.building_name,
            })
            .collect();
        Ok(sections)
    }
}

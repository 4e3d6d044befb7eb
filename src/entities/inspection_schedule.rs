use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standard schedule shared by the Inward and In-process pipelines; `inspection_type` tells them apart.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = InspectionSchedule)]
#[sea_orm(table_name = "inspection_schedules")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub plant_id: i64,
    pub building_id: i64,
    pub item_id: i64,
    pub operation_id: Option<i64>,
    pub parameter_id: i64,
    pub end_store: Option<String>,
    pub inspection_parameter_name: Option<String>,
    pub short_text: Option<String>,
    pub inspection_type: Option<String>,
    pub lsl: Option<f64>,
    pub target_value: Option<f64>,
    pub usl: Option<f64>,
    pub sample_size: Option<i32>,
    pub inspection_frequency: Option<String>,
    pub inspection_method: Option<String>,
    pub machine_type: Option<String>,
    pub recording_type: Option<String>,
    pub attachment_document: Option<String>,
    pub control_limit: Option<String>,
    pub likely_defects_classification: Option<String>,
    pub remarks: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::plant::Entity",
        from = "Column::PlantId",
        to = "super::plant::Column::Id"
    )]
    Plant,
    #[sea_orm(
        belongs_to = "super::building_section::Entity",
        from = "Column::BuildingId",
        to = "super::building_section::Column::Id"
    )]
    BuildingSection,
    #[sea_orm(
        belongs_to = "super::item_master::Entity",
        from = "Column::ItemId",
        to = "super::item_master::Column::Id"
    )]
    Item,
    #[sea_orm(
        belongs_to = "super::operation_master::Entity",
        from = "Column::OperationId",
        to = "super::operation_master::Column::Id"
    )]
    Operation,
    #[sea_orm(
        belongs_to = "super::parameter::Entity",
        from = "Column::ParameterId",
        to = "super::parameter::Column::Id"
    )]
    Parameter,
}

impl ActiveModelBehavior for ActiveModel {}

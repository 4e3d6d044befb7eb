use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standard item catalog used by Inward and In-process schedules.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = ItemMaster)]
#[sea_orm(table_name = "item_masters")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub plant_id: i64,
    pub building_id: i64,
    pub item_code: String,
    pub item_description: Option<String>,
    pub unit: Option<String>,
    pub item_type: Option<String>,
    pub end_store: Option<String>,
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
    #[sea_orm(has_many = "super::operation_master::Entity")]
    Operations,
}

impl Related<super::plant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Plant.def()
    }
}

impl Related<super::building_section::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BuildingSection.def()
    }
}

impl Related<super::operation_master::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Operations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

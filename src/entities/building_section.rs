use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A building, section or lab inside a plant.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = BuildingSection)]
#[sea_orm(table_name = "building_sections")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub plant_id: i64,
    pub building_code: String,
    pub building_name: Option<String>,
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
    #[sea_orm(has_many = "super::item_master::Entity")]
    ItemMasters,
}

impl Related<super::plant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Plant.def()
    }
}

impl Related<super::item_master::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ItemMasters.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

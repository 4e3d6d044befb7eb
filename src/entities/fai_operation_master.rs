use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fai_operation_masters")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub plant_id: i64,
    pub building_id: i64,
    pub item_id: i64,
    pub operation_code: String,
    pub operation_name: Option<String>,
    pub operation_description: Option<String>,
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
        belongs_to = "super::fai_item_master::Entity",
        from = "Column::ItemId",
        to = "super::fai_item_master::Column::Id"
    )]
    Item,
}

impl Related<super::fai_item_master::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Item.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

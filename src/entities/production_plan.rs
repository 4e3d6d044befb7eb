use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Production order, addressed by its business `order_number`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = ProductionPlan)]
#[sea_orm(table_name = "production_plans")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub order_number: String,
    pub lot_number: Option<String>,
    pub lot_qty: Option<i32>,
    pub item_desc: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub target_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub customer_name: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub stop_time: Option<DateTime<Utc>>,
    pub item_id: Option<i64>,
    pub section_id: Option<i64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::item_master::Entity",
        from = "Column::ItemId",
        to = "super::item_master::Column::Id"
    )]
    Item,
    #[sea_orm(
        belongs_to = "super::building_section::Entity",
        from = "Column::SectionId",
        to = "super::building_section::Column::Id"
    )]
    Section,
}

impl ActiveModelBehavior for ActiveModel {}

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inprocess_actual_readings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub reading_id: i64,
    pub r_key: Option<String>,
    pub r_value: Option<f64>,
    pub created_by: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::inprocess_inspection_reading::Entity",
        from = "Column::ReadingId",
        to = "super::inprocess_inspection_reading::Column::Id"
    )]
    Reading,
}

impl Related<super::inprocess_inspection_reading::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reading.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Inward (raw-material) reading, keyed to an internal order via `io_no`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rm_inspection_readings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub schedule_id: i64,
    pub io_no: Option<String>,
    pub machine_id: Option<String>,
    pub input_type: Option<String>,
    pub remarks: Option<String>,
    pub attachment_document: Option<String>,
    pub created_by: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::inspection_schedule::Entity",
        from = "Column::ScheduleId",
        to = "super::inspection_schedule::Column::Id"
    )]
    Schedule,
    #[sea_orm(has_many = "super::rm_actual_reading::Entity")]
    ActualReadings,
}

impl Related<super::inspection_schedule::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Schedule.def()
    }
}

impl Related<super::rm_actual_reading::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ActualReadings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

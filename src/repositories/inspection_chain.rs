//! Table access for the schedule -> reading -> actual-reading chain.
//!
//! Each inspection family stores its chain in its own tables. The traversal
//! only sees the normalized rows defined here, so it is written once and the
//! per-family differences stay behind [`ReadingChainTables`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, Condition, DatabaseTransaction, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Select,
};

use super::find_in_chunks;
use crate::entities::{
    fai_actual_reading, fai_inspection_reading, fai_inspection_schedule,
    inprocess_actual_reading, inprocess_inspection_reading, inspection_schedule,
    rm_actual_reading, rm_inspection_reading,
};
use crate::models::InspectionFamily;

/// Master-id restrictions applied to schedule selection. `None` leaves a
/// dimension unconstrained.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScheduleScope {
    pub plant_ids: Option<Vec<i64>>,
    pub building_ids: Option<Vec<i64>>,
    pub item_ids: Option<Vec<i64>>,
    pub operation_ids: Option<Vec<i64>>,
    pub parameter: Option<ParameterMatch>,
}

/// A parameter filter matches the schedule's own parameter name or any of
/// the active parameter masters whose name or code equals the filter.
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterMatch {
    pub name: String,
    pub parameter_ids: Vec<i64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScheduleRow {
    pub id: i64,
    pub plant_id: i64,
    pub building_id: i64,
    pub item_id: i64,
    pub operation_id: Option<i64>,
    pub parameter_id: i64,
    pub inspection_parameter_name: Option<String>,
    pub lsl: Option<f64>,
    pub target_value: Option<f64>,
    pub usl: Option<f64>,
    pub sample_size: Option<i32>,
    pub inspection_method: Option<String>,
    pub recording_type: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReadingRow {
    pub id: i64,
    pub schedule_id: i64,
    /// Value of the family's order column (`io_no` or `po_no`).
    pub order_no: Option<String>,
    pub machine_id: Option<String>,
    pub input_type: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActualRow {
    pub id: i64,
    pub reading_id: i64,
    pub r_key: Option<String>,
    pub r_value: Option<f64>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Per-family access to the three chain levels. Every method returns active
/// rows only, ordered by id ascending within their parent.
#[async_trait]
pub trait ReadingChainTables: Send + Sync {
    fn family(&self) -> InspectionFamily;

    async fn schedules(
        &self,
        txn: &DatabaseTransaction,
        scope: &ScheduleScope,
    ) -> Result<Vec<ScheduleRow>, DbErr>;

    async fn readings(
        &self,
        txn: &DatabaseTransaction,
        schedule_ids: &[i64],
        order_no: Option<&str>,
    ) -> Result<Vec<ReadingRow>, DbErr>;

    async fn actuals(
        &self,
        txn: &DatabaseTransaction,
        reading_ids: &[i64],
    ) -> Result<Vec<ActualRow>, DbErr>;
}

pub struct InwardTables;
pub struct InProcessTables;
pub struct FinalTables;

static INWARD_TABLES: InwardTables = InwardTables;
static IN_PROCESS_TABLES: InProcessTables = InProcessTables;
static FINAL_TABLES: FinalTables = FinalTables;

pub fn chain_tables(family: InspectionFamily) -> &'static dyn ReadingChainTables {
    match family {
        InspectionFamily::Inward => &INWARD_TABLES,
        InspectionFamily::InProcess => &IN_PROCESS_TABLES,
        InspectionFamily::Final => &FINAL_TABLES,
    }
}

/// Column handles shared by both schedule tables.
struct ScheduleColumns<C> {
    id: C,
    is_active: C,
    plant_id: C,
    building_id: C,
    item_id: C,
    operation_id: C,
    parameter_id: C,
    parameter_name: C,
}

const STANDARD_SCHEDULE: ScheduleColumns<inspection_schedule::Column> = ScheduleColumns {
    id: inspection_schedule::Column::Id,
    is_active: inspection_schedule::Column::IsActive,
    plant_id: inspection_schedule::Column::PlantId,
    building_id: inspection_schedule::Column::BuildingId,
    item_id: inspection_schedule::Column::ItemId,
    operation_id: inspection_schedule::Column::OperationId,
    parameter_id: inspection_schedule::Column::ParameterId,
    parameter_name: inspection_schedule::Column::InspectionParameterName,
};

const FAI_SCHEDULE: ScheduleColumns<fai_inspection_schedule::Column> = ScheduleColumns {
    id: fai_inspection_schedule::Column::Id,
    is_active: fai_inspection_schedule::Column::IsActive,
    plant_id: fai_inspection_schedule::Column::PlantId,
    building_id: fai_inspection_schedule::Column::BuildingId,
    item_id: fai_inspection_schedule::Column::ItemId,
    operation_id: fai_inspection_schedule::Column::OperationId,
    parameter_id: fai_inspection_schedule::Column::ParameterId,
    parameter_name: fai_inspection_schedule::Column::InspectionParameterName,
};

fn scoped<E, C>(mut select: Select<E>, columns: &ScheduleColumns<C>, scope: &ScheduleScope) -> Select<E>
where
    E: EntityTrait<Column = C>,
    C: ColumnTrait,
{
    select = select.filter(columns.is_active.eq(true));

    let restrictions = [
        (columns.plant_id, &scope.plant_ids),
        (columns.building_id, &scope.building_ids),
        (columns.item_id, &scope.item_ids),
        (columns.operation_id, &scope.operation_ids),
    ];
    for (column, ids) in restrictions {
        if let Some(ids) = ids {
            select = select.filter(column.is_in(ids.iter().copied()));
        }
    }

    if let Some(parameter) = &scope.parameter {
        let mut matches = Condition::any().add(columns.parameter_name.eq(parameter.name.as_str()));
        if !parameter.parameter_ids.is_empty() {
            matches = matches.add(
                columns
                    .parameter_id
                    .is_in(parameter.parameter_ids.iter().copied()),
            );
        }
        select = select.filter(matches);
    }

    select.order_by_asc(columns.id)
}

impl From<inspection_schedule::Model> for ScheduleRow {
    fn from(m: inspection_schedule::Model) -> Self {
        Self {
            id: m.id,
            plant_id: m.plant_id,
            building_id: m.building_id,
            item_id: m.item_id,
            operation_id: m.operation_id,
            parameter_id: m.parameter_id,
            inspection_parameter_name: m.inspection_parameter_name,
            lsl: m.lsl,
            target_value: m.target_value,
            usl: m.usl,
            sample_size: m.sample_size,
            inspection_method: m.inspection_method,
            recording_type: m.recording_type,
        }
    }
}

impl From<fai_inspection_schedule::Model> for ScheduleRow {
    fn from(m: fai_inspection_schedule::Model) -> Self {
        Self {
            id: m.id,
            plant_id: m.plant_id,
            building_id: m.building_id,
            item_id: m.item_id,
            operation_id: m.operation_id,
            parameter_id: m.parameter_id,
            inspection_parameter_name: m.inspection_parameter_name,
            lsl: m.lsl,
            target_value: m.target_value,
            usl: m.usl,
            sample_size: m.sample_size,
            inspection_method: m.inspection_method,
            recording_type: m.recording_type,
        }
    }
}

async fn standard_schedules(
    txn: &DatabaseTransaction,
    family: InspectionFamily,
    scope: &ScheduleScope,
) -> Result<Vec<ScheduleRow>, DbErr> {
    let mut select = scoped(inspection_schedule::Entity::find(), &STANDARD_SCHEDULE, scope);
    if let Some(tag) = family.profile().schedule_type_tag {
        select = select.filter(inspection_schedule::Column::InspectionType.eq(tag));
    }
    let rows = select.all(txn).await?;
    Ok(rows.into_iter().map(ScheduleRow::from).collect())
}

async fn fai_schedules(
    txn: &DatabaseTransaction,
    _family: InspectionFamily,
    scope: &ScheduleScope,
) -> Result<Vec<ScheduleRow>, DbErr> {
    // FAI schedules are not partitioned by inspection_type.
    let rows = scoped(fai_inspection_schedule::Entity::find(), &FAI_SCHEDULE, scope)
        .all(txn)
        .await?;
    Ok(rows.into_iter().map(ScheduleRow::from).collect())
}

/// Implements [`ReadingChainTables`] for one family from its schedule loader,
/// reading and actual-reading entity modules, and the reading's order column.
macro_rules! reading_chain_tables {
    ($(
        $tables:ident => {
            family: $family:expr,
            schedules: $schedules:path,
            readings: $reading:ident,
            actuals: $actual:ident,
            order: $order_column:ident / $order_field:ident $(,)?
        }
    ),+ $(,)?) => {
        $(
            #[async_trait]
            impl ReadingChainTables for $tables {
                fn family(&self) -> InspectionFamily {
                    $family
                }

                async fn schedules(
                    &self,
                    txn: &DatabaseTransaction,
                    scope: &ScheduleScope,
                ) -> Result<Vec<ScheduleRow>, DbErr> {
                    $schedules(txn, self.family(), scope).await
                }

                async fn readings(
                    &self,
                    txn: &DatabaseTransaction,
                    schedule_ids: &[i64],
                    order_no: Option<&str>,
                ) -> Result<Vec<ReadingRow>, DbErr> {
                    use $reading::{Column, Entity};

                    let rows = find_in_chunks(txn, schedule_ids, |ids| {
                        let mut select = Entity::find()
                            .filter(Column::IsActive.eq(true))
                            .filter(Column::ScheduleId.is_in(ids));
                        if let Some(order_no) = order_no {
                            select = select.filter(Column::$order_column.eq(order_no));
                        }
                        select.order_by_asc(Column::Id)
                    })
                    .await?;

                    Ok(rows
                        .into_iter()
                        .map(|m| ReadingRow {
                            id: m.id,
                            schedule_id: m.schedule_id,
                            order_no: m.$order_field,
                            machine_id: m.machine_id,
                            input_type: m.input_type,
                            remarks: m.remarks,
                        })
                        .collect())
                }

                async fn actuals(
                    &self,
                    txn: &DatabaseTransaction,
                    reading_ids: &[i64],
                ) -> Result<Vec<ActualRow>, DbErr> {
                    use $actual::{Column, Entity};

                    let rows = find_in_chunks(txn, reading_ids, |ids| {
                        Entity::find()
                            .filter(Column::IsActive.eq(true))
                            .filter(Column::ReadingId.is_in(ids))
                            .order_by_asc(Column::Id)
                    })
                    .await?;

                    Ok(rows
                        .into_iter()
                        .map(|m| ActualRow {
                            id: m.id,
                            reading_id: m.reading_id,
                            r_key: m.r_key,
                            r_value: m.r_value,
                            created_by: m.created_by,
                            created_at: m.created_at,
                        })
                        .collect())
                }
            }
        )+
    };
}

reading_chain_tables! {
    InwardTables => {
        family: InspectionFamily::Inward,
        schedules: standard_schedules,
        readings: rm_inspection_reading,
        actuals: rm_actual_reading,
        order: IoNo / io_no,
    },
    InProcessTables => {
        family: InspectionFamily::InProcess,
        schedules: standard_schedules,
        readings: inprocess_inspection_reading,
        actuals: inprocess_actual_reading,
        order: PoNo / po_no,
    },
    FinalTables => {
        family: InspectionFamily::Final,
        schedules: fai_schedules,
        readings: fai_inspection_reading,
        actuals: fai_actual_reading,
        order: PoNo / po_no,
    },
}

//! Code-to-id resolution and label lookup against the master tables.

use sea_orm::{ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QuerySelect};
use std::collections::HashMap;
use tracing::debug;

use super::inspection_chain::{ParameterMatch, ScheduleRow, ScheduleScope};
use super::{find_in_chunks, unique_ids};
use crate::entities::{
    building_section, fai_item_master, fai_operation_master, item_master, operation_master,
    parameter, plant,
};
use crate::models::ItemCatalog;

/// Business-code filters as they arrive from callers, already trimmed.
#[derive(Clone, Copy, Debug, Default)]
pub struct CodeFilters<'a> {
    pub plant_code: Option<&'a str>,
    pub building_code: Option<&'a str>,
    pub item_code: Option<&'a str>,
    pub operation_code: Option<&'a str>,
    pub parameter_name: Option<&'a str>,
}

/// Resolves code filters to active master ids.
///
/// Returns `Ok(None)` when an equality filter matches no active master, in
/// which case no schedule can match and callers skip the schedule tables.
pub async fn resolve_schedule_scope<C: ConnectionTrait>(
    conn: &C,
    catalog: ItemCatalog,
    filters: &CodeFilters<'_>,
) -> Result<Option<ScheduleScope>, DbErr> {
    let mut scope = ScheduleScope::default();

    if let Some(code) = filters.plant_code {
        let ids: Vec<i64> = plant::Entity::find()
            .select_only()
            .column(plant::Column::Id)
            .filter(plant::Column::PlantCode.eq(code))
            .filter(plant::Column::IsActive.eq(true))
            .into_tuple()
            .all(conn)
            .await?;
        if ids.is_empty() {
            debug!(plant_code = code, "no active plant matches filter");
            return Ok(None);
        }
        scope.plant_ids = Some(ids);
    }

    if let Some(code) = filters.building_code {
        let ids: Vec<i64> = building_section::Entity::find()
            .select_only()
            .column(building_section::Column::Id)
            .filter(building_section::Column::BuildingCode.eq(code))
            .filter(building_section::Column::IsActive.eq(true))
            .into_tuple()
            .all(conn)
            .await?;
        if ids.is_empty() {
            debug!(building_code = code, "no active building matches filter");
            return Ok(None);
        }
        scope.building_ids = Some(ids);
    }

    if let Some(code) = filters.item_code {
        let ids = item_ids_by_code(conn, catalog, code).await?;
        if ids.is_empty() {
            debug!(item_code = code, ?catalog, "no active item matches filter");
            return Ok(None);
        }
        scope.item_ids = Some(ids);
    }

    if let Some(code) = filters.operation_code {
        let ids = operation_ids_by_code(conn, catalog, code).await?;
        if ids.is_empty() {
            debug!(operation_code = code, ?catalog, "no active operation matches filter");
            return Ok(None);
        }
        scope.operation_ids = Some(ids);
    }

    if let Some(name) = filters.parameter_name {
        // An empty id list still lets the schedule's own name match.
        let parameter_ids = parameter_ids_by_name_or_code(conn, name).await?;
        scope.parameter = Some(ParameterMatch {
            name: name.to_string(),
            parameter_ids,
        });
    }

    Ok(Some(scope))
}

async fn item_ids_by_code<C: ConnectionTrait>(
    conn: &C,
    catalog: ItemCatalog,
    code: &str,
) -> Result<Vec<i64>, DbErr> {
    match catalog {
        ItemCatalog::Standard => {
            item_master::Entity::find()
                .select_only()
                .column(item_master::Column::Id)
                .filter(item_master::Column::ItemCode.eq(code))
                .filter(item_master::Column::IsActive.eq(true))
                .into_tuple()
                .all(conn)
                .await
        }
        ItemCatalog::FirstArticle => {
            fai_item_master::Entity::find()
                .select_only()
                .column(fai_item_master::Column::Id)
                .filter(fai_item_master::Column::ItemCode.eq(code))
                .filter(fai_item_master::Column::IsActive.eq(true))
                .into_tuple()
                .all(conn)
                .await
        }
    }
}

async fn operation_ids_by_code<C: ConnectionTrait>(
    conn: &C,
    catalog: ItemCatalog,
    code: &str,
) -> Result<Vec<i64>, DbErr> {
    match catalog {
        ItemCatalog::Standard => {
            operation_master::Entity::find()
                .select_only()
                .column(operation_master::Column::Id)
                .filter(operation_master::Column::OperationCode.eq(code))
                .filter(operation_master::Column::IsActive.eq(true))
                .into_tuple()
                .all(conn)
                .await
        }
        ItemCatalog::FirstArticle => {
            fai_operation_master::Entity::find()
                .select_only()
                .column(fai_operation_master::Column::Id)
                .filter(fai_operation_master::Column::OperationCode.eq(code))
                .filter(fai_operation_master::Column::IsActive.eq(true))
                .into_tuple()
                .all(conn)
                .await
        }
    }
}

/// Active parameter masters whose name or code equals `value`.
pub async fn parameter_ids_by_name_or_code<C: ConnectionTrait>(
    conn: &C,
    value: &str,
) -> Result<Vec<i64>, DbErr> {
    parameter::Entity::find()
        .select_only()
        .column(parameter::Column::Id)
        .filter(
            Condition::any()
                .add(parameter::Column::ParameterName.eq(value))
                .add(parameter::Column::ParameterCode.eq(value)),
        )
        .filter(parameter::Column::IsActive.eq(true))
        .into_tuple()
        .all(conn)
        .await
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeLabel {
    pub code: String,
    pub name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemLabel {
    pub code: String,
    pub description: Option<String>,
    pub unit: Option<String>,
}

/// Denormalized master labels for a batch of schedules, keyed by id.
///
/// Lookups ignore `is_active`: a schedule that is itself active still
/// reports the labels of masters that were retired after it was written.
#[derive(Debug, Default)]
pub struct MasterLabels {
    pub plants: HashMap<i64, CodeLabel>,
    pub buildings: HashMap<i64, CodeLabel>,
    pub items: HashMap<i64, ItemLabel>,
    pub operations: HashMap<i64, CodeLabel>,
    pub parameters: HashMap<i64, CodeLabel>,
}

pub async fn load_labels<C: ConnectionTrait>(
    conn: &C,
    catalog: ItemCatalog,
    schedules: &[ScheduleRow],
) -> Result<MasterLabels, DbErr> {
    let plant_ids = unique_ids(schedules.iter().map(|s| s.plant_id));
    let building_ids = unique_ids(schedules.iter().map(|s| s.building_id));
    let item_ids = unique_ids(schedules.iter().map(|s| s.item_id));
    let operation_ids = unique_ids(schedules.iter().filter_map(|s| s.operation_id));
    let parameter_ids = unique_ids(schedules.iter().map(|s| s.parameter_id));

    let plants = find_in_chunks(conn, &plant_ids, |ids| {
        plant::Entity::find().filter(plant::Column::Id.is_in(ids))
    })
    .await?
    .into_iter()
    .map(|m| {
        (
            m.id,
            CodeLabel {
                code: m.plant_code,
                name: m.plant_name,
            },
        )
    })
    .collect();

    let buildings = find_in_chunks(conn, &building_ids, |ids| {
        building_section::Entity::find().filter(building_section::Column::Id.is_in(ids))
    })
    .await?
    .into_iter()
    .map(|m| {
        (
            m.id,
            CodeLabel {
                code: m.building_code,
                name: m.building_name,
            },
        )
    })
    .collect();

    let parameters = find_in_chunks(conn, &parameter_ids, |ids| {
        parameter::Entity::find().filter(parameter::Column::Id.is_in(ids))
    })
    .await?
    .into_iter()
    .map(|m| {
        (
            m.id,
            CodeLabel {
                code: m.parameter_code,
                name: m.parameter_name,
            },
        )
    })
    .collect();

    let (items, operations) = match catalog {
        ItemCatalog::Standard => {
            let items = find_in_chunks(conn, &item_ids, |ids| {
                item_master::Entity::find().filter(item_master::Column::Id.is_in(ids))
            })
            .await?
            .into_iter()
            .map(|m| {
                (
                    m.id,
                    ItemLabel {
                        code: m.item_code,
                        description: m.item_description,
                        unit: m.unit,
                    },
                )
            })
            .collect();
            let operations = find_in_chunks(conn, &operation_ids, |ids| {
                operation_master::Entity::find().filter(operation_master::Column::Id.is_in(ids))
            })
            .await?
            .into_iter()
            .map(|m| {
                (
                    m.id,
                    CodeLabel {
                        code: m.operation_code,
                        name: m.operation_name,
                    },
                )
            })
            .collect();
            (items, operations)
        }
        ItemCatalog::FirstArticle => {
            let items = find_in_chunks(conn, &item_ids, |ids| {
                fai_item_master::Entity::find().filter(fai_item_master::Column::Id.is_in(ids))
            })
            .await?
            .into_iter()
            .map(|m| {
                (
                    m.id,
                    ItemLabel {
                        code: m.item_code,
                        description: m.item_description,
                        unit: m.unit,
                    },
                )
            })
            .collect();
            let operations = find_in_chunks(conn, &operation_ids, |ids| {
                fai_operation_master::Entity::find()
                    .filter(fai_operation_master::Column::Id.is_in(ids))
            })
            .await?
            .into_iter()
            .map(|m| {
                (
                    m.id,
                    CodeLabel {
                        code: m.operation_code,
                        name: m.operation_name,
                    },
                )
            })
            .collect();
            (items, operations)
        }
    };

    Ok(MasterLabels {
        plants,
        buildings,
        items,
        operations,
        parameters,
    })
}

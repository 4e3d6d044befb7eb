use metrics::{counter, histogram};
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, instrument};
use utoipa::ToSchema;

use crate::errors::ServiceError;
use crate::models::InspectionFamily;
use crate::repositories::inspection_chain::{chain_tables, ActualRow, ReadingRow};
use crate::repositories::reference_data::{load_labels, resolve_schedule_scope, CodeFilters};
use crate::services::projection::{flatten, FlattenedReading, ScheduleProjection};

/// Optional filters for reading resolution. Blank values count as absent.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ReadingFilters {
    pub plant_code: Option<String>,
    pub building_code: Option<String>,
    pub item_code: Option<String>,
    pub operation_code: Option<String>,
    pub parameter_name: Option<String>,
    /// Matched against the reading's order column (`io_no` or `po_no`).
    pub order_number: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl ReadingFilters {
    fn codes(&self) -> CodeFilters<'_> {
        CodeFilters {
            plant_code: present(&self.plant_code),
            building_code: present(&self.building_code),
            item_code: present(&self.item_code),
            operation_code: present(&self.operation_code),
            parameter_name: present(&self.parameter_name),
        }
    }

    fn order_number(&self) -> Option<&str> {
        present(&self.order_number)
    }
}

/// Resolved readings plus their count.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ReadingSet {
    pub readings: Vec<FlattenedReading>,
    pub count: usize,
}

impl ReadingSet {
    fn from_readings(readings: Vec<FlattenedReading>) -> Self {
        let count = readings.len();
        Self { readings, count }
    }
}

/// Walks schedule -> reading -> actual reading for one inspection family and
/// flattens the result.
#[derive(Clone)]
pub struct ReadingChainService {
    db: Arc<DatabaseConnection>,
}

impl ReadingChainService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Resolves every active actual reading under the schedules matching
    /// `filters`, ordered by schedule, reading and actual-reading id.
    ///
    /// All three levels are read inside one transaction.
    #[instrument(skip(self, filters), fields(inspection_type = %family))]
    pub async fn resolve_readings(
        &self,
        family: InspectionFamily,
        filters: &ReadingFilters,
    ) -> Result<ReadingSet, ServiceError> {
        let start = Instant::now();
        let family_label = family.to_string();

        let txn = self.db.begin().await.map_err(|e| {
            error!("Failed to open read transaction: {}", e);
            counter!("inspection_readings.errors", 1, "family" => family_label.clone());
            ServiceError::db_error(e)
        })?;

        match traverse(&txn, family, filters).await {
            Ok(set) => {
                txn.commit().await.map_err(ServiceError::db_error)?;
                histogram!("inspection_readings.duration", start.elapsed(), "family" => family_label.clone());
                counter!("inspection_readings.rows", set.count as u64, "family" => family_label);
                debug!(count = set.count, "resolved readings");
                Ok(set)
            }
            Err(e) => {
                if let Err(rollback) = txn.rollback().await {
                    error!("Failed to roll back read transaction: {}", rollback);
                }
                error!(error = %e, "reading resolution failed");
                counter!("inspection_readings.errors", 1, "family" => family_label);
                Err(e)
            }
        }
    }
}

async fn traverse(
    txn: &DatabaseTransaction,
    family: InspectionFamily,
    filters: &ReadingFilters,
) -> Result<ReadingSet, ServiceError> {
    let profile = family.profile();
    let tables = chain_tables(family);

    let Some(scope) = resolve_schedule_scope(txn, profile.item_catalog, &filters.codes()).await?
    else {
        return Ok(ReadingSet::default());
    };

    let schedules = tables.schedules(txn, &scope).await?;
    if schedules.is_empty() {
        return Ok(ReadingSet::default());
    }

    let labels = load_labels(txn, profile.item_catalog, &schedules).await?;
    let projections = schedules
        .iter()
        .map(|schedule| ScheduleProjection::resolve(schedule, &labels))
        .collect::<Result<Vec<_>, _>>()?;

    let schedule_ids: Vec<i64> = schedules.iter().map(|s| s.id).collect();
    let readings = tables
        .readings(txn, &schedule_ids, filters.order_number())
        .await?;
    if readings.is_empty() {
        return Ok(ReadingSet::default());
    }

    let reading_ids: Vec<i64> = readings.iter().map(|r| r.id).collect();
    let actuals = tables.actuals(txn, &reading_ids).await?;

    let mut readings_by_schedule: HashMap<i64, Vec<&ReadingRow>> = HashMap::new();
    for reading in &readings {
        readings_by_schedule
            .entry(reading.schedule_id)
            .or_default()
            .push(reading);
    }
    let mut actuals_by_reading: HashMap<i64, Vec<&ActualRow>> = HashMap::new();
    for actual in &actuals {
        actuals_by_reading
            .entry(actual.reading_id)
            .or_default()
            .push(actual);
    }

    let mut records = Vec::with_capacity(actuals.len());
    for (schedule, projection) in schedules.iter().zip(&projections) {
        let Some(schedule_readings) = readings_by_schedule.get(&schedule.id) else {
            continue;
        };
        for reading in schedule_readings {
            let Some(reading_actuals) = actuals_by_reading.get(&reading.id) else {
                continue;
            };
            for actual in reading_actuals {
                records.push(flatten(family, profile, projection, reading, actual));
            }
        }
    }

    Ok(ReadingSet::from_readings(records))
}

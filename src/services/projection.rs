//! Canonical output record for the reading resolver.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::ServiceError;
use crate::models::{FamilyProfile, InspectionFamily};
use crate::repositories::inspection_chain::{ActualRow, ReadingRow, ScheduleRow};
use crate::repositories::reference_data::MasterLabels;

/// One actual reading with its reading, schedule and master labels merged in.
/// The shape is identical for every inspection family.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FlattenedReading {
    pub inspection_type: InspectionFamily,

    pub schedule_id: i64,
    pub plant_code: String,
    pub plant_name: Option<String>,
    pub building_code: String,
    pub building_name: Option<String>,
    pub item_code: String,
    pub item_description: Option<String>,
    pub unit: Option<String>,
    pub operation_code: Option<String>,
    pub operation_name: Option<String>,
    pub parameter_name: Option<String>,
    pub lsl: Option<f64>,
    pub target_value: Option<f64>,
    pub usl: Option<f64>,
    pub sample_size: Option<i32>,
    pub inspection_method: Option<String>,
    pub recording_type: Option<String>,

    pub reading_id: i64,
    pub order_no: Option<String>,
    /// Source column of `order_no`: `io_no` or `po_no`.
    #[schema(example = "io_no")]
    pub order_field: String,
    pub machine_id: Option<String>,
    pub input_type: Option<String>,
    pub reading_remarks: Option<String>,

    pub actual_reading_id: i64,
    pub r_key: Option<String>,
    pub r_value: Option<f64>,
    pub recorded_by: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

/// Schedule-level fields shared by every record produced under one schedule.
#[derive(Clone, Debug)]
pub struct ScheduleProjection {
    schedule_id: i64,
    plant_code: String,
    plant_name: Option<String>,
    building_code: String,
    building_name: Option<String>,
    item_code: String,
    item_description: Option<String>,
    unit: Option<String>,
    operation_code: Option<String>,
    operation_name: Option<String>,
    parameter_name: Option<String>,
    lsl: Option<f64>,
    target_value: Option<f64>,
    usl: Option<f64>,
    sample_size: Option<i32>,
    inspection_method: Option<String>,
    recording_type: Option<String>,
}

fn dangling(schedule: &ScheduleRow, master: &str, id: i64) -> ServiceError {
    ServiceError::IntegrityError(format!(
        "schedule {} references missing {} {}",
        schedule.id, master, id
    ))
}

impl ScheduleProjection {
    /// Joins a schedule to its master labels. A reference to a master that
    /// does not exist is corrupt data and fails the whole request.
    pub fn resolve(schedule: &ScheduleRow, labels: &MasterLabels) -> Result<Self, ServiceError> {
        let plant = labels
            .plants
            .get(&schedule.plant_id)
            .ok_or_else(|| dangling(schedule, "plant", schedule.plant_id))?;
        let building = labels
            .buildings
            .get(&schedule.building_id)
            .ok_or_else(|| dangling(schedule, "building", schedule.building_id))?;
        let item = labels
            .items
            .get(&schedule.item_id)
            .ok_or_else(|| dangling(schedule, "item", schedule.item_id))?;
        let parameter = labels
            .parameters
            .get(&schedule.parameter_id)
            .ok_or_else(|| dangling(schedule, "parameter", schedule.parameter_id))?;
        let operation = match schedule.operation_id {
            Some(id) => Some(
                labels
                    .operations
                    .get(&id)
                    .ok_or_else(|| dangling(schedule, "operation", id))?,
            ),
            None => None,
        };

        let parameter_name = schedule
            .inspection_parameter_name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .or_else(|| parameter.name.clone());

        Ok(Self {
            schedule_id: schedule.id,
            plant_code: plant.code.clone(),
            plant_name: plant.name.clone(),
            building_code: building.code.clone(),
            building_name: building.name.clone(),
            item_code: item.code.clone(),
            item_description: item.description.clone(),
            unit: item.unit.clone(),
            operation_code: operation.map(|op| op.code.clone()),
            operation_name: operation.and_then(|op| op.name.clone()),
            parameter_name,
            lsl: schedule.lsl,
            target_value: schedule.target_value,
            usl: schedule.usl,
            sample_size: schedule.sample_size,
            inspection_method: schedule.inspection_method.clone(),
            recording_type: schedule.recording_type.clone(),
        })
    }
}

/// Builds one output record.
pub fn flatten(
    family: InspectionFamily,
    profile: &FamilyProfile,
    schedule: &ScheduleProjection,
    reading: &ReadingRow,
    actual: &ActualRow,
) -> FlattenedReading {
    FlattenedReading {
        inspection_type: family,
        schedule_id: schedule.schedule_id,
        plant_code: schedule.plant_code.clone(),
        plant_name: schedule.plant_name.clone(),
        building_code: schedule.building_code.clone(),
        building_name: schedule.building_name.clone(),
        item_code: schedule.item_code.clone(),
        item_description: schedule.item_description.clone(),
        unit: schedule.unit.clone(),
        operation_code: schedule.operation_code.clone(),
        operation_name: schedule.operation_name.clone(),
        parameter_name: schedule.parameter_name.clone(),
        lsl: schedule.lsl,
        target_value: schedule.target_value,
        usl: schedule.usl,
        sample_size: schedule.sample_size,
        inspection_method: schedule.inspection_method.clone(),
        recording_type: schedule.recording_type.clone(),
        reading_id: reading.id,
        order_no: reading.order_no.clone(),
        order_field: profile.order_field.to_string(),
        machine_id: reading.machine_id.clone(),
        input_type: reading.input_type.clone(),
        reading_remarks: reading.remarks.clone(),
        actual_reading_id: actual.id,
        r_key: actual.r_key.clone(),
        r_value: actual.r_value,
        recorded_by: actual.created_by.clone(),
        recorded_at: actual.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::reference_data::{CodeLabel, ItemLabel};
    use assert_matches::assert_matches;

    fn schedule(operation_id: Option<i64>, own_name: Option<&str>) -> ScheduleRow {
        ScheduleRow {
            id: 10,
            plant_id: 1,
            building_id: 2,
            item_id: 3,
            operation_id,
            parameter_id: 5,
            inspection_parameter_name: own_name.map(str::to_string),
            lsl: Some(9.5),
            target_value: Some(10.0),
            usl: Some(10.5),
            sample_size: Some(5),
            inspection_method: Some("Vernier".into()),
            recording_type: Some("Variable".into()),
        }
    }

    fn labels() -> MasterLabels {
        let mut labels = MasterLabels::default();
        labels.plants.insert(
            1,
            CodeLabel {
                code: "P1".into(),
                name: Some("Pune".into()),
            },
        );
        labels.buildings.insert(
            2,
            CodeLabel {
                code: "B1".into(),
                name: None,
            },
        );
        labels.items.insert(
            3,
            ItemLabel {
                code: "I1".into(),
                description: Some("Bracket".into()),
                unit: Some("mm".into()),
            },
        );
        labels.operations.insert(
            4,
            CodeLabel {
                code: "OP10".into(),
                name: Some("Turning".into()),
            },
        );
        labels.parameters.insert(
            5,
            CodeLabel {
                code: "WIDTH".into(),
                name: Some("Width".into()),
            },
        );
        labels
    }

    #[test]
    fn parameter_name_falls_back_to_master() {
        let projection = ScheduleProjection::resolve(&schedule(None, None), &labels()).unwrap();
        assert_eq!(projection.parameter_name.as_deref(), Some("Width"));
        assert!(projection.operation_code.is_none());

        let projection =
            ScheduleProjection::resolve(&schedule(Some(4), Some("Width (mm)")), &labels()).unwrap();
        assert_eq!(projection.parameter_name.as_deref(), Some("Width (mm)"));
        assert_eq!(projection.operation_code.as_deref(), Some("OP10"));
    }

    #[test]
    fn dangling_reference_is_integrity_error() {
        assert_matches!(
            ScheduleProjection::resolve(&schedule(Some(99), None), &labels()),
            Err(ServiceError::IntegrityError(msg)) if msg.contains("operation 99")
        );

        let mut missing_plant = labels();
        missing_plant.plants.clear();
        assert_matches!(
            ScheduleProjection::resolve(&schedule(None, None), &missing_plant),
            Err(ServiceError::IntegrityError(_))
        );
    }

    #[test]
    fn flatten_carries_order_field_from_profile() {
        let projection = ScheduleProjection::resolve(&schedule(None, None), &labels()).unwrap();
        let reading = ReadingRow {
            id: 20,
            schedule_id: 10,
            order_no: Some("IO-100".into()),
            machine_id: Some("M-1".into()),
            input_type: Some("manual".into()),
            remarks: None,
        };
        let actual = ActualRow {
            id: 30,
            reading_id: 20,
            r_key: Some("s1".into()),
            r_value: Some(10.02),
            created_by: Some("qa.lead".into()),
            created_at: Utc::now(),
        };

        let family = InspectionFamily::Inward;
        let record = flatten(family, family.profile(), &projection, &reading, &actual);
        assert_eq!(record.order_field, "io_no");
        assert_eq!(record.order_no.as_deref(), Some("IO-100"));
        assert_eq!(record.actual_reading_id, 30);
        assert_eq!(record.plant_code, "P1");
        assert_eq!(record.recorded_by.as_deref(), Some("qa.lead"));
    }
}

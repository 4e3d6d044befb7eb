use crate::errors::ServiceError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

/// The three inspection pipelines. Each has its own reading and
/// actual-reading tables; Final additionally has its own schedule, item and
/// operation tables.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum InspectionFamily {
    #[strum(serialize = "Inward")]
    #[serde(rename = "Inward")]
    Inward,
    #[strum(serialize = "In-process")]
    #[serde(rename = "In-process")]
    InProcess,
    #[strum(serialize = "Final")]
    #[serde(rename = "Final")]
    Final,
}

/// Which item/operation catalog a family's schedules point at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemCatalog {
    Standard,
    FirstArticle,
}

/// Static description of a family's storage layout.
#[derive(Debug, PartialEq, Eq)]
pub struct FamilyProfile {
    pub schedule_table: &'static str,
    pub reading_table: &'static str,
    pub actual_table: &'static str,
    /// Reading column holding the order number.
    pub order_field: &'static str,
    /// Value of `inspection_type` that selects this family's schedules.
    /// `None` selects every active schedule in the table.
    pub schedule_type_tag: Option<&'static str>,
    pub item_catalog: ItemCatalog,
}

static INWARD: FamilyProfile = FamilyProfile {
    schedule_table: "inspection_schedules",
    reading_table: "rm_inspection_readings",
    actual_table: "rm_actual_readings",
    order_field: "io_no",
    schedule_type_tag: Some("Inward"),
    item_catalog: ItemCatalog::Standard,
};

static IN_PROCESS: FamilyProfile = FamilyProfile {
    schedule_table: "inspection_schedules",
    reading_table: "inprocess_inspection_readings",
    actual_table: "inprocess_actual_readings",
    order_field: "po_no",
    schedule_type_tag: Some("In-process"),
    item_catalog: ItemCatalog::Standard,
};

static FINAL: FamilyProfile = FamilyProfile {
    schedule_table: "fai_inspection_schedules",
    reading_table: "fai_inspection_readings",
    actual_table: "fai_actual_readings",
    order_field: "po_no",
    schedule_type_tag: None,
    item_catalog: ItemCatalog::FirstArticle,
};

impl InspectionFamily {
    /// Parses the `inspection_type` request value. Absent, blank or unknown
    /// values are client errors.
    pub fn from_request(value: Option<&str>) -> Result<Self, ServiceError> {
        let raw = value.map(str::trim).filter(|v| !v.is_empty()).ok_or_else(|| {
            ServiceError::InvalidInput("inspection_type is required".to_string())
        })?;

        InspectionFamily::from_str(raw).map_err(|_| {
            ServiceError::InvalidInput(format!(
                "unknown inspection_type '{raw}', expected one of: Inward, In-process, Final"
            ))
        })
    }

    pub fn profile(self) -> &'static FamilyProfile {
        match self {
            InspectionFamily::Inward => &INWARD,
            InspectionFamily::InProcess => &IN_PROCESS,
            InspectionFamily::Final => &FINAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use strum::IntoEnumIterator;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!(
            InspectionFamily::from_request(Some("inward")).unwrap(),
            InspectionFamily::Inward
        );
        assert_eq!(
            InspectionFamily::from_request(Some("IN-PROCESS")).unwrap(),
            InspectionFamily::InProcess
        );
        assert_eq!(
            InspectionFamily::from_request(Some(" Final ")).unwrap(),
            InspectionFamily::Final
        );
    }

    #[test]
    fn missing_or_unknown_type_is_invalid_input() {
        assert_matches!(
            InspectionFamily::from_request(None),
            Err(ServiceError::InvalidInput(_))
        );
        assert_matches!(
            InspectionFamily::from_request(Some("  ")),
            Err(ServiceError::InvalidInput(_))
        );
        assert_matches!(
            InspectionFamily::from_request(Some("Bogus")),
            Err(ServiceError::InvalidInput(msg)) if msg.contains("Bogus")
        );
    }

    #[test]
    fn display_round_trips_through_parse() {
        for family in InspectionFamily::iter() {
            let label = family.to_string();
            assert_eq!(InspectionFamily::from_request(Some(&label)).unwrap(), family);
        }
    }

    #[test]
    fn order_field_follows_family() {
        assert_eq!(InspectionFamily::Inward.profile().order_field, "io_no");
        assert_eq!(InspectionFamily::InProcess.profile().order_field, "po_no");
        assert_eq!(InspectionFamily::Final.profile().order_field, "po_no");
        assert_eq!(
            InspectionFamily::Final.profile().item_catalog,
            ItemCatalog::FirstArticle
        );
        assert!(InspectionFamily::Final.profile().schedule_type_tag.is_none());
    }
}

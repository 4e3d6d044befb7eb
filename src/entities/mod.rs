//! SeaORM entities for the inspection schema.
//!
//! Masters: plants, buildings, items, operations, parameters and production
//! plans. Inspection chains: schedule -> reading -> actual reading, one set of
//! reading tables per family. Final inspections use their own item, operation
//! and schedule tables.

pub mod building_section;
pub mod fai_item_master;
pub mod fai_operation_master;
pub mod item_master;
pub mod operation_master;
pub mod parameter;
pub mod plant;
pub mod production_plan;

pub mod fai_inspection_schedule;
pub mod inspection_schedule;

pub mod fai_actual_reading;
pub mod fai_inspection_reading;
pub mod inprocess_actual_reading;
pub mod inprocess_inspection_reading;
pub mod rm_actual_reading;
pub mod rm_inspection_reading;

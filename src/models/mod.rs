pub mod inspection_family;

pub use inspection_family::{FamilyProfile, InspectionFamily, ItemCatalog};

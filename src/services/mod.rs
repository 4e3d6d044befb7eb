pub mod master_data;
pub mod production_plans;
pub mod projection;
pub mod reading_chain;
pub mod reference;
pub mod schedules;

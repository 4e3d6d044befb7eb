pub mod common;
pub mod health;
pub mod master_data;
pub mod production_plans;
pub mod readings;
pub mod reference;
pub mod schedules;

use crate::db::DbPool;
use crate::services::{
    master_data::MasterDataService, production_plans::ProductionPlanService,
    reading_chain::ReadingChainService, reference::ReferenceDataService,
    schedules::ScheduleService,
};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub readings: Arc<ReadingChainService>,
    pub master_data: Arc<MasterDataService>,
    pub schedules: Arc<ScheduleService>,
    pub production_plans: Arc<ProductionPlanService>,
    pub reference: Arc<ReferenceDataService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            readings: Arc::new(ReadingChainService::new(db_pool.clone())),
            master_data: Arc::new(MasterDataService::new(db_pool.clone())),
            schedules: Arc::new(ScheduleService::new(db_pool.clone())),
            production_plans: Arc::new(ProductionPlanService::new(db_pool.clone())),
            reference: Arc::new(ReferenceDataService::new(db_pool)),
        }
    }
}

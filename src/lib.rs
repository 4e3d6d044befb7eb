//! Inspection API Library
//!
//! Master data, inspection schedules and the reading-chain resolver behind
//! the quality-inspection HTTP service.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod migrator;
pub mod models;
pub mod openapi;
pub mod repositories;
pub mod services;
pub mod tracing;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
}

impl AppState {
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Self {
        let services = handlers::AppServices::new(db.clone());
        Self {
            db,
            config,
            services,
        }
    }
}

/// Routes mounted under `/api/v1`.
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        // Readings
        .nest("/readings", handlers::readings::reading_routes())
        // Master data
        .nest("/plants", handlers::master_data::plant_routes())
        .nest("/buildingsectionlabs", handlers::master_data::building_routes())
        .nest("/itemmasters", handlers::master_data::item_routes())
        .nest("/operationmasters", handlers::master_data::operation_routes())
        .nest("/parameterlists", handlers::master_data::parameter_routes())
        // Schedules
        .nest("/inspectionschedules", handlers::schedules::schedule_routes())
        .nest("/inspections", handlers::schedules::inspection_routes())
        // Production orders
        .nest(
            "/productionplanners",
            handlers::production_plans::production_plan_routes(),
        )
        .nest(
            "/purchase-orders",
            handlers::production_plans::purchase_order_routes(),
        )
        // Lookup lists
        .merge(handlers::reference::reference_routes())
}

/// Full application router without CORS or compression.
pub fn app_router(state: AppState) -> Router {
    Router::<AppState>::new()
        .nest("/health", handlers::health::health_routes())
        .nest("/api/v1", api_v1_routes())
        .merge(openapi::swagger_ui())
        // HTTP tracing layer for consistent request/response telemetry
        .layer(crate::tracing::configure_http_tracing())
        // Ensure every request carries a request id for traceability
        .layer(axum::middleware::from_fn(
            crate::tracing::request_id_middleware,
        ))
        .with_state(state)
}

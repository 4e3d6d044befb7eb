#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use inspection_api::{
    config::AppConfig,
    db,
    models::{InspectionFamily, ItemCatalog},
    AppState,
};
use sea_orm::{ConnectionTrait, DatabaseBackend as DbBackend, DatabaseConnection, Statement, Value};
use serde_json::Value as Json;
use tower::ServiceExt;

/// Ids of one plant's worth of master data.
#[derive(Clone, Copy, Debug)]
pub struct Masters {
    pub plant_id: i64,
    pub building_id: i64,
    pub item_id: i64,
    pub operation_id: i64,
    pub parameter_id: i64,
}

/// One schedule with a single reading and two actual readings.
#[derive(Clone, Copy, Debug)]
pub struct Scenario {
    pub masters: Masters,
    pub schedule_id: i64,
    pub reading_id: i64,
    pub actual_ids: [i64; 2],
}

/// Helper harness for spinning up an application state backed by an in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let cfg = AppConfig::new("sqlite::memory:", "127.0.0.1", 18_080, "test");

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let state = AppState::new(Arc::new(pool), cfg);
        let router = inspection_api::app_router(state.clone());
        Self { router, state }
    }

    pub fn db(&self) -> &DatabaseConnection {
        self.state.db.as_ref()
    }

    /// Sends a request through the full router and decodes the JSON body
    /// (`Json::Null` when empty).
    pub async fn request(&self, method: Method, uri: &str, body: Option<Json>) -> (StatusCode, Json) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let request = builder.body(body).expect("request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router response");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("response body");
        let json = if bytes.is_empty() {
            Json::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Json) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn execute(&self, sql: &str) {
        self.db()
            .execute(Statement::from_string(DbBackend::Sqlite, sql.to_string()))
            .await
            .expect("execute sql");
    }

    /// Inserts an active row and returns its id.
    pub async fn insert_row(&self, table: &str, values: Vec<(&str, Value)>) -> i64 {
        let now = Utc::now();
        let mut columns: Vec<&str> = values.iter().map(|(c, _)| *c).collect();
        let mut params: Vec<Value> = values.into_iter().map(|(_, v)| v).collect();
        columns.extend(["is_active", "created_at", "updated_at"]);
        params.extend([true.into(), now.into(), now.into()]);

        let placeholders = vec!["?"; columns.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING id",
            table,
            columns.join(", "),
            placeholders
        );
        let row = self
            .db()
            .query_one(Statement::from_sql_and_values(DbBackend::Sqlite, sql, params))
            .await
            .expect("insert row")
            .expect("returned id");
        row.try_get::<i64>("", "id").expect("id column")
    }

    pub async fn deactivate(&self, table: &str, id: i64) {
        self.execute(&format!("UPDATE {} SET is_active = 0 WHERE id = {}", table, id))
            .await;
    }

    pub async fn seed_plant(&self, code: &str) -> i64 {
        self.insert_row(
            "plants",
            vec![
                ("plant_code", code.into()),
                ("plant_name", format!("Plant {}", code).into()),
            ],
        )
        .await
    }

    pub async fn seed_building(&self, plant_id: i64, code: &str) -> i64 {
        self.insert_row(
            "building_sections",
            vec![
                ("plant_id", plant_id.into()),
                ("building_code", code.into()),
                ("building_name", format!("Building {}", code).into()),
            ],
        )
        .await
    }

    pub async fn seed_item(&self, catalog: ItemCatalog, plant_id: i64, building_id: i64, code: &str) -> i64 {
        self.insert_row(
            item_table(catalog),
            vec![
                ("plant_id", plant_id.into()),
                ("building_id", building_id.into()),
                ("item_code", code.into()),
                ("item_description", format!("Item {}", code).into()),
                ("unit", "mm".into()),
            ],
        )
        .await
    }

    pub async fn seed_operation(
        &self,
        catalog: ItemCatalog,
        plant_id: i64,
        building_id: i64,
        item_id: i64,
        code: &str,
    ) -> i64 {
        self.insert_row(
            operation_table(catalog),
            vec![
                ("plant_id", plant_id.into()),
                ("building_id", building_id.into()),
                ("item_id", item_id.into()),
                ("operation_code", code.into()),
                ("operation_name", format!("Operation {}", code).into()),
            ],
        )
        .await
    }

    pub async fn seed_parameter(&self, plant_id: i64, code: &str, name: &str) -> i64 {
        self.insert_row(
            "parameters",
            vec![
                ("plant_id", plant_id.into()),
                ("parameter_code", code.into()),
                ("parameter_name", name.into()),
            ],
        )
        .await
    }

    /// Plant P1, building B1, item I1, operation OP10 and parameter W1
    /// ("Width") in the catalog `catalog`.
    pub async fn seed_masters(&self, catalog: ItemCatalog) -> Masters {
        let plant_id = self.seed_plant("P1").await;
        let building_id = self.seed_building(plant_id, "B1").await;
        let item_id = self.seed_item(catalog, plant_id, building_id, "I1").await;
        let operation_id = self
            .seed_operation(catalog, plant_id, building_id, item_id, "OP10")
            .await;
        let parameter_id = self.seed_parameter(plant_id, "W1", "Width").await;
        Masters {
            plant_id,
            building_id,
            item_id,
            operation_id,
            parameter_id,
        }
    }

    /// Same plant, building and parameter as `base`, with item I1 and
    /// operation OP10 added to `catalog`.
    pub async fn seed_catalog(&self, catalog: ItemCatalog, base: Masters) -> Masters {
        let item_id = self
            .seed_item(catalog, base.plant_id, base.building_id, "I1")
            .await;
        let operation_id = self
            .seed_operation(catalog, base.plant_id, base.building_id, item_id, "OP10")
            .await;
        Masters {
            item_id,
            operation_id,
            ..base
        }
    }

    pub async fn seed_schedule(&self, family: InspectionFamily, masters: &Masters, parameter_name: &str) -> i64 {
        let profile = family.profile();
        let inspection_type = profile
            .schedule_type_tag
            .map(str::to_string)
            .unwrap_or_else(|| family.to_string());
        self.insert_row(
            profile.schedule_table,
            vec![
                ("plant_id", masters.plant_id.into()),
                ("building_id", masters.building_id.into()),
                ("item_id", masters.item_id.into()),
                ("operation_id", masters.operation_id.into()),
                ("parameter_id", masters.parameter_id.into()),
                ("inspection_parameter_name", parameter_name.into()),
                ("inspection_type", inspection_type.into()),
                ("lsl", 9.8f64.into()),
                ("target_value", 10.0f64.into()),
                ("usl", 10.2f64.into()),
                ("sample_size", 2i32.into()),
            ],
        )
        .await
    }

    pub async fn seed_reading(&self, family: InspectionFamily, schedule_id: i64, order_no: &str) -> i64 {
        let profile = family.profile();
        self.insert_row(
            profile.reading_table,
            vec![
                ("schedule_id", schedule_id.into()),
                (profile.order_field, order_no.into()),
                ("machine_id", "M-01".into()),
                ("created_by", "inspector".into()),
            ],
        )
        .await
    }

    pub async fn seed_actual(&self, family: InspectionFamily, reading_id: i64, key: &str, value: f64) -> i64 {
        self.insert_row(
            family.profile().actual_table,
            vec![
                ("reading_id", reading_id.into()),
                ("r_key", key.into()),
                ("r_value", value.into()),
                ("created_by", "inspector".into()),
            ],
        )
        .await
    }

    /// Schedule "Width" on P1/B1/I1/OP10 with reading IO-100 and two actual
    /// readings.
    pub async fn seed_scenario(&self, family: InspectionFamily) -> Scenario {
        let masters = self.seed_masters(family.profile().item_catalog).await;
        self.seed_scenario_on(family, masters).await
    }

    pub async fn seed_scenario_on(&self, family: InspectionFamily, masters: Masters) -> Scenario {
        let schedule_id = self.seed_schedule(family, &masters, "Width").await;
        let reading_id = self.seed_reading(family, schedule_id, "IO-100").await;
        let first = self.seed_actual(family, reading_id, "sample_1", 10.01).await;
        let second = self.seed_actual(family, reading_id, "sample_2", 9.99).await;
        Scenario {
            masters,
            schedule_id,
            reading_id,
            actual_ids: [first, second],
        }
    }
}

pub fn item_table(catalog: ItemCatalog) -> &'static str {
    match catalog {
        ItemCatalog::Standard => "item_masters",
        ItemCatalog::FirstArticle => "fai_item_masters",
    }
}

pub fn operation_table(catalog: ItemCatalog) -> &'static str {
    match catalog {
        ItemCatalog::Standard => "operation_masters",
        ItemCatalog::FirstArticle => "fai_operation_masters",
    }
}

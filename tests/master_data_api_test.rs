mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use inspection_api::models::{InspectionFamily, ItemCatalog};
use serde_json::json;

async fn create(app: &TestApp, uri: &str, body: serde_json::Value) -> serde_json::Value {
    let (status, created) = app.request(Method::POST, uri, Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "POST {} -> {}", uri, created);
    created
}

#[tokio::test]
async fn plant_lifecycle() {
    let app = TestApp::new().await;

    let plant = create(
        &app,
        "/api/v1/plants",
        json!({"plant_code": "P1", "plant_name": "Pune", "plant_address": "MIDC"}),
    )
    .await;
    let id = plant["id"].as_i64().unwrap();
    assert_eq!(plant["plant_code"], "P1");
    assert_eq!(plant["is_active"], true);

    let (status, fetched) = app.get(&format!("/api/v1/plants/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["plant_name"], "Pune");

    let (status, updated) = app
        .request(
            Method::PUT,
            &format!("/api/v1/plants/{}", id),
            Some(json!({"plant_code": "P1", "plant_name": "Pune West"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["plant_name"], "Pune West");
    assert!(updated["plant_address"].is_null());

    let (status, body) = app
        .request(Method::DELETE, &format!("/api/v1/plants/{}", id), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _) = app.get(&format!("/api/v1/plants/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app
        .request(Method::DELETE, &format!("/api/v1/plants/{}", id), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, list) = app.get("/api/v1/plants").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn duplicate_plant_code_conflicts() {
    let app = TestApp::new().await;
    create(&app, "/api/v1/plants", json!({"plant_code": "P1"})).await;

    let (status, body) = app
        .request(Method::POST, "/api/v1/plants", Some(json!({"plant_code": "P1"})))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Conflict");
}

#[tokio::test]
async fn blank_plant_code_fails_validation() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request(Method::POST, "/api/v1/plants", Some(json!({"plant_code": ""})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Validation failed"));
}

#[tokio::test]
async fn non_numeric_list_filter_is_rejected() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/v1/itemmasters?plant=abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Invalid query string"));

    let (status, _) = app.get("/api/v1/productionplanners?plant=P1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn building_and_item_reference_checks() {
    let app = TestApp::new().await;
    let plant = create(&app, "/api/v1/plants", json!({"plant_code": "P1"})).await;
    let plant_id = plant["id"].as_i64().unwrap();

    let (status, _) = app
        .request(
            Method::POST,
            "/api/v1/buildingsectionlabs",
            Some(json!({"plant_id": 999, "building_code": "B1"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let building = create(
        &app,
        "/api/v1/buildingsectionlabs",
        json!({"plant_id": plant_id, "building_code": "B1"}),
    )
    .await;
    let building_id = building["id"].as_i64().unwrap();

    let (status, _) = app
        .request(
            Method::POST,
            "/api/v1/buildingsectionlabs",
            Some(json!({"plant_id": plant_id, "building_code": "B1"})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let item = create(
        &app,
        "/api/v1/itemmasters",
        json!({
            "plant_id": plant_id,
            "building_id": building_id,
            "item_code": "I1",
            "item_type": "RM"
        }),
    )
    .await;
    let item_id = item["id"].as_i64().unwrap();

    let (status, list) = app
        .get(&format!("/api/v1/itemmasters?plant={}&item_type=RM", plant_id))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
    let (_, list) = app.get("/api/v1/itemmasters?item_type=FG").await;
    assert_eq!(list, json!([]));

    create(
        &app,
        "/api/v1/operationmasters",
        json!({
            "plant_id": plant_id,
            "building_id": building_id,
            "item_id": item_id,
            "operation_code": "OP10"
        }),
    )
    .await;
    let (status, _) = app
        .request(
            Method::POST,
            "/api/v1/operationmasters",
            Some(json!({
                "plant_id": plant_id,
                "building_id": building_id,
                "item_id": item_id,
                "operation_code": "OP10"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, operations) = app
        .get(&format!("/api/v1/operationmasters?item={}", item_id))
        .await;
    assert_eq!(operations.as_array().unwrap().len(), 1);

    create(
        &app,
        "/api/v1/parameterlists",
        json!({"plant_id": plant_id, "parameter_code": "W1", "parameter_name": "Width"}),
    )
    .await;
    let (_, parameters) = app
        .get(&format!("/api/v1/parameterlists?plant={}", plant_id))
        .await;
    assert_eq!(parameters[0]["parameter_name"], "Width");
}

#[tokio::test]
async fn schedule_crud_and_listing_by_codes() {
    let app = TestApp::new().await;
    let masters = app.seed_masters(ItemCatalog::Standard).await;

    let schedule = create(
        &app,
        "/api/v1/inspectionschedules",
        json!({
            "plant_id": masters.plant_id,
            "building_id": masters.building_id,
            "item_id": masters.item_id,
            "operation_id": masters.operation_id,
            "parameter_id": masters.parameter_id,
            "inspection_parameter_name": "Width",
            "inspection_type": "inward",
            "lsl": 9.8,
            "target_value": 10.0,
            "usl": 10.2,
            "sample_size": 5
        }),
    )
    .await;
    let id = schedule["id"].as_i64().unwrap();
    assert_eq!(schedule["inspection_type"], "Inward");

    let (status, list) = app
        .get("/api/v1/inspectionschedules?plant_id=P1&building=B1&item_code=I1&operation=OP10&inspection_type=Inward&po_no=ignored")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (_, list) = app.get("/api/v1/inspectionschedules?plant_id=P9").await;
    assert_eq!(list, json!([]));

    let (status, _) = app
        .request(
            Method::POST,
            "/api/v1/inspectionschedules",
            Some(json!({
                "plant_id": masters.plant_id,
                "building_id": masters.building_id,
                "item_id": masters.item_id,
                "parameter_id": 999
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .request(
            Method::DELETE,
            &format!("/api/v1/inspectionschedules/{}", id),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app
        .get(&format!("/api/v1/inspectionschedules/{}", id))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn inspection_filter_by_factory_and_parameter() {
    let app = TestApp::new().await;
    let scenario = app.seed_scenario(InspectionFamily::Inward).await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/v1/inspections/filter",
            Some(json!({"factoryId": "P1", "itemCode": "I1", "parameter": "W1"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let inspections = body["inspections"].as_array().unwrap();
    assert_eq!(inspections.len(), 1);
    assert_eq!(inspections[0]["id"], scenario.schedule_id);
    assert_eq!(inspections[0]["plant_code"], "P1");
    assert_eq!(inspections[0]["building_code"], "B1");
    assert_eq!(inspections[0]["operation_code"], "OP10");
    assert_eq!(inspections[0]["sample_size"], 2);

    let (status, body) = app
        .request(
            Method::POST,
            "/api/v1/inspections/filter",
            Some(json!({"factoryId": "NOPE"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["inspections"], json!([]));
}

#[tokio::test]
async fn production_plans_by_order_number() {
    let app = TestApp::new().await;
    let masters = app.seed_masters(ItemCatalog::Standard).await;

    let plan = create(
        &app,
        "/api/v1/productionplanners",
        json!({
            "order_number": "PO-1",
            "lot_number": "L-7",
            "lot_qty": 250,
            "status": "Released",
            "target_date": "2024-06-30",
            "item_id": masters.item_id,
            "section_id": masters.building_id
        }),
    )
    .await;
    assert_eq!(plan["order_number"], "PO-1");

    let (status, _) = app
        .request(
            Method::POST,
            "/api/v1/productionplanners",
            Some(json!({"order_number": "PO-1"})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, list) = app.get("/api/v1/productionplanners?plant_code=P1").await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    let (_, list) = app
        .get(&format!("/api/v1/productionplanners?plant={}", masters.plant_id + 1))
        .await;
    assert_eq!(list, json!([]));

    let (status, status_body) = app.get("/api/v1/purchase-orders/PO-1/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(status_body["po_no"], "PO-1");
    assert_eq!(status_body["status"], "Released");
    assert_eq!(status_body["item"]["item_code"], "I1");
    assert_eq!(status_body["lot_qty"], 250);
    assert_eq!(status_body["target_date"], "2024-06-30");

    let (status, _) = app.get("/api/v1/purchase-orders/PO-404/status").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .request(Method::DELETE, "/api/v1/productionplanners/PO-1", None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.get("/api/v1/productionplanners/PO-1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn initial_data_and_factory_sections() {
    let app = TestApp::new().await;
    let masters = app.seed_masters(ItemCatalog::Standard).await;

    let (status, body) = app.get("/api/v1/initial-data").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["plants"][0]["plant_code"], "P1");
    assert_eq!(body["items"][0]["item_code"], "I1");
    assert_eq!(body["parameters"][0]["parameter_name"], "Width");
    assert_eq!(body["operations"][0]["operation_code"], "OP10");

    let (status, sections) = app.get("/api/v1/factories/P1/sections").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sections[0]["id"], masters.building_id);
    assert_eq!(sections[0]["building_code"], "B1");

    let (status, _) = app.get("/api/v1/factories/P9/sections").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

mod common;

use axum::http::StatusCode;
use common::TestApp;
use inspection_api::models::InspectionFamily;

#[tokio::test]
async fn inward_scenario_over_http() {
    let app = TestApp::new().await;
    app.seed_scenario(InspectionFamily::Inward).await;

    let (status, body) = app
        .get("/api/v1/readings?inspection_type=Inward&plant_id=P1&item_code=I1&parameter_name=Width")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);

    let readings = body["readings"].as_array().expect("readings array");
    assert_eq!(readings.len(), 2);
    let first = &readings[0];
    assert_eq!(first["inspection_type"], "Inward");
    assert_eq!(first["plant_code"], "P1");
    assert_eq!(first["building_code"], "B1");
    assert_eq!(first["item_code"], "I1");
    assert_eq!(first["operation_code"], "OP10");
    assert_eq!(first["order_no"], "IO-100");
    assert_eq!(first["order_field"], "io_no");
    assert_eq!(first["r_key"], "sample_1");

    let (status, body) = app
        .get("/api/v1/readings?inspection_type=Inward&plant_id=P1&item_code=I1&parameter_name=Width&po_no=IO-999")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
    assert_eq!(body["readings"], serde_json::json!([]));
}

#[tokio::test]
async fn inspection_type_is_case_insensitive_and_aliases_parameter() {
    let app = TestApp::new().await;
    app.seed_scenario(InspectionFamily::InProcess).await;

    let (status, body) = app
        .get("/api/v1/readings?inspection_type=in-process&inspection_parameter_name=Width&operation=OP10&building=B1")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(body["readings"][0]["inspection_type"], "In-process");
    assert_eq!(body["readings"][0]["order_field"], "po_no");
}

#[tokio::test]
async fn missing_inspection_type_is_rejected() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/v1/readings?plant_id=P1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("inspection_type is required"));
    assert!(body["request_id"].is_string());
}

#[tokio::test]
async fn unknown_inspection_type_is_rejected() {
    let app = TestApp::new().await;
    app.seed_scenario(InspectionFamily::Inward).await;

    let (status, body) = app.get("/api/v1/readings?inspection_type=Bogus").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("Bogus"));
}

#[tokio::test]
async fn no_match_is_ok_and_empty() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/v1/readings?inspection_type=Final").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
    assert_eq!(body["readings"], serde_json::json!([]));
}

#[tokio::test]
async fn storage_fault_returns_diagnostic() {
    let app = TestApp::new().await;
    app.seed_scenario(InspectionFamily::Inward).await;
    app.execute("PRAGMA foreign_keys = OFF").await;
    app.execute("DROP TABLE rm_actual_readings").await;

    let (status, body) = app.get("/api/v1/readings?inspection_type=Inward").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal Server Error");
    let details = body["details"].as_str().expect("details");
    assert!(details.contains("rm_actual_readings"));
}

#[tokio::test]
async fn request_id_is_echoed() {
    let app = TestApp::new().await;

    let response = app.get("/api/v1/readings").await;
    assert_eq!(response.0, StatusCode::BAD_REQUEST);
    let request_id = response.1["request_id"].as_str().expect("request id");
    assert!(!request_id.is_empty());
}

#[tokio::test]
async fn health_endpoints_respond() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "up");

    let (status, body) = app.get("/health/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn malformed_query_string_gets_json_error() {
    let app = TestApp::new().await;

    let (status, body) = app
        .get("/api/v1/readings?inspection_type=Inward&po_no=IO-1&po_no=IO-2")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Invalid query string"));
    assert!(body["request_id"].is_string());
}

mod common;

use assert_matches::assert_matches;
use common::TestApp;
use inspection_api::{
    errors::ServiceError,
    models::{InspectionFamily, ItemCatalog},
    services::reading_chain::{ReadingChainService, ReadingFilters},
};
use rstest::rstest;
use sea_orm::{ConnectionTrait, DatabaseBackend as DbBackend, Statement};

fn service(app: &TestApp) -> ReadingChainService {
    ReadingChainService::new(app.state.db.clone())
}

fn filters() -> ReadingFilters {
    ReadingFilters {
        plant_code: Some("P1".into()),
        item_code: Some("I1".into()),
        parameter_name: Some("Width".into()),
        ..Default::default()
    }
}

/// Active actual readings reachable from active readings and schedules,
/// counted straight from the tables.
async fn direct_count(app: &TestApp, family: InspectionFamily) -> i64 {
    let profile = family.profile();
    let mut sql = format!(
        "SELECT COUNT(*) AS n FROM {actual} a \
         JOIN {reading} r ON a.reading_id = r.id \
         JOIN {schedule} s ON r.schedule_id = s.id \
         WHERE a.is_active = 1 AND r.is_active = 1 AND s.is_active = 1",
        actual = profile.actual_table,
        reading = profile.reading_table,
        schedule = profile.schedule_table,
    );
    if let Some(tag) = profile.schedule_type_tag {
        sql.push_str(&format!(" AND s.inspection_type = '{}'", tag));
    }
    let row = app
        .db()
        .query_one(Statement::from_string(DbBackend::Sqlite, sql))
        .await
        .expect("count query")
        .expect("count row");
    row.try_get::<i64>("", "n").expect("count column")
}

#[rstest]
#[case::inward(InspectionFamily::Inward, "io_no")]
#[case::in_process(InspectionFamily::InProcess, "po_no")]
#[case::final_inspection(InspectionFamily::Final, "po_no")]
#[tokio::test]
async fn resolves_one_record_per_actual_reading(
    #[case] family: InspectionFamily,
    #[case] order_field: &str,
) {
    let app = TestApp::new().await;
    let scenario = app.seed_scenario(family).await;

    let set = service(&app)
        .resolve_readings(family, &filters())
        .await
        .expect("resolve readings");

    assert_eq!(set.count, 2);
    assert_eq!(set.readings.len(), 2);

    let first = &set.readings[0];
    assert_eq!(first.inspection_type, family);
    assert_eq!(first.schedule_id, scenario.schedule_id);
    assert_eq!(first.reading_id, scenario.reading_id);
    assert_eq!(first.actual_reading_id, scenario.actual_ids[0]);
    assert_eq!(first.plant_code, "P1");
    assert_eq!(first.building_code, "B1");
    assert_eq!(first.item_code, "I1");
    assert_eq!(first.operation_code.as_deref(), Some("OP10"));
    assert_eq!(first.parameter_name.as_deref(), Some("Width"));
    assert_eq!(first.order_no.as_deref(), Some("IO-100"));
    assert_eq!(first.order_field, order_field);
    assert_eq!(first.r_key.as_deref(), Some("sample_1"));
    assert_eq!(first.r_value, Some(10.01));
    assert_eq!(first.lsl, Some(9.8));
    assert_eq!(first.usl, Some(10.2));

    assert_eq!(set.readings[1].actual_reading_id, scenario.actual_ids[1]);
    assert_eq!(set.readings[1].r_value, Some(9.99));
}

#[rstest]
#[case::inward(InspectionFamily::Inward)]
#[case::in_process(InspectionFamily::InProcess)]
#[case::final_inspection(InspectionFamily::Final)]
#[tokio::test]
async fn unknown_order_number_yields_empty_set(#[case] family: InspectionFamily) {
    let app = TestApp::new().await;
    app.seed_scenario(family).await;

    let mut filters = filters();
    filters.order_number = Some("IO-999".into());
    let set = service(&app)
        .resolve_readings(family, &filters)
        .await
        .expect("resolve readings");

    assert_eq!(set.count, 0);
    assert!(set.readings.is_empty());
}

#[rstest]
#[case::inward(InspectionFamily::Inward)]
#[case::in_process(InspectionFamily::InProcess)]
#[case::final_inspection(InspectionFamily::Final)]
#[tokio::test]
async fn order_number_narrows_readings(#[case] family: InspectionFamily) {
    let app = TestApp::new().await;
    let scenario = app.seed_scenario(family).await;
    let other = app
        .seed_reading(family, scenario.schedule_id, "IO-200")
        .await;
    app.seed_actual(family, other, "sample_1", 10.0).await;

    let mut filters = ReadingFilters::default();
    filters.order_number = Some("IO-200".into());
    let set = service(&app)
        .resolve_readings(family, &filters)
        .await
        .expect("resolve readings");

    assert_eq!(set.count, 1);
    assert_eq!(set.readings[0].reading_id, other);
    assert_eq!(set.readings[0].order_no.as_deref(), Some("IO-200"));
}

#[rstest]
#[case::inward(InspectionFamily::Inward)]
#[case::in_process(InspectionFamily::InProcess)]
#[case::final_inspection(InspectionFamily::Final)]
#[tokio::test]
async fn order_number_applies_across_matching_schedules(#[case] family: InspectionFamily) {
    let app = TestApp::new().await;
    let scenario = app.seed_scenario(family).await;
    let second = app.seed_schedule(family, &scenario.masters, "Width").await;
    let reading = app.seed_reading(family, second, "IO-500").await;
    app.seed_actual(family, reading, "sample_1", 10.05).await;

    let filters = ReadingFilters {
        plant_code: Some("P1".into()),
        order_number: Some("IO-100".into()),
        ..Default::default()
    };
    let set = service(&app)
        .resolve_readings(family, &filters)
        .await
        .expect("resolve readings");

    assert_eq!(set.count, 2);
    assert!(set
        .readings
        .iter()
        .all(|r| r.schedule_id == scenario.schedule_id));
    assert!(set
        .readings
        .iter()
        .all(|r| r.order_no.as_deref() == Some("IO-100")));
}

#[rstest]
#[case::inward(InspectionFamily::Inward)]
#[case::in_process(InspectionFamily::InProcess)]
#[case::final_inspection(InspectionFamily::Final)]
#[tokio::test]
async fn inactive_records_are_excluded(#[case] family: InspectionFamily) {
    let app = TestApp::new().await;
    let scenario = app.seed_scenario(family).await;
    let profile = family.profile();
    let svc = service(&app);

    app.deactivate(profile.actual_table, scenario.actual_ids[0])
        .await;
    let set = svc.resolve_readings(family, &filters()).await.unwrap();
    assert_eq!(set.count, 1);
    assert_eq!(set.readings[0].actual_reading_id, scenario.actual_ids[1]);

    app.deactivate(profile.reading_table, scenario.reading_id)
        .await;
    let set = svc.resolve_readings(family, &filters()).await.unwrap();
    assert_eq!(set.count, 0);
}

#[rstest]
#[case::inward(InspectionFamily::Inward)]
#[case::in_process(InspectionFamily::InProcess)]
#[case::final_inspection(InspectionFamily::Final)]
#[tokio::test]
async fn inactive_schedule_hides_its_readings(#[case] family: InspectionFamily) {
    let app = TestApp::new().await;
    let scenario = app.seed_scenario(family).await;

    app.deactivate(family.profile().schedule_table, scenario.schedule_id)
        .await;
    let set = service(&app)
        .resolve_readings(family, &ReadingFilters::default())
        .await
        .unwrap();
    assert_eq!(set.count, 0);
}

#[tokio::test]
async fn inactive_master_filter_matches_nothing() {
    let app = TestApp::new().await;
    let scenario = app.seed_scenario(InspectionFamily::Inward).await;
    app.deactivate("plants", scenario.masters.plant_id).await;

    let set = service(&app)
        .resolve_readings(InspectionFamily::Inward, &filters())
        .await
        .unwrap();
    assert_eq!(set.count, 0);

    // Without the plant filter the schedule is still reachable and keeps
    // its plant label.
    let set = service(&app)
        .resolve_readings(InspectionFamily::Inward, &ReadingFilters::default())
        .await
        .unwrap();
    assert_eq!(set.count, 2);
    assert_eq!(set.readings[0].plant_code, "P1");
}

#[rstest]
#[case::inward(InspectionFamily::Inward)]
#[case::in_process(InspectionFamily::InProcess)]
#[case::final_inspection(InspectionFamily::Final)]
#[tokio::test]
async fn count_matches_direct_traversal(#[case] family: InspectionFamily) {
    let app = TestApp::new().await;
    let scenario = app.seed_scenario(family).await;

    let second_schedule = app
        .seed_schedule(family, &scenario.masters, "Thickness")
        .await;
    for order in ["IO-300", "IO-301"] {
        let reading = app.seed_reading(family, second_schedule, order).await;
        for (i, value) in [1.0, 2.0, 3.0].into_iter().enumerate() {
            app.seed_actual(family, reading, &format!("sample_{}", i + 1), value)
                .await;
        }
    }
    let retired = app.seed_reading(family, second_schedule, "IO-302").await;
    app.seed_actual(family, retired, "sample_1", 4.0).await;
    app.deactivate(family.profile().reading_table, retired).await;

    let set = service(&app)
        .resolve_readings(family, &ReadingFilters::default())
        .await
        .unwrap();

    assert_eq!(set.count, 8);
    assert_eq!(set.count as i64, direct_count(&app, family).await);

    // Nested order: schedule, then reading, then actual reading.
    let keys: Vec<(i64, i64, i64)> = set
        .readings
        .iter()
        .map(|r| (r.schedule_id, r.reading_id, r.actual_reading_id))
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}

#[tokio::test]
async fn families_do_not_see_each_other() {
    let app = TestApp::new().await;
    let inward = app.seed_scenario(InspectionFamily::Inward).await;
    let svc = service(&app);

    for family in [InspectionFamily::InProcess, InspectionFamily::Final] {
        let set = svc
            .resolve_readings(family, &ReadingFilters::default())
            .await
            .unwrap();
        assert_eq!(set.count, 0, "{} leaked Inward readings", family);
    }

    // An In-process chain on the same masters stays separate.
    let in_process = app
        .seed_scenario_on(InspectionFamily::InProcess, inward.masters)
        .await;
    let fai_masters = app
        .seed_catalog(ItemCatalog::FirstArticle, inward.masters)
        .await;
    app.seed_scenario_on(InspectionFamily::Final, fai_masters)
        .await;

    let set = svc
        .resolve_readings(InspectionFamily::Inward, &ReadingFilters::default())
        .await
        .unwrap();
    assert_eq!(set.count, 2);
    assert!(set
        .readings
        .iter()
        .all(|r| r.schedule_id == inward.schedule_id && r.order_field == "io_no"));

    let set = svc
        .resolve_readings(InspectionFamily::InProcess, &ReadingFilters::default())
        .await
        .unwrap();
    assert_eq!(set.count, 2);
    assert!(set
        .readings
        .iter()
        .all(|r| r.schedule_id == in_process.schedule_id));

    let set = svc
        .resolve_readings(InspectionFamily::Final, &filters())
        .await
        .unwrap();
    assert_eq!(set.count, 2);
}

#[tokio::test]
async fn final_ignores_schedule_type_tag() {
    let app = TestApp::new().await;
    let scenario = app.seed_scenario(InspectionFamily::Final).await;
    app.execute(&format!(
        "UPDATE fai_inspection_schedules SET inspection_type = 'Patrol' WHERE id = {}",
        scenario.schedule_id
    ))
    .await;

    let set = service(&app)
        .resolve_readings(InspectionFamily::Final, &ReadingFilters::default())
        .await
        .unwrap();
    assert_eq!(set.count, 2);
}

#[tokio::test]
async fn parameter_filter_matches_master_code_or_name() {
    let app = TestApp::new().await;
    let scenario = app.seed_scenario(InspectionFamily::Inward).await;
    app.execute(&format!(
        "UPDATE inspection_schedules SET inspection_parameter_name = 'Outer width' WHERE id = {}",
        scenario.schedule_id
    ))
    .await;
    let svc = service(&app);

    for value in ["W1", "Width", "Outer width"] {
        let filters = ReadingFilters {
            parameter_name: Some(value.into()),
            ..Default::default()
        };
        let set = svc
            .resolve_readings(InspectionFamily::Inward, &filters)
            .await
            .unwrap();
        assert_eq!(set.count, 2, "parameter filter {}", value);
    }

    let filters = ReadingFilters {
        parameter_name: Some("Height".into()),
        ..Default::default()
    };
    let set = svc
        .resolve_readings(InspectionFamily::Inward, &filters)
        .await
        .unwrap();
    assert_eq!(set.count, 0);
}

#[tokio::test]
async fn unknown_master_codes_yield_empty_set() {
    let app = TestApp::new().await;
    app.seed_scenario(InspectionFamily::InProcess).await;
    let svc = service(&app);

    let cases = [
        ReadingFilters {
            plant_code: Some("P9".into()),
            ..Default::default()
        },
        ReadingFilters {
            building_code: Some("B9".into()),
            ..Default::default()
        },
        ReadingFilters {
            item_code: Some("I9".into()),
            ..Default::default()
        },
        ReadingFilters {
            operation_code: Some("OP99".into()),
            ..Default::default()
        },
    ];
    for filters in cases {
        let set = svc
            .resolve_readings(InspectionFamily::InProcess, &filters)
            .await
            .unwrap();
        assert_eq!(set.count, 0, "{:?}", filters);
    }
}

#[tokio::test]
async fn dangling_master_reference_is_an_integrity_error() {
    let app = TestApp::new().await;
    let scenario = app.seed_scenario(InspectionFamily::Inward).await;

    app.execute("PRAGMA foreign_keys = OFF").await;
    app.execute(&format!(
        "UPDATE inspection_schedules SET plant_id = 9999 WHERE id = {}",
        scenario.schedule_id
    ))
    .await;

    let result = service(&app)
        .resolve_readings(InspectionFamily::Inward, &ReadingFilters::default())
        .await;
    assert_matches!(result, Err(ServiceError::IntegrityError(msg)) if msg.contains("9999"));
}

#[tokio::test]
async fn missing_tables_surface_as_database_errors() {
    let app = TestApp::new().await;
    app.seed_scenario(InspectionFamily::Inward).await;
    app.execute("PRAGMA foreign_keys = OFF").await;
    app.execute("DROP TABLE rm_actual_readings").await;

    let result = service(&app)
        .resolve_readings(InspectionFamily::Inward, &ReadingFilters::default())
        .await;
    assert_matches!(result, Err(ServiceError::DatabaseError(_)));
}

use mb_results::*;

fn finished_record(name: &str) -> RunRecord {
    let mut builder = ReportBuilder::start(name, Some("round trip"), "bench");
    builder.add_step_result(StepResult {
        step: "monitor".to_string(),
        description: "hold speed".to_string(),
        status: StepStatus::Pass,
        started_at: "2026-08-30T12:00:00+00:00".to_string(),
        ended_at: "2026-08-30T12:00:05+00:00".to_string(),
        input_params: serde_json::json!({ "step": "monitor", "duration_s": 5.0 }),
        observed: Some(MonitorStats {
            speed_rpm_min: 1480.0,
            speed_rpm_max: 1502.5,
            temperature_c_max: 61.3,
        }),
        failure_details: None,
    });
    builder.finish(RunStatus::Pass, None, 61.3, 1490.0)
}

#[test]
fn save_and_load_report() {
    let temp_dir = std::env::temp_dir().join("mb_results_test");
    let _ = std::fs::remove_dir_all(&temp_dir);

    let store = ReportStore::new(temp_dir.clone()).unwrap();
    let record = finished_record("Spin Up");

    let filename = store.save(&record).unwrap();
    assert!(filename.starts_with("report_Spin_Up_"));
    assert!(filename.ends_with(".json"));

    let loaded = store.load(&filename).unwrap();
    assert_eq!(loaded, record);
    assert_eq!(loaded.steps.len(), 1);
    assert_eq!(
        loaded.steps[0].observed.as_ref().unwrap().speed_rpm_max,
        1502.5
    );
}

#[test]
fn list_reports_sorted() {
    let temp_dir = std::env::temp_dir().join("mb_results_test_list");
    let _ = std::fs::remove_dir_all(&temp_dir);

    let store = ReportStore::new(temp_dir.clone()).unwrap();
    store.save(&finished_record("Beta Run")).unwrap();
    store.save(&finished_record("Alpha Run")).unwrap();

    let names = store.list().unwrap();
    assert_eq!(names.len(), 2);
    assert!(names[0] < names[1]);
    assert!(names.iter().all(|n| n.starts_with("report_")));
}

#[test]
fn missing_report_is_an_error() {
    let temp_dir = std::env::temp_dir().join("mb_results_test_missing");
    let _ = std::fs::remove_dir_all(&temp_dir);

    let store = ReportStore::new(temp_dir).unwrap();
    let err = store.load("report_nope.json").unwrap_err();
    assert!(matches!(err, ResultsError::ReportNotFound { .. }));
}

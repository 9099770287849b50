use cpm_tool::activity_validation::ValidationError;
use cpm_tool::ingest::{
    IngestError, load_project_from_csv, load_project_from_json, project_from_json_str,
};
use cpm_tool::{CriticalPathCalculator, RelationshipKind};
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

const SNAPSHOT: &str = r#"{
  "project": { "project_code": "BRIDGE", "project_name": "Bridge Deck" },
  "activities": [
    { "task_code": "A", "task_name": "Survey",
      "planned_start": "2025-04-01 08:00", "planned_end": "2025-04-01 16:00" },
    { "task_code": "B", "task_name": "Formwork",
      "planned_start": "2025-04-02T08:00:00", "planned_end": "2025-04-03T08:00:00" },
    { "task_code": "C", "task_name": "Pour", "duration_hours": 6 },
    { "task_code": "B", "task_name": "Formwork (copy)" }
  ],
  "dependencies": [
    { "predecessor": "A", "successor": "B" },
    { "predecessor": "B", "successor": "C", "kind": "PR_FS", "lag_hours": 2 },
    { "predecessor": "C", "successor": "Z" }
  ]
}"#;

#[test]
fn json_snapshot_is_deduplicated_and_filtered() {
    let loaded = project_from_json_str(SNAPSHOT).unwrap();
    let project = &loaded.project;

    assert_eq!(project.info.project_code, "BRIDGE");
    assert_eq!(project.activities.len(), 3);
    assert_eq!(project.find_activity("A").unwrap().duration_hours, 8.0);
    assert_eq!(project.find_activity("B").unwrap().duration_hours, 24.0);
    assert_eq!(project.find_activity("C").unwrap().duration_hours, 6.0);

    let dupes = &loaded.duplicates["B"];
    assert_eq!(dupes.len(), 1);
    assert!(!dupes[0].is_identical);

    assert_eq!(project.dependencies.len(), 2);
    assert_eq!(project.dependencies[1].kind, RelationshipKind::FinishToStart);
    assert_eq!(project.dependencies[1].lag_hours, 2.0);
    assert_eq!(loaded.dropped_dependencies.len(), 1);
    assert_eq!(loaded.dropped_dependencies[0].successor, "Z");

    let outcome = CriticalPathCalculator::for_project(project).calculate().unwrap();
    // Origin is A's planned start: 8 + 24 + 2 lag + 6.
    assert_eq!(outcome.project_duration_hours, 40.0);
}

#[test]
fn json_file_round_trip_through_loader() {
    let mut tmp = NamedTempFile::new().expect("create temp file");
    tmp.write_all(SNAPSHOT.as_bytes()).unwrap();

    let loaded = load_project_from_json(tmp.path()).unwrap();
    assert_eq!(loaded.project.info.project_name, "Bridge Deck");
}

#[test]
fn csv_tables_load_with_project_code_from_file_name() {
    let dir = TempDir::new().unwrap();
    let activities = dir.path().join("PLANT-7.csv");
    let dependencies = dir.path().join("deps.csv");
    std::fs::write(
        &activities,
        "task_code,task_name,planned_start,planned_end,actual_start,actual_end,duration_hours\n\
         A,Foundations,2025-06-02 08:00,2025-06-02 16:00,,,\n\
         B,Steel,2025-06-03,,,,16\n",
    )
    .unwrap();
    std::fs::write(
        &dependencies,
        "predecessor,successor,kind,lag_hours\nA,B,SS,4\n",
    )
    .unwrap();

    let loaded = load_project_from_csv(&activities, Some(&dependencies)).unwrap();
    let project = &loaded.project;
    assert_eq!(project.info.project_code, "PLANT-7");
    assert_eq!(project.activities.len(), 2);
    assert_eq!(project.find_activity("A").unwrap().duration_hours, 8.0);
    assert_eq!(project.find_activity("B").unwrap().duration_hours, 16.0);
    assert_eq!(project.dependencies[0].kind, RelationshipKind::StartToStart);
    assert_eq!(project.dependencies[0].lag_hours, 4.0);
}

#[test]
fn csv_without_dependencies_file() {
    let dir = TempDir::new().unwrap();
    let activities = dir.path().join("solo.csv");
    std::fs::write(&activities, "task_code,task_name,duration_hours\nA,Only task,3\n").unwrap();

    let loaded = load_project_from_csv(&activities, None::<&std::path::Path>).unwrap();
    assert_eq!(loaded.project.activities.len(), 1);
    assert!(loaded.project.dependencies.is_empty());
}

#[test]
fn missing_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let err = load_project_from_json(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, IngestError::NotFound(_)));
}

#[test]
fn bad_timestamp_is_invalid_data() {
    let input = r#"{ "activities": [ { "task_code": "A", "task_name": "X",
        "planned_start": "01/04/2025" } ] }"#;
    let err = project_from_json_str(input).unwrap_err();
    assert!(matches!(err, IngestError::InvalidData(msg) if msg.contains("01/04/2025")));
}

#[test]
fn unnamed_activity_fails_validation() {
    let input = r#"{ "activities": [ { "task_code": "A", "task_name": "" } ] }"#;
    let err = project_from_json_str(input).unwrap_err();
    assert!(matches!(
        err,
        IngestError::Validation(ValidationError::MissingName(code)) if code == "A"
    ));
}

#[test]
fn empty_activity_list_is_rejected() {
    let err = project_from_json_str(r#"{ "activities": [] }"#).unwrap_err();
    assert!(matches!(err, IngestError::InvalidData(_)));
}

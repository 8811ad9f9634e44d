use chrono::NaiveDate;
use schedule_import::{
    Actioner, Assignment, DependencyKind, ImportError, ProjectDocument, SourceFormat, Task,
    TaskLink, import_project, load_project_from_json, save_project_to_json,
};
use tempfile::NamedTempFile;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn build_sample_document() -> ProjectDocument {
    let mut design = Task::new(1, "Design", d(2025, 1, 6), d(2025, 1, 10));
    design.duration_days = Some(4);
    design.percent_complete = 50;
    design.successors = vec![TaskLink {
        target_task_id: 2,
        kind: DependencyKind::FinishToStart,
        offset_days: 1,
    }];
    design.children = vec![3];
    design.assignees = vec![Assignment::new(10)];

    let build = Task::new(2, "Build", d(2025, 1, 13), d(2025, 1, 22));
    let mut detail = Task::new(3, "Detail", d(2025, 1, 6), d(2025, 1, 6));
    detail.milestone = true;

    let mut alice = Actioner::new(10, "Alice", "alice_dev");
    alice.email = "alice@example.com".to_string();
    alice.phone = "111".to_string();

    ProjectDocument::new(vec![design, build, detail], vec![alice])
}

#[test]
fn json_round_trip_preserves_every_field() {
    let document = build_sample_document();
    let file = NamedTempFile::new().unwrap();

    save_project_to_json(&document, file.path()).unwrap();
    let loaded = load_project_from_json(file.path()).unwrap();

    assert_eq!(loaded, document);
}

// Workflow-owned fields travel through the passthrough untouched; this
// path performs shape validation only, no business-rule re-derivation.
#[test]
fn passthrough_keeps_workflow_fields_verbatim() {
    let mut document = build_sample_document();
    document.tasks[0].assignees[0].acknowledged = true;
    document.tasks[0].curator = "pm_lead".to_string();

    let bytes = serde_json::to_vec(&document).unwrap();
    let loaded = import_project(&bytes, SourceFormat::Json).unwrap();

    assert!(loaded.tasks[0].assignees[0].acknowledged);
    assert_eq!(loaded.tasks[0].curator, "pm_lead");
}

#[test]
fn duplicate_task_ids_are_rejected() {
    let mut document = build_sample_document();
    document.tasks[1].id = 1;
    document.tasks[0].successors.clear();
    document.tasks[0].children.clear();

    let bytes = serde_json::to_vec(&document).unwrap();
    match import_project(&bytes, SourceFormat::Json) {
        Err(ImportError::DuplicateId { kind: "task", id: 1 }) => {}
        other => panic!("expected DuplicateId, got {other:?}"),
    }
}

#[test]
fn dangling_child_reference_is_rejected() {
    let mut document = build_sample_document();
    document.tasks[0].children = vec![42];

    let bytes = serde_json::to_vec(&document).unwrap();
    match import_project(&bytes, SourceFormat::Json) {
        Err(ImportError::DanglingReference {
            kind: "child",
            id: 42,
        }) => {}
        other => panic!("expected DanglingReference, got {other:?}"),
    }
}

#[test]
fn containment_cycle_is_rejected() {
    let mut document = build_sample_document();
    // 1 -> 3 already exists; close the loop from the bottom.
    document.tasks[2].children = vec![2];
    document.tasks[1].children = vec![1];

    let bytes = serde_json::to_vec(&document).unwrap();
    match import_project(&bytes, SourceFormat::Json) {
        Err(ImportError::CyclicContainment(_)) => {}
        other => panic!("expected CyclicContainment, got {other:?}"),
    }
}

#[test]
fn missing_required_fields_are_malformed() {
    let bytes = br#"{"tasks": [{"id": 1}], "actioners": []}"#;
    match import_project(bytes, SourceFormat::Json) {
        Err(ImportError::Malformed(detail)) => {
            assert!(detail.contains("invalid project json"), "got: {detail}")
        }
        other => panic!("expected Malformed, got {other:?}"),
    }
}

#[test]
fn non_json_input_is_malformed() {
    match import_project(b"not json at all", SourceFormat::Json) {
        Err(ImportError::Malformed(_)) => {}
        other => panic!("expected Malformed, got {other:?}"),
    }
}

#[test]
fn source_format_is_sniffed_from_extension() {
    assert_eq!(
        SourceFormat::from_path("plan.gan"),
        Some(SourceFormat::GanXml)
    );
    assert_eq!(
        SourceFormat::from_path("plan.XML"),
        Some(SourceFormat::MsProjectXml)
    );
    assert_eq!(
        SourceFormat::from_path("plan.json"),
        Some(SourceFormat::Json)
    );
    assert_eq!(SourceFormat::from_path("plan.txt"), None);
    assert_eq!(SourceFormat::from_path("plan"), None);
}

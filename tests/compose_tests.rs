use chrono::NaiveDate;
use schedule_import::import::compose::{
    AllocationRecord, MilestoneFlag, RawDependency, TaskNode, TaskSchedule, compose,
};
use schedule_import::{DependencyKind, ImportError, WorkCalendar};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn node(id: i32) -> TaskNode {
    TaskNode {
        id,
        name: format!("Task {id}"),
        start_date: d(2025, 1, 6),
        schedule: TaskSchedule::Duration(5),
        milestone: MilestoneFlag::Declared("false".to_string()),
        percent_complete: 0,
        dependencies: Vec::new(),
        child_ids: Vec::new(),
    }
}

#[test]
fn duration_schedule_derives_end_and_baseline() {
    let task = compose(node(1), &[], &WorkCalendar::default()).unwrap();
    assert_eq!(task.end_date, d(2025, 1, 13));
    assert_eq!(task.baseline_start, task.start_date);
    assert_eq!(task.baseline_end, task.end_date);
    assert_eq!(task.duration_days, Some(5));
}

#[test]
fn window_schedule_takes_explicit_end() {
    let mut source = node(1);
    source.schedule = TaskSchedule::Window(d(2025, 2, 3));
    let task = compose(source, &[], &WorkCalendar::default()).unwrap();
    assert_eq!(task.end_date, d(2025, 2, 3));
    assert_eq!(task.baseline_end, d(2025, 2, 3));
    assert_eq!(task.duration_days, None);
}

#[test]
fn allocation_table_rows_become_assignees() {
    let allocations = [
        AllocationRecord {
            task_id: 1,
            actioner_id: 10,
        },
        AllocationRecord {
            task_id: 2,
            actioner_id: 11,
        },
        AllocationRecord {
            task_id: 1,
            actioner_id: 12,
        },
    ];
    let task = compose(node(1), &allocations, &WorkCalendar::default()).unwrap();
    let ids: Vec<i32> = task.assignees.iter().map(|a| a.actioner_id).collect();
    assert_eq!(ids, vec![10, 12]);
    assert!(task.assignees.iter().all(|a| !a.acknowledged));
}

#[test]
fn dependency_codes_map_in_order() {
    let expected = [
        DependencyKind::None,
        DependencyKind::StartToStart,
        DependencyKind::FinishToStart,
        DependencyKind::FinishToFinish,
        DependencyKind::StartToFinish,
    ];
    for (code, kind) in expected.iter().enumerate() {
        let mut source = node(1);
        source.dependencies = vec![RawDependency {
            target_task_id: 2,
            type_code: code as i32,
            offset_days: -1,
        }];
        let task = compose(source, &[], &WorkCalendar::default()).unwrap();
        assert_eq!(task.successors[0].kind, *kind);
        assert_eq!(task.successors[0].target_task_id, 2);
        assert_eq!(task.successors[0].offset_days, -1);
    }
}

#[test]
fn unknown_dependency_code_is_rejected() {
    let mut source = node(7);
    source.dependencies = vec![RawDependency {
        target_task_id: 2,
        type_code: 9,
        offset_days: 0,
    }];
    match compose(source, &[], &WorkCalendar::default()) {
        Err(ImportError::UnknownDependencyKind { task_id: 7, code: 9 }) => {}
        other => panic!("expected UnknownDependencyKind, got {other:?}"),
    }
}

#[test]
fn milestone_parsing_is_case_insensitive_and_exhaustive() {
    for (raw, expected) in [("TRUE", true), ("true", true), ("False", false)] {
        let mut source = node(1);
        source.milestone = MilestoneFlag::Declared(raw.to_string());
        let task = compose(source, &[], &WorkCalendar::default()).unwrap();
        assert_eq!(task.milestone, expected, "for input '{raw}'");
    }

    let mut source = node(3);
    source.milestone = MilestoneFlag::Declared("yes".to_string());
    match compose(source, &[], &WorkCalendar::default()) {
        Err(ImportError::InvalidMilestoneValue { task_id: 3, value }) => assert_eq!(value, "yes"),
        other => panic!("expected InvalidMilestoneValue, got {other:?}"),
    }
}

#[test]
fn resolved_milestone_flag_skips_textual_validation() {
    let mut source = node(1);
    source.milestone = MilestoneFlag::Resolved(true);
    let task = compose(source, &[], &WorkCalendar::default()).unwrap();
    assert!(task.milestone);
}

#[test]
fn negative_duration_is_rejected() {
    let mut source = node(4);
    source.schedule = TaskSchedule::Duration(-2);
    match compose(source, &[], &WorkCalendar::default()) {
        Err(ImportError::Malformed(detail)) => {
            assert!(detail.contains("negative duration"), "got: {detail}")
        }
        other => panic!("expected Malformed, got {other:?}"),
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Semantic relation between a task and one of its successors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyKind {
    None,
    StartToStart,
    FinishToStart,
    FinishToFinish,
    StartToFinish,
}

impl DependencyKind {
    /// Map a source dependency-type code to its kind. Codes 0-4 are the
    /// only defined values.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(DependencyKind::None),
            1 => Some(DependencyKind::StartToStart),
            2 => Some(DependencyKind::FinishToStart),
            3 => Some(DependencyKind::FinishToFinish),
            4 => Some(DependencyKind::StartToFinish),
            _ => None,
        }
    }
}

/// One successor relation: this task precedes `target_task_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskLink {
    pub target_task_id: i32,
    pub kind: DependencyKind,
    /// Signed lag in days between the linked ends.
    pub offset_days: i32,
}

/// Binding of an actioner to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub actioner_id: i32,
    /// Workflow flag owned by downstream layers; always false at import.
    pub acknowledged: bool,
}

impl Assignment {
    pub fn new(actioner_id: i32) -> Self {
        Self {
            actioner_id,
            acknowledged: false,
        }
    }
}

/// One schedulable unit of the canonical project document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i32,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Snapshot of start/end taken at first import, never recomputed.
    pub baseline_start: NaiveDate,
    pub baseline_end: NaiveDate,
    /// Business-day duration. Present on the GanttProject path, absent when
    /// the source supplies an explicit end date instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_days: Option<i64>,
    pub milestone: bool,
    pub percent_complete: i32,
    #[serde(default)]
    pub successors: Vec<TaskLink>,
    /// Immediate nested task ids; decomposition depth is document-driven.
    #[serde(default)]
    pub children: Vec<i32>,
    #[serde(default)]
    pub assignees: Vec<Assignment>,
    /// Reserved for the workflow layer; always empty at import.
    #[serde(default)]
    pub curator: String,
}

impl Task {
    pub fn new(
        id: i32,
        name: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            start_date,
            end_date,
            baseline_start: start_date,
            baseline_end: end_date,
            duration_days: None,
            milestone: false,
            percent_complete: 0,
            successors: Vec::new(),
            children: Vec::new(),
            assignees: Vec::new(),
            curator: String::new(),
        }
    }
}

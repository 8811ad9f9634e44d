use super::{ImportError, ImportResult};
use crate::calendar::WorkCalendar;
use crate::task::{Assignment, DependencyKind, Task, TaskLink};
use chrono::NaiveDate;

/// How a source node describes the task's extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskSchedule {
    /// Business-day duration; the end date is derived via the calendar.
    Duration(i64),
    /// Explicit end date supplied by the source.
    Window(NaiveDate),
}

/// How a source node declares the milestone flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MilestoneFlag {
    /// Textual value subject to the strict true/false rule.
    Declared(String),
    /// Already resolved by the parser; no textual validation applies.
    Resolved(bool),
}

/// One resource-to-task binding from the document-wide allocation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationRecord {
    pub task_id: i32,
    pub actioner_id: i32,
}

/// Raw dependency declaration attached to a source task node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawDependency {
    pub target_task_id: i32,
    pub type_code: i32,
    pub offset_days: i32,
}

/// Format-neutral extraction of one source task node.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskNode {
    pub id: i32,
    pub name: String,
    pub start_date: NaiveDate,
    pub schedule: TaskSchedule,
    pub milestone: MilestoneFlag,
    pub percent_complete: i32,
    pub dependencies: Vec<RawDependency>,
    /// Immediate nested task ids only; parsers walk the deeper levels.
    pub child_ids: Vec<i32>,
}

/// Build one normalized task record from one source node plus the
/// document-wide allocation table. Purely functional; errors carry the
/// originating task id.
pub fn compose(
    node: TaskNode,
    allocations: &[AllocationRecord],
    calendar: &WorkCalendar,
) -> ImportResult<Task> {
    let assignees: Vec<Assignment> = allocations
        .iter()
        .filter(|record| record.task_id == node.id)
        .map(|record| Assignment::new(record.actioner_id))
        .collect();

    let mut successors = Vec::with_capacity(node.dependencies.len());
    for dependency in &node.dependencies {
        let kind = DependencyKind::from_code(dependency.type_code).ok_or(
            ImportError::UnknownDependencyKind {
                task_id: node.id,
                code: dependency.type_code,
            },
        )?;
        successors.push(TaskLink {
            target_task_id: dependency.target_task_id,
            kind,
            offset_days: dependency.offset_days,
        });
    }

    let milestone = match &node.milestone {
        MilestoneFlag::Declared(raw) => parse_milestone(node.id, raw)?,
        MilestoneFlag::Resolved(value) => *value,
    };

    let (end_date, duration_days) = match node.schedule {
        TaskSchedule::Duration(days) => {
            if days < 0 {
                return Err(ImportError::Malformed(format!(
                    "task {} has negative duration {days}",
                    node.id
                )));
            }
            (calendar.add_working_days(node.start_date, days), Some(days))
        }
        TaskSchedule::Window(end) => (end, None),
    };

    // Task::new snapshots the baseline from the freshly computed dates.
    let mut task = Task::new(node.id, node.name, node.start_date, end_date);
    task.duration_days = duration_days;
    task.milestone = milestone;
    task.percent_complete = node.percent_complete;
    task.successors = successors;
    task.children = node.child_ids;
    task.assignees = assignees;
    Ok(task)
}

/// The only legal textual values are "true" and "false", case-insensitive.
fn parse_milestone(task_id: i32, raw: &str) -> ImportResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ImportError::InvalidMilestoneValue {
            task_id,
            value: raw.to_string(),
        }),
    }
}

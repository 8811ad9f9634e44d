use super::compose::{self, AllocationRecord, MilestoneFlag, TaskNode, TaskSchedule};
use super::custom_fields::{self, CustomFieldDefinition};
use super::{ImportConfig, ImportError, ImportResult};
use crate::actioner::Actioner;
use crate::document::ProjectDocument;
use crate::validation;
use chrono::{NaiveDate, NaiveDateTime};
use roxmltree::{Document, Node};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Load an MSProject XML file into a canonical project document.
pub fn load_project_from_msproject<P: AsRef<Path>>(path: P) -> ImportResult<ProjectDocument> {
    let bytes = fs::read(path)?;
    parse_msproject_document(&bytes, &ImportConfig::default())
}

/// Parse an MSProject XML document.
///
/// The first `<Task>` node encodes the project itself and is skipped.
/// Dependency and containment data are not extracted on this path, and the
/// milestone flag is read leniently; both are intentional capability gaps
/// of the MSProject import, not parity with the GanttProject path.
pub fn parse_msproject_document(
    bytes: &[u8],
    config: &ImportConfig,
) -> ImportResult<ProjectDocument> {
    let text = std::str::from_utf8(bytes)
        .map_err(|_| ImportError::Malformed("document is not valid UTF-8".to_string()))?;
    let xml = Document::parse(text)?;
    let root = xml.root_element();

    let resource_nodes = section_children(root, "Resources", "Resource");
    if resource_nodes.is_empty() {
        return Err(ImportError::NoActioners);
    }
    let task_nodes = section_children(root, "Tasks", "Task");
    if task_nodes.is_empty() {
        return Err(ImportError::NoTasks);
    }

    let definitions = parse_field_definitions(root);
    let field_id =
        custom_fields::find_messaging_field_id(&definitions, &config.messaging_field_key)?
            .to_string();

    let mut actioners = Vec::with_capacity(resource_nodes.len());
    for node in &resource_nodes {
        actioners.push(extract_actioner(*node, &field_id)?);
    }

    let allocations = parse_assignments(root)?;

    // Everything after the project-summary node is a real task.
    let work_items = &task_nodes[1..];
    if work_items.is_empty() {
        return Err(ImportError::NoTasks);
    }
    warn!("msproject import does not extract dependency or containment data");

    let mut tasks = Vec::with_capacity(work_items.len());
    for element in work_items {
        let node = extract_task_node(*element)?;
        tasks.push(compose::compose(node, &allocations, &config.calendar)?);
    }

    let document = ProjectDocument::new(tasks, actioners);
    validation::validate_document(&document)?;
    debug!(
        tasks = document.tasks.len(),
        actioners = document.actioners.len(),
        "parsed MSProject document"
    );
    Ok(document)
}

/// MSProject documents carry a default namespace; tags are matched by
/// local name throughout.
fn section_children<'a, 'input>(
    root: Node<'a, 'input>,
    section: &str,
    child: &str,
) -> Vec<Node<'a, 'input>> {
    root.children()
        .find(|node| node.tag_name().name() == section)
        .map(|node| {
            node.children()
                .filter(|inner| inner.tag_name().name() == child)
                .collect()
        })
        .unwrap_or_default()
}

fn parse_field_definitions(root: Node) -> Vec<CustomFieldDefinition> {
    let mut definitions = Vec::new();
    for node in section_children(root, "ExtendedAttributes", "ExtendedAttribute") {
        if let (Some(id), Some(name)) = (child_text(node, "FieldID"), child_text(node, "FieldName"))
        {
            definitions.push(CustomFieldDefinition {
                id: id.trim().to_string(),
                name: name.trim().to_string(),
            });
        }
    }
    definitions
}

fn extract_actioner(node: Node, field_id: &str) -> ImportResult<Actioner> {
    let id = required_child_i32(node, "UID")?;
    let name = child_text(node, "Name").unwrap_or_default().to_string();

    let values: HashMap<String, String> = node
        .children()
        .filter(|child| child.tag_name().name() == "ExtendedAttribute")
        .filter_map(|child| {
            match (child_text(child, "FieldID"), child_text(child, "Value")) {
                (Some(id), Some(value)) => Some((id.trim().to_string(), value.to_string())),
                _ => None,
            }
        })
        .collect();
    let messaging_handle = custom_fields::extract_messaging_handle(&values, field_id, &name)?;

    let mut actioner = Actioner::new(id, name, messaging_handle);
    // The format has no phone field; email is the only contact carried.
    actioner.email = child_text(node, "EmailAddress")
        .unwrap_or_default()
        .to_string();
    Ok(actioner)
}

fn parse_assignments(root: Node) -> ImportResult<Vec<AllocationRecord>> {
    let mut allocations = Vec::new();
    for node in section_children(root, "Assignments", "Assignment") {
        allocations.push(AllocationRecord {
            task_id: required_child_i32(node, "TaskUID")?,
            actioner_id: required_child_i32(node, "ResourceUID")?,
        });
    }
    Ok(allocations)
}

fn extract_task_node(element: Node) -> ImportResult<TaskNode> {
    let id = required_child_i32(element, "UID")?;
    let name = child_text(element, "Name").unwrap_or_default().to_string();

    let start_date = parse_ms_date(id, child_text(element, "Start").unwrap_or_default())?;
    let end_date = parse_ms_date(id, child_text(element, "Finish").unwrap_or_default())?;

    // Lenient milestone read: "1" or "true" sets the flag, anything else
    // clears it. The strict textual rule applies only to GanttProject.
    let raw_milestone = child_text(element, "Milestone")
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    let milestone = matches!(raw_milestone.as_str(), "1" | "true");

    let percent_complete = child_text(element, "PercentComplete")
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(0);

    Ok(TaskNode {
        id,
        name,
        start_date,
        schedule: TaskSchedule::Window(end_date),
        milestone: MilestoneFlag::Resolved(milestone),
        percent_complete,
        dependencies: Vec::new(),
        child_ids: Vec::new(),
    })
}

fn child_text<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.children()
        .find(|child| child.tag_name().name() == name)
        .and_then(|child| child.text())
}

fn required_child_i32(node: Node, name: &str) -> ImportResult<i32> {
    let raw = child_text(node, name).ok_or_else(|| {
        ImportError::Malformed(format!(
            "<{}> element missing <{name}>",
            node.tag_name().name()
        ))
    })?;
    raw.trim().parse().map_err(|_| {
        ImportError::Malformed(format!(
            "<{}> element has invalid integer <{name}> '{raw}'",
            node.tag_name().name()
        ))
    })
}

fn parse_ms_date(task_id: i32, raw: &str) -> ImportResult<NaiveDate> {
    if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Ok(datetime.date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| ImportError::InvalidDate {
        task_id,
        value: raw.to_string(),
    })
}

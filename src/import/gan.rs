use super::compose::{self, AllocationRecord, MilestoneFlag, RawDependency, TaskNode, TaskSchedule};
use super::custom_fields::{self, CustomFieldDefinition};
use super::{ImportConfig, ImportError, ImportResult};
use crate::actioner::Actioner;
use crate::document::ProjectDocument;
use crate::task::Task;
use crate::validation;
use chrono::NaiveDate;
use roxmltree::{Document, Node};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Load a GanttProject `.gan` file into a canonical project document.
pub fn load_project_from_gan<P: AsRef<Path>>(path: P) -> ImportResult<ProjectDocument> {
    let bytes = fs::read(path)?;
    parse_gan_document(&bytes, &ImportConfig::default())
}

/// Parse a GanttProject XML document.
///
/// Four phases: structural presence checks, messaging-field resolution,
/// per-task composition (nested `<task>` elements walked with an explicit
/// stack), whole-document cross-reference validation.
pub fn parse_gan_document(bytes: &[u8], config: &ImportConfig) -> ImportResult<ProjectDocument> {
    let text = std::str::from_utf8(bytes)
        .map_err(|_| ImportError::Malformed("document is not valid UTF-8".to_string()))?;
    let xml = Document::parse(text)?;
    let root = xml.root_element();

    let top_level_tasks: Vec<Node> = root
        .children()
        .find(|node| node.has_tag_name("tasks"))
        .map(|section| {
            section
                .children()
                .filter(|node| node.has_tag_name("task"))
                .collect()
        })
        .unwrap_or_default();
    if top_level_tasks.is_empty() {
        return Err(ImportError::NoTasks);
    }

    let allocations = parse_allocations(root)?;
    if allocations.is_empty() {
        return Err(ImportError::NoAssignments);
    }

    let actioners = parse_resources(root, config)?;
    let tasks = parse_tasks(&top_level_tasks, &allocations, config)?;

    let document = ProjectDocument::new(tasks, actioners);
    validation::validate_document(&document)?;
    debug!(
        tasks = document.tasks.len(),
        actioners = document.actioners.len(),
        "parsed GanttProject document"
    );
    Ok(document)
}

fn parse_allocations(root: Node) -> ImportResult<Vec<AllocationRecord>> {
    let Some(section) = root.children().find(|node| node.has_tag_name("allocations")) else {
        return Ok(Vec::new());
    };

    let mut allocations = Vec::new();
    for node in section.children().filter(|node| node.has_tag_name("allocation")) {
        allocations.push(AllocationRecord {
            task_id: parse_attr_i32(node, "task-id")?,
            actioner_id: parse_attr_i32(node, "resource-id")?,
        });
    }
    Ok(allocations)
}

fn parse_resources(root: Node, config: &ImportConfig) -> ImportResult<Vec<Actioner>> {
    let mut definitions = Vec::new();
    let mut resource_nodes = Vec::new();
    if let Some(section) = root.children().find(|node| node.has_tag_name("resources")) {
        for node in section.children() {
            if node.has_tag_name("custom-property-definition") {
                definitions.push(CustomFieldDefinition {
                    id: required_attr(node, "id")?.to_string(),
                    name: required_attr(node, "name")?.to_string(),
                });
            } else if node.has_tag_name("resource") {
                resource_nodes.push(node);
            }
        }
    }

    // Resolved once per document; per-resource lookups index by field id.
    let field_id =
        custom_fields::find_messaging_field_id(&definitions, &config.messaging_field_key)?
            .to_string();

    let mut actioners = Vec::with_capacity(resource_nodes.len());
    for node in resource_nodes {
        let id = parse_attr_i32(node, "id")?;
        let name = required_attr(node, "name")?.to_string();

        let values: HashMap<String, String> = node
            .children()
            .filter(|child| child.has_tag_name("custom-property"))
            .filter_map(|child| {
                match (child.attribute("definition-id"), child.attribute("value")) {
                    (Some(definition_id), Some(value)) => {
                        Some((definition_id.to_string(), value.to_string()))
                    }
                    _ => None,
                }
            })
            .collect();
        let messaging_handle = custom_fields::extract_messaging_handle(&values, &field_id, &name)?;

        let mut actioner = Actioner::new(id, name, messaging_handle);
        actioner.email = node.attribute("contacts").unwrap_or_default().to_string();
        actioner.phone = node.attribute("phone").unwrap_or_default().to_string();
        actioners.push(actioner);
    }
    Ok(actioners)
}

fn parse_tasks(
    top_level: &[Node],
    allocations: &[AllocationRecord],
    config: &ImportConfig,
) -> ImportResult<Vec<Task>> {
    let mut tasks = Vec::new();

    // Depth-first in document order. The explicit stack replaces call-stack
    // recursion, so decomposition depth is bounded only by the document.
    let mut stack: Vec<Node> = top_level.iter().rev().copied().collect();
    while let Some(element) = stack.pop() {
        let node = extract_task_node(element)?;
        tasks.push(compose::compose(node, allocations, &config.calendar)?);

        let nested: Vec<Node> = element
            .children()
            .filter(|child| child.has_tag_name("task"))
            .collect();
        for child in nested.into_iter().rev() {
            stack.push(child);
        }
    }
    Ok(tasks)
}

fn extract_task_node(element: Node) -> ImportResult<TaskNode> {
    let id = parse_attr_i32(element, "id")?;
    let name = required_attr(element, "name")?.to_string();

    let raw_start = element.attribute("start").unwrap_or_default();
    let start_date =
        NaiveDate::parse_from_str(raw_start, "%Y-%m-%d").map_err(|_| ImportError::InvalidDate {
            task_id: id,
            value: raw_start.to_string(),
        })?;

    let duration = parse_attr_i64(element, "duration")?;
    let milestone =
        MilestoneFlag::Declared(element.attribute("meeting").unwrap_or("false").to_string());
    let percent_complete = optional_attr_i32(element, "complete", 0)?;

    let mut dependencies = Vec::new();
    let mut child_ids = Vec::new();
    for child in element.children() {
        if child.has_tag_name("depend") {
            dependencies.push(RawDependency {
                target_task_id: parse_attr_i32(child, "id")?,
                type_code: parse_attr_i32(child, "type")?,
                offset_days: optional_attr_i32(child, "difference", 0)?,
            });
        } else if child.has_tag_name("task") {
            child_ids.push(parse_attr_i32(child, "id")?);
        }
    }

    Ok(TaskNode {
        id,
        name,
        start_date,
        schedule: TaskSchedule::Duration(duration),
        milestone,
        percent_complete,
        dependencies,
        child_ids,
    })
}

fn required_attr<'a>(node: Node<'a, '_>, name: &str) -> ImportResult<&'a str> {
    node.attribute(name).ok_or_else(|| {
        ImportError::Malformed(format!(
            "<{}> element missing '{name}' attribute",
            node.tag_name().name()
        ))
    })
}

fn parse_attr_i32(node: Node, name: &str) -> ImportResult<i32> {
    let raw = required_attr(node, name)?;
    raw.trim().parse().map_err(|_| {
        ImportError::Malformed(format!(
            "<{}> attribute '{name}' has invalid integer '{raw}'",
            node.tag_name().name()
        ))
    })
}

fn parse_attr_i64(node: Node, name: &str) -> ImportResult<i64> {
    let raw = required_attr(node, name)?;
    raw.trim().parse().map_err(|_| {
        ImportError::Malformed(format!(
            "<{}> attribute '{name}' has invalid integer '{raw}'",
            node.tag_name().name()
        ))
    })
}

fn optional_attr_i32(node: Node, name: &str, default: i32) -> ImportResult<i32> {
    match node.attribute(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| {
            ImportError::Malformed(format!(
                "<{}> attribute '{name}' has invalid integer '{raw}'",
                node.tag_name().name()
            ))
        }),
    }
}

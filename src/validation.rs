use crate::document::ProjectDocument;
use crate::import::{ImportError, ImportResult};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};

/// Whole-document referential checks, run as the final phase of every
/// import. Fail-fast: the first violation aborts with its location.
pub(crate) fn validate_document(document: &ProjectDocument) -> ImportResult<()> {
    let mut task_ids = HashSet::with_capacity(document.tasks.len());
    for task in &document.tasks {
        if !task_ids.insert(task.id) {
            return Err(ImportError::DuplicateId {
                kind: "task",
                id: task.id,
            });
        }
    }

    let mut actioner_ids = HashSet::with_capacity(document.actioners.len());
    for actioner in &document.actioners {
        if !actioner_ids.insert(actioner.id) {
            return Err(ImportError::DuplicateId {
                kind: "actioner",
                id: actioner.id,
            });
        }
    }

    for task in &document.tasks {
        for link in &task.successors {
            if !task_ids.contains(&link.target_task_id) {
                return Err(ImportError::DanglingReference {
                    kind: "successor",
                    id: link.target_task_id,
                });
            }
        }
        for child_id in &task.children {
            if !task_ids.contains(child_id) {
                return Err(ImportError::DanglingReference {
                    kind: "child",
                    id: *child_id,
                });
            }
        }
        for assignment in &task.assignees {
            if !actioner_ids.contains(&assignment.actioner_id) {
                return Err(ImportError::DanglingReference {
                    kind: "assignee",
                    id: assignment.actioner_id,
                });
            }
        }
    }

    detect_containment_cycle(document)
}

/// The containment relation must stay a forest. Malformed input can smuggle
/// a cycle in through `children`, so the check runs over a flat graph of
/// ids instead of walking a nested tree.
fn detect_containment_cycle(document: &ProjectDocument) -> ImportResult<()> {
    let mut graph: DiGraph<i32, ()> = DiGraph::new();
    let mut id_to_index: HashMap<i32, NodeIndex> = HashMap::new();

    for task in &document.tasks {
        let node_ix = graph.add_node(task.id);
        id_to_index.insert(task.id, node_ix);
    }

    // Add edges: parent -> child
    for task in &document.tasks {
        for child_id in &task.children {
            if let (Some(&u), Some(&v)) = (id_to_index.get(&task.id), id_to_index.get(child_id)) {
                graph.add_edge(u, v, ());
            }
        }
    }

    match toposort(&graph, None) {
        Ok(_) => Ok(()),
        Err(cycle) => Err(ImportError::CyclicContainment(graph[cycle.node_id()])),
    }
}

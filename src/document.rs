use crate::actioner::Actioner;
use crate::task::Task;
use serde::{Deserialize, Serialize};

/// Canonical output of every import: the flat task table plus the actioner
/// directory. The serde form of this struct is the JSON exchange contract,
/// so export-then-reimport round-trips losslessly.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectDocument {
    pub tasks: Vec<Task>,
    pub actioners: Vec<Actioner>,
}

impl ProjectDocument {
    pub fn new(tasks: Vec<Task>, actioners: Vec<Actioner>) -> Self {
        Self { tasks, actioners }
    }

    pub fn task(&self, id: i32) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn actioner(&self, id: i32) -> Option<&Actioner> {
        self.actioners.iter().find(|actioner| actioner.id == id)
    }
}

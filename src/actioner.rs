use serde::{Deserialize, Serialize};

/// A human resource assignable to tasks, addressed via an external
/// messaging handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actioner {
    /// Identifier taken from the source resource identifier.
    pub id: i32,
    pub name: String,
    /// Optional contact string; empty when the source has none.
    #[serde(default)]
    pub email: String,
    /// Optional contact string; MSProject documents have no phone field.
    #[serde(default)]
    pub phone: String,
    /// External chat username. Never empty in a valid document.
    pub messaging_handle: String,
}

impl Actioner {
    pub fn new(id: i32, name: impl Into<String>, messaging_handle: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: String::new(),
            phone: String::new(),
            messaging_handle: messaging_handle.into(),
        }
    }
}

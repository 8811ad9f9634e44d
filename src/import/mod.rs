use crate::calendar::WorkCalendar;
use crate::document::ProjectDocument;
use serde_json::Error as SerdeJsonError;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

pub mod compose;
pub mod custom_fields;
pub mod gan;
pub mod json;
pub mod msproject;

pub use gan::load_project_from_gan;
pub use json::{load_project_from_json, save_project_to_json};
pub use msproject::load_project_from_msproject;

#[derive(Debug)]
pub enum ImportError {
    /// Source document declares zero tasks; nothing to import.
    NoTasks,
    /// GanttProject document has tasks but no resource allocations.
    NoAssignments,
    /// MSProject document has no resources.
    NoActioners,
    /// No custom field or extended attribute maps to the reserved
    /// messaging key.
    MissingMessagingField,
    /// The messaging field exists but is blank for the named actioner.
    EmptyMessagingHandle(String),
    InvalidMilestoneValue { task_id: i32, value: String },
    UnknownDependencyKind { task_id: i32, code: i32 },
    InvalidDate { task_id: i32, value: String },
    DanglingReference { kind: &'static str, id: i32 },
    DuplicateId { kind: &'static str, id: i32 },
    /// The `children` relation contains a cycle through the given task.
    CyclicContainment(i32),
    /// Document fails to parse as well-formed structured text at all.
    Malformed(String),
    Io(io::Error),
    Serialization(SerdeJsonError),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::NoTasks => write!(f, "document declares no tasks"),
            ImportError::NoAssignments => {
                write!(f, "document contains tasks but no resource allocations")
            }
            ImportError::NoActioners => write!(f, "document declares no resources"),
            ImportError::MissingMessagingField => write!(
                f,
                "no custom field is declared for the reserved key '{}'",
                custom_fields::MESSAGING_FIELD_KEY
            ),
            ImportError::EmptyMessagingHandle(name) => {
                write!(f, "resource '{name}' has no messaging handle")
            }
            ImportError::InvalidMilestoneValue { task_id, value } => {
                write!(f, "task {task_id} has invalid milestone value '{value}'")
            }
            ImportError::UnknownDependencyKind { task_id, code } => {
                write!(f, "task {task_id} has unknown dependency type code {code}")
            }
            ImportError::InvalidDate { task_id, value } => {
                write!(f, "task {task_id} has invalid date '{value}'")
            }
            ImportError::DanglingReference { kind, id } => {
                write!(f, "{kind} reference points to nonexistent id {id}")
            }
            ImportError::DuplicateId { kind, id } => {
                write!(f, "duplicate {kind} id {id}")
            }
            ImportError::CyclicContainment(task_id) => {
                write!(f, "task containment cycle involving task {task_id}")
            }
            ImportError::Malformed(detail) => write!(f, "malformed document: {detail}"),
            ImportError::Io(err) => write!(f, "io error: {err}"),
            ImportError::Serialization(err) => write!(f, "serialization error: {err}"),
        }
    }
}

impl std::error::Error for ImportError {}

impl From<io::Error> for ImportError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<SerdeJsonError> for ImportError {
    fn from(value: SerdeJsonError) -> Self {
        Self::Serialization(value)
    }
}

impl From<roxmltree::Error> for ImportError {
    fn from(value: roxmltree::Error) -> Self {
        Self::Malformed(value.to_string())
    }
}

pub type ImportResult<T> = Result<T, ImportError>;

/// Source formats this engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    GanXml,
    MsProjectXml,
    Json,
}

impl SourceFormat {
    /// Sniff the format from a file extension: `.gan`, `.xml`, `.json`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let extension = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "gan" => Some(SourceFormat::GanXml),
            "xml" => Some(SourceFormat::MsProjectXml),
            "json" => Some(SourceFormat::Json),
            _ => None,
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            SourceFormat::GanXml => "gan-xml",
            SourceFormat::MsProjectXml => "msproject-xml",
            SourceFormat::Json => "json",
        };
        write!(f, "{tag}")
    }
}

impl FromStr for SourceFormat {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "gan" | "gan-xml" => Ok(SourceFormat::GanXml),
            "msproject" | "msproject-xml" => Ok(SourceFormat::MsProjectXml),
            "json" => Ok(SourceFormat::Json),
            other => Err(format!("unknown source format '{other}'")),
        }
    }
}

/// Immutable configuration shared by every import invocation.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    pub calendar: WorkCalendar,
    /// Semantic name of the custom property carrying the messaging handle.
    pub messaging_field_key: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            calendar: WorkCalendar::default(),
            messaging_field_key: custom_fields::MESSAGING_FIELD_KEY.to_string(),
        }
    }
}

/// Convert one source document into a canonical project document.
pub fn import_project(bytes: &[u8], format: SourceFormat) -> ImportResult<ProjectDocument> {
    import_project_with(bytes, format, &ImportConfig::default())
}

pub fn import_project_with(
    bytes: &[u8],
    format: SourceFormat,
    config: &ImportConfig,
) -> ImportResult<ProjectDocument> {
    let document = match format {
        SourceFormat::GanXml => gan::parse_gan_document(bytes, config)?,
        SourceFormat::MsProjectXml => msproject::parse_msproject_document(bytes, config)?,
        SourceFormat::Json => json::parse_json_document(bytes)?,
    };
    info!(
        %format,
        tasks = document.tasks.len(),
        actioners = document.actioners.len(),
        "import complete"
    );
    Ok(document)
}

/// Load a project document from a file, sniffing the format from the
/// extension.
pub fn load_project_from_path<P: AsRef<Path>>(path: P) -> ImportResult<ProjectDocument> {
    let format = SourceFormat::from_path(&path).ok_or_else(|| {
        ImportError::Malformed(format!(
            "unrecognized file extension for '{}'",
            path.as_ref().display()
        ))
    })?;
    let bytes = fs::read(path)?;
    import_project(&bytes, format)
}

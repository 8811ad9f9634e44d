pub mod actioner;
pub mod calendar;
pub mod document;
pub mod import;
pub mod task;
pub(crate) mod validation;

pub use actioner::Actioner;
pub use calendar::WorkCalendar;
pub use document::ProjectDocument;
pub use import::{
    ImportConfig, ImportError, ImportResult, SourceFormat, import_project, import_project_with,
    load_project_from_gan, load_project_from_json, load_project_from_msproject,
    load_project_from_path, save_project_to_json,
};
pub use task::{Assignment, DependencyKind, Task, TaskLink};

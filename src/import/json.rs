use super::{ImportError, ImportResult};
use crate::document::ProjectDocument;
use crate::validation;
use std::fs::File;
use std::path::Path;

/// Deserialize a previously exported project document.
///
/// Shape validation (field presence) comes from serde and the
/// cross-reference pass; business rules are not re-derived, since the data
/// was already normalized once before export.
pub fn parse_json_document(bytes: &[u8]) -> ImportResult<ProjectDocument> {
    let document: ProjectDocument = serde_json::from_slice(bytes)
        .map_err(|err| ImportError::Malformed(format!("invalid project json: {err}")))?;
    validation::validate_document(&document)?;
    Ok(document)
}

pub fn load_project_from_json<P: AsRef<Path>>(path: P) -> ImportResult<ProjectDocument> {
    let bytes = std::fs::read(path)?;
    parse_json_document(&bytes)
}

/// Serialize a project document to the canonical JSON exchange form.
pub fn save_project_to_json<P: AsRef<Path>>(
    document: &ProjectDocument,
    path: P,
) -> ImportResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, document)?;
    Ok(())
}

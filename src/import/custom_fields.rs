use super::{ImportError, ImportResult};
use std::collections::HashMap;

/// Reserved semantic name of the custom property carrying the external
/// messaging username. Both XML dialects store the handle as an open-ended
/// custom property rather than a first-class field.
pub const MESSAGING_FIELD_KEY: &str = "tg_username";

/// One custom-property (GanttProject) or extended-attribute (MSProject)
/// definition from a source document's resource-metadata section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomFieldDefinition {
    /// Format-local field identifier referenced by per-resource values.
    pub id: String,
    /// Semantic name declared for the field.
    pub name: String,
}

/// Locate the field identifier declared for `key`.
///
/// Resolved once per document; per-resource lookups then index directly by
/// the returned id instead of re-scanning the definitions.
pub fn find_messaging_field_id<'a>(
    definitions: &'a [CustomFieldDefinition],
    key: &str,
) -> ImportResult<&'a str> {
    definitions
        .iter()
        .find(|definition| definition.name == key)
        .map(|definition| definition.id.as_str())
        .ok_or(ImportError::MissingMessagingField)
}

/// Extract one resource's messaging handle from its custom-property values,
/// keyed by field id. A missing or blank value is fatal for the import.
pub fn extract_messaging_handle(
    values: &HashMap<String, String>,
    field_id: &str,
    actioner_name: &str,
) -> ImportResult<String> {
    match values.get(field_id) {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(ImportError::EmptyMessagingHandle(actioner_name.to_string())),
    }
}

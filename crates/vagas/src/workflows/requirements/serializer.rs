//! String transport of the requirements document (`requisitos_json`).

use super::builder::RequirementBuilder;
use super::document::JobRequirementsDocument;
use super::RequirementsError;

/// Encode the enabled requirements of `builder`.
pub fn serialize(builder: &RequirementBuilder) -> Result<String, RequirementsError> {
    builder.document().to_json_string()
}

/// Decode a stored `requisitos_json`. Callers decide what a failure means;
/// nothing in this crate maps it to an empty document.
pub fn deserialize(raw: &str) -> Result<JobRequirementsDocument, RequirementsError> {
    JobRequirementsDocument::from_json_str(raw)
}

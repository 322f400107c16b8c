//! Job requirements: the fixed schema of selectable criteria, the edit-session
//! builder and the `requisitos_json` document persisted with each posting.

mod builder;
mod criteria;
mod document;
pub mod schema;
pub mod serializer;
mod value;

pub use builder::{BuilderError, RequirementBuilder, RequirementSlot};
pub use criteria::{
    BoundedRange, CertificationCriterion, DistanceCriterion, LeadershipCriterion,
    LeveledCriterion, LocationCriterion, RequirementIssue, ScreeningCriteria,
};
pub use document::JobRequirementsDocument;
pub use schema::{
    schema_catalog, validate_value, RequirementCategory, RequirementKey, SchemaCatalog,
    SchemaViolation, ValueShape, LICENCE_CATEGORIES,
};
pub use value::{
    CertificationRequirement, DistanceValue, LanguageRequirement, LeadershipValue, LocationValue,
    ProficiencyLevel, RangeValue, RequirementValue, SchoolingLevel, TechnologyRequirement,
    NO_LIMIT,
};

#[derive(Debug, thiserror::Error)]
pub enum RequirementsError {
    #[error("requirements document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unknown requirement key '{0}'")]
    UnknownKey(String),
    #[error("requirement key '{0}' appears more than once")]
    DuplicateKey(String),
    #[error("requirement {key} expects a {expected} value")]
    ShapeMismatch {
        key: RequirementKey,
        expected: &'static str,
    },
}

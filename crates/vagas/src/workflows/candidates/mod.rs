//! Candidate profiles, their CSV import and screening against job criteria.

pub mod domain;
pub mod import;
pub mod normalizer;
pub mod screening;

pub use domain::{CandidateProfile, CandidateSkill};
pub use import::{CandidateImportError, CandidateImporter};
pub use screening::{
    DisqualificationReason, ScoreComponent, ScreeningDecision, ScreeningEngine, ScreeningOutcome,
    ScreeningWeights,
};

use serde::{Deserialize, Serialize};

use super::rules::ScreeningSignals;
use crate::workflows::requirements::{ProficiencyLevel, RequirementKey, SchoolingLevel};

/// Screening result for one candidate against one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScreeningDecision {
    Qualified,
    Partial { gaps: Vec<String> },
    Disqualified { reason: DisqualificationReason },
}

impl ScreeningDecision {
    pub fn summary(&self) -> String {
        match self {
            ScreeningDecision::Qualified => "atende todos os requisitos".to_string(),
            ScreeningDecision::Partial { gaps } => {
                format!("atende parcialmente: {}", gaps.join("; "))
            }
            ScreeningDecision::Disqualified { reason } => reason.summary(),
        }
    }

    pub fn is_disqualified(&self) -> bool {
        matches!(self, ScreeningDecision::Disqualified { .. })
    }
}

/// Knock-out criteria. Anything else a candidate misses is a gap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisqualificationReason {
    AgeOutOfRange {
        age: u32,
        min: Option<u32>,
        max: Option<u32>,
    },
    MissingLicence {
        categories: Vec<String>,
    },
    SchoolingBelowMinimum {
        required: SchoolingLevel,
        actual: SchoolingLevel,
    },
    MissingMandatory {
        requirement: RequirementKey,
        name: String,
    },
    InsufficientLevel {
        requirement: RequirementKey,
        name: String,
        required: ProficiencyLevel,
        actual: Option<ProficiencyLevel>,
    },
}

impl DisqualificationReason {
    pub fn requirement(&self) -> RequirementKey {
        match self {
            DisqualificationReason::AgeOutOfRange { .. } => RequirementKey::Idade,
            DisqualificationReason::MissingLicence { .. } => RequirementKey::Cnh,
            DisqualificationReason::SchoolingBelowMinimum { .. } => {
                RequirementKey::EscolaridadeMinima
            }
            DisqualificationReason::MissingMandatory { requirement, .. }
            | DisqualificationReason::InsufficientLevel { requirement, .. } => *requirement,
        }
    }

    pub fn summary(&self) -> String {
        match self {
            DisqualificationReason::AgeOutOfRange { age, min, max } => format!(
                "idade {age} fora da faixa {}-{}",
                min.map_or_else(|| "sem limite".to_string(), |value| value.to_string()),
                max.map_or_else(|| "sem limite".to_string(), |value| value.to_string())
            ),
            DisqualificationReason::MissingLicence { categories } => {
                format!("CNH sem a(s) categoria(s) {}", categories.join(", "))
            }
            DisqualificationReason::SchoolingBelowMinimum { required, actual } => format!(
                "escolaridade {} abaixo do mínimo {}",
                actual.label(),
                required.label()
            ),
            DisqualificationReason::MissingMandatory { requirement, name } => {
                format!("{}: falta {name} (obrigatório)", requirement.label())
            }
            DisqualificationReason::InsufficientLevel {
                requirement,
                name,
                required,
                actual,
            } => format!(
                "{}: {name} no nível {} abaixo do exigido {} (obrigatório)",
                requirement.label(),
                actual.map_or("não informado", |level| level.as_str()),
                required.as_str()
            ),
        }
    }
}

pub(crate) fn decide_outcome(signals: ScreeningSignals) -> ScreeningDecision {
    if let Some(reason) = signals.knockouts.into_iter().next() {
        return ScreeningDecision::Disqualified { reason };
    }

    if !signals.gaps.is_empty() {
        return ScreeningDecision::Partial { gaps: signals.gaps };
    }

    ScreeningDecision::Qualified
}

mod config;
mod policy;
mod rules;

pub use config::ScreeningWeights;
pub use policy::{DisqualificationReason, ScreeningDecision};

use serde::{Deserialize, Serialize};

use super::domain::CandidateProfile;
use crate::workflows::requirements::{RequirementKey, ScreeningCriteria};
use policy::decide_outcome;

/// Stateless evaluator that applies job criteria to candidate profiles.
#[derive(Debug, Clone, Default)]
pub struct ScreeningEngine {
    weights: ScreeningWeights,
}

impl ScreeningEngine {
    pub fn new(weights: ScreeningWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScreeningWeights {
        &self.weights
    }

    pub fn score(
        &self,
        criteria: &ScreeningCriteria,
        candidate: &CandidateProfile,
    ) -> ScreeningOutcome {
        let (components, total_score, signals) =
            rules::score_candidate(criteria, candidate, &self.weights);
        let decision = decide_outcome(signals);

        ScreeningOutcome {
            candidate: candidate.name.clone(),
            decision,
            total_score,
            components,
        }
    }

    /// Score every candidate and order the results: qualified first, then
    /// partial, then disqualified; higher scores first within each group.
    pub fn rank(
        &self,
        criteria: &ScreeningCriteria,
        candidates: &[CandidateProfile],
    ) -> Vec<ScreeningOutcome> {
        let mut outcomes: Vec<ScreeningOutcome> = candidates
            .iter()
            .map(|candidate| self.score(criteria, candidate))
            .collect();
        outcomes.sort_by(|left, right| {
            decision_rank(&left.decision)
                .cmp(&decision_rank(&right.decision))
                .then_with(|| right.total_score.cmp(&left.total_score))
        });
        outcomes
    }
}

fn decision_rank(decision: &ScreeningDecision) -> u8 {
    match decision {
        ScreeningDecision::Qualified => 0,
        ScreeningDecision::Partial { .. } => 1,
        ScreeningDecision::Disqualified { .. } => 2,
    }
}

/// Contribution of one requirement to a candidate's score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub requirement: RequirementKey,
    pub score: i16,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningOutcome {
    pub candidate: String,
    pub decision: ScreeningDecision,
    pub total_score: i32,
    pub components: Vec<ScoreComponent>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::candidates::domain::CandidateSkill;
    use crate::workflows::requirements::{
        BoundedRange, CertificationCriterion, DistanceCriterion, LeveledCriterion,
        LocationCriterion, ProficiencyLevel, SchoolingLevel,
    };

    fn warehouse_criteria() -> ScreeningCriteria {
        ScreeningCriteria {
            age: Some(BoundedRange {
                min: Some(18),
                max: Some(65),
            }),
            licence_categories: vec!["D".to_string()],
            location: Some(LocationCriterion {
                city: Some("Campinas".to_string()),
                state: Some("SP".to_string()),
                accepted_regions: vec!["Sumaré".to_string()],
            }),
            distance: Some(DistanceCriterion {
                max_km: Some(30),
                auto_calculate: false,
            }),
            minimum_schooling: Some(SchoolingLevel::MedioCompleto),
            technologies: vec![LeveledCriterion {
                name: "Excel".to_string(),
                level: Some(ProficiencyLevel::Avancado),
                mandatory: true,
            }],
            languages: vec![LeveledCriterion {
                name: "Inglês".to_string(),
                level: Some(ProficiencyLevel::Intermediario),
                mandatory: false,
            }],
            certifications: vec![CertificationCriterion {
                name: "NR-11".to_string(),
                mandatory: false,
            }],
            ..ScreeningCriteria::default()
        }
    }

    fn strong_candidate() -> CandidateProfile {
        CandidateProfile {
            name: "Joana".to_string(),
            age: Some(34),
            city: Some("Sumare".to_string()),
            state: Some("SP".to_string()),
            distance_km: Some(12),
            licence_categories: vec!["AD".to_string()],
            schooling: Some(SchoolingLevel::Tecnico),
            technologies: vec![CandidateSkill::new(
                "excel",
                Some(ProficiencyLevel::Especialista),
            )],
            languages: vec![CandidateSkill::new(
                "Ingles",
                Some(ProficiencyLevel::Fluente),
            )],
            certifications: vec!["nr-11".to_string()],
            ..CandidateProfile::default()
        }
    }

    #[test]
    fn engine_qualifies_candidates_meeting_every_requirement() {
        let engine = ScreeningEngine::default();
        let outcome = engine.score(&warehouse_criteria(), &strong_candidate());

        assert_eq!(outcome.decision, ScreeningDecision::Qualified);
        assert_eq!(outcome.candidate, "Joana");
        assert!(outcome.components.iter().all(|component| component.score > 0));
        let excel = outcome
            .components
            .iter()
            .find(|component| component.requirement == RequirementKey::TecnologiasSoftwares)
            .expect("technology component");
        let weights = ScreeningWeights::default();
        assert_eq!(excel.score, weights.technology + weights.level_bonus);
    }

    #[test]
    fn engine_disqualifies_for_missing_mandatory_technology() {
        let engine = ScreeningEngine::default();
        let mut candidate = strong_candidate();
        candidate.technologies.clear();

        let outcome = engine.score(&warehouse_criteria(), &candidate);

        match outcome.decision {
            ScreeningDecision::Disqualified {
                reason: DisqualificationReason::MissingMandatory { requirement, name },
            } => {
                assert_eq!(requirement, RequirementKey::TecnologiasSoftwares);
                assert_eq!(name, "Excel");
            }
            other => panic!("expected missing mandatory technology, got {other:?}"),
        }
    }

    #[test]
    fn engine_reports_first_knockout_in_requirement_order() {
        let engine = ScreeningEngine::default();
        let mut candidate = strong_candidate();
        candidate.age = Some(70);
        candidate.licence_categories = vec!["B".to_string()];

        let outcome = engine.score(&warehouse_criteria(), &candidate);

        assert!(matches!(
            outcome.decision,
            ScreeningDecision::Disqualified {
                reason: DisqualificationReason::AgeOutOfRange { age: 70, .. }
            }
        ));
        assert!(outcome.components.iter().any(|component| {
            component.requirement == RequirementKey::Cnh && component.score < 0
        }));
    }

    #[test]
    fn distance_and_language_shortfalls_are_gaps() {
        let engine = ScreeningEngine::default();
        let mut candidate = strong_candidate();
        candidate.distance_km = Some(55);
        candidate.languages = vec![CandidateSkill::new("Inglês", Some(ProficiencyLevel::Basico))];

        let outcome = engine.score(&warehouse_criteria(), &candidate);

        match outcome.decision {
            ScreeningDecision::Partial { gaps } => {
                assert_eq!(gaps.len(), 2);
                assert!(gaps[0].starts_with("Distância"));
                assert!(gaps[1].starts_with("Idiomas"));
            }
            other => panic!("expected partial match, got {other:?}"),
        }
    }

    #[test]
    fn schooling_below_minimum_is_a_knockout() {
        let engine = ScreeningEngine::default();
        let mut candidate = strong_candidate();
        candidate.schooling = Some(SchoolingLevel::FundamentalCompleto);

        let outcome = engine.score(&warehouse_criteria(), &candidate);
        assert!(outcome.decision.is_disqualified());
        assert!(outcome.decision.summary().contains("abaixo do mínimo"));
    }

    #[test]
    fn rank_orders_by_decision_then_score() {
        let engine = ScreeningEngine::default();
        let strong = strong_candidate();
        let mut partial = strong_candidate();
        partial.name = "Rui".to_string();
        partial.certifications.clear();
        let mut out = strong_candidate();
        out.name = "Leo".to_string();
        out.age = Some(16);

        let ranked = engine.rank(&warehouse_criteria(), &[out, partial, strong]);
        let names: Vec<&str> = ranked.iter().map(|outcome| outcome.candidate.as_str()).collect();
        assert_eq!(names, vec!["Joana", "Rui", "Leo"]);
    }

    #[test]
    fn empty_criteria_qualify_everyone() {
        let engine = ScreeningEngine::default();
        let outcome = engine.score(&ScreeningCriteria::default(), &CandidateProfile::default());
        assert_eq!(outcome.decision, ScreeningDecision::Qualified);
        assert_eq!(outcome.total_score, 0);
    }

    #[test]
    fn long_skill_lists_do_not_overflow_the_total() {
        let criteria = ScreeningCriteria {
            soft_skills: vec!["Comunicação".to_string(); 20_000],
            ..ScreeningCriteria::default()
        };
        let candidate = CandidateProfile {
            name: "Bia".to_string(),
            soft_skills: vec!["comunicacao".to_string()],
            ..CandidateProfile::default()
        };

        let engine = ScreeningEngine::default();
        let outcome = engine.score(&criteria, &candidate);

        let expected = 20_000 * i32::from(engine.weights().soft_skill);
        assert!(expected > i32::from(i16::MAX));
        assert_eq!(outcome.total_score, expected);
        assert_eq!(outcome.decision, ScreeningDecision::Qualified);
    }

    #[test]
    fn extreme_weights_saturate_instead_of_wrapping() {
        let engine = ScreeningEngine::new(ScreeningWeights {
            technology: i16::MAX,
            level_bonus: i16::MAX,
            ..ScreeningWeights::default()
        });
        let criteria = ScreeningCriteria {
            technologies: vec![LeveledCriterion {
                name: "Excel".to_string(),
                level: Some(ProficiencyLevel::Basico),
                mandatory: true,
            }],
            ..ScreeningCriteria::default()
        };

        let outcome = engine.score(&criteria, &strong_candidate());

        let excel = outcome
            .components
            .iter()
            .find(|component| component.requirement == RequirementKey::TecnologiasSoftwares)
            .expect("technology component");
        assert_eq!(excel.score, i16::MAX);
        assert_eq!(outcome.total_score, i32::from(i16::MAX));
    }
}

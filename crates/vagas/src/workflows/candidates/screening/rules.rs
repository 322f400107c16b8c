use super::super::domain::{expand_licence_categories, CandidateProfile, CandidateSkill};
use super::super::normalizer::same_term;
use super::config::ScreeningWeights;
use super::policy::DisqualificationReason;
use super::ScoreComponent;
use crate::workflows::requirements::{
    BoundedRange, LeveledCriterion, RequirementKey, ScreeningCriteria,
};

pub(crate) struct ScreeningSignals {
    pub knockouts: Vec<DisqualificationReason>,
    pub gaps: Vec<String>,
}

struct Scorecard {
    components: Vec<ScoreComponent>,
    total: i32,
    signals: ScreeningSignals,
}

impl Scorecard {
    fn new() -> Self {
        Self {
            components: Vec::new(),
            total: 0,
            signals: ScreeningSignals {
                knockouts: Vec::new(),
                gaps: Vec::new(),
            },
        }
    }

    fn award(&mut self, requirement: RequirementKey, score: i16, notes: String) {
        self.total = self.total.saturating_add(i32::from(score));
        self.components.push(ScoreComponent {
            requirement,
            score,
            notes,
        });
    }

    fn gap(&mut self, requirement: RequirementKey, notes: String) {
        self.signals
            .gaps
            .push(format!("{}: {notes}", requirement.label()));
        self.components.push(ScoreComponent {
            requirement,
            score: 0,
            notes,
        });
    }

    fn knockout(&mut self, penalty: i16, reason: DisqualificationReason) {
        self.total = self.total.saturating_sub(i32::from(penalty));
        self.components.push(ScoreComponent {
            requirement: reason.requirement(),
            score: penalty.saturating_neg(),
            notes: reason.summary(),
        });
        self.signals.knockouts.push(reason);
    }
}

pub(crate) fn score_candidate(
    criteria: &ScreeningCriteria,
    candidate: &CandidateProfile,
    weights: &ScreeningWeights,
) -> (Vec<ScoreComponent>, i32, ScreeningSignals) {
    let mut card = Scorecard::new();

    score_age(criteria, candidate, weights, &mut card);
    score_licence(criteria, candidate, weights, &mut card);
    score_location(criteria, candidate, weights, &mut card);
    score_distance(criteria, candidate, weights, &mut card);
    score_schooling(criteria, candidate, weights, &mut card);
    score_education_lists(criteria, candidate, weights, &mut card);
    score_experience(criteria, candidate, weights, &mut card);
    score_leveled(
        RequirementKey::TecnologiasSoftwares,
        &criteria.technologies,
        &candidate.technologies,
        weights.technology,
        weights.level_bonus,
        &mut card,
    );
    score_leveled(
        RequirementKey::Idiomas,
        &criteria.languages,
        &candidate.languages,
        weights.language,
        weights.level_bonus,
        &mut card,
    );
    score_certifications(criteria, candidate, weights, &mut card);

    for skill in &criteria.soft_skills {
        if contains_term(&candidate.soft_skills, skill) {
            card.award(RequirementKey::SoftSkills, weights.soft_skill, skill.clone());
        } else {
            card.gap(RequirementKey::SoftSkills, format!("{skill} não informado"));
        }
    }

    (card.components, card.total, card.signals)
}

fn score_age(
    criteria: &ScreeningCriteria,
    candidate: &CandidateProfile,
    weights: &ScreeningWeights,
    card: &mut Scorecard,
) {
    let Some(range) = criteria.age.filter(|range| !range.is_unbounded()) else {
        return;
    };

    match candidate.age {
        Some(age) if range.contains(age) => card.award(
            RequirementKey::Idade,
            weights.age,
            format!("idade {age} dentro da faixa"),
        ),
        Some(age) => card.knockout(
            weights.age,
            DisqualificationReason::AgeOutOfRange {
                age,
                min: range.min,
                max: range.max,
            },
        ),
        None => card.gap(RequirementKey::Idade, "idade não informada".to_string()),
    }
}

fn score_licence(
    criteria: &ScreeningCriteria,
    candidate: &CandidateProfile,
    weights: &ScreeningWeights,
    card: &mut Scorecard,
) {
    if criteria.licence_categories.is_empty() {
        return;
    }

    let held = expand_licence_categories(&candidate.licence_categories);
    let missing: Vec<String> = expand_licence_categories(&criteria.licence_categories)
        .into_iter()
        .filter(|letter| !held.contains(letter))
        .map(String::from)
        .collect();

    if missing.is_empty() {
        card.award(
            RequirementKey::Cnh,
            weights.licence,
            format!("CNH {}", criteria.licence_categories.join(", ")),
        );
    } else {
        card.knockout(
            weights.licence,
            DisqualificationReason::MissingLicence {
                categories: missing,
            },
        );
    }
}

fn score_location(
    criteria: &ScreeningCriteria,
    candidate: &CandidateProfile,
    weights: &ScreeningWeights,
    card: &mut Scorecard,
) {
    let Some(location) = &criteria.location else {
        return;
    };

    let city_matches = |expected: &str| {
        candidate
            .city
            .as_deref()
            .is_some_and(|city| same_term(city, expected))
    };
    let state_matches = |expected: &str| {
        candidate
            .state
            .as_deref()
            .is_some_and(|state| state.trim().eq_ignore_ascii_case(expected))
    };

    let has_home = location.city.is_some() || location.state.is_some();
    let at_home = has_home
        && location.city.as_deref().map_or(true, city_matches)
        && location.state.as_deref().map_or(true, state_matches);
    let in_region = location
        .accepted_regions
        .iter()
        .any(|region| city_matches(region.as_str()));

    if at_home || in_region {
        let place = candidate
            .city
            .clone()
            .or_else(|| candidate.state.clone())
            .unwrap_or_default();
        card.award(
            RequirementKey::CidadeEstado,
            weights.location,
            format!("reside em {place}"),
        );
    } else if candidate.city.is_none() && candidate.state.is_none() {
        card.gap(
            RequirementKey::CidadeEstado,
            "localização não informada".to_string(),
        );
    } else {
        card.gap(
            RequirementKey::CidadeEstado,
            "fora da região da vaga".to_string(),
        );
    }
}

fn score_distance(
    criteria: &ScreeningCriteria,
    candidate: &CandidateProfile,
    weights: &ScreeningWeights,
    card: &mut Scorecard,
) {
    let Some(max_km) = criteria.distance.and_then(|distance| distance.max_km) else {
        return;
    };

    match candidate.distance_km {
        Some(km) if km <= max_km => card.award(
            RequirementKey::Distancia,
            weights.distance,
            format!("{km} km da vaga"),
        ),
        Some(km) => card.gap(
            RequirementKey::Distancia,
            format!("{km} km acima do máximo de {max_km} km"),
        ),
        None => card.gap(
            RequirementKey::Distancia,
            "distância não informada".to_string(),
        ),
    }
}

fn score_schooling(
    criteria: &ScreeningCriteria,
    candidate: &CandidateProfile,
    weights: &ScreeningWeights,
    card: &mut Scorecard,
) {
    let Some(required) = criteria.minimum_schooling else {
        return;
    };

    match candidate.schooling {
        Some(actual) if actual >= required => card.award(
            RequirementKey::EscolaridadeMinima,
            weights.schooling,
            actual.label().to_string(),
        ),
        Some(actual) => card.knockout(
            weights.schooling,
            DisqualificationReason::SchoolingBelowMinimum { required, actual },
        ),
        None => card.gap(
            RequirementKey::EscolaridadeMinima,
            "escolaridade não informada".to_string(),
        ),
    }
}

fn score_education_lists(
    criteria: &ScreeningCriteria,
    candidate: &CandidateProfile,
    weights: &ScreeningWeights,
    card: &mut Scorecard,
) {
    if !criteria.fields_of_study.is_empty() {
        match criteria
            .fields_of_study
            .iter()
            .find(|field| contains_term(&candidate.fields_of_study, field))
        {
            Some(field) => {
                card.award(RequirementKey::AreaFormacao, weights.field_of_study, field.clone())
            }
            None => card.gap(
                RequirementKey::AreaFormacao,
                format!("formação fora de {}", criteria.fields_of_study.join(", ")),
            ),
        }
    }

    for course in &criteria.complementary_courses {
        if contains_term(&candidate.courses, course) {
            card.award(RequirementKey::CursosComplementares, weights.course, course.clone());
        } else {
            card.gap(
                RequirementKey::CursosComplementares,
                format!("{course} não informado"),
            );
        }
    }
}

fn score_experience(
    criteria: &ScreeningCriteria,
    candidate: &CandidateProfile,
    weights: &ScreeningWeights,
    card: &mut Scorecard,
) {
    if let Some(range) = criteria.experience_years.filter(|range| !range.is_unbounded()) {
        match candidate.experience_years {
            Some(years) if range.contains(years) => card.award(
                RequirementKey::TempoExperiencia,
                weights.experience_years,
                format!("{years} ano(s) de experiência"),
            ),
            Some(years) => card.gap(
                RequirementKey::TempoExperiencia,
                describe_years_outside(years, &range),
            ),
            None => card.gap(
                RequirementKey::TempoExperiencia,
                "experiência não informada".to_string(),
            ),
        }
    }

    if !criteria.experience_areas.is_empty() {
        match criteria
            .experience_areas
            .iter()
            .find(|area| contains_term(&candidate.experience_areas, area))
        {
            Some(area) => card.award(
                RequirementKey::ExperienciaArea,
                weights.experience_area,
                area.clone(),
            ),
            None => card.gap(
                RequirementKey::ExperienciaArea,
                format!("sem experiência em {}", criteria.experience_areas.join(", ")),
            ),
        }
    }

    if let Some(leadership) = &criteria.leadership {
        let required = leadership.team_size.unwrap_or(1);
        match candidate.led_team_size {
            Some(size) if size >= required => card.award(
                RequirementKey::CargosLideranca,
                weights.leadership,
                format!("liderou equipe de {size} pessoa(s)"),
            ),
            Some(size) => card.gap(
                RequirementKey::CargosLideranca,
                format!("liderou {size} pessoa(s), exigido {required}"),
            ),
            None => card.gap(
                RequirementKey::CargosLideranca,
                "sem experiência de liderança".to_string(),
            ),
        }
    }
}

fn describe_years_outside(years: u32, range: &BoundedRange) -> String {
    match (range.min, range.max) {
        (Some(min), _) if years < min => format!("{years} ano(s), mínimo {min}"),
        (_, Some(max)) => format!("{years} ano(s), máximo {max}"),
        _ => format!("{years} ano(s)"),
    }
}

fn score_leveled(
    requirement: RequirementKey,
    wanted: &[LeveledCriterion],
    declared: &[CandidateSkill],
    weight: i16,
    level_bonus: i16,
    card: &mut Scorecard,
) {
    for criterion in wanted {
        let found = declared
            .iter()
            .find(|skill| same_term(&skill.name, &criterion.name));

        let Some(skill) = found else {
            if criterion.mandatory {
                card.knockout(
                    weight,
                    DisqualificationReason::MissingMandatory {
                        requirement,
                        name: criterion.name.clone(),
                    },
                );
            } else {
                card.gap(requirement, format!("{} não informado", criterion.name));
            }
            continue;
        };

        let Some(required) = criterion.level else {
            card.award(requirement, weight, criterion.name.clone());
            continue;
        };

        match skill.level {
            Some(actual) if actual.rank() >= required.rank() => {
                let bonus = if actual.rank() > required.rank() {
                    level_bonus
                } else {
                    0
                };
                card.award(
                    requirement,
                    weight.saturating_add(bonus),
                    format!("{} {}", criterion.name, actual.as_str()),
                );
            }
            actual if criterion.mandatory => card.knockout(
                weight,
                DisqualificationReason::InsufficientLevel {
                    requirement,
                    name: criterion.name.clone(),
                    required,
                    actual,
                },
            ),
            actual => card.gap(
                requirement,
                format!(
                    "{} no nível {}, exigido {}",
                    criterion.name,
                    actual.map_or("não informado", |level| level.as_str()),
                    required.as_str()
                ),
            ),
        }
    }
}

fn score_certifications(
    criteria: &ScreeningCriteria,
    candidate: &CandidateProfile,
    weights: &ScreeningWeights,
    card: &mut Scorecard,
) {
    for certification in &criteria.certifications {
        if contains_term(&candidate.certifications, &certification.name) {
            card.award(
                RequirementKey::CertificacoesTecnicas,
                weights.certification,
                certification.name.clone(),
            );
        } else if certification.mandatory {
            card.knockout(
                weights.certification,
                DisqualificationReason::MissingMandatory {
                    requirement: RequirementKey::CertificacoesTecnicas,
                    name: certification.name.clone(),
                },
            );
        } else {
            card.gap(
                RequirementKey::CertificacoesTecnicas,
                format!("{} não informado", certification.name),
            );
        }
    }
}

fn contains_term(haystack: &[String], needle: &str) -> bool {
    haystack.iter().any(|item| same_term(item, needle))
}

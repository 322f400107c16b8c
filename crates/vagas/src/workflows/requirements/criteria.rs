use serde::Serialize;

use super::document::JobRequirementsDocument;
use super::schema::{validate_value, RequirementKey, SchemaViolation};
use super::value::{ProficiencyLevel, RangeValue, RequirementValue, SchoolingLevel, NO_LIMIT};

/// Numeric range after conversion; `None` on either side means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BoundedRange {
    pub min: Option<u32>,
    pub max: Option<u32>,
}

impl BoundedRange {
    pub fn contains(&self, value: u32) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationCriterion {
    pub city: Option<String>,
    pub state: Option<String>,
    pub accepted_regions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DistanceCriterion {
    pub max_km: Option<u32>,
    pub auto_calculate: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadershipCriterion {
    pub team_size: Option<u32>,
    pub level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeveledCriterion {
    pub name: String,
    pub level: Option<ProficiencyLevel>,
    pub mandatory: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificationCriterion {
    pub name: String,
    pub mandatory: bool,
}

/// Typed view of a requirements document, consumed by candidate screening.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScreeningCriteria {
    pub age: Option<BoundedRange>,
    pub licence_categories: Vec<String>,
    pub location: Option<LocationCriterion>,
    pub distance: Option<DistanceCriterion>,
    pub minimum_schooling: Option<SchoolingLevel>,
    pub fields_of_study: Vec<String>,
    pub complementary_courses: Vec<String>,
    pub experience_years: Option<BoundedRange>,
    pub experience_areas: Vec<String>,
    pub leadership: Option<LeadershipCriterion>,
    pub technologies: Vec<LeveledCriterion>,
    pub languages: Vec<LeveledCriterion>,
    pub certifications: Vec<CertificationCriterion>,
    pub soft_skills: Vec<String>,
}

/// A requirement that is enabled but not usable as a screening criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequirementIssue {
    pub key: RequirementKey,
    pub message: String,
}

impl RequirementIssue {
    fn new(key: RequirementKey, message: impl Into<String>) -> Self {
        Self {
            key,
            message: message.into(),
        }
    }
}

impl From<&SchemaViolation> for RequirementIssue {
    fn from(violation: &SchemaViolation) -> Self {
        match violation {
            SchemaViolation::NonNumericBound { key, bound, value } => {
                Self::new(*key, format!("{bound} '{value}' não é um número"))
            }
            SchemaViolation::BoundOutOfRange {
                key,
                bound,
                value,
                lower,
                upper,
            } => Self::new(
                *key,
                format!("{bound} {value} fora do intervalo {lower} a {upper}"),
            ),
            SchemaViolation::UnknownProficiency { key, value } => {
                Self::new(*key, format!("nível '{value}' desconhecido"))
            }
            SchemaViolation::UnknownLicenceCategory { key, value } => {
                Self::new(*key, format!("categoria '{value}' não existe"))
            }
            SchemaViolation::InvalidStateCode { key, value } => {
                Self::new(*key, format!("estado '{value}' deve ser a sigla de duas letras"))
            }
            SchemaViolation::NonNumericField { key, field, value } => {
                Self::new(*key, format!("{field} '{value}' não é um número inteiro"))
            }
            SchemaViolation::ShapeMismatch { key, expected, .. } => {
                Self::new(*key, format!("formato inválido, esperado {expected}"))
            }
        }
    }
}

impl std::fmt::Display for RequirementIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.key.label(), self.message)
    }
}

impl ScreeningCriteria {
    /// Convert a document into typed criteria, collecting every problem
    /// instead of stopping at the first one. Values the schema rejects are
    /// reported and not converted.
    pub fn from_document(document: &JobRequirementsDocument) -> Result<Self, Vec<RequirementIssue>> {
        let mut criteria = Self::default();
        let mut issues = Vec::new();

        for (key, value) in document.iter() {
            if let Err(violation) = validate_value(key, value) {
                issues.push(RequirementIssue::from(&violation));
                continue;
            }
            match value {
                RequirementValue::Range(range) => match convert_range(key, range) {
                    Ok(bounded) => match key {
                        RequirementKey::Idade => criteria.age = Some(bounded),
                        _ => criteria.experience_years = Some(bounded),
                    },
                    Err(issue) => issues.push(issue),
                },
                RequirementValue::TextList(items) => {
                    let cleaned = clean_list(key, items, &mut issues);
                    match key {
                        RequirementKey::Cnh => {
                            criteria.licence_categories = cleaned
                                .into_iter()
                                .map(|item| item.to_ascii_uppercase())
                                .collect()
                        }
                        RequirementKey::AreaFormacao => criteria.fields_of_study = cleaned,
                        RequirementKey::CursosComplementares => {
                            criteria.complementary_courses = cleaned
                        }
                        RequirementKey::ExperienciaArea => criteria.experience_areas = cleaned,
                        _ => criteria.soft_skills = cleaned,
                    }
                }
                RequirementValue::Technologies(items) => {
                    criteria.technologies = items
                        .iter()
                        .enumerate()
                        .filter_map(|(index, item)| {
                            leveled(key, index, &item.name, &item.level, item.mandatory, &mut issues)
                        })
                        .collect();
                }
                RequirementValue::Languages(items) => {
                    criteria.languages = items
                        .iter()
                        .enumerate()
                        .filter_map(|(index, item)| {
                            leveled(
                                key,
                                index,
                                &item.language,
                                &item.level,
                                item.mandatory,
                                &mut issues,
                            )
                        })
                        .collect();
                }
                RequirementValue::Certifications(items) => {
                    for (index, item) in items.iter().enumerate() {
                        let name = item.name.trim();
                        if name.is_empty() {
                            issues.push(RequirementIssue::new(
                                key,
                                format!("item {} sem nome", index + 1),
                            ));
                            continue;
                        }
                        criteria.certifications.push(CertificationCriterion {
                            name: name.to_string(),
                            mandatory: item.mandatory,
                        });
                    }
                }
                RequirementValue::Schooling(level) => criteria.minimum_schooling = Some(*level),
                RequirementValue::Location(location) => {
                    let city = non_blank(&location.city);
                    let state = non_blank(&location.state).map(|state| state.to_ascii_uppercase());
                    let accepted_regions: Vec<String> = location
                        .accepted_regions
                        .iter()
                        .filter_map(|region| non_blank(region))
                        .collect();
                    if city.is_none() && state.is_none() && accepted_regions.is_empty() {
                        issues.push(RequirementIssue::new(
                            key,
                            "informe cidade, estado ou regiões aceitas",
                        ));
                    } else {
                        criteria.location = Some(LocationCriterion {
                            city,
                            state,
                            accepted_regions,
                        });
                    }
                }
                RequirementValue::Distance(distance) => {
                    match parse_bound(key, "distância máxima", &distance.max_km) {
                        Ok(max_km) => {
                            criteria.distance = Some(DistanceCriterion {
                                max_km,
                                auto_calculate: distance.auto_calculate,
                            })
                        }
                        Err(issue) => issues.push(issue),
                    }
                }
                RequirementValue::Leadership(leadership) => {
                    match parse_bound(key, "tamanho da equipe", &leadership.team_size) {
                        Ok(team_size) => {
                            criteria.leadership = Some(LeadershipCriterion {
                                team_size,
                                level: non_blank(&leadership.level),
                            })
                        }
                        Err(issue) => issues.push(issue),
                    }
                }
            }
        }

        if issues.is_empty() {
            Ok(criteria)
        } else {
            Err(issues)
        }
    }
}

fn convert_range(key: RequirementKey, range: &RangeValue) -> Result<BoundedRange, RequirementIssue> {
    let min = parse_bound(key, "mínimo", &range.min)?;
    let max = parse_bound(key, "máximo", &range.max)?;
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(RequirementIssue::new(
                key,
                format!("mínimo {min} maior que máximo {max}"),
            ));
        }
    }
    Ok(BoundedRange { min, max })
}

fn parse_bound(
    key: RequirementKey,
    label: &str,
    raw: &str,
) -> Result<Option<u32>, RequirementIssue> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == NO_LIMIT {
        return Ok(None);
    }
    trimmed
        .parse::<u32>()
        .map(Some)
        .map_err(|_| RequirementIssue::new(key, format!("{label} '{raw}' não é um número")))
}

fn clean_list(
    key: RequirementKey,
    items: &[String],
    issues: &mut Vec<RequirementIssue>,
) -> Vec<String> {
    let mut cleaned = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match non_blank(item) {
            Some(value) => cleaned.push(value),
            None => issues.push(RequirementIssue::new(
                key,
                format!("item {} está em branco", index + 1),
            )),
        }
    }
    cleaned
}

fn leveled(
    key: RequirementKey,
    index: usize,
    name: &str,
    level: &str,
    mandatory: bool,
    issues: &mut Vec<RequirementIssue>,
) -> Option<LeveledCriterion> {
    let Some(name) = non_blank(name) else {
        issues.push(RequirementIssue::new(
            key,
            format!("item {} sem nome", index + 1),
        ));
        return None;
    };

    let level = if level.trim().is_empty() {
        None
    } else {
        match ProficiencyLevel::parse(level) {
            Some(parsed) => Some(parsed),
            None => {
                issues.push(RequirementIssue::new(
                    key,
                    format!("nível '{level}' desconhecido para {name}"),
                ));
                return None;
            }
        }
    };

    Some(LeveledCriterion {
        name,
        level,
        mandatory,
    })
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

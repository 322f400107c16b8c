use std::fmt;

use serde::{Deserialize, Serialize};

use super::value::{
    DistanceValue, LeadershipValue, LocationValue, ProficiencyLevel, RangeValue,
    RequirementValue, SchoolingLevel, NO_LIMIT,
};

/// Driving licence categories accepted by the `cnh` requirement.
pub const LICENCE_CATEGORIES: [&str; 9] = ["A", "B", "C", "D", "E", "AB", "AC", "AD", "AE"];

/// Fixed groupings of screening criteria.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RequirementCategory {
    Basic,
    Location,
    Education,
    Experience,
    Technical,
    SoftSkills,
}

impl RequirementCategory {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Basic,
            Self::Location,
            Self::Education,
            Self::Experience,
            Self::Technical,
            Self::SoftSkills,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Basic => "Dados básicos",
            Self::Location => "Localização",
            Self::Education => "Formação",
            Self::Experience => "Experiência",
            Self::Technical => "Competências técnicas",
            Self::SoftSkills => "Competências comportamentais",
        }
    }

    pub fn keys(self) -> impl Iterator<Item = RequirementKey> {
        RequirementKey::ordered()
            .into_iter()
            .filter(move |key| key.category() == self)
    }
}

/// A single criterion inside a category. The set is closed: adding one is a
/// schema change.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RequirementKey {
    Idade,
    Cnh,
    CidadeEstado,
    Distancia,
    EscolaridadeMinima,
    AreaFormacao,
    CursosComplementares,
    TempoExperiencia,
    ExperienciaArea,
    CargosLideranca,
    TecnologiasSoftwares,
    Idiomas,
    CertificacoesTecnicas,
    SoftSkills,
}

impl RequirementKey {
    pub const fn ordered() -> [Self; 14] {
        [
            Self::Idade,
            Self::Cnh,
            Self::CidadeEstado,
            Self::Distancia,
            Self::EscolaridadeMinima,
            Self::AreaFormacao,
            Self::CursosComplementares,
            Self::TempoExperiencia,
            Self::ExperienciaArea,
            Self::CargosLideranca,
            Self::TecnologiasSoftwares,
            Self::Idiomas,
            Self::CertificacoesTecnicas,
            Self::SoftSkills,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idade => "idade",
            Self::Cnh => "cnh",
            Self::CidadeEstado => "cidade_estado",
            Self::Distancia => "distancia",
            Self::EscolaridadeMinima => "escolaridade_minima",
            Self::AreaFormacao => "area_formacao",
            Self::CursosComplementares => "cursos_complementares",
            Self::TempoExperiencia => "tempo_experiencia",
            Self::ExperienciaArea => "experiencia_area",
            Self::CargosLideranca => "cargos_lideranca",
            Self::TecnologiasSoftwares => "tecnologias_softwares",
            Self::Idiomas => "idiomas",
            Self::CertificacoesTecnicas => "certificacoes_tecnicas",
            Self::SoftSkills => "soft_skills",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ordered().into_iter().find(|key| key.as_str() == raw)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Idade => "Idade",
            Self::Cnh => "CNH",
            Self::CidadeEstado => "Cidade/Estado",
            Self::Distancia => "Distância",
            Self::EscolaridadeMinima => "Escolaridade mínima",
            Self::AreaFormacao => "Área de formação",
            Self::CursosComplementares => "Cursos complementares",
            Self::TempoExperiencia => "Tempo de experiência",
            Self::ExperienciaArea => "Experiência na área",
            Self::CargosLideranca => "Cargos de liderança",
            Self::TecnologiasSoftwares => "Tecnologias e softwares",
            Self::Idiomas => "Idiomas",
            Self::CertificacoesTecnicas => "Certificações técnicas",
            Self::SoftSkills => "Soft skills",
        }
    }

    pub const fn category(self) -> RequirementCategory {
        match self {
            Self::Idade | Self::Cnh => RequirementCategory::Basic,
            Self::CidadeEstado | Self::Distancia => RequirementCategory::Location,
            Self::EscolaridadeMinima | Self::AreaFormacao | Self::CursosComplementares => {
                RequirementCategory::Education
            }
            Self::TempoExperiencia | Self::ExperienciaArea | Self::CargosLideranca => {
                RequirementCategory::Experience
            }
            Self::TecnologiasSoftwares | Self::Idiomas | Self::CertificacoesTecnicas => {
                RequirementCategory::Technical
            }
            Self::SoftSkills => RequirementCategory::SoftSkills,
        }
    }

    pub const fn shape(self) -> ValueShape {
        match self {
            Self::Idade => ValueShape::ScalarRange {
                lower: 14,
                upper: 100,
                unit: "anos",
            },
            Self::TempoExperiencia => ValueShape::ScalarRange {
                lower: 0,
                upper: 60,
                unit: "anos",
            },
            Self::Cnh
            | Self::AreaFormacao
            | Self::CursosComplementares
            | Self::ExperienciaArea
            | Self::SoftSkills => ValueShape::StringList,
            Self::TecnologiasSoftwares => ValueShape::RecordList {
                record: RecordKind::Technology,
            },
            Self::Idiomas => ValueShape::RecordList {
                record: RecordKind::Language,
            },
            Self::CertificacoesTecnicas => ValueShape::RecordList {
                record: RecordKind::Certification,
            },
            Self::EscolaridadeMinima => ValueShape::EnumSelection,
            Self::CidadeEstado => ValueShape::Composite {
                composite: CompositeKind::Location,
            },
            Self::Distancia => ValueShape::Composite {
                composite: CompositeKind::Distance,
            },
            Self::CargosLideranca => ValueShape::Composite {
                composite: CompositeKind::Leadership,
            },
        }
    }

    /// Value a freshly opened form shows for this requirement.
    pub fn default_value(self) -> RequirementValue {
        match self.shape() {
            ValueShape::ScalarRange { .. } => RequirementValue::Range(RangeValue::default()),
            ValueShape::StringList => RequirementValue::TextList(Vec::new()),
            ValueShape::RecordList { record } => match record {
                RecordKind::Technology => RequirementValue::Technologies(Vec::new()),
                RecordKind::Language => RequirementValue::Languages(Vec::new()),
                RecordKind::Certification => RequirementValue::Certifications(Vec::new()),
            },
            ValueShape::EnumSelection => RequirementValue::Schooling(SchoolingLevel::MedioCompleto),
            ValueShape::Composite { composite } => match composite {
                CompositeKind::Location => RequirementValue::Location(LocationValue::default()),
                CompositeKind::Distance => RequirementValue::Distance(DistanceValue {
                    max_km: String::new(),
                    auto_calculate: true,
                }),
                CompositeKind::Leadership => {
                    RequirementValue::Leadership(LeadershipValue::default())
                }
            },
        }
    }
}

impl fmt::Display for RequirementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Technology,
    Language,
    Certification,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeKind {
    Location,
    Distance,
    Leadership,
}

/// Shape descriptor for a requirement's configuration payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "tipo", rename_all = "snake_case")]
pub enum ValueShape {
    ScalarRange {
        lower: u32,
        upper: u32,
        unit: &'static str,
    },
    StringList,
    RecordList {
        record: RecordKind,
    },
    EnumSelection,
    Composite {
        composite: CompositeKind,
    },
}

impl ValueShape {
    pub fn accepts(&self, value: &RequirementValue) -> bool {
        matches!(
            (self, value),
            (ValueShape::ScalarRange { .. }, RequirementValue::Range(_))
                | (ValueShape::StringList, RequirementValue::TextList(_))
                | (
                    ValueShape::RecordList {
                        record: RecordKind::Technology
                    },
                    RequirementValue::Technologies(_)
                )
                | (
                    ValueShape::RecordList {
                        record: RecordKind::Language
                    },
                    RequirementValue::Languages(_)
                )
                | (
                    ValueShape::RecordList {
                        record: RecordKind::Certification
                    },
                    RequirementValue::Certifications(_)
                )
                | (ValueShape::EnumSelection, RequirementValue::Schooling(_))
                | (
                    ValueShape::Composite {
                        composite: CompositeKind::Location
                    },
                    RequirementValue::Location(_)
                )
                | (
                    ValueShape::Composite {
                        composite: CompositeKind::Distance
                    },
                    RequirementValue::Distance(_)
                )
                | (
                    ValueShape::Composite {
                        composite: CompositeKind::Leadership
                    },
                    RequirementValue::Leadership(_)
                )
        )
    }

    pub const fn label(&self) -> &'static str {
        match self {
            ValueShape::ScalarRange { .. } => "range",
            ValueShape::StringList => "string list",
            ValueShape::RecordList {
                record: RecordKind::Technology,
            } => "technology list",
            ValueShape::RecordList {
                record: RecordKind::Language,
            } => "language list",
            ValueShape::RecordList {
                record: RecordKind::Certification,
            } => "certification list",
            ValueShape::EnumSelection => "schooling level",
            ValueShape::Composite {
                composite: CompositeKind::Location,
            } => "location",
            ValueShape::Composite {
                composite: CompositeKind::Distance,
            } => "distance",
            ValueShape::Composite {
                composite: CompositeKind::Leadership,
            } => "leadership",
        }
    }
}

/// Edit-time rejection of a configuration value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaViolation {
    #[error("{key}.{bound}: '{value}' is not a whole number or 'sem_limite'")]
    NonNumericBound {
        key: RequirementKey,
        bound: &'static str,
        value: String,
    },
    #[error("{key}.{bound}: {value} is outside {lower}..={upper}")]
    BoundOutOfRange {
        key: RequirementKey,
        bound: &'static str,
        value: u32,
        lower: u32,
        upper: u32,
    },
    #[error("{key}: '{value}' is not a proficiency level")]
    UnknownProficiency { key: RequirementKey, value: String },
    #[error("{key}: '{value}' is not a licence category")]
    UnknownLicenceCategory { key: RequirementKey, value: String },
    #[error("{key}.estado: '{value}' is not a two-letter state code")]
    InvalidStateCode { key: RequirementKey, value: String },
    #[error("{key}.{field}: '{value}' is not a whole number")]
    NonNumericField {
        key: RequirementKey,
        field: &'static str,
        value: String,
    },
    #[error("{key} expects a {expected} value, got {found}")]
    ShapeMismatch {
        key: RequirementKey,
        expected: &'static str,
        found: &'static str,
    },
}

/// Validate a value the builder is about to store under `key`.
///
/// Blank fields are accepted; completeness is checked at submission by
/// [`super::ScreeningCriteria::from_document`].
pub fn validate_value(key: RequirementKey, value: &RequirementValue) -> Result<(), SchemaViolation> {
    let shape = key.shape();
    if !shape.accepts(value) {
        return Err(SchemaViolation::ShapeMismatch {
            key,
            expected: shape.label(),
            found: value.kind_label(),
        });
    }

    match value {
        RequirementValue::Range(range) => {
            if let ValueShape::ScalarRange { lower, upper, .. } = shape {
                check_bound(key, "min", &range.min, lower, upper)?;
                check_bound(key, "max", &range.max, lower, upper)?;
            }
        }
        RequirementValue::TextList(items) if key == RequirementKey::Cnh => {
            for item in items.iter().map(|item| item.trim()) {
                if !item.is_empty() && !LICENCE_CATEGORIES.contains(&item.to_ascii_uppercase().as_str()) {
                    return Err(SchemaViolation::UnknownLicenceCategory {
                        key,
                        value: item.to_string(),
                    });
                }
            }
        }
        RequirementValue::Technologies(items) => {
            for item in items {
                check_proficiency(key, &item.level)?;
            }
        }
        RequirementValue::Languages(items) => {
            for item in items {
                check_proficiency(key, &item.level)?;
            }
        }
        RequirementValue::Location(location) => {
            let state = location.state.trim();
            if !state.is_empty()
                && !(state.len() == 2 && state.chars().all(|c| c.is_ascii_alphabetic()))
            {
                return Err(SchemaViolation::InvalidStateCode {
                    key,
                    value: location.state.clone(),
                });
            }
        }
        RequirementValue::Distance(distance) => {
            check_whole_number(key, "max_km", &distance.max_km)?;
        }
        RequirementValue::Leadership(leadership) => {
            check_whole_number(key, "tamanho_equipe", &leadership.team_size)?;
        }
        RequirementValue::TextList(_)
        | RequirementValue::Certifications(_)
        | RequirementValue::Schooling(_) => {}
    }

    Ok(())
}

fn check_bound(
    key: RequirementKey,
    bound: &'static str,
    raw: &str,
    lower: u32,
    upper: u32,
) -> Result<(), SchemaViolation> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == NO_LIMIT {
        return Ok(());
    }

    let value = trimmed
        .parse::<u32>()
        .map_err(|_| SchemaViolation::NonNumericBound {
            key,
            bound,
            value: raw.to_string(),
        })?;
    if value < lower || value > upper {
        return Err(SchemaViolation::BoundOutOfRange {
            key,
            bound,
            value,
            lower,
            upper,
        });
    }
    Ok(())
}

fn check_proficiency(key: RequirementKey, raw: &str) -> Result<(), SchemaViolation> {
    if raw.trim().is_empty() || ProficiencyLevel::parse(raw).is_some() {
        Ok(())
    } else {
        Err(SchemaViolation::UnknownProficiency {
            key,
            value: raw.to_string(),
        })
    }
}

fn check_whole_number(
    key: RequirementKey,
    field: &'static str,
    raw: &str,
) -> Result<(), SchemaViolation> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.parse::<u32>().is_ok() {
        Ok(())
    } else {
        Err(SchemaViolation::NonNumericField {
            key,
            field,
            value: raw.to_string(),
        })
    }
}

/// One entry of the schema catalog served to form clients.
#[derive(Debug, Clone, Serialize)]
pub struct RequirementDescriptor {
    pub key: RequirementKey,
    pub label: &'static str,
    pub shape: ValueShape,
    pub default: RequirementValue,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryDescriptor {
    pub category: RequirementCategory,
    pub label: &'static str,
    pub requirements: Vec<RequirementDescriptor>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SchemaCatalog {
    pub categories: Vec<CategoryDescriptor>,
    pub schooling_levels: Vec<SchoolingOption>,
    pub proficiency_levels: Vec<&'static str>,
    pub licence_categories: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SchoolingOption {
    pub value: SchoolingLevel,
    pub label: &'static str,
}

pub fn schema_catalog() -> SchemaCatalog {
    let categories = RequirementCategory::ordered()
        .into_iter()
        .map(|category| CategoryDescriptor {
            category,
            label: category.label(),
            requirements: category
                .keys()
                .map(|key| RequirementDescriptor {
                    key,
                    label: key.label(),
                    shape: key.shape(),
                    default: key.default_value(),
                })
                .collect(),
        })
        .collect();

    SchemaCatalog {
        categories,
        schooling_levels: SchoolingLevel::ordered()
            .into_iter()
            .map(|level| SchoolingOption {
                value: level,
                label: level.label(),
            })
            .collect(),
        proficiency_levels: ProficiencyLevel::all()
            .into_iter()
            .map(ProficiencyLevel::as_str)
            .collect(),
        licence_categories: LICENCE_CATEGORIES.to_vec(),
    }
}

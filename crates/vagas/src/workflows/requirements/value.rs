use serde::{Deserialize, Serialize};

use super::schema::{RequirementKey, ValueShape};
use super::RequirementsError;

/// Sentinel a range bound carries when the form selected "no limit".
pub const NO_LIMIT: &str = "sem_limite";

/// Range bounds exactly as the form controls hand them over.
///
/// Bounds stay string-encoded in the document; [`super::ScreeningCriteria`]
/// converts them to numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeValue {
    #[serde(default)]
    pub min: String,
    #[serde(default)]
    pub max: String,
}

impl RangeValue {
    pub fn new(min: impl Into<String>, max: impl Into<String>) -> Self {
        Self {
            min: min.into(),
            max: max.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnologyRequirement {
    #[serde(rename = "nome", default)]
    pub name: String,
    #[serde(rename = "nivel", default)]
    pub level: String,
    #[serde(rename = "obrigatorio", default)]
    pub mandatory: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageRequirement {
    #[serde(rename = "idioma", default)]
    pub language: String,
    #[serde(rename = "nivel", default)]
    pub level: String,
    #[serde(rename = "obrigatorio", default)]
    pub mandatory: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificationRequirement {
    #[serde(rename = "nome", default)]
    pub name: String,
    #[serde(rename = "obrigatorio", default)]
    pub mandatory: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationValue {
    #[serde(rename = "cidade", default)]
    pub city: String,
    #[serde(rename = "estado", default)]
    pub state: String,
    #[serde(rename = "regioes_aceitas", default)]
    pub accepted_regions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceValue {
    #[serde(default)]
    pub max_km: String,
    #[serde(rename = "calcular_automaticamente", default)]
    pub auto_calculate: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadershipValue {
    #[serde(rename = "tamanho_equipe", default)]
    pub team_size: String,
    #[serde(rename = "nivel_lideranca", default)]
    pub level: String,
}

/// Schooling levels, ordered from lowest to highest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SchoolingLevel {
    FundamentalIncompleto,
    FundamentalCompleto,
    MedioIncompleto,
    MedioCompleto,
    Tecnico,
    SuperiorIncompleto,
    SuperiorCompleto,
    PosGraduacao,
    Mestrado,
    Doutorado,
}

impl SchoolingLevel {
    pub const fn ordered() -> [Self; 10] {
        [
            Self::FundamentalIncompleto,
            Self::FundamentalCompleto,
            Self::MedioIncompleto,
            Self::MedioCompleto,
            Self::Tecnico,
            Self::SuperiorIncompleto,
            Self::SuperiorCompleto,
            Self::PosGraduacao,
            Self::Mestrado,
            Self::Doutorado,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FundamentalIncompleto => "fundamental_incompleto",
            Self::FundamentalCompleto => "fundamental_completo",
            Self::MedioIncompleto => "medio_incompleto",
            Self::MedioCompleto => "medio_completo",
            Self::Tecnico => "tecnico",
            Self::SuperiorIncompleto => "superior_incompleto",
            Self::SuperiorCompleto => "superior_completo",
            Self::PosGraduacao => "pos_graduacao",
            Self::Mestrado => "mestrado",
            Self::Doutorado => "doutorado",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::FundamentalIncompleto => "Ensino fundamental incompleto",
            Self::FundamentalCompleto => "Ensino fundamental completo",
            Self::MedioIncompleto => "Ensino médio incompleto",
            Self::MedioCompleto => "Ensino médio completo",
            Self::Tecnico => "Curso técnico",
            Self::SuperiorIncompleto => "Ensino superior incompleto",
            Self::SuperiorCompleto => "Ensino superior completo",
            Self::PosGraduacao => "Pós-graduação",
            Self::Mestrado => "Mestrado",
            Self::Doutorado => "Doutorado",
        }
    }

    /// Accepts the wire value (`superior_completo`) as well as spaced or
    /// hyphenated variants typed into spreadsheets (`Superior completo`).
    pub fn parse(raw: &str) -> Option<Self> {
        let folded = crate::workflows::candidates::normalizer::normalize_term(raw)
            .replace([' ', '-'], "_");
        let folded = folded
            .strip_prefix("ensino_")
            .map(str::to_string)
            .unwrap_or(folded);
        Self::ordered()
            .into_iter()
            .find(|level| level.as_str() == folded)
    }
}

/// Proficiency levels accepted for technologies and languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProficiencyLevel {
    Basico,
    Intermediario,
    Avancado,
    Especialista,
    Fluente,
    Nativo,
}

impl ProficiencyLevel {
    pub const fn all() -> [Self; 6] {
        [
            Self::Basico,
            Self::Intermediario,
            Self::Avancado,
            Self::Especialista,
            Self::Fluente,
            Self::Nativo,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basico => "basico",
            Self::Intermediario => "intermediario",
            Self::Avancado => "avancado",
            Self::Especialista => "especialista",
            Self::Fluente => "fluente",
            Self::Nativo => "nativo",
        }
    }

    /// Comparable rank. Specialist (technologies) and fluent (languages) sit at
    /// the same step.
    pub const fn rank(self) -> u8 {
        match self {
            Self::Basico => 1,
            Self::Intermediario => 2,
            Self::Avancado => 3,
            Self::Especialista | Self::Fluente => 4,
            Self::Nativo => 5,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let folded = crate::workflows::candidates::normalizer::normalize_term(raw);
        Self::all()
            .into_iter()
            .find(|level| level.as_str() == folded)
    }
}

/// Configuration payload of one requirement. The variant is fixed by the
/// requirement key (see [`RequirementKey::shape`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RequirementValue {
    Range(RangeValue),
    TextList(Vec<String>),
    Technologies(Vec<TechnologyRequirement>),
    Languages(Vec<LanguageRequirement>),
    Certifications(Vec<CertificationRequirement>),
    Schooling(SchoolingLevel),
    Location(LocationValue),
    Distance(DistanceValue),
    Leadership(LeadershipValue),
}

impl RequirementValue {
    /// Decode the JSON value stored under `key`, using the key's shape to pick
    /// the variant.
    pub fn from_json(
        key: RequirementKey,
        value: serde_json::Value,
    ) -> Result<Self, RequirementsError> {
        let shape = key.shape();
        let kind_matches = match shape {
            ValueShape::ScalarRange { .. } | ValueShape::Composite { .. } => value.is_object(),
            ValueShape::StringList | ValueShape::RecordList { .. } => value.is_array(),
            ValueShape::EnumSelection => value.is_string(),
        };
        if !kind_matches {
            return Err(RequirementsError::ShapeMismatch {
                key,
                expected: shape.label(),
            });
        }

        let decoded = match shape {
            ValueShape::ScalarRange { .. } => Self::Range(serde_json::from_value(value)?),
            ValueShape::StringList => Self::TextList(serde_json::from_value(value)?),
            ValueShape::RecordList { record } => match record {
                super::schema::RecordKind::Technology => {
                    Self::Technologies(serde_json::from_value(value)?)
                }
                super::schema::RecordKind::Language => {
                    Self::Languages(serde_json::from_value(value)?)
                }
                super::schema::RecordKind::Certification => {
                    Self::Certifications(serde_json::from_value(value)?)
                }
            },
            ValueShape::EnumSelection => Self::Schooling(serde_json::from_value(value)?),
            ValueShape::Composite { composite } => match composite {
                super::schema::CompositeKind::Location => {
                    Self::Location(serde_json::from_value(value)?)
                }
                super::schema::CompositeKind::Distance => {
                    Self::Distance(serde_json::from_value(value)?)
                }
                super::schema::CompositeKind::Leadership => {
                    Self::Leadership(serde_json::from_value(value)?)
                }
            },
        };

        Ok(decoded)
    }

    pub const fn kind_label(&self) -> &'static str {
        match self {
            Self::Range(_) => "range",
            Self::TextList(_) => "string list",
            Self::Technologies(_) => "technology list",
            Self::Languages(_) => "language list",
            Self::Certifications(_) => "certification list",
            Self::Schooling(_) => "schooling level",
            Self::Location(_) => "location",
            Self::Distance(_) => "distance",
            Self::Leadership(_) => "leadership",
        }
    }

    /// Number of items for list-shaped values.
    pub fn list_len(&self) -> Option<usize> {
        match self {
            Self::TextList(items) => Some(items.len()),
            Self::Technologies(items) => Some(items.len()),
            Self::Languages(items) => Some(items.len()),
            Self::Certifications(items) => Some(items.len()),
            _ => None,
        }
    }

    pub(crate) fn push_blank_item(&mut self) -> Option<usize> {
        match self {
            Self::TextList(items) => items.push(String::new()),
            Self::Technologies(items) => items.push(TechnologyRequirement::default()),
            Self::Languages(items) => items.push(LanguageRequirement::default()),
            Self::Certifications(items) => items.push(CertificationRequirement::default()),
            _ => return None,
        }
        self.list_len().map(|len| len - 1)
    }

    /// Removes the item at `index`; `None` if the value is not a list or the
    /// index is out of range.
    pub(crate) fn remove_item(&mut self, index: usize) -> Option<()> {
        fn remove_at<T>(items: &mut Vec<T>, index: usize) -> Option<()> {
            (index < items.len()).then(|| {
                items.remove(index);
            })
        }

        match self {
            Self::TextList(items) => remove_at(items, index),
            Self::Technologies(items) => remove_at(items, index),
            Self::Languages(items) => remove_at(items, index),
            Self::Certifications(items) => remove_at(items, index),
            _ => None,
        }
    }
}

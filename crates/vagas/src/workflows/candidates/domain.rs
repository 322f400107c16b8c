use serde::{Deserialize, Serialize};

use crate::workflows::requirements::{ProficiencyLevel, SchoolingLevel, LICENCE_CATEGORIES};

/// Technology or language a candidate declares, with an optional level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSkill {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "nivel", default)]
    pub level: Option<ProficiencyLevel>,
}

impl CandidateSkill {
    pub fn new(name: impl Into<String>, level: Option<ProficiencyLevel>) -> Self {
        Self {
            name: name.into(),
            level,
        }
    }
}

/// Candidate data screened against a job's requirements. Unknown facts stay
/// `None` or empty and are reported as gaps rather than failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateProfile {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "idade")]
    pub age: Option<u32>,
    #[serde(rename = "cidade")]
    pub city: Option<String>,
    #[serde(rename = "estado")]
    pub state: Option<String>,
    #[serde(rename = "distancia_km")]
    pub distance_km: Option<u32>,
    #[serde(rename = "cnh")]
    pub licence_categories: Vec<String>,
    #[serde(rename = "escolaridade")]
    pub schooling: Option<SchoolingLevel>,
    #[serde(rename = "formacao")]
    pub fields_of_study: Vec<String>,
    #[serde(rename = "cursos")]
    pub courses: Vec<String>,
    #[serde(rename = "anos_experiencia")]
    pub experience_years: Option<u32>,
    #[serde(rename = "areas_experiencia")]
    pub experience_areas: Vec<String>,
    #[serde(rename = "tamanho_equipe")]
    pub led_team_size: Option<u32>,
    #[serde(rename = "tecnologias")]
    pub technologies: Vec<CandidateSkill>,
    #[serde(rename = "idiomas")]
    pub languages: Vec<CandidateSkill>,
    #[serde(rename = "certificacoes")]
    pub certifications: Vec<String>,
    pub soft_skills: Vec<String>,
}

/// Expand licence categories into single letters: `"AB"` grants both A and B.
pub fn expand_licence_categories<'a, I>(categories: I) -> Vec<char>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut letters: Vec<char> = categories
        .into_iter()
        .map(|category| category.trim().to_ascii_uppercase())
        .filter(|category| LICENCE_CATEGORIES.contains(&category.as_str()))
        .flat_map(|category| category.chars().collect::<Vec<_>>())
        .collect();
    letters.sort_unstable();
    letters.dedup();
    letters
}

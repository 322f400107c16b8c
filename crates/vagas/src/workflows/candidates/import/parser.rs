use std::io::Read;

use serde::{Deserialize, Deserializer};

use super::CandidateImportError;
use crate::workflows::candidates::domain::{CandidateProfile, CandidateSkill};
use crate::workflows::requirements::{ProficiencyLevel, SchoolingLevel};

const LIST_SEPARATOR: char = ';';
const LEVEL_SEPARATOR: char = ':';

pub(crate) fn parse_profiles<R: Read>(reader: R) -> Result<Vec<CandidateProfile>, CandidateImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut profiles = Vec::new();

    for (index, record) in csv_reader.deserialize::<CandidateRow>().enumerate() {
        let row = record?;
        // Header is line 1.
        profiles.push(row.into_profile(index + 2)?);
    }

    Ok(profiles)
}

#[derive(Debug, Deserialize)]
struct CandidateRow {
    #[serde(rename = "Nome")]
    name: String,
    #[serde(rename = "Idade", default, deserialize_with = "empty_string_as_none")]
    age: Option<String>,
    #[serde(rename = "Cidade", default, deserialize_with = "empty_string_as_none")]
    city: Option<String>,
    #[serde(rename = "Estado", default, deserialize_with = "empty_string_as_none")]
    state: Option<String>,
    #[serde(
        rename = "Distancia Km",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    distance_km: Option<String>,
    #[serde(rename = "CNH", default, deserialize_with = "empty_string_as_none")]
    licence: Option<String>,
    #[serde(
        rename = "Escolaridade",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    schooling: Option<String>,
    #[serde(rename = "Formacao", default, deserialize_with = "empty_string_as_none")]
    fields_of_study: Option<String>,
    #[serde(rename = "Cursos", default, deserialize_with = "empty_string_as_none")]
    courses: Option<String>,
    #[serde(
        rename = "Anos Experiencia",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    experience_years: Option<String>,
    #[serde(
        rename = "Areas Experiencia",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    experience_areas: Option<String>,
    #[serde(
        rename = "Tamanho Equipe",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    team_size: Option<String>,
    #[serde(
        rename = "Tecnologias",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    technologies: Option<String>,
    #[serde(rename = "Idiomas", default, deserialize_with = "empty_string_as_none")]
    languages: Option<String>,
    #[serde(
        rename = "Certificacoes",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    certifications: Option<String>,
    #[serde(
        rename = "Soft Skills",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    soft_skills: Option<String>,
}

impl CandidateRow {
    fn into_profile(self, line: usize) -> Result<CandidateProfile, CandidateImportError> {
        let schooling = match self.schooling.as_deref() {
            Some(raw) => Some(
                SchoolingLevel::parse(raw)
                    .ok_or_else(|| invalid_cell(line, "Escolaridade", raw))?,
            ),
            None => None,
        };

        Ok(CandidateProfile {
            name: self.name,
            age: parse_number(line, "Idade", self.age.as_deref())?,
            city: self.city,
            state: self.state.map(|state| state.to_ascii_uppercase()),
            distance_km: parse_number(line, "Distancia Km", self.distance_km.as_deref())?,
            licence_categories: split_list(self.licence.as_deref())
                .into_iter()
                .map(|category| category.to_ascii_uppercase())
                .collect(),
            schooling,
            fields_of_study: split_list(self.fields_of_study.as_deref()),
            courses: split_list(self.courses.as_deref()),
            experience_years: parse_number(
                line,
                "Anos Experiencia",
                self.experience_years.as_deref(),
            )?,
            experience_areas: split_list(self.experience_areas.as_deref()),
            led_team_size: parse_number(line, "Tamanho Equipe", self.team_size.as_deref())?,
            technologies: parse_skills(line, "Tecnologias", self.technologies.as_deref())?,
            languages: parse_skills(line, "Idiomas", self.languages.as_deref())?,
            certifications: split_list(self.certifications.as_deref()),
            soft_skills: split_list(self.soft_skills.as_deref()),
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn split_list(cell: Option<&str>) -> Vec<String> {
    cell.map(|value| {
        value
            .split(LIST_SEPARATOR)
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn parse_number(
    line: usize,
    column: &'static str,
    cell: Option<&str>,
) -> Result<Option<u32>, CandidateImportError> {
    cell.map(|raw| {
        raw.trim()
            .parse::<u32>()
            .map_err(|_| invalid_cell(line, column, raw))
    })
    .transpose()
}

fn parse_skills(
    line: usize,
    column: &'static str,
    cell: Option<&str>,
) -> Result<Vec<CandidateSkill>, CandidateImportError> {
    split_list(cell)
        .into_iter()
        .map(|entry| match entry.split_once(LEVEL_SEPARATOR) {
            Some((name, level)) if !level.trim().is_empty() => {
                let parsed =
                    ProficiencyLevel::parse(level).ok_or_else(|| invalid_cell(line, column, &entry))?;
                Ok(CandidateSkill::new(name.trim(), Some(parsed)))
            }
            Some((name, _)) => Ok(CandidateSkill::new(name.trim(), None)),
            None => Ok(CandidateSkill::new(entry.as_str(), None)),
        })
        .collect()
}

fn invalid_cell(line: usize, column: &'static str, value: &str) -> CandidateImportError {
    CandidateImportError::InvalidCell {
        line,
        column,
        value: value.to_string(),
    }
}

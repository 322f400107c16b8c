use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::workflows::requirements::{serializer, JobRequirementsDocument, RequirementsError};

/// Identifier assigned by the table service. Never generated locally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Owner reference of a posting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkMode {
    #[default]
    Presencial,
    Remoto,
    Hibrido,
}

impl WorkMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            WorkMode::Presencial => "presencial",
            WorkMode::Remoto => "remoto",
            WorkMode::Hibrido => "hibrido",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "presencial" => Some(WorkMode::Presencial),
            "remoto" => Some(WorkMode::Remoto),
            "hibrido" | "híbrido" => Some(WorkMode::Hibrido),
            _ => None,
        }
    }

    /// Only fully remote postings may omit the address.
    pub const fn requires_address(self) -> bool {
        !matches!(self, WorkMode::Remoto)
    }
}

/// Top-level job fields as typed by the user, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDraft {
    #[serde(rename = "titulo", default)]
    pub title: String,
    #[serde(rename = "descricao", default)]
    pub description: String,
    #[serde(rename = "endereco", default)]
    pub address: String,
    #[serde(rename = "modo_trabalho", default)]
    pub work_mode: WorkMode,
    #[serde(rename = "usuario_id", default, deserialize_with = "owner_reference")]
    pub owner: Option<UserId>,
}

/// Body sent to the table service on create and replace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobSubmissionPayload {
    pub titulo: String,
    pub descricao: String,
    pub endereco: String,
    pub modo_trabalho: WorkMode,
    pub requisitos_json: String,
    pub usuario_id: String,
}

/// Job row as stored by the table service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: JobId,
    #[serde(default)]
    pub titulo: String,
    #[serde(default)]
    pub descricao: String,
    #[serde(default)]
    pub endereco: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none_mode")]
    pub modo_trabalho: Option<WorkMode>,
    #[serde(default)]
    pub requisitos_json: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub usuario_id: Option<String>,
    #[serde(default)]
    pub criado_em: Option<String>,
}

fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(text)) => {
            Ok(Some(text).filter(|value| !value.trim().is_empty()))
        }
        Some(serde_json::Value::Number(number)) => Ok(Some(number.to_string())),
        Some(serde_json::Value::Null) | None => Ok(None),
        Some(other) => Err(de::Error::custom(format!(
            "expected text or number, got {other}"
        ))),
    }
}

fn owner_reference<'de, D>(deserializer: D) -> Result<Option<UserId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text_or_number(deserializer)?.map(UserId))
}

fn blank_as_none_mode<'de, D>(deserializer: D) -> Result<Option<WorkMode>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => WorkMode::parse(&raw)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("unknown modo_trabalho '{raw}'"))),
        _ => Ok(None),
    }
}

/// A job posting with its decoded requirements document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobPosting {
    pub id: JobId,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "endereco", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "modo_trabalho")]
    pub work_mode: WorkMode,
    #[serde(rename = "usuario_id")]
    pub owner: Option<UserId>,
    #[serde(rename = "criado_em")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "requisitos")]
    pub requirements: JobRequirementsDocument,
}

impl JobPosting {
    /// The locally held job after a successful write: the submitted fields
    /// plus whatever identity the store assigned.
    pub fn merge_remote_identity(
        draft: JobDraft,
        requirements: JobRequirementsDocument,
        stored: &JobRecord,
    ) -> Self {
        let address = Some(draft.address.trim().to_string()).filter(|value| !value.is_empty());
        Self {
            id: stored.id.clone(),
            title: draft.title.trim().to_string(),
            description: draft.description.trim().to_string(),
            address,
            work_mode: draft.work_mode,
            owner: draft.owner,
            created_at: stored.criado_em.as_deref().and_then(parse_timestamp),
            requirements,
        }
    }

    /// Decode a stored row. An absent or blank `requisitos_json` is a posting
    /// without requirements; anything else must decode.
    pub fn from_record(record: JobRecord) -> Result<Self, RequirementsError> {
        let requirements = match record.requisitos_json.as_deref().map(str::trim) {
            None | Some("") => JobRequirementsDocument::new(),
            Some(raw) => serializer::deserialize(raw)?,
        };

        Ok(Self {
            created_at: record.criado_em.as_deref().and_then(parse_timestamp),
            id: record.id,
            title: record.titulo,
            description: record.descricao,
            address: record.endereco.filter(|value| !value.trim().is_empty()),
            work_mode: record.modo_trabalho.unwrap_or_default(),
            owner: record.usuario_id.map(UserId),
            requirements,
        })
    }
}

/// Table services report timestamps either as RFC 3339 or as
/// `YYYY-MM-DD HH:MM:SS` with an optional offset.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%:z") {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

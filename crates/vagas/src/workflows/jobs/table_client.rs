//! REST client for the hosted table service (NocoDB-style v2 records API).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::domain::{JobId, JobRecord, JobSubmissionPayload, UserId};
use super::store::{JobStore, StoreError};
use crate::config::TableServiceConfig;

const TOKEN_HEADER: &str = "xc-token";

pub struct TableApiClient {
    client: reqwest::Client,
    records_url: String,
    api_token: String,
}

#[derive(Debug, Deserialize)]
struct RecordList {
    #[serde(default)]
    list: Vec<Value>,
}

impl TableApiClient {
    pub fn new(
        base_url: &str,
        api_token: impl Into<String>,
        table: &str,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| StoreError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            records_url: format!(
                "{}/api/v2/tables/{}/records",
                base_url.trim_end_matches('/'),
                table
            ),
            api_token: api_token.into(),
        })
    }

    /// Build a client when the configuration names a table service.
    pub fn from_config(config: &TableServiceConfig) -> Result<Option<Self>, StoreError> {
        match (&config.base_url, &config.api_token) {
            (Some(base_url), Some(token)) => Self::new(
                base_url,
                token.clone(),
                &config.jobs_table,
                config.timeout(),
            )
            .map(Some),
            _ => Ok(None),
        }
    }

    pub fn records_url(&self) -> &str {
        &self.records_url
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Response, StoreError> {
        let response = request
            .header(TOKEN_HEADER, &self.api_token)
            .send()
            .await
            .map_err(|err| StoreError::Transport(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .text()
            .await
            .ok()
            .map(|body| remote_message(&body))
            .unwrap_or_else(|| "unknown error".to_string());
        tracing::warn!(status = status.as_u16(), %message, "table service rejected request");
        Err(StoreError::Remote {
            status: status.as_u16(),
            message,
        })
    }

    async fn read_json(response: Response) -> Result<Value, StoreError> {
        response
            .json::<Value>()
            .await
            .map_err(|err| StoreError::Decode(err.to_string()))
    }
}

#[async_trait]
impl JobStore for TableApiClient {
    async fn create(&self, payload: &JobSubmissionPayload) -> Result<JobRecord, StoreError> {
        tracing::debug!(url = %self.records_url, "creating job record");
        let response = self
            .send(self.client.post(&self.records_url).json(payload))
            .await?;
        let body = Self::read_json(response).await?;
        record_from_value(body, None)
    }

    async fn replace(
        &self,
        id: &JobId,
        payload: &JobSubmissionPayload,
    ) -> Result<JobRecord, StoreError> {
        let mut body = to_object(payload)?;
        body.insert("Id".to_string(), id_value(id));

        tracing::debug!(url = %self.records_url, %id, "replacing job record");
        let response = self
            .send(self.client.patch(&self.records_url).json(&body))
            .await?;
        let echoed = Self::read_json(response).await?;
        record_from_value(merge_objects(Value::Object(body), echoed), Some(id))
    }

    async fn fetch(&self, id: &JobId) -> Result<Option<JobRecord>, StoreError> {
        let url = format!("{}/{}", self.records_url, id);
        match self.send(self.client.get(&url)).await {
            Ok(response) => {
                let body = Self::read_json(response).await?;
                record_from_value(body, None).map(Some)
            }
            Err(StoreError::Remote { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<JobRecord>, StoreError> {
        let filter = owner_filter(owner)?;
        let response = self
            .send(
                self.client
                    .get(&self.records_url)
                    .query(&[("where", filter.as_str())]),
            )
            .await?;
        let page: RecordList = response
            .json()
            .await
            .map_err(|err| StoreError::Decode(err.to_string()))?;

        page.list
            .into_iter()
            .map(|row| record_from_value(row, None))
            .collect()
    }
}

/// `where` clause selecting one owner's rows. Characters that delimit filter
/// terms are refused rather than escaped.
fn owner_filter(owner: &UserId) -> Result<String, StoreError> {
    let owner = owner.0.trim();
    if owner.is_empty() || owner.contains([',', '(', ')', '~']) {
        return Err(StoreError::InvalidFilter(owner.to_string()));
    }
    Ok(format!("(usuario_id,eq,{owner})"))
}

/// Normalise a row from the table service into a [`JobRecord`].
///
/// The identifier column is `Id` or `id`, numeric or textual. `fallback` is
/// only used by replace, where the caller already holds the identifier.
pub(crate) fn record_from_value(
    value: Value,
    fallback: Option<&JobId>,
) -> Result<JobRecord, StoreError> {
    let Value::Object(mut row) = value else {
        return Err(StoreError::Decode("expected a JSON object".to_string()));
    };

    let id = ["Id", "id", "ID"]
        .iter()
        .find_map(|key| row.remove(*key).and_then(identifier_from))
        .or_else(|| fallback.cloned())
        .ok_or(StoreError::MissingIdentifier)?;

    if !row.contains_key("criado_em") {
        if let Some(created) = row.remove("CreatedAt").or_else(|| row.remove("created_at")) {
            row.insert("criado_em".to_string(), created);
        }
    }
    row.insert("id".to_string(), Value::String(id.0));

    serde_json::from_value(Value::Object(row)).map_err(|err| StoreError::Decode(err.to_string()))
}

fn identifier_from(value: Value) -> Option<JobId> {
    match value {
        Value::Number(number) => Some(JobId(number.to_string())),
        Value::String(text) if !text.trim().is_empty() => Some(JobId(text.trim().to_string())),
        _ => None,
    }
}

fn id_value(id: &JobId) -> Value {
    id.0
        .parse::<u64>()
        .map(Value::from)
        .unwrap_or_else(|_| Value::String(id.0.clone()))
}

fn to_object(payload: &JobSubmissionPayload) -> Result<Map<String, Value>, StoreError> {
    match serde_json::to_value(payload) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(StoreError::Decode("payload is not an object".to_string())),
        Err(err) => Err(StoreError::Decode(err.to_string())),
    }
}

/// Fields echoed by the service win over what was sent.
fn merge_objects(sent: Value, echoed: Value) -> Value {
    match (sent, echoed) {
        (Value::Object(mut base), Value::Object(overlay)) => {
            base.extend(overlay);
            Value::Object(base)
        }
        (sent, _) => sent,
    }
}

fn remote_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            ["msg", "message", "error"]
                .iter()
                .find_map(|key| value.get(*key).and_then(Value::as_str).map(str::to_string))
        })
        .unwrap_or_else(|| body.trim().to_string())
}

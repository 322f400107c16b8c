use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{JobDraft, JobId, UserId};
use super::service::{JobSubmissionService, SubmissionError};
use super::store::{JobStore, StoreError};
use crate::workflows::candidates::CandidateProfile;
use crate::workflows::requirements::{schema_catalog, serializer, JobRequirementsDocument};

/// Job posting body as the form sends it: top-level fields plus the
/// requirements document as a JSON string.
#[derive(Debug, Deserialize)]
pub struct JobSubmissionRequest {
    #[serde(flatten)]
    pub draft: JobDraft,
    #[serde(default)]
    pub requisitos_json: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub usuario_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ScreenRequest {
    #[serde(default)]
    pub candidatos: Vec<CandidateProfile>,
}

/// Router exposing job submission, lookup and screening endpoints.
pub fn job_router<S>(service: Arc<JobSubmissionService<S>>) -> Router
where
    S: JobStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/jobs",
            post(create_handler::<S>).get(list_handler::<S>),
        )
        .route(
            "/api/v1/jobs/:job_id",
            get(fetch_handler::<S>).put(replace_handler::<S>),
        )
        .route("/api/v1/jobs/:job_id/screen", post(screen_handler::<S>))
        .route("/api/v1/requirements/schema", get(schema_handler))
        .with_state(service)
}

pub(crate) async fn create_handler<S>(
    State(service): State<Arc<JobSubmissionService<S>>>,
    Json(request): Json<JobSubmissionRequest>,
) -> Response
where
    S: JobStore + 'static,
{
    let requirements = match decode_requirements(request.requisitos_json.as_deref()) {
        Ok(document) => document,
        Err(response) => return response,
    };

    match service.submit(request.draft, requirements).await {
        Ok(posting) => (StatusCode::CREATED, Json(posting)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn replace_handler<S>(
    State(service): State<Arc<JobSubmissionService<S>>>,
    Path(job_id): Path<String>,
    Json(request): Json<JobSubmissionRequest>,
) -> Response
where
    S: JobStore + 'static,
{
    let requirements = match decode_requirements(request.requisitos_json.as_deref()) {
        Ok(document) => document,
        Err(response) => return response,
    };

    match service
        .replace(&JobId(job_id), request.draft, requirements)
        .await
    {
        Ok(posting) => (StatusCode::OK, Json(posting)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn fetch_handler<S>(
    State(service): State<Arc<JobSubmissionService<S>>>,
    Path(job_id): Path<String>,
) -> Response
where
    S: JobStore + 'static,
{
    match service.load(&JobId(job_id)).await {
        Ok(posting) => (StatusCode::OK, Json(posting)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<S>(
    State(service): State<Arc<JobSubmissionService<S>>>,
    Query(query): Query<OwnerQuery>,
) -> Response
where
    S: JobStore + 'static,
{
    let Some(owner) = query
        .usuario_id
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
    else {
        let payload = json!({
            "error": "Informe o usuário (usuario_id) para listar as vagas.",
        });
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
    };

    match service.list_for_owner(&UserId(owner)).await {
        Ok(postings) => (StatusCode::OK, Json(postings)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn screen_handler<S>(
    State(service): State<Arc<JobSubmissionService<S>>>,
    Path(job_id): Path<String>,
    Json(request): Json<ScreenRequest>,
) -> Response
where
    S: JobStore + 'static,
{
    match service.screen(&JobId(job_id), &request.candidatos).await {
        Ok(outcomes) => (StatusCode::OK, Json(json!({ "resultados": outcomes }))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn schema_handler() -> Response {
    (StatusCode::OK, Json(schema_catalog())).into_response()
}

/// Malformed `requisitos_json` is rejected, never read as "no requirements".
fn decode_requirements(raw: Option<&str>) -> Result<JobRequirementsDocument, Response> {
    match raw.map(str::trim) {
        None | Some("") => Ok(JobRequirementsDocument::new()),
        Some(raw) => serializer::deserialize(raw).map_err(|error| {
            let payload = json!({
                "error": format!("requisitos_json inválido: {error}"),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }),
    }
}

fn error_response(error: SubmissionError) -> Response {
    let status = match &error {
        SubmissionError::Validation(_)
        | SubmissionError::Requirements(_)
        | SubmissionError::Store(StoreError::InvalidFilter(_)) => StatusCode::UNPROCESSABLE_ENTITY,
        SubmissionError::NotFound(_) | SubmissionError::Store(StoreError::NotFound(_)) => {
            StatusCode::NOT_FOUND
        }
        SubmissionError::Store(_) => StatusCode::BAD_GATEWAY,
        SubmissionError::StoredRequirements { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = match &error {
        SubmissionError::Validation(errors) => json!({
            "error": error.to_string(),
            "errors": errors.errors,
        }),
        _ => json!({
            "error": error.to_string(),
        }),
    };

    (status, Json(payload)).into_response()
}

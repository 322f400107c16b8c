use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use vagas::error::AppError;
use vagas::workflows::jobs::{job_router, JobStore, JobSubmissionService};
use vagas::workflows::requirements::{
    serializer, RequirementIssue, RequirementKey, ScreeningCriteria,
};

/// Result of checking a requirements document without submitting it.
#[derive(Debug, Serialize)]
pub(crate) struct RequirementsCheck {
    pub(crate) valid: bool,
    pub(crate) requisitos: Vec<RequirementKey>,
    pub(crate) problemas: Vec<RequirementIssue>,
}

pub(crate) fn with_job_routes<S>(service: Arc<JobSubmissionService<S>>) -> axum::Router
where
    S: JobStore + 'static,
{
    job_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/requirements/check",
            axum::routing::post(requirements_check_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Decode a raw `requisitos_json` body and report whether it is usable.
pub(crate) async fn requirements_check_endpoint(
    body: String,
) -> Result<Json<RequirementsCheck>, AppError> {
    Ok(Json(check_requirements(&body)?))
}

pub(crate) fn check_requirements(raw: &str) -> Result<RequirementsCheck, AppError> {
    let document = serializer::deserialize(raw)?;
    let problemas = ScreeningCriteria::from_document(&document)
        .err()
        .unwrap_or_default();

    Ok(RequirementsCheck {
        valid: problemas.is_empty(),
        requisitos: document.keys().collect(),
        problemas,
    })
}

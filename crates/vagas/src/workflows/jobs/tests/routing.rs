use super::common::*;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::workflows::jobs::domain::JobId;
use crate::workflows::jobs::router::{fetch_handler, job_router};
use crate::workflows::jobs::JobSubmissionService;

fn submission_body() -> Value {
    json!({
        "titulo": "Analista de logística",
        "descricao": "Controle de estoque e expedição",
        "endereco": "Rodovia Anhanguera, km 104",
        "modo_trabalho": "presencial",
        "usuario_id": 7,
        "requisitos_json": "{\"idade\":{\"min\":\"18\",\"max\":\"65\"}}"
    })
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn create_route_returns_created_posting() {
    let (router, store) = memory_router();

    let response = router
        .oneshot(json_request("POST", "/api/v1/jobs", &submission_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body["id"], "1");
    assert_eq!(body["usuario_id"], "7");
    assert_eq!(body["modo_trabalho"], "presencial");
    assert_eq!(body["requisitos"]["idade"]["min"], "18");
    assert_eq!(store.calls(), 1);
}

#[tokio::test]
async fn create_route_lists_every_missing_field() {
    let (router, store) = memory_router();
    let mut body = submission_body();
    body["titulo"] = json!("");
    body["descricao"] = json!(" ");

    let response = router
        .oneshot(json_request("POST", "/api/v1/jobs", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .expect("errors array")
        .iter()
        .filter_map(|error| error["field"].as_str())
        .collect();
    assert_eq!(fields, vec!["titulo", "descricao"]);
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn create_route_rejects_malformed_requirements_json() {
    let (router, store) = memory_router();
    let mut body = submission_body();
    body["requisitos_json"] = json!("{\"idade\":");

    let response = router
        .oneshot(json_request("POST", "/api/v1/jobs", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .starts_with("requisitos_json inválido"));
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn create_route_rejects_requirement_values_of_the_wrong_kind() {
    let (router, store) = memory_router();
    let mut body = submission_body();
    body["requisitos_json"] = json!("{\"idade\":[\"18\"]}");

    let response = router
        .oneshot(json_request("POST", "/api/v1/jobs", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .contains("expects a range value"));
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn create_route_rejects_requirements_outside_the_schema() {
    let (router, store) = memory_router();
    let mut body = submission_body();
    body["requisitos_json"] = json!("{\"idade\":{\"min\":\"5\"},\"cnh\":[\"Z\"]}");

    let response = router
        .oneshot(json_request("POST", "/api/v1/jobs", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    let errors = body["errors"].as_array().expect("field errors");
    assert_eq!(errors.len(), 2);
    assert!(errors
        .iter()
        .all(|error| error["field"] == json!("requisitos_json")));
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn create_route_reports_bad_gateway_when_store_is_down() {
    let service = Arc::new(JobSubmissionService::new(Arc::new(OfflineStore)));
    let router = job_router(service);

    let response = router
        .oneshot(json_request("POST", "/api/v1/jobs", &submission_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .contains("connection refused"));
}

#[tokio::test]
async fn fetch_handler_returns_not_found_for_unknown_job() {
    let (service, _) = memory_service();

    let response = fetch_handler::<MemoryStore>(State(service), Path("42".to_string())).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn replace_route_updates_stored_posting() {
    let (service, store) = memory_service();
    let posting = service
        .submit(draft(), requirements())
        .await
        .expect("seed posting");
    let router = job_router(service);

    let mut body = submission_body();
    body["titulo"] = json!("Coordenador de logística");
    body["requisitos_json"] = json!("");

    let response = router
        .oneshot(json_request(
            "PUT",
            &format!("/api/v1/jobs/{}", posting.id),
            &body,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let stored = store.record(&JobId("1".to_string())).expect("row kept");
    assert_eq!(stored.titulo, "Coordenador de logística");
    assert_eq!(stored.requisitos_json.as_deref(), Some("{}"));
}

#[tokio::test]
async fn list_route_requires_owner() {
    let (router, _) = memory_router();

    let response = router
        .oneshot(
            Request::get("/api/v1/jobs")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn list_route_filters_by_owner() {
    let (service, _) = memory_service();
    service
        .submit(draft(), requirements())
        .await
        .expect("seed posting");
    let router = job_router(service);

    let response = router
        .oneshot(
            Request::get("/api/v1/jobs?usuario_id=7")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn schema_route_serves_every_category() {
    let (router, _) = memory_router();

    let response = router
        .oneshot(
            Request::get("/api/v1/requirements/schema")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["categories"].as_array().map(Vec::len), Some(6));
}

#[tokio::test]
async fn screen_route_returns_ranked_results() {
    let (service, _) = memory_service();
    let posting = service
        .submit(draft(), requirements())
        .await
        .expect("seed posting");
    let router = job_router(service);

    let body = json!({
        "candidatos": [
            { "nome": "Elisa", "idade": 17 },
            { "nome": "Fábio", "idade": 40, "tecnologias": [{ "nome": "excel", "nivel": "avancado" }] }
        ]
    });

    let response = router
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/jobs/{}/screen", posting.id),
            &body,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    let results = body["resultados"].as_array().expect("results");
    assert_eq!(results[0]["candidate"], "Fábio");
    assert_eq!(results[0]["decision"]["status"], "qualified");
    assert_eq!(results[1]["decision"]["status"], "disqualified");
}

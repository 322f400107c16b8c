use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryJobStore, JobStoreBackend};
use crate::routes::with_job_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};
use vagas::config::{AppConfig, TableServiceConfig};
use vagas::error::AppError;
use vagas::telemetry;
use vagas::workflows::jobs::{JobSubmissionService, TableApiClient};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = job_store(&config.table)?;
    let backend = store.label();
    let job_service = Arc::new(JobSubmissionService::new(Arc::new(store)));

    let app = with_job_routes(job_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, backend, "job requirements service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

pub(crate) fn job_store(config: &TableServiceConfig) -> Result<JobStoreBackend, AppError> {
    match TableApiClient::from_config(config)? {
        Some(client) => {
            info!(url = client.records_url(), "using hosted table service");
            Ok(JobStoreBackend::Table(client))
        }
        None => {
            warn!("TABLE_API_URL not set; job postings are kept in memory");
            Ok(JobStoreBackend::Memory(InMemoryJobStore::default()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_table_url_falls_back_to_memory() {
        let store = job_store(&TableServiceConfig::default()).expect("store");
        assert_eq!(store.label(), "in-memory");
    }

    #[test]
    fn configured_table_service_is_used() {
        let config = TableServiceConfig {
            base_url: Some("https://tables.example.com".to_string()),
            api_token: Some("secret".to_string()),
            ..TableServiceConfig::default()
        };

        let store = job_store(&config).expect("store");
        assert_eq!(store.label(), "table-service");
    }
}

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use vagas::error::AppError;
use vagas::workflows::jobs::{
    JobId, JobRecord, JobStore, JobSubmissionPayload, StoreError, TableApiClient, UserId,
};
use vagas::workflows::requirements::{serializer, JobRequirementsDocument};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Job rows kept in process memory, for demos and local runs without a table
/// service.
#[derive(Default, Clone)]
pub(crate) struct InMemoryJobStore {
    records: Arc<Mutex<HashMap<JobId, JobRecord>>>,
    next_id: Arc<AtomicU64>,
}

impl InMemoryJobStore {
    fn with_records<T>(
        &self,
        apply: impl FnOnce(&mut HashMap<JobId, JobRecord>) -> T,
    ) -> Result<T, StoreError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| StoreError::Transport("in-memory store lock poisoned".to_string()))?;
        Ok(apply(&mut guard))
    }

    fn row(id: JobId, payload: &JobSubmissionPayload, created: Option<String>) -> JobRecord {
        JobRecord {
            id,
            titulo: payload.titulo.clone(),
            descricao: payload.descricao.clone(),
            endereco: Some(payload.endereco.clone()),
            modo_trabalho: Some(payload.modo_trabalho),
            requisitos_json: Some(payload.requisitos_json.clone()),
            usuario_id: Some(payload.usuario_id.clone()),
            criado_em: created,
        }
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn create(&self, payload: &JobSubmissionPayload) -> Result<JobRecord, StoreError> {
        let id = JobId((self.next_id.fetch_add(1, Ordering::SeqCst) + 1).to_string());
        let created = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let record = Self::row(id, payload, Some(created));
        self.with_records(|records| {
            records.insert(record.id.clone(), record.clone());
        })?;
        Ok(record)
    }

    async fn replace(
        &self,
        id: &JobId,
        payload: &JobSubmissionPayload,
    ) -> Result<JobRecord, StoreError> {
        self.with_records(|records| {
            let created = records.get(id)?.criado_em.clone();
            let record = Self::row(id.clone(), payload, created);
            records.insert(id.clone(), record.clone());
            Some(record)
        })?
        .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    async fn fetch(&self, id: &JobId) -> Result<Option<JobRecord>, StoreError> {
        self.with_records(|records| records.get(id).cloned())
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<JobRecord>, StoreError> {
        self.with_records(|records| {
            let mut rows: Vec<JobRecord> = records
                .values()
                .filter(|record| record.usuario_id.as_deref() == Some(owner.0.as_str()))
                .cloned()
                .collect();
            rows.sort_by_cached_key(|record| {
                (record.id.0.parse::<u64>().ok(), record.id.0.clone())
            });
            rows
        })
    }
}

/// Store selected at startup: the hosted table service when configured,
/// process memory otherwise.
pub(crate) enum JobStoreBackend {
    Table(TableApiClient),
    Memory(InMemoryJobStore),
}

impl JobStoreBackend {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            JobStoreBackend::Table(_) => "table-service",
            JobStoreBackend::Memory(_) => "in-memory",
        }
    }
}

#[async_trait]
impl JobStore for JobStoreBackend {
    async fn create(&self, payload: &JobSubmissionPayload) -> Result<JobRecord, StoreError> {
        match self {
            JobStoreBackend::Table(store) => store.create(payload).await,
            JobStoreBackend::Memory(store) => store.create(payload).await,
        }
    }

    async fn replace(
        &self,
        id: &JobId,
        payload: &JobSubmissionPayload,
    ) -> Result<JobRecord, StoreError> {
        match self {
            JobStoreBackend::Table(store) => store.replace(id, payload).await,
            JobStoreBackend::Memory(store) => store.replace(id, payload).await,
        }
    }

    async fn fetch(&self, id: &JobId) -> Result<Option<JobRecord>, StoreError> {
        match self {
            JobStoreBackend::Table(store) => store.fetch(id).await,
            JobStoreBackend::Memory(store) => store.fetch(id).await,
        }
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<JobRecord>, StoreError> {
        match self {
            JobStoreBackend::Table(store) => store.list_by_owner(owner).await,
            JobStoreBackend::Memory(store) => store.list_by_owner(owner).await,
        }
    }
}

/// Read a `requisitos_json` document from disk. Malformed files are errors.
pub(crate) fn read_requirements_file(path: &Path) -> Result<JobRequirementsDocument, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serializer::deserialize(&raw)?)
}

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::workflows::jobs::domain::{
    JobDraft, JobId, JobRecord, JobSubmissionPayload, UserId, WorkMode,
};
use crate::workflows::jobs::store::{JobStore, StoreError};
use crate::workflows::jobs::{job_router, JobSubmissionService};
use crate::workflows::requirements::{
    JobRequirementsDocument, RangeValue, RequirementKey, RequirementValue, TechnologyRequirement,
};

pub(super) fn draft() -> JobDraft {
    JobDraft {
        title: "Analista de logística".to_string(),
        description: "Controle de estoque e expedição".to_string(),
        address: "Rodovia Anhanguera, km 104".to_string(),
        work_mode: WorkMode::Presencial,
        owner: Some(UserId("7".to_string())),
    }
}

pub(super) fn requirements() -> JobRequirementsDocument {
    let mut document = JobRequirementsDocument::new();
    document
        .insert(
            RequirementKey::Idade,
            RequirementValue::Range(RangeValue::new("18", "65")),
        )
        .expect("range");
    document
        .insert(
            RequirementKey::TecnologiasSoftwares,
            RequirementValue::Technologies(vec![TechnologyRequirement {
                name: "Excel".to_string(),
                level: "avancado".to_string(),
                mandatory: true,
            }]),
        )
        .expect("technologies");
    document
}

/// Store that keeps rows in memory and counts every call.
#[derive(Default)]
pub(super) struct MemoryStore {
    records: Mutex<BTreeMap<JobId, JobRecord>>,
    next_id: AtomicUsize,
    calls: AtomicUsize,
}

impl MemoryStore {
    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(super) fn record(&self, id: &JobId) -> Option<JobRecord> {
        self.records
            .lock()
            .expect("store mutex poisoned")
            .get(id)
            .cloned()
    }

    pub(super) fn seed(&self, record: JobRecord) {
        self.records
            .lock()
            .expect("store mutex poisoned")
            .insert(record.id.clone(), record);
    }

    fn row(id: JobId, payload: &JobSubmissionPayload) -> JobRecord {
        JobRecord {
            id,
            titulo: payload.titulo.clone(),
            descricao: payload.descricao.clone(),
            endereco: Some(payload.endereco.clone()),
            modo_trabalho: Some(payload.modo_trabalho),
            requisitos_json: Some(payload.requisitos_json.clone()),
            usuario_id: Some(payload.usuario_id.clone()),
            criado_em: Some("2025-03-01T09:30:00Z".to_string()),
        }
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn create(&self, payload: &JobSubmissionPayload) -> Result<JobRecord, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let id = JobId((self.next_id.fetch_add(1, Ordering::SeqCst) + 1).to_string());
        let record = Self::row(id, payload);
        self.seed(record.clone());
        Ok(record)
    }

    async fn replace(
        &self,
        id: &JobId,
        payload: &JobSubmissionPayload,
    ) -> Result<JobRecord, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.record(id).is_none() {
            return Err(StoreError::NotFound(id.clone()));
        }
        let record = Self::row(id.clone(), payload);
        self.seed(record.clone());
        Ok(record)
    }

    async fn fetch(&self, id: &JobId) -> Result<Option<JobRecord>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.record(id))
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<JobRecord>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| record.usuario_id.as_deref() == Some(owner.0.as_str()))
            .cloned()
            .collect())
    }
}

/// Store whose every call fails like an unreachable service.
pub(super) struct OfflineStore;

#[async_trait]
impl JobStore for OfflineStore {
    async fn create(&self, _payload: &JobSubmissionPayload) -> Result<JobRecord, StoreError> {
        Err(StoreError::Transport("connection refused".to_string()))
    }

    async fn replace(
        &self,
        _id: &JobId,
        _payload: &JobSubmissionPayload,
    ) -> Result<JobRecord, StoreError> {
        Err(StoreError::Transport("connection refused".to_string()))
    }

    async fn fetch(&self, _id: &JobId) -> Result<Option<JobRecord>, StoreError> {
        Err(StoreError::Transport("connection refused".to_string()))
    }

    async fn list_by_owner(&self, _owner: &UserId) -> Result<Vec<JobRecord>, StoreError> {
        Err(StoreError::Transport("connection refused".to_string()))
    }
}

pub(super) fn memory_service() -> (Arc<JobSubmissionService<MemoryStore>>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let service = Arc::new(JobSubmissionService::new(store.clone()));
    (service, store)
}

pub(super) fn memory_router() -> (axum::Router, Arc<MemoryStore>) {
    let (service, store) = memory_service();
    (job_router(service), store)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

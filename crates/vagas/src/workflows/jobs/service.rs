use std::sync::Arc;

use super::domain::{JobDraft, JobId, JobPosting, JobSubmissionPayload, UserId};
use super::store::{JobStore, StoreError};
use super::validation::{append_requirement_issues, validate_draft, ValidationErrors};
use crate::workflows::candidates::{CandidateProfile, ScreeningEngine, ScreeningOutcome};
use crate::workflows::requirements::{
    JobRequirementsDocument, RequirementBuilder, RequirementsError, ScreeningCriteria,
};

/// Validates job submissions and writes them to the table service.
pub struct JobSubmissionService<S> {
    store: Arc<S>,
    engine: ScreeningEngine,
}

impl<S> JobSubmissionService<S>
where
    S: JobStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self::with_engine(store, ScreeningEngine::default())
    }

    pub fn with_engine(store: Arc<S>, engine: ScreeningEngine) -> Self {
        Self { store, engine }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Validate a submission and build the outbound body. Nothing here
    /// touches the network.
    pub fn prepare(
        &self,
        draft: &JobDraft,
        requirements: &JobRequirementsDocument,
    ) -> Result<JobSubmissionPayload, SubmissionError> {
        let mut errors = validate_draft(draft);
        if let Err(issues) = ScreeningCriteria::from_document(requirements) {
            append_requirement_issues(&mut errors, &issues);
        }
        if !errors.is_empty() {
            return Err(SubmissionError::Validation(errors));
        }

        let owner = draft
            .owner
            .as_ref()
            .map(|owner| owner.0.trim().to_string())
            .unwrap_or_default();

        Ok(JobSubmissionPayload {
            titulo: draft.title.trim().to_string(),
            descricao: draft.description.trim().to_string(),
            endereco: draft.address.trim().to_string(),
            modo_trabalho: draft.work_mode,
            requisitos_json: requirements.to_json_string()?,
            usuario_id: owner,
        })
    }

    /// Create a posting. The returned posting carries the identifier the store
    /// assigned.
    pub async fn submit(
        &self,
        draft: JobDraft,
        requirements: JobRequirementsDocument,
    ) -> Result<JobPosting, SubmissionError> {
        let payload = self.prepare(&draft, &requirements)?;
        let stored = self.store.create(&payload).await.map_err(|err| {
            tracing::warn!(error = %err, "job submission failed");
            err
        })?;

        tracing::info!(id = %stored.id, owner = %payload.usuario_id, "job posting created");
        Ok(JobPosting::merge_remote_identity(draft, requirements, &stored))
    }

    /// Submit the enabled requirements of an edit session. The builder is
    /// only read, so a failed submission leaves it as it was.
    pub async fn submit_from_builder(
        &self,
        draft: JobDraft,
        builder: &RequirementBuilder,
    ) -> Result<JobPosting, SubmissionError> {
        self.submit(draft, builder.document()).await
    }

    /// Overwrite a posting and its whole requirements document.
    pub async fn replace(
        &self,
        id: &JobId,
        draft: JobDraft,
        requirements: JobRequirementsDocument,
    ) -> Result<JobPosting, SubmissionError> {
        let payload = self.prepare(&draft, &requirements)?;
        let stored = self.store.replace(id, &payload).await?;

        tracing::info!(%id, "job posting replaced");
        Ok(JobPosting::merge_remote_identity(draft, requirements, &stored))
    }

    pub async fn load(&self, id: &JobId) -> Result<JobPosting, SubmissionError> {
        let record = self
            .store
            .fetch(id)
            .await?
            .ok_or_else(|| SubmissionError::NotFound(id.clone()))?;

        JobPosting::from_record(record).map_err(|source| {
            tracing::error!(%id, error = %source, "stored requisitos_json does not decode");
            SubmissionError::StoredRequirements {
                id: id.clone(),
                source,
            }
        })
    }

    pub async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<JobPosting>, SubmissionError> {
        let records = self.store.list_by_owner(owner).await?;
        tracing::debug!(%owner, count = records.len(), "listed job postings");

        records
            .into_iter()
            .map(|record| {
                let id = record.id.clone();
                JobPosting::from_record(record)
                    .map_err(|source| SubmissionError::StoredRequirements { id, source })
            })
            .collect()
    }

    /// Rank candidates against a stored posting's requirements.
    pub async fn screen(
        &self,
        id: &JobId,
        candidates: &[CandidateProfile],
    ) -> Result<Vec<ScreeningOutcome>, SubmissionError> {
        let posting = self.load(id).await?;
        let criteria = ScreeningCriteria::from_document(&posting.requirements).map_err(|issues| {
            let mut errors = ValidationErrors::default();
            append_requirement_issues(&mut errors, &issues);
            SubmissionError::Validation(errors)
        })?;

        Ok(self.engine.rank(&criteria, candidates))
    }
}

/// Error raised by the job submission service.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("{0}")]
    Validation(ValidationErrors),
    #[error(transparent)]
    Requirements(#[from] RequirementsError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("job {0} not found")]
    NotFound(JobId),
    #[error("job {id} has an unreadable requisitos_json")]
    StoredRequirements {
        id: JobId,
        #[source]
        source: RequirementsError,
    },
}

use async_trait::async_trait;

use super::domain::{JobId, JobRecord, JobSubmissionPayload, UserId};

/// System of record for job postings.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Create a row; the returned record carries the store-assigned id.
    async fn create(&self, payload: &JobSubmissionPayload) -> Result<JobRecord, StoreError>;
    /// Overwrite every field of an existing row.
    async fn replace(
        &self,
        id: &JobId,
        payload: &JobSubmissionPayload,
    ) -> Result<JobRecord, StoreError>;
    async fn fetch(&self, id: &JobId) -> Result<Option<JobRecord>, StoreError>;
    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<JobRecord>, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("table service unreachable: {0}")]
    Transport(String),
    #[error("table service answered {status}: {message}")]
    Remote { status: u16, message: String },
    #[error("unexpected table service response: {0}")]
    Decode(String),
    #[error("table service response did not include a record identifier")]
    MissingIdentifier,
    #[error("job {0} not found")]
    NotFound(JobId),
    #[error("'{0}' cannot be used in a table service filter")]
    InvalidFilter(String),
}

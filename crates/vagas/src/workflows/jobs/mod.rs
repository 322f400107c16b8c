//! Job posting submission: validation of the top-level fields, packaging of
//! the requirements document and the round trip through the table service.

pub mod domain;
pub mod router;
pub mod service;
pub mod store;
pub mod table_client;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    JobDraft, JobId, JobPosting, JobRecord, JobSubmissionPayload, UserId, WorkMode,
};
pub use router::{job_router, JobSubmissionRequest};
pub use service::{JobSubmissionService, SubmissionError};
pub use store::{JobStore, StoreError};
pub use table_client::TableApiClient;
pub use validation::{validate_draft, FieldError, JobField, ValidationErrors};

use std::fmt;

use serde::Serialize;

use super::domain::JobDraft;
use crate::workflows::requirements::RequirementIssue;

/// Top-level job fields a submission can be rejected for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum JobField {
    #[serde(rename = "titulo")]
    Title,
    #[serde(rename = "descricao")]
    Description,
    #[serde(rename = "endereco")]
    Address,
    #[serde(rename = "usuario_id")]
    Owner,
    #[serde(rename = "requisitos_json")]
    Requirements,
}

impl JobField {
    /// Name shown to the user.
    pub const fn label(self) -> &'static str {
        match self {
            JobField::Title => "título",
            JobField::Description => "descrição",
            JobField::Address => "endereço",
            JobField::Owner => "usuário",
            JobField::Requirements => "requisitos",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: JobField,
    pub message: String,
}

/// Every problem found in one submission, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn fields(&self) -> Vec<JobField> {
        self.errors.iter().map(|error| error.field).collect()
    }

    pub fn messages(&self) -> Vec<&str> {
        self.errors.iter().map(|error| error.message.as_str()).collect()
    }

    fn push(&mut self, field: JobField, message: String) {
        self.errors.push(FieldError { field, message });
    }

    fn missing(&mut self, field: JobField) {
        self.push(field, format!("O campo {} é obrigatório.", field.label()));
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages().join(" "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Check the mandatory top-level fields of a draft.
pub fn validate_draft(draft: &JobDraft) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    if draft.title.trim().is_empty() {
        errors.missing(JobField::Title);
    }
    if draft.description.trim().is_empty() {
        errors.missing(JobField::Description);
    }
    if draft.work_mode.requires_address() && draft.address.trim().is_empty() {
        errors.push(
            JobField::Address,
            format!(
                "O campo {} é obrigatório para vagas {}.",
                JobField::Address.label(),
                draft.work_mode.as_str()
            ),
        );
    }
    let has_owner = draft
        .owner
        .as_ref()
        .is_some_and(|owner| !owner.0.trim().is_empty());
    if !has_owner {
        errors.push(
            JobField::Owner,
            format!(
                "Nenhum {} autenticado: faça login para publicar a vaga.",
                JobField::Owner.label()
            ),
        );
    }

    errors
}

/// Fold requirement issues into the submission errors.
pub(crate) fn append_requirement_issues(errors: &mut ValidationErrors, issues: &[RequirementIssue]) {
    for issue in issues {
        errors.push(JobField::Requirements, format!("Requisito {issue}"));
    }
}

use super::common::*;
use std::sync::Arc;

use crate::workflows::candidates::{CandidateProfile, CandidateSkill, ScreeningDecision};
use crate::workflows::jobs::domain::{JobId, JobRecord, UserId, WorkMode};
use crate::workflows::jobs::store::StoreError;
use crate::workflows::jobs::validation::JobField;
use crate::workflows::jobs::{JobSubmissionService, SubmissionError};
use crate::workflows::requirements::{
    serializer, ProficiencyLevel, RangeValue, RequirementBuilder, RequirementKey,
    RequirementValue,
};

#[tokio::test]
async fn submit_takes_identifier_from_the_store() {
    let (service, store) = memory_service();

    let posting = service
        .submit(draft(), requirements())
        .await
        .expect("submission succeeds");

    assert_eq!(posting.id, JobId("1".to_string()));
    assert_eq!(posting.title, "Analista de logística");
    assert_eq!(posting.requirements, requirements());
    assert!(posting.created_at.is_some());

    let stored = store.record(&posting.id).expect("row stored");
    assert_eq!(stored.modo_trabalho, Some(WorkMode::Presencial));
    assert_eq!(
        stored.requisitos_json.as_deref(),
        Some(r#"{"idade":{"min":"18","max":"65"},"tecnologias_softwares":[{"nome":"Excel","nivel":"avancado","obrigatorio":true}]}"#)
    );
}

#[tokio::test]
async fn empty_title_is_rejected_before_any_store_call() {
    let (service, store) = memory_service();
    let mut draft = draft();
    draft.title = "  ".to_string();

    let error = service
        .submit(draft, requirements())
        .await
        .expect_err("title required");

    match error {
        SubmissionError::Validation(errors) => {
            assert_eq!(errors.fields(), vec![JobField::Title]);
            assert!(errors.messages()[0].contains("título"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn onsite_without_address_is_rejected_before_any_store_call() {
    let (service, store) = memory_service();
    for mode in [WorkMode::Presencial, WorkMode::Hibrido] {
        let mut draft = draft();
        draft.work_mode = mode;
        draft.address.clear();

        let error = service
            .submit(draft, requirements())
            .await
            .expect_err("address required");
        assert!(matches!(error, SubmissionError::Validation(_)));
    }
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn remote_jobs_submit_without_address() {
    let (service, store) = memory_service();
    let mut draft = draft();
    draft.work_mode = WorkMode::Remoto;
    draft.address.clear();

    let posting = service
        .submit(draft, requirements())
        .await
        .expect("remote submission succeeds");

    assert_eq!(posting.address, None);
    assert_eq!(store.calls(), 1);
}

#[tokio::test]
async fn inverted_ranges_are_rejected_at_submission() {
    let (service, store) = memory_service();
    let mut builder = RequirementBuilder::new();
    builder.toggle(RequirementKey::Idade, true);
    builder
        .update_config(
            RequirementKey::Idade,
            RequirementValue::Range(RangeValue::new("65", "18")),
        )
        .expect("each bound is valid on its own");

    let error = service
        .submit_from_builder(draft(), &builder)
        .await
        .expect_err("min above max");

    match error {
        SubmissionError::Validation(errors) => {
            assert_eq!(errors.fields(), vec![JobField::Requirements]);
            assert!(errors.messages()[0].contains("Idade"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn decoded_documents_outside_the_schema_are_rejected_at_submission() {
    let (service, store) = memory_service();
    let requirements = serializer::deserialize(
        r#"{"idade":{"min":"5","max":"200"},"cnh":["Z"],"cidade_estado":{"cidade":"Campinas","estado":"Sao Paulo"}}"#,
    )
    .expect("well-formed document");

    let error = service
        .submit(draft(), requirements)
        .await
        .expect_err("bounds, licence and state are outside the schema");

    match error {
        SubmissionError::Validation(errors) => {
            assert_eq!(
                errors.fields(),
                vec![
                    JobField::Requirements,
                    JobField::Requirements,
                    JobField::Requirements
                ]
            );
            let messages = errors.messages();
            assert!(messages[0].contains("Idade"));
            assert!(messages[1].contains("'Z'"));
            assert!(messages[2].contains("Sao Paulo"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn transport_failure_leaves_the_builder_untouched() {
    let service = JobSubmissionService::new(Arc::new(OfflineStore));
    let mut builder = RequirementBuilder::new();
    builder.toggle(RequirementKey::Cnh, true);
    builder
        .update_config(
            RequirementKey::Cnh,
            RequirementValue::TextList(vec!["B".to_string()]),
        )
        .expect("valid categories");
    let before = builder.clone();

    let error = service
        .submit_from_builder(draft(), &builder)
        .await
        .expect_err("store offline");

    assert!(matches!(
        error,
        SubmissionError::Store(StoreError::Transport(_))
    ));
    assert!(error.to_string().contains("connection refused"));
    assert_eq!(builder, before);
}

#[tokio::test]
async fn replace_overwrites_the_whole_document() {
    let (service, store) = memory_service();
    let posting = service
        .submit(draft(), requirements())
        .await
        .expect("submission succeeds");

    let mut builder = RequirementBuilder::from_document(&posting.requirements);
    builder.toggle(RequirementKey::TecnologiasSoftwares, false);
    builder.toggle(RequirementKey::SoftSkills, true);
    builder
        .update_config(
            RequirementKey::SoftSkills,
            RequirementValue::TextList(vec!["Organização".to_string()]),
        )
        .expect("free text");

    let replaced = service
        .replace(&posting.id, draft(), builder.document())
        .await
        .expect("replace succeeds");

    assert_eq!(replaced.id, posting.id);
    let stored = store.record(&posting.id).expect("row stored");
    let document =
        serializer::deserialize(stored.requisitos_json.as_deref().expect("json")).expect("decodes");
    assert!(!document.contains(RequirementKey::TecnologiasSoftwares));
    assert!(document.contains(RequirementKey::SoftSkills));
    assert!(document.contains(RequirementKey::Idade));
}

#[tokio::test]
async fn load_reports_missing_and_malformed_rows() {
    let (service, store) = memory_service();

    let error = service
        .load(&JobId("404".to_string()))
        .await
        .expect_err("missing");
    assert!(matches!(error, SubmissionError::NotFound(_)));

    store.seed(JobRecord {
        id: JobId("9".to_string()),
        titulo: "Vaga antiga".to_string(),
        descricao: "Importada".to_string(),
        endereco: None,
        modo_trabalho: None,
        requisitos_json: Some("{\"idade\":".to_string()),
        usuario_id: Some("7".to_string()),
        criado_em: None,
    });
    let error = service
        .load(&JobId("9".to_string()))
        .await
        .expect_err("malformed");
    assert!(matches!(
        error,
        SubmissionError::StoredRequirements { ref id, .. } if id.0 == "9"
    ));
}

#[tokio::test]
async fn list_for_owner_returns_only_their_postings() {
    let (service, _) = memory_service();
    service
        .submit(draft(), requirements())
        .await
        .expect("first");
    let mut other = draft();
    other.owner = Some(UserId("8".to_string()));
    service.submit(other, requirements()).await.expect("second");

    let postings = service
        .list_for_owner(&UserId("7".to_string()))
        .await
        .expect("list succeeds");
    assert_eq!(postings.len(), 1);
    assert_eq!(postings[0].owner, Some(UserId("7".to_string())));
}

#[tokio::test]
async fn screen_ranks_candidates_against_stored_requirements() {
    let (service, _) = memory_service();
    let posting = service
        .submit(draft(), requirements())
        .await
        .expect("submission succeeds");

    let qualified = CandidateProfile {
        name: "Carla".to_string(),
        age: Some(30),
        technologies: vec![CandidateSkill::new(
            "Excel",
            Some(ProficiencyLevel::Avancado),
        )],
        ..CandidateProfile::default()
    };
    let missing_excel = CandidateProfile {
        name: "Davi".to_string(),
        age: Some(30),
        ..CandidateProfile::default()
    };

    let outcomes = service
        .screen(&posting.id, &[missing_excel, qualified])
        .await
        .expect("screening succeeds");

    assert_eq!(outcomes[0].candidate, "Carla");
    assert_eq!(outcomes[0].decision, ScreeningDecision::Qualified);
    assert!(outcomes[1].decision.is_disqualified());
}

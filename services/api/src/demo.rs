use crate::infra::{read_requirements_file, InMemoryJobStore};
use crate::routes::check_requirements;
use clap::Args;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;
use vagas::error::AppError;
use vagas::workflows::candidates::{
    CandidateImporter, CandidateProfile, ScreeningEngine, ScreeningOutcome,
};
use vagas::workflows::jobs::{
    JobDraft, JobSubmissionService, SubmissionError, UserId, WorkMode,
};
use vagas::workflows::requirements::{
    schema_catalog, serializer, LanguageRequirement, LocationValue, RangeValue,
    RequirementBuilder, RequirementKey, RequirementValue, RequirementsError, SchoolingLevel,
    ScreeningCriteria, TechnologyRequirement,
};

const SAMPLE_CANDIDATES: &str = "\
Nome,Idade,Cidade,Estado,Distancia Km,CNH,Escolaridade,Formacao,Cursos,Anos Experiencia,Areas Experiencia,Tamanho Equipe,Tecnologias,Idiomas,Certificacoes,Soft Skills
Marina Costa,31,Campinas,SP,6,AB,Ensino Superior Completo,Logística,NR-11,6,Logística;Compras,4,Excel:avancado;SAP:intermediario,Inglês:intermediario,,Organização;Comunicação
Rafael Nunes,27,Sumaré,SP,18,B,Ensino Médio Completo,,NR-11,3,Logística,,Excel:intermediario,,,Organização
Tiago Alves,58,Campinas,SP,4,,Ensino Médio Completo,,,12,Logística,8,Excel:basico,,,
";

#[derive(Args, Debug)]
pub(crate) struct CheckArgs {
    /// Path to a requisitos_json document
    #[arg(long)]
    pub(crate) file: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct ScreenArgs {
    /// Path to a requisitos_json document
    #[arg(long)]
    pub(crate) requirements: PathBuf,
    /// Candidate CSV exported from the spreadsheet service
    #[arg(long)]
    pub(crate) candidates: PathBuf,
    /// Show only the first N ranked candidates
    #[arg(long)]
    pub(crate) top: Option<usize>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Candidate CSV to screen instead of the bundled sample
    #[arg(long)]
    pub(crate) candidates: Option<PathBuf>,
    /// Print every score component for each candidate
    #[arg(long)]
    pub(crate) details: bool,
}

pub(crate) fn run_requirements_schema() -> Result<(), AppError> {
    let catalog =
        serde_json::to_string_pretty(&schema_catalog()).map_err(RequirementsError::from)?;
    println!("{catalog}");
    Ok(())
}

pub(crate) fn run_requirements_check(args: CheckArgs) -> Result<(), AppError> {
    let raw = std::fs::read_to_string(&args.file)?;
    let check = check_requirements(&raw)?;

    println!("{} requirement(s) enabled", check.requisitos.len());
    for key in &check.requisitos {
        println!("- {} ({})", key.label(), key.category().label());
    }
    if check.valid {
        println!("Document is usable for screening.");
    } else {
        println!("Problems:");
        for issue in &check.problemas {
            println!("- {issue}");
        }
    }
    Ok(())
}

pub(crate) fn run_screen(args: ScreenArgs) -> Result<(), AppError> {
    let document = read_requirements_file(&args.requirements)?;
    let criteria = ScreeningCriteria::from_document(&document).map_err(|issues| {
        let details: Vec<String> = issues.iter().map(ToString::to_string).collect();
        std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("requirements not usable for screening: {}", details.join("; ")),
        )
    })?;
    let candidates = CandidateImporter::from_path(&args.candidates)?;

    let mut outcomes = ScreeningEngine::default().rank(&criteria, &candidates);
    if let Some(top) = args.top {
        outcomes.truncate(top);
    }
    render_ranking(&outcomes, false);
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    println!("Job requirements demo");

    let builder = sample_builder()?;
    let requisitos_json = serializer::serialize(&builder)?;
    println!("\nrequisitos_json ({} requirements)", builder.document().len());
    println!("{requisitos_json}");

    let service = JobSubmissionService::new(Arc::new(InMemoryJobStore::default()));

    let mut incomplete = sample_draft();
    incomplete.title.clear();
    incomplete.address.clear();
    match service.submit_from_builder(incomplete, &builder).await {
        Err(SubmissionError::Validation(errors)) => {
            println!("\nIncomplete submission rejected before reaching the store:");
            for message in errors.messages() {
                println!("- {message}");
            }
        }
        Err(other) => return Err(other.into()),
        Ok(posting) => println!("\nUnexpectedly accepted posting {}", posting.id),
    }

    let posting = service.submit_from_builder(sample_draft(), &builder).await?;
    println!(
        "\nPosted job {} \"{}\" ({})",
        posting.id,
        posting.title,
        posting.work_mode.as_str()
    );

    let candidates = load_candidates(args.candidates)?;
    println!("\nScreening {} candidate(s)", candidates.len());
    let outcomes = service.screen(&posting.id, &candidates).await?;
    render_ranking(&outcomes, args.details);

    Ok(())
}

fn sample_draft() -> JobDraft {
    JobDraft {
        title: "Analista de logística".to_string(),
        description: "Planejamento de rotas, controle de estoque e expedição.".to_string(),
        address: "Rodovia Anhanguera, km 104, Campinas - SP".to_string(),
        work_mode: WorkMode::Hibrido,
        owner: Some(UserId("1".to_string())),
    }
}

fn sample_builder() -> Result<RequirementBuilder, AppError> {
    let mut builder = RequirementBuilder::new();
    let values = [
        (
            RequirementKey::Idade,
            RequirementValue::Range(RangeValue::new("21", "55")),
        ),
        (
            RequirementKey::Cnh,
            RequirementValue::TextList(vec!["B".to_string()]),
        ),
        (
            RequirementKey::CidadeEstado,
            RequirementValue::Location(LocationValue {
                city: "Campinas".to_string(),
                state: "SP".to_string(),
                accepted_regions: vec!["Sumaré".to_string(), "Hortolândia".to_string()],
            }),
        ),
        (
            RequirementKey::EscolaridadeMinima,
            RequirementValue::Schooling(SchoolingLevel::MedioCompleto),
        ),
        (
            RequirementKey::TecnologiasSoftwares,
            RequirementValue::Technologies(vec![TechnologyRequirement {
                name: "Excel".to_string(),
                level: "intermediario".to_string(),
                mandatory: true,
            }]),
        ),
        (
            RequirementKey::Idiomas,
            RequirementValue::Languages(vec![LanguageRequirement {
                language: "Inglês".to_string(),
                level: "basico".to_string(),
                mandatory: false,
            }]),
        ),
        (
            RequirementKey::SoftSkills,
            RequirementValue::TextList(vec!["Organização".to_string()]),
        ),
    ];

    for (key, value) in values {
        builder.toggle(key, true);
        builder.update_config(key, value).map_err(|err| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, err.to_string())
        })?;
    }
    Ok(builder)
}

fn load_candidates(path: Option<PathBuf>) -> Result<Vec<CandidateProfile>, AppError> {
    let candidates = match path {
        Some(path) => CandidateImporter::from_path(path)?,
        None => CandidateImporter::from_reader(Cursor::new(SAMPLE_CANDIDATES))?,
    };
    Ok(candidates)
}

fn render_ranking(outcomes: &[ScreeningOutcome], details: bool) {
    for (position, outcome) in outcomes.iter().enumerate() {
        println!(
            "{}. {} | score {} | {}",
            position + 1,
            outcome.candidate,
            outcome.total_score,
            outcome.decision.summary()
        );
        if details {
            for component in &outcome.components {
                println!(
                    "   - {} {:+} {}",
                    component.requirement.label(),
                    component.score,
                    component.notes
                );
            }
        }
    }
}

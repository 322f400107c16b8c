mod parser;

use std::io::Read;
use std::path::Path;

use super::domain::CandidateProfile;

#[derive(Debug, thiserror::Error)]
pub enum CandidateImportError {
    #[error("failed to read candidate export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid candidate CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}, column '{column}': cannot read '{value}'")]
    InvalidCell {
        line: usize,
        column: &'static str,
        value: String,
    },
}

/// Reads candidate spreadsheets exported from the table service.
pub struct CandidateImporter;

impl CandidateImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<CandidateProfile>, CandidateImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<CandidateProfile>, CandidateImportError> {
        let profiles = parser::parse_profiles(reader)?;
        tracing::debug!(count = profiles.len(), "imported candidate profiles");
        Ok(profiles)
    }
}

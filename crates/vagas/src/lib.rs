//! Job posting requirements, submission workflow, and candidate screening.
//!
//! The hosted table service owns job records; this crate owns the grammar of the
//! `requisitos_json` document embedded in each record and everything that reads
//! or writes it.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;

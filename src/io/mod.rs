//! File IO and report writers.
//!
//! The report itself is format-agnostic (`MakeReadyReport`); a
//! [`ReportWriter`] turns it into JSON for the spreadsheet collaborator
//! or into a terminal rendering for a human.

pub mod writers;

pub use writers::{JsonWriter, TerminalWriter};

use crate::core::MakeReadyReport;
use crate::validate::InputValidation;
use anyhow::{Context, Result};
use serde_json::Value;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Terminal,
}

pub trait ReportWriter {
    fn write_report(&mut self, report: &MakeReadyReport) -> Result<()>;
    fn write_validation(
        &mut self,
        structural: &InputValidation,
        survey: &InputValidation,
    ) -> Result<()>;
}

/// Reads and parses one JSON export.
pub fn read_json(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {} as JSON", path.display()))
}

/// Builds the writer for the requested format, targeting a file when an
/// output path is given and stdout otherwise.
pub fn create_writer(
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<Box<dyn ReportWriter>> {
    let destination: Box<dyn Write> = match output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        ),
        None => Box::new(io::stdout()),
    };
    Ok(match format {
        OutputFormat::Json => Box::new(JsonWriter::new(destination)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(destination)),
    })
}

use crate::core::MakeReadyReport;
use crate::io::ReportWriter;
use crate::validate::InputValidation;
use serde::Serialize;
use std::io::Write;

/// Emits the report as pretty-printed JSON: the hand-off contract for
/// the external spreadsheet/rendering collaborator.
pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

#[derive(Serialize)]
struct ValidationOutput<'a> {
    structural: &'a InputValidation,
    survey: &'a InputValidation,
    valid: bool,
}

impl<W: Write> ReportWriter for JsonWriter<W> {
    fn write_report(&mut self, report: &MakeReadyReport) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_validation(
        &mut self,
        structural: &InputValidation,
        survey: &InputValidation,
    ) -> anyhow::Result<()> {
        let output = ValidationOutput {
            structural,
            survey,
            valid: structural.is_valid() && survey.is_valid(),
        };
        let json = serde_json::to_string_pretty(&output)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        Ok(())
    }
}

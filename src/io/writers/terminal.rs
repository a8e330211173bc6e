use crate::core::{col, MakeReadyReport, ReportRow, RowRole};
use crate::io::ReportWriter;
use crate::validate::InputValidation;
use colored::*;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use std::io::Write;

/// Human-oriented rendering: one block per pole with the A-K summary as
/// headed text and the make-ready columns as a table.
pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_pole_summary(&mut self, row: &ReportRow) -> anyhow::Result<()> {
        let cell = |column: usize| row.cells[column].as_deref().unwrap_or("NA");

        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "{} {}  #{}  [{}]",
            "Pole".bold().cyan(),
            cell(col::POLE_NUMBER).bold(),
            cell(col::OPERATION),
            cell(col::ACTION).yellow()
        )?;
        writeln!(
            self.writer,
            "  Owner: {}  Structure: {}",
            cell(col::POLE_OWNER),
            cell(col::POLE_STRUCTURE)
        )?;
        writeln!(
            self.writer,
            "  Riser: {}  Guy: {}  PLA: {}  Grade: {}",
            cell(col::PROPOSED_RISER),
            cell(col::PROPOSED_GUY),
            cell(col::PLA),
            cell(col::CONSTRUCTION_GRADE)
        )?;
        writeln!(
            self.writer,
            "  Lowest Com: {}  Lowest CPS Electrical: {}",
            cell(col::LOWEST_COM),
            cell(col::LOWEST_ELECTRIC)
        )?;
        Ok(())
    }
}

fn make_ready_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Attacher", "Existing", "Proposed", "Mid-Span Proposed"]);
    table
}

fn make_ready_cells(row: &ReportRow) -> Vec<String> {
    [
        col::ATTACHER,
        col::EXISTING_HEIGHT,
        col::PROPOSED_HEIGHT,
        col::MID_SPAN_PROPOSED,
    ]
    .iter()
    .map(|&column| row.cells[column].clone().unwrap_or_default())
    .collect()
}

impl<W: Write> ReportWriter for TerminalWriter<W> {
    fn write_report(&mut self, report: &MakeReadyReport) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", "MAKE-READY REPORT".bold())?;

        let mut table: Option<Table> = None;
        for row in &report.rows {
            match row.role {
                // the fixed header block is implied by the table headers
                RowRole::ColumnHeader => {}
                RowRole::PoleHeader => {
                    if let Some(table) = table.take() {
                        writeln!(self.writer, "{table}")?;
                    }
                    self.write_pole_summary(row)?;
                    let mut next = make_ready_table();
                    next.add_row(make_ready_cells(row));
                    table = Some(next);
                }
                _ => {
                    if let Some(table) = table.as_mut() {
                        table.add_row(make_ready_cells(row));
                    }
                }
            }
        }
        if let Some(table) = table.take() {
            writeln!(self.writer, "{table}")?;
        }

        let poles = report
            .rows
            .iter()
            .filter(|r| r.role == RowRole::PoleHeader)
            .count();
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "{} pole(s), {} row(s), {} merge region(s)",
            poles.to_string().bold(),
            report.rows.len(),
            report.merges.len()
        )?;
        Ok(())
    }

    fn write_validation(
        &mut self,
        structural: &InputValidation,
        survey: &InputValidation,
    ) -> anyhow::Result<()> {
        for (name, validation) in [("structural", structural), ("survey", survey)] {
            let status = if validation.is_valid() {
                "OK".green()
            } else {
                "INVALID".red()
            };
            writeln!(self.writer, "{} input: {status}", name.bold())?;
            for error in &validation.errors {
                writeln!(self.writer, "  {} {error}", "error:".red())?;
            }
            for warning in &validation.warnings {
                writeln!(self.writer, "  {} {warning}", "warning:".yellow())?;
            }
        }
        writeln!(
            self.writer,
            "{} survey node(s) usable for matching",
            survey.usable_nodes
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MergeSpan;

    fn sample_report() -> MakeReadyReport {
        let mut header = ReportRow::empty(RowRole::ColumnHeader);
        header.set(col::OPERATION, "Operation Number");

        let mut pole = ReportRow::empty(RowRole::PoleHeader);
        pole.set(col::OPERATION, "1");
        pole.set(col::ACTION, "Installing");
        pole.set(col::POLE_NUMBER, "PL100");
        pole.set(col::ATTACHER, "Primary Span");

        let mut attachment = ReportRow::empty(RowRole::Attachment);
        attachment.set(col::ATTACHER, "Neutral");
        attachment.set(col::PROPOSED_HEIGHT, "32'-10\"");

        MakeReadyReport {
            rows: vec![header, pole, attachment],
            merges: vec![MergeSpan::new(1, 0, 1, 0)],
            column_widths: vec![10; 15],
        }
    }

    #[test]
    fn renders_pole_summary_and_attachments() {
        colored::control::set_override(false);
        let mut buffer = Vec::new();
        TerminalWriter::new(&mut buffer)
            .write_report(&sample_report())
            .unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.contains("PL100"));
        assert!(text.contains("[Installing]"));
        assert!(text.contains("Neutral"));
        assert!(text.contains("32'-10\""));
        assert!(text.contains("1 pole(s)"));
    }

    #[test]
    fn validation_output_lists_problems() {
        colored::control::set_override(false);
        let structural = InputValidation::default();
        let survey = InputValidation {
            errors: vec!["missing or invalid nodes object".to_string()],
            warnings: vec!["node n2 has no pole number".to_string()],
            usable_nodes: 0,
        };
        let mut buffer = Vec::new();
        TerminalWriter::new(&mut buffer)
            .write_validation(&structural, &survey)
            .unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.contains("structural input: OK"));
        assert!(text.contains("survey input: INVALID"));
        assert!(text.contains("error: missing or invalid nodes object"));
        assert!(text.contains("warning: node n2 has no pole number"));
    }
}

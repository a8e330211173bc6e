//! Report assembly: lays the consolidated data out as an ordered table
//! of rows with declared merge regions, one block per pole.

use crate::aggregate::{summarize_pole, PoleSummary};
use crate::config::ReportConfig;
use crate::consolidate::{
    consolidate, format_span_header, mid_span_status, ConsolidatedSet,
};
use crate::convert::NA;
use crate::core::errors::Result;
use crate::core::{col, MakeReadyReport, MergeSpan, ReportRow, RowRole, COLUMN_WIDTHS};
use crate::ident::{canonical_pole_id, PoleSource};
use crate::matcher::{match_poles, MatchedPole, PoleIndex};
use crate::sources::{KatapultConnection, KatapultDoc, SpidaDoc, WireEndPoint};
use crate::validate;
use serde_json::Value;

/// Builds the complete make-ready report from the two parsed exports.
/// Fails up front on schema violations; emits no partial report.
pub fn build_report(
    structural_root: &Value,
    survey_root: &Value,
    config: &ReportConfig,
) -> Result<MakeReadyReport> {
    validate::validate_structural(structural_root)?;
    validate::validate_survey(survey_root)?;

    let structural = SpidaDoc::new(structural_root);
    let survey = KatapultDoc::new(survey_root);
    let index = PoleIndex::build(&survey);

    let (mut rows, mut merges) = header_block();
    for (i, matched) in match_poles(&structural, &index).iter().enumerate() {
        let set = consolidate(matched, &survey, config);
        let summary = summarize_pole(matched, &survey, config);
        emit_pole_block(
            &mut rows,
            &mut merges,
            i + 1,
            matched,
            &set,
            &summary,
            &survey,
            config,
        );
    }

    Ok(MakeReadyReport {
        rows,
        merges,
        column_widths: COLUMN_WIDTHS.to_vec(),
    })
}

/// The fixed three-row header and its merge regions.
fn header_block() -> (Vec<ReportRow>, Vec<MergeSpan>) {
    let mut row_1 = ReportRow::empty(RowRole::ColumnHeader);
    row_1.set(col::OPERATION, "Operation Number");
    row_1.set(col::ACTION, "Attachment Action");
    row_1.set(col::POLE_OWNER, "Pole Owner");
    row_1.set(col::POLE_NUMBER, "Pole #");
    row_1.set(col::POLE_STRUCTURE, "Pole Structure");
    row_1.set(col::PROPOSED_RISER, "Proposed Riser");
    row_1.set(col::PROPOSED_GUY, "Proposed Guy");
    row_1.set(col::PLA, "PLA%");
    row_1.set(col::CONSTRUCTION_GRADE, "Construction Grade");
    row_1.set(col::LOWEST_COM, "Existing Mid-Span Data");
    row_1.set(col::ATTACHER, "Make Ready Data");

    let mut row_2 = ReportRow::empty(RowRole::ColumnHeader);
    row_2.set(col::LOWEST_COM, "Height Lowest Com");
    row_2.set(col::LOWEST_ELECTRIC, "Height Lowest CPS Electrical");
    row_2.set(col::ATTACHER, "Attachment Height");
    row_2.set(col::MID_SPAN_PROPOSED, "Mid-Span Proposed");

    let mut row_3 = ReportRow::empty(RowRole::ColumnHeader);
    row_3.set(col::ATTACHER, "Attacher Description");
    row_3.set(col::EXISTING_HEIGHT, "Existing");
    row_3.set(col::PROPOSED_HEIGHT, "Proposed");
    row_3.set(col::MID_SPAN_PROPOSED, "Proposed");

    let merges = vec![
        // "Existing Mid-Span Data" over J1:K1
        MergeSpan::new(0, col::LOWEST_COM, 0, col::LOWEST_ELECTRIC),
        // "Make Ready Data" over L1:O1
        MergeSpan::new(0, col::ATTACHER, 0, col::MID_SPAN_PROPOSED),
        // "Attachment Height" over L2:N2
        MergeSpan::new(1, col::ATTACHER, 1, col::PROPOSED_HEIGHT),
    ];

    (vec![row_1, row_2, row_3], merges)
}

/// Appends one pole's rows and A-K merge regions.
#[allow(clippy::too_many_arguments)]
fn emit_pole_block<'a>(
    rows: &mut Vec<ReportRow>,
    merges: &mut Vec<MergeSpan>,
    operation_number: usize,
    pole: &MatchedPole<'a>,
    set: &ConsolidatedSet,
    summary: &PoleSummary,
    survey: &KatapultDoc<'a>,
    config: &ReportConfig,
) {
    let first_row = rows.len();
    let mut block: Vec<ReportRow> = Vec::new();

    let recommended = pole.spida.recommended_design(config);
    let end_points: Vec<WireEndPoint<'a>> = recommended
        .map(|d| d.wire_end_points().collect())
        .unwrap_or_default();

    if end_points.is_empty() {
        // no spans: list every reportable attachment under a default span
        let mut header = ReportRow::empty(RowRole::PoleHeader);
        header.set(col::ATTACHER, format_span_header(None));
        block.push(header);

        let mut emitted = 0;
        for entry in set.entries().iter().filter(|e| e.state.is_reported()) {
            block.push(attachment_row(entry, None));
            emitted += 1;
        }
        if emitted == 0 {
            let mut placeholder = ReportRow::empty(RowRole::Placeholder);
            placeholder.set(col::ATTACHER, "No attachments");
            block.push(placeholder);
        }
    } else {
        for end_point in &end_points {
            let role = if block.is_empty() {
                RowRole::PoleHeader
            } else {
                RowRole::SpanHeader
            };
            let mut header = ReportRow::empty(role);
            header.set(col::ATTACHER, format_span_header(Some(end_point)));
            block.push(header);

            let connection = span_connection(pole, end_point, survey);
            let mut emitted: Vec<usize> = Vec::new();
            for wire_id in end_point.wire_ids() {
                for (slot, entry) in set.entries().iter().enumerate() {
                    if emitted.contains(&slot)
                        || !entry.state.is_reported()
                        || !entry.source_ids.iter().any(|id| id == wire_id)
                    {
                        continue;
                    }
                    block.push(attachment_row(entry, connection.as_ref()));
                    emitted.push(slot);
                }
            }
            if emitted.is_empty() {
                let mut placeholder = ReportRow::empty(RowRole::Placeholder);
                placeholder.set(col::ATTACHER, "No attachments on this span");
                block.push(placeholder);
            }
        }
    }

    let mut from_pole = ReportRow::empty(RowRole::FromPole);
    from_pole.set(col::ATTACHER, "From Pole");
    from_pole.set(col::EXISTING_HEIGHT, pole.canonical_id.clone());
    block.push(from_pole);

    let mut to_pole = ReportRow::empty(RowRole::ToPole);
    to_pole.set(col::ATTACHER, "To Pole");
    to_pole.set(col::EXISTING_HEIGHT, to_pole_id(pole, survey, &end_points));
    block.push(to_pole);

    // pole-level columns on the first row only
    let first = &mut block[0];
    first.set(col::OPERATION, operation_number.to_string());
    first.set(col::ACTION, set.action().label());
    first.set(col::POLE_OWNER, summary.owner.clone());
    first.set(col::POLE_NUMBER, pole.canonical_id.clone());
    first.set(col::POLE_STRUCTURE, summary.structure.clone());
    first.set(col::PROPOSED_RISER, summary.proposed_riser.clone());
    first.set(col::PROPOSED_GUY, summary.proposed_guy.clone());
    first.set(col::PLA, summary.pla.clone());
    first.set(col::CONSTRUCTION_GRADE, summary.construction_grade.clone());
    first.set(col::LOWEST_COM, summary.lowest_com.clone());
    first.set(col::LOWEST_ELECTRIC, summary.lowest_electric.clone());

    // merge A-K down the block, excluding the From/To trailer rows
    let attachment_region = block.len() - 2;
    if attachment_region >= 1 {
        let end_row = first_row + attachment_region - 1;
        for column in col::OPERATION..=col::LOWEST_ELECTRIC {
            merges.push(MergeSpan::new(first_row, column, end_row, column));
        }
    }

    rows.extend(block);
}

fn attachment_row(
    entry: &crate::core::ConsolidatedAttachment,
    connection: Option<&KatapultConnection>,
) -> ReportRow {
    use crate::core::AttachmentState;

    let mut row = ReportRow::empty(RowRole::Attachment);
    row.set(col::ATTACHER, entry.description.clone());

    // survey measurement wins as the existing height; new installs have
    // an intentionally empty existing cell
    let existing = if entry.state == AttachmentState::RecommendedOnly {
        String::new()
    } else if entry.survey_height != NA {
        entry.survey_height.clone()
    } else {
        entry.measured_height.clone()
    };
    row.set(col::EXISTING_HEIGHT, existing);
    row.set(col::PROPOSED_HEIGHT, entry.recommended_height.clone());

    let mid_span = if entry.proposed_mid_span != NA {
        entry.proposed_mid_span.clone()
    } else {
        mid_span_status(&entry.description, connection)
    };
    row.set(col::MID_SPAN_PROPOSED, mid_span);
    row
}

/// Finds the survey connection carrying a span: the edge from this
/// pole's node whose far end canonicalizes to the span target.
fn span_connection<'a>(
    pole: &MatchedPole<'a>,
    end_point: &WireEndPoint<'a>,
    survey: &KatapultDoc<'a>,
) -> Option<KatapultConnection<'a>> {
    let node = pole.survey.as_ref()?;
    let target =
        canonical_pole_id(end_point.structure_label()?, PoleSource::Structural);
    survey.connections().find(|conn| {
        conn.other_end(node.id())
            .and_then(|other| survey.node(other))
            .and_then(|n| n.pole_number())
            .map(|num| canonical_pole_id(&num, PoleSource::Survey))
            .as_deref()
            == Some(target.as_str())
    })
}

/// The matched neighbor: survey connections first (document order), then
/// the first outbound structural span endpoint.
fn to_pole_id<'a>(
    pole: &MatchedPole<'a>,
    survey: &KatapultDoc<'a>,
    end_points: &[WireEndPoint<'a>],
) -> String {
    if let Some(node) = &pole.survey {
        for conn in survey.connections() {
            let Some(other) = conn.other_end(node.id()) else {
                continue;
            };
            if let Some(number) = survey.node(other).and_then(|n| n.pole_number()) {
                return canonical_pole_id(&number, PoleSource::Survey);
            }
        }
    }
    end_points
        .iter()
        .find(|ep| !ep.is_previous_pole() && ep.structure_label().is_some())
        .and_then(|ep| ep.structure_label())
        .map(|label| canonical_pole_id(label, PoleSource::Structural))
        .unwrap_or_else(|| NA.to_string())
}

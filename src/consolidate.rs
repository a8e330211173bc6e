//! Attachment consolidation: the record-reconciliation core.
//!
//! Per pole, attachment items from the structural export's two design
//! states and the survey's physical measurements are folded into one
//! record per physical attachment, keyed by (owner, type description).
//! The key is an intentionally coarse exact-match join; near-duplicate
//! descriptions stay separate entries.

use crate::config::ReportConfig;
use crate::convert::{feet_inches_from_inches, to_feet_inches, Unit, NA};
use crate::core::{AttachmentAction, AttachmentState, ConsolidatedAttachment};
use crate::ident::{canonical_pole_id, PoleSource};
use crate::matcher::MatchedPole;
use crate::sources::katapult::MidSpanWire;
use crate::sources::{KatapultConnection, KatapultDoc, SpidaAttachment, WireEndPoint};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Labels that look like a bare pole number and get canonicalized when
/// they appear as a span target.
static POLE_LABEL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:PL|P\.|PO|\d+-PL)?\d+$").unwrap());

const COMPASS: [&str; 8] = [
    "North",
    "North East",
    "East",
    "South East",
    "South",
    "South West",
    "West",
    "North West",
];

/// The consolidation key: both owner and the full type description must
/// match exactly (case-folded) for two items to collide into one entry.
pub fn attachment_key(owner: &str, description: &str) -> String {
    format!("{}_{}", owner.to_uppercase(), description.to_uppercase())
}

/// Builds the display description for a structural attachment item from
/// its usage group and owner heuristics. The export's own description
/// wins when present.
pub fn describe_attachment(item: &SpidaAttachment) -> String {
    if let Some(description) = item.client_description() {
        return description.to_string();
    }

    let usage = item.usage_group().to_uppercase();
    let owner = item.owner_id().unwrap_or("");
    let owner_upper = owner.to_uppercase();
    let size = item.client_size().unwrap_or("");
    let with_owner = |suffix: &str| {
        if owner.is_empty() {
            suffix.to_string()
        } else {
            format!("{owner} {suffix}")
        }
    };

    if usage.contains("PRIMARY") {
        return with_owner("Primary");
    }
    if usage == "NEUTRAL" {
        return "Neutral".to_string();
    }
    if usage == "COMMUNICATION_BUNDLE" || usage == "COMMUNICATIONS" {
        if owner_upper.contains("CHARTER") || owner_upper.contains("SPECTRUM") {
            return "Charter/Spectrum Fiber Optic".to_string();
        }
        if owner_upper.contains("AT&T") {
            return if size.to_lowercase().contains("fiber") {
                "AT&T Fiber Optic Com".to_string()
            } else {
                "AT&T Telco Com".to_string()
            };
        }
        if owner_upper.contains("CPS") {
            return "CPS Supply Fiber".to_string();
        }
        return with_owner("Fiber Optic Com");
    }
    if usage == "COMMUNICATION_SERVICE" {
        if owner_upper.contains("AT&T") {
            return "AT&T Com Drop".to_string();
        }
        return with_owner("Com Drop");
    }
    if usage == "UTILITY_SERVICE" && owner_upper.contains("CPS") {
        return "CPS Secondary Drop Loop".to_string();
    }
    if usage.contains("STREET_LIGHT") {
        return with_owner("Street Light Drop");
    }
    if usage == "RISER_EQUIPMENT" || item.client_type() == Some("RISER") {
        return with_owner("Riser");
    }
    if usage == "ANCHOR_GUY_EQUIPMENT" || item.client_type() == Some("GUY_ASSEMBLY") {
        return with_owner("Guy");
    }

    if !owner.is_empty() && !size.is_empty() {
        return format!("{owner} {size}");
    }
    if !size.is_empty() {
        return size.to_string();
    }
    if !owner.is_empty() {
        return format!("{owner} Cable");
    }
    if !usage.is_empty() {
        return usage;
    }
    "Unknown Attachment".to_string()
}

/// The consolidated attachments of one pole, in insertion order so the
/// emitted report is byte-stable across runs.
#[derive(Debug, Default)]
pub struct ConsolidatedSet {
    entries: Vec<ConsolidatedAttachment>,
    index: HashMap<String, usize>,
    denied: bool,
}

impl ConsolidatedSet {
    pub fn entries(&self) -> &[ConsolidatedAttachment] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, key: String, entry: ConsolidatedAttachment) -> usize {
        let slot = self.entries.len();
        self.entries.push(entry);
        self.index.insert(key, slot);
        slot
    }

    fn fold_measured(&mut self, item: &SpidaAttachment) {
        let owner = item.owner().to_string();
        let description = describe_attachment(item);
        let key = attachment_key(&owner, &description);
        let (value, unit) = item.height();
        let height = to_feet_inches(value, unit);

        let slot = match self.index.get(&key) {
            Some(&slot) => slot,
            None => self.insert(
                key,
                ConsolidatedAttachment {
                    description,
                    owner,
                    source_ids: Vec::new(),
                    state: AttachmentState::MeasuredOnly,
                    measured_height: height.clone(),
                    recommended_height: NA.to_string(),
                    survey_height: NA.to_string(),
                    proposed_mid_span: NA.to_string(),
                },
            ),
        };
        let entry = &mut self.entries[slot];
        if let Some(id) = item.id() {
            entry.source_ids.push(id.to_string());
        }
        if entry.measured_height == NA && height != NA {
            entry.measured_height = height;
        }
    }

    fn fold_recommended(&mut self, item: &SpidaAttachment) {
        let owner = item.owner().to_string();
        let description = describe_attachment(item);
        let key = attachment_key(&owner, &description);
        let (value, unit) = item.height();
        let height = to_feet_inches(value, unit);

        let slot = match self.index.get(&key) {
            Some(&slot) => {
                let entry = &mut self.entries[slot];
                entry.recommended_height = height.clone();
                if entry.state == AttachmentState::MeasuredOnly {
                    // heights are compared as formatted strings: a move
                    // below display resolution is not a modification
                    entry.state = if height != NA && entry.measured_height != height {
                        AttachmentState::Modified
                    } else {
                        AttachmentState::Existing
                    };
                }
                slot
            }
            None => self.insert(
                key,
                ConsolidatedAttachment {
                    description,
                    owner,
                    source_ids: Vec::new(),
                    state: AttachmentState::RecommendedOnly,
                    measured_height: NA.to_string(),
                    recommended_height: height,
                    survey_height: NA.to_string(),
                    proposed_mid_span: NA.to_string(),
                },
            ),
        };
        if let Some(id) = item.id() {
            self.entries[slot].source_ids.push(id.to_string());
        }
    }

    /// Best-effort join of a survey measurement onto an existing entry:
    /// owner prefix plus the survey type token contained in the
    /// structural description. When several entries match, the last one
    /// in insertion order wins. Never creates entries; survey-only
    /// attachments with no structural counterpart are dropped.
    fn fold_survey(
        &mut self,
        attachment: &crate::sources::SurveyAttachment,
        mid_span_wires: &[MidSpanWire],
    ) {
        let owner = attachment.owner.to_uppercase();
        let token = attachment.kind.as_deref().map(str::to_lowercase);
        let slot = self.entries.iter().rposition(|entry| {
            entry.owner.to_uppercase() == owner
                && match &token {
                    Some(token) => entry.description.to_lowercase().contains(token),
                    None => true,
                }
        });
        let Some(slot) = slot else {
            log::debug!(
                "survey attachment {} ({:?}) has no structural counterpart, dropped",
                attachment.owner,
                attachment.kind
            );
            return;
        };

        let entry = &mut self.entries[slot];
        if let Some(feet) = attachment.height_feet {
            entry.survey_height = to_feet_inches(Some(feet), Some(Unit::Feet));
        }
        if let (Some(trace_id), Some(mr_move)) =
            (&attachment.trace_id, attachment.mr_move_inches)
        {
            if let Some(wire) = mid_span_wires.iter().find(|w| &w.trace_id == trace_id) {
                entry.proposed_mid_span =
                    feet_inches_from_inches(wire.measured_inches + mr_move);
            }
        }
    }

    /// Pole-level action derived from the entry states. A denied survey
    /// work type overrides whatever the designs imply.
    pub fn action(&self) -> AttachmentAction {
        if self.denied {
            return AttachmentAction::ExistingDenied;
        }
        if self
            .entries
            .iter()
            .any(|e| e.state == AttachmentState::RecommendedOnly)
        {
            return AttachmentAction::Installing;
        }
        if !self.entries.is_empty()
            && self
                .entries
                .iter()
                .all(|e| e.state == AttachmentState::MeasuredOnly)
        {
            return AttachmentAction::Removing;
        }
        AttachmentAction::Existing
    }
}

/// Runs the full consolidation for one matched pole.
pub fn consolidate<'a>(
    pole: &MatchedPole<'a>,
    survey: &KatapultDoc<'a>,
    config: &ReportConfig,
) -> ConsolidatedSet {
    let mut set = ConsolidatedSet::default();

    if let Some(design) = pole.spida.measured_design(config) {
        for item in design.attachment_items() {
            set.fold_measured(&item);
        }
    }
    if let Some(design) = pole.spida.recommended_design(config) {
        for item in design.attachment_items() {
            set.fold_recommended(&item);
        }
    }

    if let Some(node) = &pole.survey {
        let mid_span_wires = survey.mid_span_wires(node.id());
        for attachment in survey.node_attachments(node) {
            set.fold_survey(&attachment, &mid_span_wires);
        }
        set.denied = node.work_type().as_deref() == Some(config.denied_work_type.as_str());
    }

    set
}

/// Mid-span status for an attachment on a span: "UG" when the survey
/// connection routes underground or the description says so, else "NA".
pub fn mid_span_status(description: &str, connection: Option<&KatapultConnection>) -> String {
    if connection.is_some_and(|c| c.is_underground()) {
        return "UG".to_string();
    }
    let lower = description.to_lowercase();
    // "ug" must stand alone so "guy" never matches
    let mentions_ug = lower
        .split(|c: char| !c.is_ascii_alphanumeric())
        .any(|word| word == "ug");
    if lower.contains("underground") || mentions_ug {
        "UG".to_string()
    } else {
        NA.to_string()
    }
}

/// Header text for one span block: "Backspan" toward the previous pole,
/// else a compass reference like "Ref (North East) to PL123".
pub fn format_span_header(endpoint: Option<&WireEndPoint>) -> String {
    let Some(endpoint) = endpoint else {
        return "Primary Span".to_string();
    };
    if endpoint.is_previous_pole() {
        return "Backspan".to_string();
    }

    let direction = match endpoint.direction_degrees() {
        Some(degrees) => compass_direction(degrees).to_string(),
        None => endpoint
            .direction_raw()
            .unwrap_or("Unknown Direction")
            .to_string(),
    };
    let label = endpoint.structure_label().unwrap_or("Unknown Target");
    let label = if POLE_LABEL_PATTERN.is_match(label) {
        canonical_pole_id(label, PoleSource::Structural)
    } else {
        label.to_string()
    };
    format!("Ref ({direction}) to {label}")
}

/// Nearest 8-point compass direction for a bearing in degrees.
fn compass_direction(degrees: f64) -> &'static str {
    let normalized = degrees.rem_euclid(360.0);
    COMPASS[((normalized / 45.0).round() as usize) % 8]
}

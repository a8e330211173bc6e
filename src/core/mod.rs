//! Core data model for the make-ready report.
//!
//! The report is an abstract table: an ordered list of 15-column rows plus
//! a list of merge spans. Turning that into a spreadsheet file or an HTML
//! table is the job of an external collaborator; the JSON serialization of
//! these types is the hand-off contract.

pub mod errors;

use serde::Serialize;

pub use errors::{Error, Result};

/// Number of columns in the report (A through O).
pub const COLUMN_COUNT: usize = 15;

/// Column indices by report letter.
pub mod col {
    pub const OPERATION: usize = 0; // A
    pub const ACTION: usize = 1; // B
    pub const POLE_OWNER: usize = 2; // C
    pub const POLE_NUMBER: usize = 3; // D
    pub const POLE_STRUCTURE: usize = 4; // E
    pub const PROPOSED_RISER: usize = 5; // F
    pub const PROPOSED_GUY: usize = 6; // G
    pub const PLA: usize = 7; // H
    pub const CONSTRUCTION_GRADE: usize = 8; // I
    pub const LOWEST_COM: usize = 9; // J
    pub const LOWEST_ELECTRIC: usize = 10; // K
    pub const ATTACHER: usize = 11; // L
    pub const EXISTING_HEIGHT: usize = 12; // M
    pub const PROPOSED_HEIGHT: usize = 13; // N
    pub const MID_SPAN_PROPOSED: usize = 14; // O
}

/// Suggested column widths (characters) for the spreadsheet collaborator.
pub const COLUMN_WIDTHS: [u16; COLUMN_COUNT] =
    [10, 20, 15, 20, 25, 18, 18, 18, 18, 20, 20, 35, 15, 15, 20];

/// What a row represents within the report layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowRole {
    /// One of the three fixed header rows.
    ColumnHeader,
    /// First row of a pole block; carries the pole-level columns A-K.
    PoleHeader,
    /// A span header row within a pole block.
    SpanHeader,
    /// One consolidated attachment.
    Attachment,
    /// The "From Pole" trailer row.
    FromPole,
    /// The "To Pole" trailer row.
    ToPole,
    /// A "no attachments" filler row for an empty span.
    Placeholder,
}

/// One report row: a role tag plus exactly [`COLUMN_COUNT`] cells.
/// `None` renders as a blank cell; `Some("")` is an intentionally empty
/// value (e.g. the existing height of a brand-new attachment).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub role: RowRole,
    pub cells: Vec<Option<String>>,
}

impl ReportRow {
    pub fn empty(role: RowRole) -> Self {
        Self {
            role,
            cells: vec![None; COLUMN_COUNT],
        }
    }

    pub fn set(&mut self, column: usize, value: impl Into<String>) {
        self.cells[column] = Some(value.into());
    }
}

/// An inclusive rectangular merge region, in 0-based row/column indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MergeSpan {
    pub start_row: usize,
    pub start_col: usize,
    pub end_row: usize,
    pub end_col: usize,
}

impl MergeSpan {
    pub fn new(start_row: usize, start_col: usize, end_row: usize, end_col: usize) -> Self {
        Self {
            start_row,
            start_col,
            end_row,
            end_col,
        }
    }
}

/// The complete report handed to the rendering/export collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MakeReadyReport {
    pub rows: Vec<ReportRow>,
    pub merges: Vec<MergeSpan>,
    pub column_widths: Vec<u16>,
}

/// Lifecycle of a consolidated attachment across the two design states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentState {
    /// Present only in the as-measured design: slated for removal.
    MeasuredOnly,
    /// Present only in the as-recommended design: a new install.
    RecommendedOnly,
    /// Present in both designs at the same height.
    Existing,
    /// Present in both designs at different heights.
    Modified,
}

impl AttachmentState {
    /// Whether attachments in this state get their own report row.
    /// Removals are reflected in the pole action, not listed per span.
    pub fn is_reported(&self) -> bool {
        !matches!(self, Self::MeasuredOnly)
    }
}

/// One physical attachment merged across sources and design states.
/// Identity is (owner, type description) uppercased; no stable
/// cross-source attachment id exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsolidatedAttachment {
    pub description: String,
    pub owner: String,
    /// Ids of every structural item folded into this entry.
    pub source_ids: Vec<String>,
    pub state: AttachmentState,
    /// Formatted heights, "NA" when the source has no value.
    pub measured_height: String,
    pub recommended_height: String,
    pub survey_height: String,
    pub proposed_mid_span: String,
}

/// Pole-level attachment action derived from the consolidated states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentAction {
    Installing,
    Removing,
    Existing,
    /// Permit for the work was denied; the pole stays as-is.
    ExistingDenied,
}

impl AttachmentAction {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Installing => "Installing",
            Self::Removing => "Removing",
            Self::Existing => "Existing",
            Self::ExistingDenied => "Existing (Denied)",
        }
    }
}

impl std::fmt::Display for AttachmentAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

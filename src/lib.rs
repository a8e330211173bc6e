// Export modules for library usage
pub mod access;
pub mod aggregate;
pub mod cli;
pub mod config;
pub mod consolidate;
pub mod convert;
pub mod core;
pub mod ident;
pub mod io;
pub mod matcher;
pub mod report;
pub mod sources;
pub mod validate;

// Re-export commonly used types
pub use crate::core::{
    AttachmentAction, AttachmentState, ConsolidatedAttachment, Error, MakeReadyReport, MergeSpan,
    ReportRow, Result, RowRole,
};

pub use crate::config::ReportConfig;

pub use crate::consolidate::{consolidate, describe_attachment, format_span_header, ConsolidatedSet};

pub use crate::ident::{canonical_pole_id, PoleSource, UNKNOWN_POLE};

pub use crate::io::{create_writer, OutputFormat, ReportWriter};

pub use crate::matcher::{match_poles, MatchedPole, PoleIndex};

pub use crate::report::build_report;

pub use crate::validate::{check_structural, check_survey, InputValidation};

//! Read-only adapters over the two parsed JSON exports.
//!
//! Neither format is deserialized into rigid structs: both are
//! schema-optional in practice, so the adapters are thin typed views over
//! `serde_json::Value` built on the [`crate::access`] helpers.

pub mod katapult;
pub mod spida;

pub use katapult::{KatapultConnection, KatapultDoc, KatapultNode, SurveyAttachment};
pub use spida::{SpidaAttachment, SpidaDesign, SpidaDoc, SpidaPole, WireEndPoint};

//! Adapter over the field-survey (Katapult) export.
//!
//! Shape contract: top-level `nodes` (id -> node) and `connections`
//! (id -> edge), optionally `photos` and `traces.trace_data`. Node
//! attributes spread one logical value across provenance keys (the
//! user-asserted value first, then the imported one, then a computed
//! default); the precedence lists are declared once here.
//!
//! Attachment items appear in two shapes, depending on how the job was
//! collected: an `attachments` catalog keyed by id (sometimes nested
//! under `attributes`), or raw photo annotations under
//! `photofirst_data.wire` / `photofirst_data.equipment`. Both are
//! adapted into the same [`SurveyAttachment`] so consolidation is
//! written once.

use crate::access;
use serde_json::{Map, Value};

/// Candidate attribute paths for a node's pole number, in precedence
/// order.
const POLE_NUMBER_PATHS: [&str; 3] = [
    "attributes.PoleNumber.assessment",
    "attributes.PoleNumber.-Imported",
    "attributes.pole_tag.tagtext",
];

/// Provenance precedence for the pole owner.
const POLE_OWNER_PATHS: [&str; 2] = [
    "attributes.pole_owner.multi_added.0",
    "attributes.pole_owner.button_added",
];

/// Provenance precedence for the survey-reported passing capacity.
const PASSING_CAPACITY_PATHS: [&str; 2] = [
    "attributes.final_passing_capacity_%.assessment",
    "attributes.final_passing_capacity_%.auto_calced",
];

/// The whole survey document.
#[derive(Debug, Clone, Copy)]
pub struct KatapultDoc<'a> {
    root: &'a Value,
}

impl<'a> KatapultDoc<'a> {
    pub fn new(root: &'a Value) -> Self {
        Self { root }
    }

    /// All nodes in document order.
    pub fn nodes(&self) -> impl Iterator<Item = KatapultNode<'a>> + '_ {
        access::get_object(self.root, "nodes")
            .into_iter()
            .flat_map(|map| map.iter())
            .map(|(id, value)| KatapultNode { id, value })
    }

    pub fn node(&self, node_id: &str) -> Option<KatapultNode<'a>> {
        access::get_object(self.root, "nodes")?
            .get_key_value(node_id)
            .map(|(id, value)| KatapultNode { id, value })
    }

    /// All connections in document order.
    pub fn connections(&self) -> impl Iterator<Item = KatapultConnection<'a>> + '_ {
        access::get_object(self.root, "connections")
            .into_iter()
            .flat_map(|map| map.values())
            .map(KatapultConnection::new)
    }

    /// Cable metadata for a trace id, from `traces.trace_data`.
    pub fn trace(&self, trace_id: &str) -> Option<TraceInfo<'a>> {
        let value = access::get(self.root, "traces.trace_data")?.get(trace_id)?;
        Some(TraceInfo {
            company: access::get_str(value, "company"),
            cable_type: access::get_str(value, "cable_type"),
        })
    }

    /// Unified attachment items for a node, resolving trace metadata for
    /// the photo-annotation shape.
    pub fn node_attachments(&self, node: &KatapultNode<'a>) -> Vec<SurveyAttachment> {
        match node.attachment_source() {
            AttachmentSource::Catalog(items) => {
                items.values().map(catalog_attachment).collect()
            }
            AttachmentSource::PhotoFirst(photofirst) => ["wire", "equipment"]
                .iter()
                .filter_map(|kind| access::get_object(photofirst, kind))
                .flat_map(|map| map.values())
                .map(|item| self.photofirst_attachment(item))
                .collect(),
            AttachmentSource::None => Vec::new(),
        }
    }

    fn photofirst_attachment(&self, item: &Value) -> SurveyAttachment {
        let trace_id = access::get_str(item, "_trace").map(str::to_string);
        let trace = trace_id.as_deref().and_then(|id| self.trace(id));
        let measured_inches = access::get_f64(item, "_measured_height");
        SurveyAttachment {
            owner: trace
                .as_ref()
                .and_then(|t| t.company)
                .unwrap_or("Unknown")
                .to_string(),
            kind: trace.as_ref().and_then(|t| t.cable_type).map(str::to_string),
            height_feet: measured_inches.map(|inches| inches / 12.0),
            mr_move_inches: access::get_f64(item, "mr_move"),
            trace_id,
        }
    }

    /// Mid-span wire measurements reachable from a node: every
    /// photo-annotated wire on the sections of aerial-cable connections
    /// touching the node, as (trace id, measured height in inches).
    pub fn mid_span_wires(&self, node_id: &str) -> Vec<MidSpanWire> {
        let mut wires = Vec::new();
        for conn in self.connections() {
            if !conn.touches(node_id) || !conn.is_aerial_cable() {
                continue;
            }
            let Some(sections) = conn.sections() else {
                continue;
            };
            for section in sections.values() {
                let Some(photos) = access::get_object(section, "photos") else {
                    continue;
                };
                for (photo_key, photo_ref) in photos {
                    // section.photos holds either id -> details or key -> id
                    let photo_id = photo_ref.as_str().unwrap_or(photo_key);
                    let Some(annotated) =
                        access::get(self.root, "photos").and_then(|p| p.get(photo_id))
                    else {
                        continue;
                    };
                    let Some(section_wires) =
                        access::get_object(annotated, "photofirst_data.wire")
                    else {
                        continue;
                    };
                    for wire in section_wires.values() {
                        if let (Some(trace_id), Some(measured_inches)) = (
                            access::get_str(wire, "_trace"),
                            access::get_f64(wire, "_measured_height"),
                        ) {
                            wires.push(MidSpanWire {
                                trace_id: trace_id.to_string(),
                                measured_inches,
                            });
                        }
                    }
                }
            }
        }
        wires
    }
}

/// One surveyed node.
#[derive(Debug, Clone, Copy)]
pub struct KatapultNode<'a> {
    id: &'a str,
    value: &'a Value,
}

impl<'a> KatapultNode<'a> {
    pub fn id(&self) -> &'a str {
        self.id
    }

    /// Raw pole number via the precedence list. The winning value may be
    /// a string, a number, or a `{tagtext: ...}` object.
    pub fn pole_number(&self) -> Option<String> {
        let value = access::first_of(self.value, &POLE_NUMBER_PATHS)?;
        if let Some(tagtext) = access::get(value, "tagtext") {
            return access::as_display_string(tagtext);
        }
        access::as_display_string(value)
    }

    pub fn pole_owner(&self) -> Option<String> {
        access::first_of(self.value, &POLE_OWNER_PATHS)
            .and_then(access::as_display_string)
    }

    /// Survey-reported final passing capacity, the PLA fallback.
    pub fn passing_capacity(&self) -> Option<f64> {
        access::first_of(self.value, &PASSING_CAPACITY_PATHS).and_then(access::as_f64)
    }

    /// The survey work-type flag, lowercased ("denied" overrides the
    /// derived attachment action).
    pub fn work_type(&self) -> Option<String> {
        access::get_str(self.value, "attributes.kat_work_type.button_added")
            .map(str::to_lowercase)
    }

    /// Which attachment shape this node actually carries.
    pub fn attachment_source(&self) -> AttachmentSource<'a> {
        for path in ["attachments", "attributes.attachments"] {
            if let Some(items) = access::get_object(self.value, path) {
                if !items.is_empty() {
                    return AttachmentSource::Catalog(items);
                }
            }
        }
        if let Some(photofirst) = access::get(self.value, "photofirst_data") {
            return AttachmentSource::PhotoFirst(photofirst);
        }
        AttachmentSource::None
    }
}

/// The two shapes survey attachments come in.
#[derive(Debug, Clone, Copy)]
pub enum AttachmentSource<'a> {
    /// An `attachments` catalog keyed by attachment id.
    Catalog(&'a Map<String, Value>),
    /// Raw photo annotations under `photofirst_data`.
    PhotoFirst(&'a Value),
    None,
}

fn catalog_attachment(item: &Value) -> SurveyAttachment {
    let height_ft = access::get_f64(item, "attributes.height_ft.assessment");
    let height_in = access::get_f64(item, "attributes.height_in.assessment");
    SurveyAttachment {
        owner: access::get_str(item, "attributes.company_name.company_name")
            .unwrap_or("Unknown")
            .to_string(),
        kind: access::get_str(item, "attributes.attachment_type.button_added")
            .or_else(|| access::get_str(item, "attributes.cable_type.button_added"))
            .map(str::to_string),
        height_feet: height_ft.map(|ft| ft + height_in.unwrap_or(0.0) / 12.0),
        mr_move_inches: None,
        trace_id: None,
    }
}

/// One physically measured attachment, unified across both shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyAttachment {
    pub owner: String,
    /// Best available type token (attachment/cable type, or the trace's
    /// cable type), used for the best-effort match against structural
    /// descriptions.
    pub kind: Option<String>,
    /// Measured attachment height in decimal feet.
    pub height_feet: Option<f64>,
    /// Proposed make-ready move, in inches (photo-annotation shape only).
    pub mr_move_inches: Option<f64>,
    /// Links the item to mid-span photo measurements.
    pub trace_id: Option<String>,
}

/// Cable metadata attached to a trace id.
#[derive(Debug, Clone, Copy)]
pub struct TraceInfo<'a> {
    pub company: Option<&'a str>,
    pub cable_type: Option<&'a str>,
}

/// A (trace, measured height) pair found along a span.
#[derive(Debug, Clone, PartialEq)]
pub struct MidSpanWire {
    pub trace_id: String,
    pub measured_inches: f64,
}

/// One edge between two surveyed nodes.
#[derive(Debug, Clone, Copy)]
pub struct KatapultConnection<'a> {
    value: &'a Value,
}

impl<'a> KatapultConnection<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }

    pub fn touches(&self, node_id: &str) -> bool {
        self.other_end(node_id).is_some()
    }

    /// The opposite endpoint, when `node_id` is one of the two ends.
    pub fn other_end(&self, node_id: &str) -> Option<&'a str> {
        let node_1 = access::get_str(self.value, "node_id_1");
        let node_2 = access::get_str(self.value, "node_id_2");
        if node_1 == Some(node_id) {
            node_2
        } else if node_2 == Some(node_id) {
            node_1
        } else {
            None
        }
    }

    /// The connection's button/type flag ("underground_path", ...).
    pub fn button(&self) -> Option<&'a str> {
        access::get_str(self.value, "button")
    }

    pub fn is_underground(&self) -> bool {
        self.button()
            .is_some_and(|b| b.eq_ignore_ascii_case("underground_path"))
    }

    fn connection_type(&self) -> Option<&'a str> {
        access::get(self.value, "attributes.connection_type")
            .and_then(|attr| access::first_of(attr, &["button_added"]))
            .and_then(Value::as_str)
    }

    pub fn is_aerial_cable(&self) -> bool {
        self.connection_type() == Some("aerial cable")
    }

    fn sections(&self) -> Option<&'a Map<String, Value>> {
        access::get_object(self.value, "sections")
    }
}

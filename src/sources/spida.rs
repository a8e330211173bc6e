//! Adapter over the structural-analysis (SPIDAcalc) export.
//!
//! Shape contract: `leads[0].locations[]`, each location carrying a
//! `label` and a `designs[]` list. Each design holds a `structure` with
//! `wires`, `equipments`, `guys` and `wireEndPoints`, plus an `analysis`
//! list; the pole may also carry a top-level `analysis` list.

use crate::access;
use crate::config::ReportConfig;
use crate::convert::Unit;
use serde_json::Value;

static EMPTY: Vec<Value> = Vec::new();

fn matches_names(design: &Value, names: &[String]) -> bool {
    names.iter().any(|name| {
        access::get_str(design, "name") == Some(name)
            || access::get_str(design, "label") == Some(name)
    })
}

/// The whole structural document.
#[derive(Debug, Clone, Copy)]
pub struct SpidaDoc<'a> {
    root: &'a Value,
}

impl<'a> SpidaDoc<'a> {
    pub fn new(root: &'a Value) -> Self {
        Self { root }
    }

    /// All poles, in document order.
    pub fn poles(&self) -> impl Iterator<Item = SpidaPole<'a>> + '_ {
        access::get_array(self.root, "leads.0.locations")
            .unwrap_or(&EMPTY)
            .iter()
            .map(SpidaPole::new)
    }
}

/// One pole (a "location" in the export).
#[derive(Debug, Clone, Copy)]
pub struct SpidaPole<'a> {
    value: &'a Value,
}

impl<'a> SpidaPole<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }

    pub fn label(&self) -> &'a str {
        access::get_str(self.value, "label").unwrap_or_default()
    }

    fn designs(&self) -> &'a [Value] {
        access::get_array(self.value, "designs")
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn design_named(&self, names: &[String]) -> Option<SpidaDesign<'a>> {
        self.designs()
            .iter()
            .find(|d| matches_names(d, names))
            .map(SpidaDesign::new)
    }

    /// The as-measured design: matched by name, else the first design.
    /// The positional fallback never claims a design that is explicitly
    /// named as recommended (a recommended-only export has no measured
    /// state at all).
    pub fn measured_design(&self, config: &ReportConfig) -> Option<SpidaDesign<'a>> {
        if let Some(design) = self.design_named(&config.measured_design_names) {
            return Some(design);
        }
        let first = self.designs().first()?;
        if matches_names(first, &config.recommended_design_names) {
            return None;
        }
        Some(SpidaDesign::new(first))
    }

    /// The as-recommended design: matched by name, else the second design.
    pub fn recommended_design(&self, config: &ReportConfig) -> Option<SpidaDesign<'a>> {
        self.design_named(&config.recommended_design_names)
            .or_else(|| self.designs().get(1).map(SpidaDesign::new))
    }

    /// Pole-level analysis cases (fallback when the recommended design
    /// carries none).
    pub fn analyses(&self) -> &'a [Value] {
        access::get_array(self.value, "analysis")
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn owner_id(&self) -> Option<&'a str> {
        access::get_str(self.value, "structure.pole.owner.id")
    }

    /// Physical pole height as (value, unit); unit defaults to metres,
    /// which is what the export writes when omitted.
    pub fn height(&self) -> (Option<f64>, Option<Unit>) {
        let value = access::get_f64(self.value, "structure.pole.clientItem.height.value");
        let unit = access::get_str(self.value, "structure.pole.clientItem.height.unit")
            .map_or(Some(Unit::Metres), Unit::parse);
        (value, unit)
    }

    pub fn class_of_pole(&self) -> Option<&'a str> {
        access::get_str(self.value, "structure.pole.clientItem.classOfPole")
    }

    pub fn species(&self) -> Option<&'a str> {
        access::get_str(self.value, "structure.pole.clientItem.species")
    }
}

/// One named design state of a pole.
#[derive(Debug, Clone, Copy)]
pub struct SpidaDesign<'a> {
    value: &'a Value,
}

impl<'a> SpidaDesign<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }

    fn structure_list(&self, key: &str) -> &'a [Value] {
        access::get_array(self.value, &format!("structure.{key}"))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Wires followed by equipment, the order attachment items are folded
    /// during consolidation.
    pub fn attachment_items(&self) -> impl Iterator<Item = SpidaAttachment<'a>> + '_ {
        self.structure_list("wires")
            .iter()
            .chain(self.structure_list("equipments").iter())
            .map(SpidaAttachment::new)
    }

    pub fn equipments(&self) -> impl Iterator<Item = SpidaAttachment<'a>> + '_ {
        self.structure_list("equipments")
            .iter()
            .map(SpidaAttachment::new)
    }

    pub fn guy_count(&self) -> usize {
        self.structure_list("guys").len()
    }

    pub fn analyses(&self) -> &'a [Value] {
        access::get_array(self.value, "analysis")
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn wire_end_points(&self) -> impl Iterator<Item = WireEndPoint<'a>> + '_ {
        self.structure_list("wireEndPoints")
            .iter()
            .map(WireEndPoint::new)
    }

    pub fn has_wire_end_points(&self) -> bool {
        !self.structure_list("wireEndPoints").is_empty()
    }
}

/// One wire or equipment item within a design.
#[derive(Debug, Clone, Copy)]
pub struct SpidaAttachment<'a> {
    value: &'a Value,
}

impl<'a> SpidaAttachment<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }

    pub fn id(&self) -> Option<&'a str> {
        access::get_str(self.value, "id")
    }

    /// Owner id as recorded, when present. The classifier treats a
    /// missing owner as anonymous.
    pub fn owner_id(&self) -> Option<&'a str> {
        access::get_str(self.value, "owner.id")
    }

    /// Owner id with the consolidation default.
    pub fn owner(&self) -> &'a str {
        self.owner_id().unwrap_or("Unknown")
    }

    pub fn usage_group(&self) -> &'a str {
        access::get_str(self.value, "usageGroup").unwrap_or_default()
    }

    pub fn client_description(&self) -> Option<&'a str> {
        access::get_str(self.value, "clientItem.description")
    }

    pub fn client_size(&self) -> Option<&'a str> {
        access::get_str(self.value, "clientItem.size")
    }

    pub fn client_type(&self) -> Option<&'a str> {
        access::get_str(self.value, "clientItem.type")
    }

    /// Attachment height as (value, unit); unit defaults to metres.
    pub fn height(&self) -> (Option<f64>, Option<Unit>) {
        let value = access::get_f64(self.value, "attachmentHeight.value");
        let unit = access::get_str(self.value, "attachmentHeight.unit")
            .map_or(Some(Unit::Metres), Unit::parse);
        (value, unit)
    }
}

/// A span endpoint: a reference from this pole toward a neighbor.
#[derive(Debug, Clone, Copy)]
pub struct WireEndPoint<'a> {
    value: &'a Value,
}

impl<'a> WireEndPoint<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }

    pub fn kind(&self) -> Option<&'a str> {
        access::get_str(self.value, "type")
    }

    pub fn is_previous_pole(&self) -> bool {
        self.kind() == Some("PREVIOUS_POLE")
    }

    /// Compass bearing toward the neighbor, in degrees.
    pub fn direction_degrees(&self) -> Option<f64> {
        access::get_f64(self.value, "direction")
    }

    /// Raw direction field for the non-numeric fallback.
    pub fn direction_raw(&self) -> Option<&'a str> {
        access::get_str(self.value, "direction")
    }

    pub fn structure_label(&self) -> Option<&'a str> {
        access::get_str(self.value, "structureLabel")
    }

    /// Ids of the wires routed over this span.
    pub fn wire_ids(&self) -> impl Iterator<Item = &'a str> + '_ {
        access::get_array(self.value, "wires")
            .unwrap_or(&EMPTY)
            .iter()
            .filter_map(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pole_doc() -> Value {
        json!({
            "leads": [{"locations": [{
                "label": "1-PL100",
                "structure": {"pole": {
                    "owner": {"id": "CPS Energy"},
                    "clientItem": {
                        "height": {"value": 12.19, "unit": "METRE"},
                        "classOfPole": "4",
                        "species": "Southern Pine"
                    }
                }},
                "designs": [
                    {"label": "Measured Design", "structure": {"wires": [
                        {"id": "Wire#1", "owner": {"id": "ACME"}, "usageGroup": "NEUTRAL",
                         "attachmentHeight": {"value": 10.0, "unit": "METRE"}}
                    ]}},
                    {"label": "Recommended Design", "structure": {
                        "wires": [],
                        "equipments": [{"id": "Equip#1", "clientItem": {"type": "RISER"}}],
                        "guys": [{}, {}],
                        "wireEndPoints": [{"type": "NEXT_POLE", "direction": 90,
                                           "structureLabel": "1-PL101", "wires": ["Wire#1"]}]
                    }}
                ]
            }]}]
        })
    }

    #[test]
    fn designs_resolve_by_name() {
        let doc = pole_doc();
        let spida = SpidaDoc::new(&doc);
        let pole = spida.poles().next().unwrap();
        let config = ReportConfig::default();

        let measured = pole.measured_design(&config).unwrap();
        assert_eq!(measured.attachment_items().count(), 1);

        let recommended = pole.recommended_design(&config).unwrap();
        assert_eq!(recommended.guy_count(), 2);
        assert_eq!(recommended.equipments().count(), 1);
        let wep = recommended.wire_end_points().next().unwrap();
        assert_eq!(wep.structure_label(), Some("1-PL101"));
        assert_eq!(wep.wire_ids().collect::<Vec<_>>(), vec!["Wire#1"]);
    }

    #[test]
    fn designs_fall_back_positionally() {
        let doc = json!({"leads": [{"locations": [{
            "label": "x",
            "designs": [
                {"structure": {"wires": [{"id": "a"}]}},
                {"structure": {"wires": [{"id": "b"}]}}
            ]
        }]}]});
        let spida = SpidaDoc::new(&doc);
        let pole = spida.poles().next().unwrap();
        let config = ReportConfig::default();
        let measured = pole.measured_design(&config).unwrap();
        let recommended = pole.recommended_design(&config).unwrap();
        assert_eq!(measured.attachment_items().next().unwrap().id(), Some("a"));
        assert_eq!(
            recommended.attachment_items().next().unwrap().id(),
            Some("b")
        );
    }

    #[test]
    fn recommended_only_export_has_no_measured_design() {
        let doc = json!({"leads": [{"locations": [{
            "label": "1-PL100",
            "designs": [{"label": "Recommended Design", "structure": {"wires": [{"id": "a"}]}}]
        }]}]});
        let spida = SpidaDoc::new(&doc);
        let pole = spida.poles().next().unwrap();
        let config = ReportConfig::default();
        assert!(pole.measured_design(&config).is_none());
        assert!(pole.recommended_design(&config).is_some());
    }

    #[test]
    fn pole_attributes() {
        let doc = pole_doc();
        let spida = SpidaDoc::new(&doc);
        let pole = spida.poles().next().unwrap();
        assert_eq!(pole.owner_id(), Some("CPS Energy"));
        assert_eq!(pole.class_of_pole(), Some("4"));
        let (value, unit) = pole.height();
        assert_eq!(value, Some(12.19));
        assert_eq!(unit, Some(Unit::Metres));
    }
}

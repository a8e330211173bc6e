//! Up-front schema validation of both inputs.
//!
//! Schema problems are collected in full and reported together; a fatal
//! problem aborts the run before any rows are produced. Individual field
//! misses deeper in the documents are not validation concerns; they
//! degrade to "NA" cells.

use crate::access;
use crate::core::errors::{Error, Result};
use crate::sources::KatapultDoc;
use serde::Serialize;
use serde_json::Value;

/// Outcome of checking one input document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InputValidation {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// Survey only: nodes carrying a resolvable pole number.
    pub usable_nodes: usize,
}

impl InputValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Checks the structural export: `leads[0].locations[]` must exist and
/// every location needs a label and a designs array.
pub fn check_structural(root: &Value) -> InputValidation {
    let mut validation = InputValidation::default();

    if !root.is_object() {
        validation
            .errors
            .push("structural root must be an object".to_string());
        return validation;
    }
    if access::get_array(root, "leads").is_none() {
        validation
            .errors
            .push("missing or invalid leads array".to_string());
        return validation;
    }
    let Some(locations) = access::get_array(root, "leads.0.locations") else {
        validation
            .errors
            .push("missing or invalid locations array in first lead".to_string());
        return validation;
    };

    for (idx, location) in locations.iter().enumerate() {
        let label = access::get_str(location, "label");
        if label.is_none() {
            validation
                .errors
                .push(format!("location at index {idx} missing required field: label"));
        }
        if access::get_array(location, "designs").is_none() {
            validation.errors.push(format!(
                "location \"{}\" missing required field: designs array",
                label.map_or_else(|| idx.to_string(), str::to_string)
            ));
        }
    }

    validation
}

/// Checks the survey export: a non-empty `nodes` map with at least one
/// node carrying a pole number. Nodes without one are warnings; they are
/// excluded from matching, not fatal.
pub fn check_survey(root: &Value) -> InputValidation {
    let mut validation = InputValidation::default();

    if !root.is_object() {
        validation
            .errors
            .push("survey root must be an object".to_string());
        return validation;
    }
    if access::get_object(root, "nodes").is_none() {
        validation
            .errors
            .push("missing or invalid nodes object".to_string());
        return validation;
    }

    for node in KatapultDoc::new(root).nodes() {
        if node.pole_number().is_some() {
            validation.usable_nodes += 1;
        } else {
            validation.warnings.push(format!(
                "node {} has no pole number (will be skipped during processing)",
                node.id()
            ));
        }
    }
    if validation.usable_nodes == 0 {
        validation
            .errors
            .push("no usable nodes with pole numbers found".to_string());
    }

    validation
}

/// Fatal-on-error wrapper for the structural input.
pub fn validate_structural(root: &Value) -> Result<()> {
    let validation = check_structural(root);
    if validation.is_valid() {
        Ok(())
    } else {
        Err(Error::StructuralInput(validation.errors))
    }
}

/// Fatal-on-error wrapper for the survey input; surviving warnings are
/// logged.
pub fn validate_survey(root: &Value) -> Result<()> {
    let validation = check_survey(root);
    for warning in &validation.warnings {
        log::warn!("{warning}");
    }
    if validation.is_valid() {
        Ok(())
    } else {
        Err(Error::SurveyInput(validation.errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn structural_problems_are_aggregated() {
        let doc = json!({"leads": [{"locations": [
            {"designs": []},
            {"label": "1-PL2"}
        ]}]});
        let validation = check_structural(&doc);
        assert_eq!(validation.errors.len(), 2);
        assert!(validation.errors[0].contains("index 0"));
        assert!(validation.errors[1].contains("1-PL2"));
    }

    #[test]
    fn structural_missing_locations_is_fatal() {
        assert!(validate_structural(&json!({"leads": []})).is_err());
        assert!(validate_structural(&json!([1, 2])).is_err());
        assert!(validate_structural(&json!({"leads": [{"locations": []}]})).is_ok());
    }

    #[test]
    fn survey_counts_usable_nodes() {
        let doc = json!({"nodes": {
            "n1": {"attributes": {"PoleNumber": {"assessment": "PL1"}}},
            "n2": {"attributes": {}},
            "n3": {"attributes": {"pole_tag": {"tagtext": "PL3"}}}
        }});
        let validation = check_survey(&doc);
        assert!(validation.is_valid());
        assert_eq!(validation.usable_nodes, 2);
        assert_eq!(validation.warnings.len(), 1);
        assert!(validation.warnings[0].contains("n2"));
    }

    #[test]
    fn survey_without_usable_nodes_is_fatal() {
        let doc = json!({"nodes": {"n1": {"attributes": {}}}});
        assert!(validate_survey(&doc).is_err());
        assert!(validate_survey(&json!({})).is_err());
    }
}

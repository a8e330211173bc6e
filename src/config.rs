//! Report configuration.
//!
//! The utility-specific heuristics that would otherwise be buried in the
//! matching and aggregation code live here, loadable from a TOML file.

use crate::core::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Substring identifying the analysis case whose Pole/STRESS result
    /// supplies PLA% and construction grade.
    #[serde(default = "default_target_analysis_case")]
    pub target_analysis_case: String,

    /// An attachment owner containing any of these (case-insensitive)
    /// counts as the electric utility for the lowest-height partition.
    #[serde(default = "default_electric_owner_keywords")]
    pub electric_owner_keywords: Vec<String>,

    /// Design names identifying the as-measured state; falls back to the
    /// first design when none match.
    #[serde(default = "default_measured_design_names")]
    pub measured_design_names: Vec<String>,

    /// Design names identifying the as-recommended state; falls back to
    /// the second design when none match.
    #[serde(default = "default_recommended_design_names")]
    pub recommended_design_names: Vec<String>,

    /// Survey work-type value that forces the denied annotation on the
    /// pole's attachment action.
    #[serde(default = "default_denied_work_type")]
    pub denied_work_type: String,
}

fn default_target_analysis_case() -> String {
    "Light - Grade C".to_string()
}

fn default_electric_owner_keywords() -> Vec<String> {
    vec!["CPS".to_string(), "POWER".to_string()]
}

fn default_measured_design_names() -> Vec<String> {
    vec!["Measured Design".to_string()]
}

fn default_recommended_design_names() -> Vec<String> {
    vec!["Recommended Design".to_string()]
}

fn default_denied_work_type() -> String {
    "denied".to_string()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            target_analysis_case: default_target_analysis_case(),
            electric_owner_keywords: default_electric_owner_keywords(),
            measured_design_names: default_measured_design_names(),
            recommended_design_names: default_recommended_design_names(),
            denied_work_type: default_denied_work_type(),
        }
    }
}

impl ReportConfig {
    /// Loads configuration from a TOML file, or returns defaults when no
    /// path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            None => Ok(Self::default()),
            Some(path) => {
                let content = fs::read_to_string(path)?;
                let config: Self = toml::from_str(&content).map_err(|e| {
                    Error::Configuration(format!("{}: {e}", path.display()))
                })?;
                log::debug!("Loaded config from {}", path.display());
                Ok(config)
            }
        }
    }

    /// True when the owner name belongs to the electric utility.
    pub fn is_electric_owner(&self, owner: &str) -> bool {
        let owner = owner.to_uppercase();
        self.electric_owner_keywords
            .iter()
            .any(|kw| owner.contains(&kw.to_uppercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_complete() {
        let config = ReportConfig::default();
        assert_eq!(config.target_analysis_case, "Light - Grade C");
        assert!(config.is_electric_owner("CPS ENERGY"));
        assert!(config.is_electric_owner("Acme Power Co"));
        assert!(!config.is_electric_owner("Charter"));
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: ReportConfig =
            toml::from_str("target_analysis_case = \"Heavy - Grade B\"").unwrap();
        assert_eq!(config.target_analysis_case, "Heavy - Grade B");
        assert_eq!(config.measured_design_names, vec!["Measured Design"]);
    }
}

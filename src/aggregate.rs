//! Pole-level summary fields derived from a matched pole pair.

use crate::access;
use crate::config::ReportConfig;
use crate::convert::{format_percentage, format_yes_no_count, to_feet_inches, Unit, NA};
use crate::matcher::MatchedPole;
use crate::sources::KatapultDoc;
use serde_json::Value;

/// The pole-level columns A-K minus the operation number and action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoleSummary {
    pub owner: String,
    pub structure: String,
    pub proposed_riser: String,
    pub proposed_guy: String,
    pub pla: String,
    pub construction_grade: String,
    pub lowest_com: String,
    pub lowest_electric: String,
}

/// Computes every summary field for one matched pole.
pub fn summarize_pole<'a>(
    pole: &MatchedPole<'a>,
    survey: &KatapultDoc<'a>,
    config: &ReportConfig,
) -> PoleSummary {
    let recommended = pole.spida.recommended_design(config);

    let riser_count = recommended
        .map(|d| {
            d.equipments()
                .filter(|e| e.client_type() == Some("RISER"))
                .count()
        })
        .unwrap_or(0);
    let guy_count = recommended.map(|d| d.guy_count()).unwrap_or(0);

    let (pla, construction_grade) = pla_and_grade(pole, config);
    let (lowest_com, lowest_electric) = lowest_heights(pole, survey, config);

    PoleSummary {
        owner: pole_owner(pole),
        structure: structure_description(pole),
        proposed_riser: format_yes_no_count(riser_count as i64),
        proposed_guy: format_yes_no_count(guy_count as i64),
        pla,
        construction_grade,
        lowest_com,
        lowest_electric,
    }
}

/// Owner precedence: survey multi-value owner, survey single-value owner,
/// structural pole owner, NA.
fn pole_owner(pole: &MatchedPole) -> String {
    pole.survey
        .as_ref()
        .and_then(|node| node.pole_owner())
        .or_else(|| pole.spida.owner_id().map(str::to_string))
        .unwrap_or_else(|| NA.to_string())
}

/// `35'-0"-4 Southern Pine`: height, class and species where present.
fn structure_description(pole: &MatchedPole) -> String {
    let (value, unit) = pole.spida.height();
    if value.is_none() {
        return NA.to_string();
    }
    let mut structure = to_feet_inches(value, unit);
    if let Some(class) = pole.spida.class_of_pole() {
        structure.push('-');
        structure.push_str(class);
    }
    if let Some(species) = pole.spida.species() {
        structure.push(' ');
        structure.push_str(species);
    }
    structure
}

/// PLA% and construction grade from the structural analysis results,
/// falling back to the survey-reported passing capacity.
fn pla_and_grade(pole: &MatchedPole, config: &ReportConfig) -> (String, String) {
    let analysis = target_analysis(pole, config);

    let mut pla = NA.to_string();
    let mut grade = NA.to_string();
    if let Some(analysis) = analysis {
        let stress_actual = access::get_array(analysis, "results")
            .into_iter()
            .flatten()
            .find(|r| {
                access::get_str(r, "component") == Some("Pole")
                    && access::get_str(r, "analysisType") == Some("STRESS")
            })
            .and_then(|r| access::get(r, "actual"))
            .and_then(Value::as_f64);
        if let Some(actual) = stress_actual {
            pla = format_percentage(Some(actual));
        }
        if let Some(g) = access::get_str(analysis, "analysisCaseDetails.constructionGrade") {
            grade = g.to_string();
        }
    }

    if pla == NA {
        if let Some(capacity) = pole.survey.as_ref().and_then(|n| n.passing_capacity()) {
            pla = format_percentage(Some(capacity));
        }
    }

    (pla, grade)
}

/// Locates the analysis case supplying PLA and grade: the configured
/// target case within the recommended design, else the design's first
/// case, else a pole-level case preferring "Recommended", else the
/// pole's last case.
fn target_analysis<'a>(pole: &MatchedPole<'a>, config: &ReportConfig) -> Option<&'a Value> {
    let case_matches = |a: &Value| {
        access::get_str(a, "analysisCaseDetails.name")
            .is_some_and(|name| name.contains(&config.target_analysis_case))
            || access::get_str(a, "id")
                .is_some_and(|id| id.contains(&config.target_analysis_case))
    };

    if let Some(design) = pole.spida.recommended_design(config) {
        let analyses = design.analyses();
        if !analyses.is_empty() {
            return analyses.iter().find(|a| case_matches(a)).or(analyses.first());
        }
    }

    let pole_analyses = pole.spida.analyses();
    if pole_analyses.is_empty() {
        return None;
    }
    pole_analyses
        .iter()
        .find(|a| {
            access::get_str(a, "analysisCaseDetails.name")
                .is_some_and(|name| name.contains("Recommended"))
                || case_matches(a)
        })
        .or(pole_analyses.last())
}

/// Lowest survey attachment heights, partitioned into communications vs
/// electric by the owning company name.
fn lowest_heights<'a>(
    pole: &MatchedPole<'a>,
    survey: &KatapultDoc<'a>,
    config: &ReportConfig,
) -> (String, String) {
    let mut min_com: Option<f64> = None;
    let mut min_electric: Option<f64> = None;

    if let Some(node) = &pole.survey {
        for attachment in survey.node_attachments(node) {
            let Some(feet) = attachment.height_feet.filter(|f| *f > 0.0) else {
                continue;
            };
            let bucket = if config.is_electric_owner(&attachment.owner) {
                &mut min_electric
            } else {
                &mut min_com
            };
            *bucket = Some(bucket.map_or(feet, |m: f64| m.min(feet)));
        }
    }

    let render = |min: Option<f64>| to_feet_inches(min, Some(Unit::Feet));
    (render(min_com), render(min_electric))
}

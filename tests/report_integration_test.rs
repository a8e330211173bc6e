use makeready::config::ReportConfig;
use makeready::core::{col, RowRole};
use makeready::{build_report, AttachmentAction};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn single_pole_structural() -> Value {
    json!({"leads": [{"locations": [{
        "label": "1-PL100",
        "designs": [{
            "label": "Recommended Design",
            "structure": {"wires": [{
                "id": "Wire#1",
                "owner": {"id": "ACME"},
                "usageGroup": "NEUTRAL",
                "attachmentHeight": {"value": 10.0, "unit": "METRE"}
            }]}
        }]
    }]}]})
}

fn single_pole_survey() -> Value {
    json!({"nodes": {
        "n1": {"attributes": {"PoleNumber": {"assessment": "PL100"}}}
    }})
}

#[test]
fn recommended_only_pole_reports_an_install() {
    let config = ReportConfig::default();
    let report =
        build_report(&single_pole_structural(), &single_pole_survey(), &config).unwrap();

    // three header rows, then the pole block
    let pole_row = &report.rows[3];
    assert_eq!(pole_row.role, RowRole::PoleHeader);
    assert_eq!(pole_row.cells[col::OPERATION].as_deref(), Some("1"));
    assert_eq!(pole_row.cells[col::POLE_NUMBER].as_deref(), Some("PL100"));
    assert_eq!(
        pole_row.cells[col::ACTION].as_deref(),
        Some(AttachmentAction::Installing.label())
    );
    // no wire end points: the block opens with the default span header
    assert_eq!(pole_row.cells[col::ATTACHER].as_deref(), Some("Primary Span"));

    let attachment = &report.rows[4];
    assert_eq!(attachment.role, RowRole::Attachment);
    assert_eq!(attachment.cells[col::ATTACHER].as_deref(), Some("Neutral"));
    // new install: intentionally empty existing height
    assert_eq!(attachment.cells[col::EXISTING_HEIGHT].as_deref(), Some(""));
    // 10 m = 32.8084 ft
    assert_eq!(
        attachment.cells[col::PROPOSED_HEIGHT].as_deref(),
        Some("32'-10\"")
    );
    assert_eq!(
        attachment.cells[col::MID_SPAN_PROPOSED].as_deref(),
        Some("NA")
    );

    let from_pole = &report.rows[5];
    assert_eq!(from_pole.role, RowRole::FromPole);
    assert_eq!(from_pole.cells[col::EXISTING_HEIGHT].as_deref(), Some("PL100"));
    let to_pole = &report.rows[6];
    assert_eq!(to_pole.role, RowRole::ToPole);
    assert_eq!(to_pole.cells[col::EXISTING_HEIGHT].as_deref(), Some("NA"));
    assert_eq!(report.rows.len(), 7);
}

#[test]
fn consolidation_output_is_idempotent() {
    let structural = json!({"leads": [{"locations": [
        {
            "label": "1-PL1",
            "designs": [
                {"label": "Measured Design", "structure": {"wires": [
                    {"id": "w1", "owner": {"id": "ACME"}, "usageGroup": "NEUTRAL",
                     "attachmentHeight": {"value": 10.0, "unit": "METRE"}},
                    {"id": "w2", "owner": {"id": "Charter"}, "usageGroup": "COMMUNICATION_BUNDLE",
                     "attachmentHeight": {"value": 7.0, "unit": "METRE"}}
                ]}},
                {"label": "Recommended Design", "structure": {
                    "wires": [
                        {"id": "w3", "owner": {"id": "ACME"}, "usageGroup": "NEUTRAL",
                         "attachmentHeight": {"value": 10.0, "unit": "METRE"}},
                        {"id": "w4", "owner": {"id": "Charter"}, "usageGroup": "COMMUNICATION_BUNDLE",
                         "attachmentHeight": {"value": 7.5, "unit": "METRE"}}
                    ],
                    "wireEndPoints": [
                        {"type": "PREVIOUS_POLE", "direction": 180, "structureLabel": "1-PL0",
                         "wires": ["w3", "w4"]},
                        {"type": "NEXT_POLE", "direction": 45, "structureLabel": "1-PL2",
                         "wires": ["w4"]}
                    ]
                }}
            ]
        },
        {"label": "2-PL2", "designs": [
            {"label": "Measured Design", "structure": {}},
            {"label": "Recommended Design", "structure": {}}
        ]}
    ]}]});
    let survey = json!({"nodes": {
        "n1": {"attributes": {"PoleNumber": {"assessment": "PL1"}}},
        "n2": {"attributes": {"PoleNumber": {"assessment": "PL2"}}}
    }, "connections": {"c1": {"node_id_1": "n1", "node_id_2": "n2"}}});

    let config = ReportConfig::default();
    let first = build_report(&structural, &survey, &config).unwrap();
    let second = build_report(&structural, &survey, &config).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn attachments_land_under_their_spans() {
    let structural = json!({"leads": [{"locations": [{
        "label": "1-PL1",
        "designs": [
            {"label": "Measured Design", "structure": {}},
            {"label": "Recommended Design", "structure": {
                "wires": [
                    {"id": "w1", "owner": {"id": "ACME"}, "usageGroup": "NEUTRAL",
                     "attachmentHeight": {"value": 10.0, "unit": "METRE"}},
                    {"id": "w2", "owner": {"id": "Zayo"}, "usageGroup": "COMMUNICATIONS",
                     "attachmentHeight": {"value": 8.0, "unit": "METRE"}}
                ],
                "wireEndPoints": [
                    {"type": "PREVIOUS_POLE", "direction": 270, "structureLabel": "1-PL0",
                     "wires": ["w1"]},
                    {"type": "NEXT_POLE", "direction": 90, "structureLabel": "1-PL2",
                     "wires": []}
                ]
            }}
        ]
    }]}]});
    let survey = json!({"nodes": {
        "n1": {"attributes": {"PoleNumber": {"assessment": "PL1"}}}
    }});

    let config = ReportConfig::default();
    let report = build_report(&structural, &survey, &config).unwrap();
    let block: Vec<(RowRole, Option<&str>)> = report.rows[3..]
        .iter()
        .map(|r| (r.role, r.cells[col::ATTACHER].as_deref()))
        .collect();

    assert_eq!(
        block,
        vec![
            (RowRole::PoleHeader, Some("Backspan")),
            (RowRole::Attachment, Some("Neutral")),
            (RowRole::SpanHeader, Some("Ref (East) to PL2")),
            (RowRole::Placeholder, Some("No attachments on this span")),
            (RowRole::FromPole, Some("From Pole")),
            (RowRole::ToPole, Some("To Pole")),
        ]
    );

    // A-K merges cover every block row except the From/To trailer
    let block_merges: Vec<_> = report.merges.iter().filter(|m| m.start_row == 3).collect();
    assert_eq!(block_merges.len(), 11);
    assert!(block_merges.iter().all(|m| m.end_row == 6));
}

#[test]
fn unmatched_pole_degrades_to_structural_data() {
    let structural = json!({"leads": [{"locations": [{
        "label": "1-PL404",
        "structure": {"pole": {
            "owner": {"id": "CPS Energy"},
            "clientItem": {"height": {"value": 12.19, "unit": "METRE"}}
        }},
        "designs": [
            {"label": "Measured Design", "structure": {}},
            {"label": "Recommended Design", "structure": {}}
        ]
    }]}]});
    // the survey knows a different pole entirely
    let survey = json!({"nodes": {
        "n1": {"attributes": {"PoleNumber": {"assessment": "PL1"}}}
    }});

    let config = ReportConfig::default();
    let report = build_report(&structural, &survey, &config).unwrap();
    let pole_row = &report.rows[3];
    assert_eq!(pole_row.cells[col::POLE_NUMBER].as_deref(), Some("PL404"));
    assert_eq!(pole_row.cells[col::POLE_OWNER].as_deref(), Some("CPS Energy"));
    assert_eq!(pole_row.cells[col::LOWEST_COM].as_deref(), Some("NA"));
    assert_eq!(pole_row.cells[col::LOWEST_ELECTRIC].as_deref(), Some("NA"));
    assert_eq!(pole_row.cells[col::PLA].as_deref(), Some("NA"));
}

#[test]
fn every_row_has_fifteen_cells() {
    let config = ReportConfig::default();
    let report =
        build_report(&single_pole_structural(), &single_pole_survey(), &config).unwrap();
    assert!(report.rows.iter().all(|r| r.cells.len() == 15));
    assert_eq!(report.column_widths.len(), 15);
}

use campaign_lift_core::{
    build_report, build_report_with,
    config::{AnalysisConfig, CommerceSchema, DisplayMode, EventSchema},
    period::{DivisorPolicy, Period},
    table::{Cell, Table},
    Backend, LiftError,
};
use chrono::NaiveDate;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn valid_config() -> AnalysisConfig {
    AnalysisConfig {
        events:           EventSchema::new("Region"),
        commerce:         CommerceSchema::new("Region"),
        source_whitelist: vec!["google".to_string()],
        base_periods:     vec![Period::new("Base", day("2024-01-01"), day("2024-01-07")).unwrap()],
        campaign_periods: vec![Period::new("Campaign", day("2024-01-08"), day("2024-01-14")).unwrap()],
        regions:          vec!["East".to_string()],
        control_regions:  Vec::new(),
        campaign_policy:  DivisorPolicy::Average,
        display_mode:     DisplayMode::Separate,
    }
}

fn tables() -> (Table, Table) {
    let events = Table::new("events", &["Date", "Region", "Session source", "Sessions"])
        .with_row(vec![
            Cell::Date(day("2024-01-02")),
            Cell::text("East"),
            Cell::text("google"),
            Cell::Number(10.0),
        ]);
    let commerce = Table::new("commerce", &["Day", "Region", "Net sales"]);
    (events, commerce)
}

fn expect_config_error(cfg: &AnalysisConfig) {
    let (ev, co) = tables();
    match build_report(&ev, &co, cfg) {
        Err(LiftError::Config(_)) | Err(LiftError::InvalidPeriod { .. }) => {}
        other => panic!("expected configuration error, got {other:?}"),
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn empty_region_selection_is_rejected() {
    let mut cfg = valid_config();
    cfg.regions.clear();
    expect_config_error(&cfg);
}

#[test]
fn base_period_count_must_be_one_or_two() {
    let mut cfg = valid_config();
    cfg.base_periods.clear();
    expect_config_error(&cfg);

    let mut cfg = valid_config();
    let base = cfg.base_periods[0].clone();
    cfg.base_periods = vec![base.clone(), base.clone(), base];
    expect_config_error(&cfg);
}

#[test]
fn campaign_period_is_required() {
    let mut cfg = valid_config();
    cfg.campaign_periods.clear();
    expect_config_error(&cfg);
}

#[test]
fn inverted_period_is_rejected_before_aggregation() {
    let mut cfg = valid_config();
    // Deserialised periods bypass Period::new, so validate() must catch this.
    cfg.campaign_periods[0].start_date = day("2024-02-01");
    let (ev, co) = tables();
    assert!(matches!(
        build_report(&ev, &co, &cfg),
        Err(LiftError::InvalidPeriod { .. })
    ));
}

#[test]
fn blank_column_name_is_a_configuration_error() {
    let mut cfg = valid_config();
    cfg.events.source_column = "  ".to_string();
    expect_config_error(&cfg);
}

#[test]
fn configuration_errors_win_over_data_errors() {
    let mut cfg = valid_config();
    cfg.regions.clear();
    cfg.events.visits_column = "Visits".to_string();
    expect_config_error(&cfg);
}

#[test]
fn missing_column_fails_whole_build_on_both_backends() {
    let mut cfg = valid_config();
    cfg.commerce.revenue_column = "Gross sales".to_string();
    let (ev, co) = tables();

    for backend in [Backend::Memory, Backend::Sqlite] {
        match build_report_with(&ev, &co, &cfg, backend) {
            Err(LiftError::MissingColumn { table, column }) => {
                assert_eq!(table, "commerce");
                assert_eq!(column, "Gross sales");
            }
            other => panic!("{backend:?}: expected MissingColumn, got {other:?}"),
        }
    }
}

#[test]
fn config_loads_from_json_with_default_columns() {
    let json = r#"{
        "events":   { "region_column": "Region" },
        "commerce": { "region_column": "Shipping region" },
        "source_whitelist": ["google", "google.com"],
        "base_periods": [
            { "label": "Base week 25", "start_date": "2024-06-17", "end_date": "2024-06-23" },
            { "label": "Base week 26", "start_date": "2024-06-24", "end_date": "2024-06-30" }
        ],
        "campaign_periods": [
            { "label": "Campaign week 1", "start_date": "2024-07-01", "end_date": "2024-07-07" }
        ],
        "regions": ["North", "South"],
        "control_regions": ["South"],
        "campaign_policy": "sum",
        "display_mode": "combined"
    }"#;
    let path = std::env::temp_dir().join(format!("lift-config-{}.json", std::process::id()));
    std::fs::write(&path, json).unwrap();

    let cfg = AnalysisConfig::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(cfg.events.date_column, "Date");
    assert_eq!(cfg.events.source_column, "Session source");
    assert_eq!(cfg.events.visits_column, "Sessions");
    assert_eq!(cfg.commerce.date_column, "Day");
    assert_eq!(cfg.commerce.revenue_column, "Net sales");
    assert_eq!(cfg.campaign_policy, DivisorPolicy::Sum);
    assert_eq!(cfg.display_mode, DisplayMode::Combined);
    assert_eq!(cfg.base_periods[1].week_count(), 1);
}

#[test]
fn loading_an_invalid_config_fails() {
    let json = r#"{
        "events":   { "region_column": "Region" },
        "commerce": { "region_column": "Region" },
        "base_periods": [
            { "label": "Backwards", "start_date": "2024-06-23", "end_date": "2024-06-17" }
        ],
        "campaign_periods": [
            { "label": "Campaign", "start_date": "2024-07-01", "end_date": "2024-07-07" }
        ],
        "regions": ["North"]
    }"#;
    let path = std::env::temp_dir().join(format!("lift-bad-config-{}.json", std::process::id()));
    std::fs::write(&path, json).unwrap();

    let result = AnalysisConfig::load(&path);
    std::fs::remove_file(&path).ok();
    assert!(matches!(result, Err(LiftError::InvalidPeriod { .. })));
}

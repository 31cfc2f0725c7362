//! lift-runner: headless runner for the period comparison engine.
//!
//! Usage:
//!   lift-runner --config analysis.json --data snapshot.json
//!   lift-runner --config analysis.json --data snapshot.json --backend sqlite --out report.json
//!   lift-runner --demo-seed 42

use anyhow::{bail, Context, Result};
use campaign_lift_core::{
    build_report_with,
    report::{ComparisonCell, Report},
    sample::{demo_config, SampleDataset, SampleSpec},
    session::ReportBook,
    table::Table,
    AnalysisConfig, Backend,
};
use std::env;

/// A dataset snapshot file: both tables, already cleaned.
#[derive(serde::Deserialize)]
struct Snapshot {
    events:   Table,
    commerce: Table,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let backend = match flag_value(&args, "--backend").unwrap_or("memory") {
        "memory" => Backend::Memory,
        "sqlite" => Backend::Sqlite,
        other => bail!("unknown backend '{other}' (expected memory or sqlite)"),
    };
    let out = flag_value(&args, "--out");

    let (config, mut snapshot) = match parse_seed(flag_value(&args, "--demo-seed"))? {
        Some(seed) => {
            let spec = SampleSpec::default();
            let data = SampleDataset::generate(seed, &spec);
            let config = demo_config(&spec)?;
            (config, Snapshot { events: data.events, commerce: data.commerce })
        }
        None => {
            let config_path = flag_value(&args, "--config").context("--config is required")?;
            let data_path = flag_value(&args, "--data").context("--data is required")?;
            let config = AnalysisConfig::load(config_path)?;
            let content = std::fs::read_to_string(data_path)
                .with_context(|| format!("Cannot read {data_path}"))?;
            let snapshot: Snapshot = serde_json::from_str(&content)?;
            (config, snapshot)
        }
    };
    if snapshot.events.name.is_empty() {
        snapshot.events.name = "events".into();
    }
    if snapshot.commerce.name.is_empty() {
        snapshot.commerce.name = "commerce".into();
    }

    println!("Campaign lift: lift-runner");
    println!("  backend:   {backend:?}");
    println!("  events:    {} rows", snapshot.events.len());
    println!("  commerce:  {} rows", snapshot.commerce.len());
    println!();

    let report = build_report_with(&snapshot.events, &snapshot.commerce, &config, backend)?;
    print_report(&report);

    let mut book = ReportBook::new();
    let section_id = book.append(config, report);
    log::info!("report section {section_id} recorded");

    if let Some(path) = out {
        let section = book.latest().context("report book is empty")?;
        std::fs::write(path, serde_json::to_string_pretty(section)?)
            .with_context(|| format!("Cannot write {path}"))?;
        println!("\nreport written to {path}");
    }
    Ok(())
}

fn print_report(report: &Report) {
    println!("=== PERIODS ===");
    for p in &report.periods {
        println!(
            "  {:<24} {:?} {}..{}  {} days -> {} weeks, divisor {}",
            p.label, p.role, p.start_date, p.end_date, p.day_span, p.week_count, p.divisor
        );
    }

    for (i, summary) in report.summary.comparisons.iter().enumerate() {
        println!();
        println!("=== {} vs {} ===", summary.base_label, summary.campaign_label);
        println!(
            "  {:<16} {:>32} {:>32} {:>32}",
            "region", "total visits", "filtered visits", "revenue"
        );
        for row in &report.rows {
            let Some(c) = row.comparisons.get(i) else { continue };
            println!(
                "  {:<16} {:>32} {:>32} {:>32}",
                row.region,
                cell_text(&c.cells.total_visits),
                cell_text(&c.cells.filtered_visits),
                cell_text(&c.cells.revenue),
            );
        }
        println!(
            "  mean change (targets): visits {}, filtered {}, revenue {}",
            mean_text(summary.mean_change_total_visits),
            mean_text(summary.mean_change_filtered_visits),
            mean_text(summary.mean_change_revenue),
        );
    }
    println!();
    println!(
        "  target regions: {}  control regions: {}",
        report.summary.target_regions, report.summary.control_regions
    );
}

fn cell_text(cell: &ComparisonCell) -> String {
    format!("{:.0} -> {:.0} ({})", cell.base_value, cell.campaign_value, cell.change)
}

fn mean_text(mean: Option<f64>) -> String {
    mean.map(|m| format!("{m:+.1}%")).unwrap_or_else(|| "n/a".into())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_seed(raw: Option<&str>) -> Result<Option<u64>> {
    match raw {
        Some(v) => match v.parse() {
            Ok(seed) => Ok(Some(seed)),
            Err(_) => bail!("--demo-seed expects an unsigned integer, got '{v}'"),
        },
        None => Ok(None),
    }
}

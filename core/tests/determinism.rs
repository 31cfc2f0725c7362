//! Same inputs, same report: on every backend, on every run.

use campaign_lift_core::{
    build_report_with,
    report::Report,
    sample::{demo_config, SampleDataset, SampleSpec},
    session::ReportBook,
    store::SqliteSource,
    Backend,
};

fn demo_report(seed: u64, backend: Backend) -> Report {
    let spec = SampleSpec::default();
    let data = SampleDataset::generate(seed, &spec);
    let config = demo_config(&spec).expect("demo config");
    build_report_with(&data.events, &data.commerce, &config, backend).expect("build")
}

fn assert_reports_close(a: &Report, b: &Report) {
    assert_eq!(a.rows.len(), b.rows.len());
    for (ra, rb) in a.rows.iter().zip(&b.rows) {
        assert_eq!(ra.region, rb.region);
        for (ca, cb) in ra.comparisons.iter().zip(&rb.comparisons) {
            for (x, y) in [
                (&ca.cells.total_visits, &cb.cells.total_visits),
                (&ca.cells.filtered_visits, &cb.cells.filtered_visits),
                (&ca.cells.revenue, &cb.cells.revenue),
            ] {
                assert!((x.base_value - y.base_value).abs() < 1e-6, "{}", ra.region);
                assert!((x.campaign_value - y.campaign_value).abs() < 1e-6, "{}", ra.region);
            }
        }
    }
}

#[test]
fn same_seed_produces_identical_reports() {
    let _ = env_logger::builder().is_test(true).try_init();
    let a = demo_report(0xC0FF_EE, Backend::Memory);
    let b = demo_report(0xC0FF_EE, Backend::Memory);
    assert_eq!(a, b);
}

#[test]
fn different_seeds_produce_different_reports() {
    let a = demo_report(42, Backend::Memory);
    let b = demo_report(99, Backend::Memory);
    assert_ne!(a.rows, b.rows, "seed is not being used");
}

#[test]
fn sqlite_backend_agrees_with_memory_backend() {
    let memory = demo_report(7, Backend::Memory);
    let sqlite = demo_report(7, Backend::Sqlite);
    assert_reports_close(&memory, &sqlite);
    assert_eq!(memory.periods, sqlite.periods);
}

#[test]
fn demo_report_shape() {
    let report = demo_report(1, Backend::Memory);
    // 4 targets + control; 2 base × 2 campaign comparisons each.
    assert_eq!(report.rows.len(), 5);
    assert!(report.rows.iter().all(|r| r.comparisons.len() == 4));
    assert_eq!(report.control_row().map(|r| r.region.as_str()), Some("Control set"));
    assert_eq!(report.summary.comparisons.len(), 4);
}

#[test]
fn sqlite_snapshot_copies_every_row() {
    let spec = SampleSpec::default();
    let data = SampleDataset::generate(3, &spec);
    let config = demo_config(&spec).unwrap();
    let store = SqliteSource::load(
        &data.events,
        &config.events,
        &data.commerce,
        &config.commerce,
        &config.source_whitelist,
    )
    .unwrap();

    assert_eq!(store.traffic_row_count().unwrap(), data.events.len() as i64);
    assert_eq!(store.order_row_count().unwrap(), data.commerce.len() as i64);
}

#[test]
fn report_book_is_append_only_history() {
    let spec = SampleSpec::default();
    let config = demo_config(&spec).unwrap();
    let mut book = ReportBook::new();

    let first = book.append(config.clone(), demo_report(1, Backend::Memory));
    let second = book.append(config, demo_report(2, Backend::Memory));

    assert_eq!(book.len(), 2);
    assert_ne!(first, second);
    assert_eq!(book.latest().map(|s| s.section_id), Some(second));
    assert_eq!(book.get(&first).map(|s| s.report.rows.len()), Some(5));
}

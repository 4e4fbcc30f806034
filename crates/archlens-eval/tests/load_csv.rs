use std::path::{Path, PathBuf};

use archlens_core::{ColumnKind, Error as TableError, Value};
use archlens_eval::{
    EngineConfig, EvalError, LoadError, QualityLevel, compute_report, load_table_csv,
    load_table_from_reader,
};
use chrono::NaiveDate;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn config() -> EngineConfig {
    EngineConfig::for_date(NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date"))
}

#[test]
fn sample_inventory_loads_with_inferred_kinds() {
    let table = load_table_csv(&fixture("sample_inventory.csv")).expect("load sample");

    assert_eq!(table.row_count(), 6);
    assert_eq!(table.column_count(), 16);

    let kind = |name: &str| table.column(name).map(|column| column.kind);
    assert_eq!(kind("Application_Name"), Some(ColumnKind::Categorical));
    assert_eq!(kind("Maintenance_Cost"), Some(ColumnKind::Numeric));
    assert_eq!(kind("Availability_Percentage"), Some(ColumnKind::Numeric));
    assert_eq!(kind("Last_Updated"), Some(ColumnKind::Date));

    let maintenance = table
        .numeric("Maintenance_Cost")
        .expect("numeric column")
        .expect("present column");
    assert_eq!(maintenance[5], None);
    assert_eq!(
        table.row(0).map(|row| row[0].clone()),
        Some(Value::Text("CRM Suite".to_string()))
    );
}

#[test]
fn sample_inventory_report() {
    let table = load_table_csv(&fixture("sample_inventory.csv")).expect("load sample");
    let report = compute_report(&table, &config()).expect("report");

    assert_eq!(report.structural.missing_cells, 2);
    assert_eq!(report.structural.duplicate_rows, 0);
    assert!((report.structural.completeness_pct - 94.0 / 96.0 * 100.0).abs() < 1e-9);
    assert_eq!(report.quality.consistency, 100.0);
    assert_eq!(report.quality.accuracy, 100.0);
    assert_eq!(report.quality.level, QualityLevel::Excellent);

    let business = report.business.expect("business section");
    let costs = business.costs.expect("costs");
    assert_eq!(costs.maintenance_total, Some(82_500.0));
    assert_eq!(costs.development_total, Some(340_000.0));

    let names = business
        .top_expensive
        .expect("top ranking")
        .into_iter()
        .map(|app| app.display_name())
        .collect::<Vec<_>>();
    assert_eq!(
        names,
        vec!["Data Lake", "Billing Engine", "CRM Suite", "HR Portal", "Intranet"]
    );

    let risk = business.risk.expect("risk");
    assert_eq!(risk.high_or_critical, 3);
    assert_eq!(risk.high_or_critical_pct, 50.0);

    let security = report.security.expect("security section");
    assert_eq!(security.compliance.expect("compliance").non_compliant, 2);
    assert_eq!(security.security_score.expect("score").flagged, 3);
    assert_eq!(security.vulnerabilities.expect("vulns").flagged, 3);

    let performance = report.performance.expect("performance section");
    assert_eq!(performance.performance_score.expect("score").flagged, 2);
    assert_eq!(performance.availability.expect("availability").flagged, 2);

    let correlation = report.charts.correlation.expect("correlation");
    assert_eq!(correlation.columns.len(), 10);
    assert_eq!(correlation.observations, 5);
}

#[test]
fn ragged_rows_fail_to_load() {
    let err = load_table_csv(&fixture("malformed_rows.csv")).expect_err("ragged csv");
    assert!(matches!(err, LoadError::Csv(_)));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = load_table_csv(&fixture("does_not_exist.csv")).expect_err("missing file");
    assert!(matches!(err, LoadError::Io(_)));
}

#[test]
fn empty_input_has_no_header() {
    let err = load_table_from_reader("".as_bytes()).expect_err("empty input");
    assert!(matches!(err, LoadError::MissingHeader));
}

#[test]
fn duplicate_headers_are_rejected() {
    let input = "Application_Name,Application_Name\nCRM,ERP\n";
    let err = load_table_from_reader(input.as_bytes()).expect_err("duplicate header");
    assert!(matches!(
        err,
        LoadError::Table(TableError::DuplicateColumn(ref name)) if name == "Application_Name"
    ));
}

#[test]
fn header_only_input_yields_empty_table() {
    let input = "Application_Name,Maintenance_Cost\n";
    let table = load_table_from_reader(input.as_bytes()).expect("header only");

    assert_eq!(table.row_count(), 0);
    assert_eq!(table.column_count(), 2);
    let report = compute_report(&table, &config()).expect("report");
    assert_eq!(report.structural.completeness_pct, 0.0);
    assert!(report.business.is_none());
}

#[test]
fn text_scores_surface_as_malformed_table() {
    let table = load_table_csv(&fixture("mixed_kinds.csv")).expect("load mixed kinds");
    assert_eq!(
        table.column("Security_Score").map(|column| column.kind),
        Some(ColumnKind::Categorical)
    );

    let err = compute_report(&table, &config()).expect_err("text scores");
    assert!(matches!(
        err,
        EvalError::MalformedTable(TableError::NonNumericColumn { ref column, .. })
            if column == "Security_Score"
    ));
}

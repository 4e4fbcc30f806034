use archlens_core::{Column, Error as TableError, Table};
use archlens_eval::{
    EngineConfig, EvalError, MetricsEngine, QualityIssueKind, QualityLevel, compute_report,
};
use chrono::NaiveDate;

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date")
}

fn config() -> EngineConfig {
    EngineConfig::for_date(as_of())
}

fn approx(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn cost_sums_and_top_ranking() {
    let table = Table::new(vec![
        Column::categorical("Application_Name", ["CRM", "ERP", "HR Portal"]),
        Column::numeric("Maintenance_Cost", [100.0, 200.0, 300.0]),
        Column::numeric("Development_Cost", [50.0, 50.0, 50.0]),
    ])
    .expect("valid table");
    let config = EngineConfig {
        top_n_expensive: 2,
        ..config()
    };

    let report = compute_report(&table, &config).expect("report");
    let business = report.business.expect("business section");

    let costs = business.costs.expect("cost summary");
    assert_eq!(costs.maintenance_total, Some(600.0));
    assert_eq!(costs.development_total, Some(150.0));
    assert_eq!(costs.total, Some(750.0));

    let top = business.top_expensive.expect("top ranking");
    let totals = top.iter().map(|app| app.total_cost).collect::<Vec<_>>();
    assert_eq!(totals, vec![350.0, 250.0]);
    assert_eq!(top[0].row, 2);
    assert_eq!(top[0].name.as_deref(), Some("HR Portal"));
    assert_eq!(top[1].row, 1);

    assert!(business.criticality.is_none());
    assert!(business.risk.is_none());
}

#[test]
fn equal_costs_keep_table_order() {
    let table = Table::new(vec![
        Column::numeric("Maintenance_Cost", [100.0, 200.0, 100.0, 200.0]),
        Column::numeric("Development_Cost", [0.0, 0.0, 0.0, 0.0]),
    ])
    .expect("valid table");

    let report = compute_report(&table, &config()).expect("report");
    let rows = report
        .business
        .and_then(|business| business.top_expensive)
        .expect("top ranking")
        .iter()
        .map(|app| app.row)
        .collect::<Vec<_>>();

    assert_eq!(rows, vec![1, 3, 0, 2]);
}

#[test]
fn out_of_range_security_score_lowers_accuracy() {
    let table = Table::new(vec![Column::numeric("Security_Score", [150.0])]).expect("valid table");

    let report = compute_report(&table, &config()).expect("report");

    approx(report.quality.accuracy, 90.0);
    approx(report.quality.consistency, 100.0);
    approx(report.quality.completeness, 100.0);
    approx(report.quality.overall, (100.0 + 100.0 + 90.0) / 3.0);
    assert_eq!(report.quality.level, QualityLevel::Excellent);
    assert_eq!(report.quality.issues.len(), 1);
    assert_eq!(report.quality.issues[0].kind, QualityIssueKind::OutOfRange);
    assert_eq!(report.quality.issues[0].rows, 1);
}

#[test]
fn empty_table_has_zero_completeness_and_no_sections() {
    for table in [
        Table::empty(),
        Table::new(vec![
            Column::numeric("Maintenance_Cost", Vec::<f64>::new()),
            Column::categorical("Risk_Level", Vec::<&str>::new()),
        ])
        .expect("valid table"),
    ] {
        let report = compute_report(&table, &config()).expect("report");

        assert_eq!(report.structural.rows, 0);
        assert_eq!(report.structural.missing_cells, 0);
        approx(report.structural.completeness_pct, 0.0);
        approx(report.quality.completeness, 0.0);
        assert!(report.business.is_none());
        assert!(report.security.is_none());
        assert!(report.performance.is_none());
        assert!(report.charts.departments.is_none());
        assert!(report.charts.cost_histogram.is_none());
    }
}

#[test]
fn high_and_critical_risk_share() {
    let table = Table::new(vec![Column::categorical(
        "Risk_Level",
        ["High", "Critical", "Low", "High"],
    )])
    .expect("valid table");

    let report = compute_report(&table, &config()).expect("report");
    let risk = report
        .business
        .and_then(|business| business.risk)
        .expect("risk summary");

    assert_eq!(risk.high_or_critical, 3);
    approx(risk.high_or_critical_pct, 75.0);
    assert_eq!(risk.distribution.count("High"), 2);
    assert_eq!(risk.distribution.count("Low"), 1);
    assert_eq!(risk.distribution.entries[0].label, "High");
}

#[test]
fn risk_labels_match_exactly() {
    let table = Table::new(vec![Column::categorical(
        "Risk_Level",
        ["high", "CRITICAL", "Severe", "High"],
    )])
    .expect("valid table");

    let report = compute_report(&table, &config()).expect("report");
    let risk = report
        .business
        .and_then(|business| business.risk)
        .expect("risk summary");

    assert_eq!(risk.high_or_critical, 1);
    assert_eq!(risk.distribution.entries.len(), 4);
}

#[test]
fn threshold_comparisons_are_strict() {
    let table = Table::new(vec![
        Column::numeric("Security_Score", [80.0, 79.9, 95.0]),
        Column::numeric("Vulnerability_Count", [5.0, 6.0, 0.0]),
        Column::numeric("Performance_Score", [70.0, 69.0, 100.0]),
        Column::numeric("Availability_Percentage", [99.0, 98.9, 99.99]),
        Column::categorical(
            "Compliance_Status",
            ["Compliant", "Non-Compliant", "non-compliant"],
        ),
    ])
    .expect("valid table");

    let report = compute_report(&table, &config()).expect("report");
    let security = report.security.expect("security section");
    let performance = report.performance.expect("performance section");

    assert_eq!(security.security_score.expect("score").flagged, 1);
    assert_eq!(security.vulnerabilities.expect("vulns").flagged, 1);
    let compliance = security.compliance.expect("compliance");
    assert_eq!(compliance.non_compliant, 1);

    let score = performance.performance_score.expect("performance score");
    assert_eq!(score.flagged, 1);
    approx(score.average.expect("average"), (70.0 + 69.0 + 100.0) / 3.0);
    assert_eq!(performance.availability.expect("availability").flagged, 1);
}

#[test]
fn absent_columns_leave_sections_out() {
    let table = Table::new(vec![
        Column::categorical("Application_Name", ["CRM", "ERP"]),
        Column::numeric("User_Count", [10.0, 20.0]),
    ])
    .expect("valid table");

    let report = compute_report(&table, &config()).expect("report");

    assert!(report.business.is_none());
    assert!(report.security.is_none());
    assert!(report.performance.is_none());
    assert!(report.charts.correlation.is_none());
    approx(report.quality.consistency, 100.0);
    approx(report.quality.accuracy, 100.0);
}

#[test]
fn only_maintenance_cost_yields_partial_costs() {
    let table = Table::new(vec![Column::numeric(
        "Maintenance_Cost",
        [Some(10.0), None, Some(5.5)],
    )])
    .expect("valid table");

    let report = compute_report(&table, &config()).expect("report");
    let business = report.business.expect("business section");
    let costs = business.costs.expect("cost summary");

    assert_eq!(costs.maintenance_total, Some(15.5));
    assert_eq!(costs.development_total, None);
    assert_eq!(costs.total, None);
    assert!(business.top_expensive.is_none());
}

#[test]
fn negative_values_and_future_dates_lower_consistency() {
    let table = Table::new(vec![
        Column::numeric("Maintenance_Cost", [-10.0, 20.0, 30.0, 40.0]),
        Column::numeric("User_Count", [-1.0, -2.0, 3.0, 4.0]),
        Column::dates(
            "Last_Updated",
            [
                NaiveDate::from_ymd_opt(2024, 1, 1),
                NaiveDate::from_ymd_opt(2030, 1, 1),
                None,
                NaiveDate::from_ymd_opt(2024, 6, 1),
            ],
        ),
    ])
    .expect("valid table");

    let report = compute_report(&table, &config()).expect("report");

    // 100 - 1/4*10 - 2/4*10 - 1/4*10
    approx(report.quality.consistency, 90.0);
    let kinds = report
        .quality
        .issues
        .iter()
        .map(|issue| issue.kind)
        .collect::<Vec<_>>();
    assert_eq!(
        kinds,
        vec![
            QualityIssueKind::NegativeValues,
            QualityIssueKind::NegativeValues,
            QualityIssueKind::FutureDated,
        ]
    );
}

#[test]
fn unparsable_last_updated_applies_flat_penalty() {
    let table = Table::new(vec![Column::categorical(
        "Last_Updated",
        ["2024-01-01", "soon", "later"],
    )])
    .expect("valid table");

    let report = compute_report(&table, &config()).expect("report");

    approx(report.quality.consistency, 95.0);
    assert_eq!(report.quality.issues[0].kind, QualityIssueKind::UnparsableDates);
    assert_eq!(report.quality.issues[0].rows, 2);
}

#[test]
fn consistency_and_accuracy_are_floored_at_zero() {
    let table = Table::new(vec![
        Column::numeric("Maintenance_Cost", [-1.0, -2.0]),
        Column::numeric("Development_Cost", [-1.0, -2.0]),
        Column::numeric("User_Count", [-1.0, -2.0]),
        Column::numeric("Data_Volume", [-1.0, -2.0]),
        Column::numeric("Security_Score", [-50.0, 500.0]),
        Column::numeric("Performance_Score", [101.0, -1.0]),
        Column::numeric("Availability_Percentage", [250.0, -3.0]),
    ])
    .expect("valid table");
    let config = EngineConfig {
        penalty_weight: 1_000.0,
        ..config()
    };

    let report = compute_report(&table, &config).expect("report");

    approx(report.quality.consistency, 0.0);
    approx(report.quality.accuracy, 0.0);
    approx(report.quality.overall, 100.0 / 3.0);
    assert_eq!(report.quality.level, QualityLevel::NeedsImprovement);
}

#[test]
fn non_numeric_monitored_column_is_malformed() {
    let table = Table::new(vec![Column::categorical(
        "Maintenance_Cost",
        ["cheap", "expensive"],
    )])
    .expect("valid table");

    let err = compute_report(&table, &config()).expect_err("text costs must fail");

    match err {
        EvalError::MalformedTable(TableError::NonNumericColumn { column, .. }) => {
            assert_eq!(column, "Maintenance_Cost");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn invalid_config_is_rejected() {
    let table = Table::new(vec![Column::numeric("Security_Score", [50.0])]).expect("valid table");
    let config = EngineConfig {
        score_histogram_bins: 0,
        ..config()
    };

    let err = MetricsEngine::new(config)
        .compute(&table)
        .expect_err("zero bins must fail");

    assert!(matches!(err, EvalError::InvalidConfig(_)));
}

#[test]
fn duplicate_rows_and_missing_cells_are_counted() {
    let table = Table::new(vec![
        Column::categorical("Application_Name", [Some("CRM"), Some("CRM"), None, None]),
        Column::numeric("User_Count", [Some(10.0), Some(10.0), None, None]),
    ])
    .expect("valid table");

    let report = compute_report(&table, &config()).expect("report");

    assert_eq!(report.structural.duplicate_rows, 2);
    assert_eq!(report.structural.missing_cells, 4);
    approx(report.structural.completeness_pct, 50.0);
    assert_eq!(report.structural.column_missing[0].missing, 2);
    approx(report.structural.column_missing[1].missing_pct, 50.0);
}

#[test]
fn signed_zero_rows_are_duplicates() {
    let table = Table::new(vec![
        Column::categorical("Application_Name", ["Batch", "Batch"]),
        Column::numeric("Vulnerability_Count", [0.0, -0.0]),
    ])
    .expect("valid table");

    let report = compute_report(&table, &config()).expect("report");

    assert_eq!(report.structural.duplicate_rows, 1);
}

#[test]
fn chart_data_follows_configured_bins() {
    let table = Table::new(vec![
        Column::numeric("Maintenance_Cost", [100.0, 200.0, 300.0, 400.0]),
        Column::numeric("Development_Cost", [10.0, 30.0, 20.0, 40.0]),
        Column::numeric("Security_Score", [60.0, 70.0, 80.0, 90.0]),
        Column::categorical("Owner_Department", ["IT", "HR", "IT", "Finance"]),
    ])
    .expect("valid table");

    let report = compute_report(&table, &config()).expect("report");
    let charts = report.charts;

    let cost = charts.cost_histogram.expect("cost histogram");
    assert_eq!(cost.bins.len(), 8);
    assert_eq!(cost.bins.iter().map(|bin| bin.count).sum::<usize>(), 4);
    assert_eq!(charts.security_histogram.expect("security").bins.len(), 12);
    assert!(charts.performance_histogram.is_none());

    let departments = charts.departments.expect("departments");
    assert_eq!(departments.entries[0].label, "IT");
    assert_eq!(departments.entries[0].count, 2);

    let correlation = charts.correlation.expect("correlation");
    assert_eq!(correlation.observations, 4);
    assert_eq!(correlation.columns.len(), 3);
    approx(
        correlation
            .get("Maintenance_Cost", "Maintenance_Cost")
            .expect("diagonal"),
        1.0,
    );
}

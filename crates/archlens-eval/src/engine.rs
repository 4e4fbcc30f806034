use std::collections::{BTreeMap, HashSet};

use archlens_core::columns::{
    APPLICATION_NAME, AVAILABILITY_PERCENTAGE, BUSINESS_CRITICALITY, COMPLIANCE_STATUS,
    DEVELOPMENT_COST, HIGH_RISK_LABELS, MAINTENANCE_COST, NON_COMPLIANT_LABEL, PERFORMANCE_SCORE,
    RISK_LEVEL, SECURITY_SCORE, VULNERABILITY_COUNT,
};
use archlens_core::{ColumnKind, Table};

use crate::charts::collect_chart_data;
use crate::config::EngineConfig;
use crate::errors::EvalError;
use crate::metrics::{
    BusinessMetrics, ColumnMissing, ComplianceSummary, CostSummary, ExpensiveApplication,
    KindCount, METRICS_VERSION, MetricsReport, PerformanceMetrics, RiskSummary, SecurityMetrics,
    StructuralStats, ThresholdRule, ThresholdSummary,
};
use crate::quality::score_quality;
use crate::stats::{distribution, mean, percentage, sum};

/// Compute inventory metrics from an in-memory table.
///
/// The engine holds only its configuration and never mutates the table, so
/// one instance can be shared across threads and reused for any number of
/// tables.
#[derive(Debug, Clone, Default)]
pub struct MetricsEngine {
    config: EngineConfig,
}

impl MetricsEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn compute(&self, table: &Table) -> Result<MetricsReport, EvalError> {
        self.config.validate()?;

        let structural = structural_stats(table);
        let quality = score_quality(table, &self.config, structural.completeness_pct)?;

        let (business, security, performance) = if table.row_count() == 0 {
            (None, None, None)
        } else {
            (
                business_metrics(table, &self.config)?,
                security_metrics(table, &self.config)?,
                performance_metrics(table, &self.config)?,
            )
        };
        let charts = collect_chart_data(table, &self.config)?;

        tracing::debug!(
            event = "report_computed",
            rows = structural.rows,
            columns = structural.columns,
            business = business.is_some(),
            security = security.is_some(),
            performance = performance.is_some(),
            overall_quality = quality.overall
        );

        Ok(MetricsReport {
            metrics_version: METRICS_VERSION.to_string(),
            structural,
            quality,
            business,
            security,
            performance,
            charts,
        })
    }
}

/// Compute a report with the given configuration.
pub fn compute_report(table: &Table, config: &EngineConfig) -> Result<MetricsReport, EvalError> {
    MetricsEngine::new(config.clone()).compute(table)
}

fn structural_stats(table: &Table) -> StructuralStats {
    let rows = table.row_count();
    let columns = table.column_count();

    let column_missing = table
        .columns()
        .iter()
        .map(|column| {
            let missing = column.null_count();
            ColumnMissing {
                column: column.name.clone(),
                kind: column.kind,
                missing,
                missing_pct: percentage(missing, rows),
            }
        })
        .collect::<Vec<_>>();
    let missing_cells = column_missing.iter().map(|entry| entry.missing).sum::<usize>();

    let cells = rows * columns;
    let completeness_pct = if cells == 0 {
        0.0
    } else {
        (cells - missing_cells) as f64 / cells as f64 * 100.0
    };

    let mut kinds: BTreeMap<ColumnKind, usize> = BTreeMap::new();
    for column in table.columns() {
        *kinds.entry(column.kind).or_insert(0) += 1;
    }
    let column_kinds = kinds
        .into_iter()
        .map(|(kind, columns)| KindCount { kind, columns })
        .collect();

    StructuralStats {
        rows,
        columns,
        missing_cells,
        duplicate_rows: count_duplicate_rows(table),
        completeness_pct,
        column_missing,
        column_kinds,
    }
}

/// Rows whose full value tuple equals an earlier row's tuple.
fn count_duplicate_rows(table: &Table) -> usize {
    let mut seen = HashSet::new();
    let mut duplicates = 0usize;
    for index in 0..table.row_count() {
        let key = table
            .columns()
            .iter()
            .map(|column| column.values[index].key())
            .collect::<Vec<_>>()
            .join("|");
        if !seen.insert(key) {
            duplicates += 1;
        }
    }
    duplicates
}

fn business_metrics(
    table: &Table,
    config: &EngineConfig,
) -> Result<Option<BusinessMetrics>, EvalError> {
    let rows = table.row_count();

    let criticality = table
        .labels(BUSINESS_CRITICALITY)
        .map(|labels| distribution(BUSINESS_CRITICALITY, &labels, rows));

    let maintenance = table.numeric(MAINTENANCE_COST)?;
    let development = table.numeric(DEVELOPMENT_COST)?;

    let costs = if maintenance.is_none() && development.is_none() {
        None
    } else {
        let maintenance_total = maintenance.as_deref().map(sum);
        let development_total = development.as_deref().map(sum);
        let total = match (maintenance_total, development_total) {
            (Some(maintenance), Some(development)) => Some(maintenance + development),
            _ => None,
        };
        Some(CostSummary {
            maintenance_total,
            development_total,
            total,
        })
    };

    let top_expensive = match (&maintenance, &development) {
        (Some(maintenance), Some(development)) => Some(top_expensive(
            table,
            maintenance,
            development,
            config.top_n_expensive,
        )),
        _ => None,
    };

    let risk = table.labels(RISK_LEVEL).map(|labels| {
        let distribution = distribution(RISK_LEVEL, &labels, rows);
        let high_or_critical = HIGH_RISK_LABELS
            .iter()
            .map(|label| distribution.count(label))
            .sum();
        RiskSummary {
            distribution,
            high_or_critical,
            high_or_critical_pct: percentage(high_or_critical, rows),
        }
    });

    if criticality.is_none() && costs.is_none() && top_expensive.is_none() && risk.is_none() {
        return Ok(None);
    }

    Ok(Some(BusinessMetrics {
        criticality,
        costs,
        top_expensive,
        risk,
    }))
}

/// The `limit` rows with the largest `maintenance + development` cost.
///
/// Rows missing either cost are skipped. Equal totals keep table order.
fn top_expensive(
    table: &Table,
    maintenance: &[Option<f64>],
    development: &[Option<f64>],
    limit: usize,
) -> Vec<ExpensiveApplication> {
    let names = table.labels(APPLICATION_NAME);

    let mut candidates = maintenance
        .iter()
        .zip(development)
        .enumerate()
        .filter_map(|(row, (maintenance, development))| {
            let (maintenance_cost, development_cost) = ((*maintenance)?, (*development)?);
            Some(ExpensiveApplication {
                row,
                name: names.as_ref().and_then(|names| names[row].clone()),
                maintenance_cost,
                development_cost,
                total_cost: maintenance_cost + development_cost,
            })
        })
        .collect::<Vec<_>>();

    candidates.sort_by(|a, b| b.total_cost.total_cmp(&a.total_cost));
    candidates.truncate(limit);
    candidates
}

fn security_metrics(
    table: &Table,
    config: &EngineConfig,
) -> Result<Option<SecurityMetrics>, EvalError> {
    let rows = table.row_count();

    let compliance = table.labels(COMPLIANCE_STATUS).map(|labels| {
        let distribution = distribution(COMPLIANCE_STATUS, &labels, rows);
        let non_compliant = distribution.count(NON_COMPLIANT_LABEL);
        ComplianceSummary {
            distribution,
            non_compliant,
            non_compliant_pct: percentage(non_compliant, rows),
        }
    });

    let security_score = table.numeric(SECURITY_SCORE)?.map(|values| {
        threshold_summary(
            SECURITY_SCORE,
            &values,
            config.security_threshold,
            ThresholdRule::Below,
            rows,
        )
    });

    let vulnerabilities = table.numeric(VULNERABILITY_COUNT)?.map(|values| {
        threshold_summary(
            VULNERABILITY_COUNT,
            &values,
            config.vulnerability_threshold,
            ThresholdRule::Above,
            rows,
        )
    });

    if compliance.is_none() && security_score.is_none() && vulnerabilities.is_none() {
        return Ok(None);
    }

    Ok(Some(SecurityMetrics {
        compliance,
        security_score,
        vulnerabilities,
    }))
}

fn performance_metrics(
    table: &Table,
    config: &EngineConfig,
) -> Result<Option<PerformanceMetrics>, EvalError> {
    let rows = table.row_count();

    let performance_score = table.numeric(PERFORMANCE_SCORE)?.map(|values| {
        threshold_summary(
            PERFORMANCE_SCORE,
            &values,
            config.performance_threshold,
            ThresholdRule::Below,
            rows,
        )
    });

    let availability = table.numeric(AVAILABILITY_PERCENTAGE)?.map(|values| {
        threshold_summary(
            AVAILABILITY_PERCENTAGE,
            &values,
            config.availability_threshold,
            ThresholdRule::Below,
            rows,
        )
    });

    if performance_score.is_none() && availability.is_none() {
        return Ok(None);
    }

    Ok(Some(PerformanceMetrics {
        performance_score,
        availability,
    }))
}

fn threshold_summary(
    column: &str,
    values: &[Option<f64>],
    threshold: f64,
    rule: ThresholdRule,
    rows: usize,
) -> ThresholdSummary {
    let flagged = values
        .iter()
        .flatten()
        .filter(|value| rule.flags(**value, threshold))
        .count();

    ThresholdSummary {
        column: column.to_string(),
        average: mean(values),
        threshold,
        rule,
        flagged,
        flagged_pct: percentage(flagged, rows),
    }
}

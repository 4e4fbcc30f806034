use archlens_core::columns::{
    CORRELATION_COLUMNS, MAINTENANCE_COST, OWNER_DEPARTMENT, PERFORMANCE_SCORE, SECURITY_SCORE,
};
use archlens_core::{ColumnKind, Table};

use crate::config::EngineConfig;
use crate::errors::EvalError;
use crate::metrics::{ChartData, CorrelationMatrix};
use crate::stats::{distribution, histogram, pearson};

/// Collect the numeric series plotted by chart and dashboard renderers.
pub fn collect_chart_data(table: &Table, config: &EngineConfig) -> Result<ChartData, EvalError> {
    if table.row_count() == 0 {
        return Ok(ChartData::default());
    }

    let cost_histogram = table
        .numeric(MAINTENANCE_COST)?
        .and_then(|values| histogram(MAINTENANCE_COST, &values, config.cost_histogram_bins));
    let security_histogram = table
        .numeric(SECURITY_SCORE)?
        .and_then(|values| histogram(SECURITY_SCORE, &values, config.score_histogram_bins));
    let performance_histogram = table
        .numeric(PERFORMANCE_SCORE)?
        .and_then(|values| histogram(PERFORMANCE_SCORE, &values, config.score_histogram_bins));

    let departments = table
        .labels(OWNER_DEPARTMENT)
        .map(|labels| distribution(OWNER_DEPARTMENT, &labels, table.row_count()));

    Ok(ChartData {
        cost_histogram,
        security_histogram,
        performance_histogram,
        correlation: correlation_matrix(table),
        departments,
    })
}

/// Pearson correlation across the present numeric correlation columns.
///
/// Rows with a missing value in any selected column are dropped first. At
/// least two columns and two complete rows are required. Correlation columns
/// that exist with a non-numeric kind are left out rather than failing.
pub fn correlation_matrix(table: &Table) -> Option<CorrelationMatrix> {
    let selected = CORRELATION_COLUMNS
        .iter()
        .filter_map(|name| table.column(name))
        .filter(|column| column.kind == ColumnKind::Numeric)
        .collect::<Vec<_>>();
    if selected.len() < 2 {
        return None;
    }

    let mut series: Vec<Vec<f64>> = vec![Vec::new(); selected.len()];
    for row in 0..table.row_count() {
        let values = selected
            .iter()
            .map(|column| column.values[row].as_number())
            .collect::<Option<Vec<_>>>();
        if let Some(values) = values {
            for (idx, value) in values.into_iter().enumerate() {
                series[idx].push(value);
            }
        }
    }

    let observations = series.first().map(Vec::len).unwrap_or(0);
    if observations < 2 {
        return None;
    }

    let coefficients = series
        .iter()
        .map(|x| series.iter().map(|y| pearson(x, y)).collect())
        .collect();

    Some(CorrelationMatrix {
        columns: selected.iter().map(|column| column.name.clone()).collect(),
        observations,
        coefficients,
    })
}

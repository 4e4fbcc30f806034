use std::fmt;

use archlens_core::ColumnKind;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Metrics contract version for `metrics.json` artifacts.
pub const METRICS_VERSION: &str = "0.1";

/// Machine-readable result of one analysis run.
///
/// Optional sections are present only when at least one of their source
/// columns exists in the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MetricsReport {
    pub metrics_version: String,
    pub structural: StructuralStats,
    pub quality: QualityScore,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business: Option<BusinessMetrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<SecurityMetrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance: Option<PerformanceMetrics>,
    pub charts: ChartData,
}

/// Shape and completeness of the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StructuralStats {
    pub rows: usize,
    pub columns: usize,
    pub missing_cells: usize,
    pub duplicate_rows: usize,
    pub completeness_pct: f64,
    pub column_missing: Vec<ColumnMissing>,
    pub column_kinds: Vec<KindCount>,
}

/// Missing values of a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ColumnMissing {
    pub column: String,
    pub kind: ColumnKind,
    pub missing: usize,
    pub missing_pct: f64,
}

/// Number of columns of a given kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct KindCount {
    pub kind: ColumnKind,
    pub columns: usize,
}

/// Data-quality score on a 0..=100 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QualityScore {
    pub completeness: f64,
    pub consistency: f64,
    pub accuracy: f64,
    pub overall: f64,
    pub level: QualityLevel,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<QualityIssue>,
}

/// Qualitative band of the overall quality score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum QualityLevel {
    Excellent,
    Good,
    Satisfactory,
    NeedsImprovement,
}

impl QualityLevel {
    pub fn label(&self) -> &'static str {
        match self {
            QualityLevel::Excellent => "Excellent",
            QualityLevel::Good => "Good",
            QualityLevel::Satisfactory => "Satisfactory",
            QualityLevel::NeedsImprovement => "Needs Improvement",
        }
    }
}

impl fmt::Display for QualityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A rule violation that lowered the quality score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QualityIssue {
    pub column: String,
    pub kind: QualityIssueKind,
    pub rows: usize,
    pub penalty: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum QualityIssueKind {
    NegativeValues,
    OutOfRange,
    FutureDated,
    UnparsableDates,
}

impl QualityIssueKind {
    pub fn describe(&self) -> &'static str {
        match self {
            QualityIssueKind::NegativeValues => "negative value(s)",
            QualityIssueKind::OutOfRange => "value(s) outside [0, 100]",
            QualityIssueKind::FutureDated => "date(s) in the future",
            QualityIssueKind::UnparsableDates => "value(s) not parseable as dates",
        }
    }
}

/// Label counts of a categorical column, most frequent first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Distribution {
    pub column: String,
    pub entries: Vec<DistributionEntry>,
}

impl Distribution {
    /// Count for an exact label, zero when the label never occurs.
    pub fn count(&self, label: &str) -> usize {
        self.entries
            .iter()
            .find(|entry| entry.label == label)
            .map(|entry| entry.count)
            .unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|entry| entry.count).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DistributionEntry {
    pub label: String,
    pub count: usize,
    /// Share of all table rows, nulls included.
    pub pct: f64,
}

/// Cost, criticality and risk aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BusinessMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criticality: Option<Distribution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub costs: Option<CostSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_expensive: Option<Vec<ExpensiveApplication>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk: Option<RiskSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CostSummary {
    pub maintenance_total: Option<f64>,
    pub development_total: Option<f64>,
    /// Present only when both cost columns exist.
    pub total: Option<f64>,
}

/// One entry of the most-expensive ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExpensiveApplication {
    /// Zero-based row index in the source table.
    pub row: usize,
    pub name: Option<String>,
    pub maintenance_cost: f64,
    pub development_cost: f64,
    pub total_cost: f64,
}

impl ExpensiveApplication {
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("row {}", self.row + 1))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RiskSummary {
    pub distribution: Distribution,
    pub high_or_critical: usize,
    pub high_or_critical_pct: f64,
}

/// Compliance, security score and vulnerability aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SecurityMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance: Option<ComplianceSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_score: Option<ThresholdSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vulnerabilities: Option<ThresholdSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ComplianceSummary {
    pub distribution: Distribution,
    pub non_compliant: usize,
    pub non_compliant_pct: f64,
}

/// Performance score and availability aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PerformanceMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance_score: Option<ThresholdSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<ThresholdSummary>,
}

/// Average of a numeric column and the rows flagged by a strict threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ThresholdSummary {
    pub column: String,
    /// `None` when the column holds no values.
    pub average: Option<f64>,
    pub threshold: f64,
    pub rule: ThresholdRule,
    pub flagged: usize,
    pub flagged_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdRule {
    /// Flag values strictly below the threshold.
    Below,
    /// Flag values strictly above the threshold.
    Above,
}

impl ThresholdRule {
    pub fn flags(&self, value: f64, threshold: f64) -> bool {
        match self {
            ThresholdRule::Below => value < threshold,
            ThresholdRule::Above => value > threshold,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            ThresholdRule::Below => "<",
            ThresholdRule::Above => ">",
        }
    }
}

/// Numeric series consumed by chart renderers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ChartData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_histogram: Option<Histogram>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_histogram: Option<Histogram>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance_histogram: Option<Histogram>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation: Option<CorrelationMatrix>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departments: Option<Distribution>,
}

/// Equal-width histogram; the last bin includes its upper edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Histogram {
    pub column: String,
    pub mean: Option<f64>,
    pub bins: Vec<HistogramBin>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Pearson correlation over rows where every listed column has a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub observations: usize,
    /// Row-major; `None` where a column has zero variance.
    pub coefficients: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, row: &str, column: &str) -> Option<f64> {
        let i = self.columns.iter().position(|name| name == row)?;
        let j = self.columns.iter().position(|name| name == column)?;
        self.coefficients.get(i)?.get(j).copied().flatten()
    }
}

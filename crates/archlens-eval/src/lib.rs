//! Inventory metrics: loading, scoring and report rendering.

pub mod charts;
pub mod config;
pub mod engine;
pub mod errors;
pub mod load;
pub mod metrics;
pub mod quality;
pub mod report;
mod stats;

pub use charts::{collect_chart_data, correlation_matrix};
pub use config::EngineConfig;
pub use engine::{MetricsEngine, compute_report};
pub use errors::{EvalError, LoadError};
pub use load::{load_table_csv, load_table_from_reader};
pub use metrics::{
    BusinessMetrics, ChartData, ColumnMissing, ComplianceSummary, CorrelationMatrix, CostSummary,
    Distribution, DistributionEntry, ExpensiveApplication, Histogram, HistogramBin, KindCount,
    METRICS_VERSION, MetricsReport, PerformanceMetrics, QualityIssue, QualityIssueKind,
    QualityLevel, QualityScore, RiskSummary, SecurityMetrics, StructuralStats, ThresholdRule,
    ThresholdSummary,
};
pub use quality::score_quality;
pub use report::{
    RECOMMENDATIONS, ReportFormat, format_count, format_currency, render_console,
    render_markdown_report, render_text_report,
};

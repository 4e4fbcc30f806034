use chrono::NaiveDateTime;

use crate::metrics::{
    BusinessMetrics, Distribution, MetricsReport, PerformanceMetrics, QualityScore,
    SecurityMetrics, StructuralStats, ThresholdSummary,
};

/// Report file name; the extension depends on the format.
pub const REPORT_FILE_STEM: &str = "comprehensive_analysis_report";

/// Closing recommendations, identical for every dataset.
pub const RECOMMENDATIONS: [&str; 7] = [
    "Check columns with high percentage of missing data",
    "Establish rules for filling mandatory fields",
    "Regularly monitor data quality",
    "Create data cleaning process",
    "Improve security of applications with low scores",
    "Optimize performance of problematic applications",
    "Develop risk reduction plan for high-risk applications",
];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const RULE: &str = "==================================================";

/// Output format of a report artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Markdown,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Markdown => "md",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{REPORT_FILE_STEM}.{}", self.extension())
    }

    pub fn render(&self, report: &MetricsReport, generated_at: NaiveDateTime) -> String {
        match self {
            ReportFormat::Text => render_text_report(report, generated_at),
            ReportFormat::Markdown => render_markdown_report(report, generated_at),
        }
    }
}

/// Render the console summary: fixed section order, closing recommendations.
pub fn render_console(report: &MetricsReport) -> String {
    let mut lines = vec!["ARCHITECTURE INVENTORY ANALYSIS".to_string()];
    for section in build_sections(report) {
        lines.push(String::new());
        lines.push(RULE.to_string());
        lines.push(section.title.to_uppercase());
        push_text_lines(&mut lines, &section.lines);
    }
    lines.join("\n")
}

/// Render the plain-text report with timestamp header and footer.
pub fn render_text_report(report: &MetricsReport, generated_at: NaiveDateTime) -> String {
    let timestamp = generated_at.format(TIMESTAMP_FORMAT).to_string();
    let mut lines = vec![
        "COMPREHENSIVE ARCHITECTURE INVENTORY ANALYSIS REPORT".to_string(),
        String::new(),
        format!("Analysis Date: {timestamp}"),
    ];
    for section in build_sections(report) {
        lines.push(String::new());
        lines.push(format!("{}:", section.title.to_uppercase()));
        push_text_lines(&mut lines, &section.lines);
    }
    lines.push(String::new());
    lines.push(format!("Created: {timestamp}"));
    lines.push(String::new());
    lines.join("\n")
}

/// Render the markdown report with timestamp header and footer.
pub fn render_markdown_report(report: &MetricsReport, generated_at: NaiveDateTime) -> String {
    let timestamp = generated_at.format(TIMESTAMP_FORMAT).to_string();
    let mut lines = vec![
        "# Comprehensive Architecture Inventory Analysis Report".to_string(),
        String::new(),
        format!("**Analysis Date:** {timestamp}"),
    ];
    for section in build_sections(report) {
        lines.push(String::new());
        lines.push(format!("## {}", section.title));
        for line in &section.lines {
            match line {
                Line::Heading(text) => {
                    lines.push(String::new());
                    lines.push(format!("### {text}"));
                }
                Line::Metric(label, value) => lines.push(format!("- **{label}:** {value}")),
                Line::Entry(text) => lines.push(format!("- {text}")),
                Line::Numbered(number, text) => lines.push(format!("{number}. {text}")),
                Line::Note(text) => lines.push(format!("_{text}_")),
            }
        }
    }
    lines.push(String::new());
    lines.push("---".to_string());
    lines.push(format!("*Created: {timestamp}*"));
    lines.push(String::new());
    lines.join("\n")
}

/// Format a currency amount as `$1,234.56`.
pub fn format_currency(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let formatted = format!("{:.2}", value.abs());
    let (integer, fraction) = formatted.split_once('.').unwrap_or((&formatted, "00"));
    format!("{sign}${}.{fraction}", group_thousands(integer))
}

/// Format a count with thousands separators.
pub fn format_count(value: usize) -> String {
    group_thousands(&value.to_string())
}

pub fn format_pct(value: f64) -> String {
    format!("{value:.1}%")
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

struct Section {
    title: &'static str,
    lines: Vec<Line>,
}

enum Line {
    Heading(String),
    Metric(String, String),
    Entry(String),
    Numbered(usize, String),
    Note(String),
}

fn metric(label: impl Into<String>, value: impl Into<String>) -> Line {
    Line::Metric(label.into(), value.into())
}

fn push_text_lines(lines: &mut Vec<String>, section: &[Line]) {
    for line in section {
        match line {
            Line::Heading(text) => {
                lines.push(String::new());
                lines.push(format!("{text}:"));
            }
            Line::Metric(label, value) => lines.push(format!("  {label}: {value}")),
            Line::Entry(text) => lines.push(format!("  {text}")),
            Line::Numbered(number, text) => lines.push(format!("  {number}. {text}")),
            Line::Note(text) => lines.push(format!("  ({text})")),
        }
    }
}

fn build_sections(report: &MetricsReport) -> Vec<Section> {
    vec![
        Section {
            title: "Basic Data Information",
            lines: structural_lines(&report.structural),
        },
        Section {
            title: "Data Quality",
            lines: quality_lines(&report.quality),
        },
        Section {
            title: "Business Analysis",
            lines: report
                .business
                .as_ref()
                .map(business_lines)
                .unwrap_or_else(|| vec![Line::Note("no business columns found".to_string())]),
        },
        Section {
            title: "Security and Compliance",
            lines: report
                .security
                .as_ref()
                .map(security_lines)
                .unwrap_or_else(|| vec![Line::Note("no security columns found".to_string())]),
        },
        Section {
            title: "Performance",
            lines: report
                .performance
                .as_ref()
                .map(performance_lines)
                .unwrap_or_else(|| {
                    vec![Line::Note("no performance columns found".to_string())]
                }),
        },
        Section {
            title: "Recommendations",
            lines: RECOMMENDATIONS
                .iter()
                .enumerate()
                .map(|(idx, text)| Line::Numbered(idx + 1, text.to_string()))
                .collect(),
        },
    ]
}

fn structural_lines(stats: &StructuralStats) -> Vec<Line> {
    let mut lines = vec![
        metric("Total records", format_count(stats.rows)),
        metric("Total columns", format_count(stats.columns)),
        metric("Missing values", format_count(stats.missing_cells)),
        metric("Duplicate records", format_count(stats.duplicate_rows)),
        metric("Data completeness", format_pct(stats.completeness_pct)),
    ];

    if !stats.column_kinds.is_empty() {
        lines.push(Line::Heading("Data types".to_string()));
        for entry in &stats.column_kinds {
            lines.push(Line::Entry(format!("{}: {} columns", entry.kind, entry.columns)));
        }
    }

    if !stats.column_missing.is_empty() {
        lines.push(Line::Heading("Column analysis".to_string()));
        for entry in &stats.column_missing {
            lines.push(Line::Entry(format!(
                "{}: {} missing ({})",
                entry.column,
                entry.missing,
                format_pct(entry.missing_pct)
            )));
        }
    }

    lines
}

fn quality_lines(quality: &QualityScore) -> Vec<Line> {
    let mut lines = vec![
        metric("Completeness", format!("{:.1}", quality.completeness)),
        metric("Consistency", format!("{:.1}", quality.consistency)),
        metric("Accuracy", format!("{:.1}", quality.accuracy)),
        metric(
            "Overall quality score",
            format!("{:.1}/100 ({})", quality.overall, quality.level),
        ),
    ];

    if !quality.issues.is_empty() {
        lines.push(Line::Heading("Quality issues".to_string()));
        for issue in &quality.issues {
            lines.push(Line::Entry(format!(
                "{}: {} {} (-{:.1})",
                issue.column,
                issue.rows,
                issue.kind.describe(),
                issue.penalty
            )));
        }
    }

    lines
}

fn distribution_lines(lines: &mut Vec<Line>, distribution: &Distribution) {
    for entry in &distribution.entries {
        lines.push(Line::Entry(format!(
            "{}: {} ({})",
            entry.label,
            entry.count,
            format_pct(entry.pct)
        )));
    }
}

fn business_lines(business: &BusinessMetrics) -> Vec<Line> {
    let mut lines = Vec::new();

    if let Some(criticality) = &business.criticality {
        lines.push(Line::Heading(
            "Application criticality distribution".to_string(),
        ));
        distribution_lines(&mut lines, criticality);
    }

    if let Some(costs) = &business.costs {
        lines.push(Line::Heading("Cost analysis".to_string()));
        if let Some(total) = costs.maintenance_total {
            lines.push(metric("Total maintenance costs", format_currency(total)));
        }
        if let Some(total) = costs.development_total {
            lines.push(metric("Total development costs", format_currency(total)));
        }
        if let Some(total) = costs.total {
            lines.push(metric("Total costs", format_currency(total)));
        }
    }

    if let Some(top) = &business.top_expensive {
        lines.push(Line::Heading(format!(
            "Top {} most expensive applications",
            top.len()
        )));
        for app in top {
            lines.push(Line::Entry(format!(
                "{}: {}",
                app.display_name(),
                format_currency(app.total_cost)
            )));
        }
    }

    if let Some(risk) = &business.risk {
        lines.push(Line::Heading("Risk analysis".to_string()));
        distribution_lines(&mut lines, &risk.distribution);
        lines.push(metric(
            "Applications with high/critical risk",
            risk.high_or_critical.to_string(),
        ));
        lines.push(metric(
            "Percentage of high-risk applications",
            format_pct(risk.high_or_critical_pct),
        ));
    }

    lines
}

fn threshold_lines(
    lines: &mut Vec<Line>,
    summary: &ThresholdSummary,
    average_label: &str,
    average: String,
    flagged_label: &str,
) {
    lines.push(metric(average_label, average));
    lines.push(metric(
        format!(
            "{flagged_label} ({}{})",
            summary.rule.symbol(),
            trim_number(summary.threshold)
        ),
        summary.flagged.to_string(),
    ));
    lines.push(metric(
        format!("{flagged_label} percentage"),
        format_pct(summary.flagged_pct),
    ));
}

fn security_lines(security: &SecurityMetrics) -> Vec<Line> {
    let mut lines = Vec::new();

    if let Some(compliance) = &security.compliance {
        lines.push(Line::Heading("Compliance status".to_string()));
        distribution_lines(&mut lines, &compliance.distribution);
        lines.push(metric(
            "Non-compliant applications",
            compliance.non_compliant.to_string(),
        ));
        lines.push(metric(
            "Non-compliant percentage",
            format_pct(compliance.non_compliant_pct),
        ));
    }

    if let Some(score) = &security.security_score {
        lines.push(Line::Heading("Security scores".to_string()));
        threshold_lines(
            &mut lines,
            score,
            "Average security score",
            format_average(score.average, "/100", 1),
            "Low security",
        );
    }

    if let Some(vulnerabilities) = &security.vulnerabilities {
        lines.push(Line::Heading("Vulnerabilities".to_string()));
        threshold_lines(
            &mut lines,
            vulnerabilities,
            "Average vulnerabilities",
            format_average(vulnerabilities.average, "", 1),
            "High vulnerability count",
        );
    }

    lines
}

fn performance_lines(performance: &PerformanceMetrics) -> Vec<Line> {
    let mut lines = Vec::new();

    if let Some(score) = &performance.performance_score {
        lines.push(Line::Heading("Performance scores".to_string()));
        threshold_lines(
            &mut lines,
            score,
            "Average performance score",
            format_average(score.average, "/100", 1),
            "Low performance",
        );
    }

    if let Some(availability) = &performance.availability {
        lines.push(Line::Heading("Availability".to_string()));
        threshold_lines(
            &mut lines,
            availability,
            "Average availability",
            format_average(availability.average, "%", 2),
            "Low availability",
        );
    }

    lines
}

fn format_average(value: Option<f64>, suffix: &str, precision: usize) -> String {
    match value {
        Some(value) => format!("{value:.precision$}{suffix}"),
        None => "n/a".to_string(),
    }
}

fn trim_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(999.5), "$999.50");
        assert_eq!(format_currency(1234.567), "$1,234.57");
        assert_eq!(format_currency(1_234_567.0), "$1,234,567.00");
        assert_eq!(format_currency(-2500.0), "-$2,500.00");
    }

    #[test]
    fn counts_group_thousands() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(12_345_678), "12,345,678");
    }

    #[test]
    fn averages_render_placeholder_when_absent() {
        assert_eq!(format_average(None, "/100", 1), "n/a");
        assert_eq!(format_average(Some(99.456), "%", 2), "99.46%");
        assert_eq!(trim_number(80.0), "80");
        assert_eq!(trim_number(99.5), "99.5");
    }
}

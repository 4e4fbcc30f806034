use archlens_eval::{
    CorrelationMatrix, Distribution, Histogram, ThresholdSummary, format_count, format_currency,
};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Bar, BarChart, BarGroup, Block, Borders, Paragraph, Row, Table as TableWidget, Tabs, Wrap,
};

use crate::dashboard::state::{App, Page, Visualization};

pub const TABS_HEIGHT: u16 = 3;
pub const STATUS_HEIGHT: u16 = 1;
const CORRELATION_CELL_WIDTH: u16 = 9;
const HELP: &str = "Tab/←→ page  1-6 jump  ↑↓ scroll  v chart  s save report  q quit";

pub fn draw_ui(frame: &mut Frame, app: &App) {
    let size = frame.size();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(TABS_HEIGHT),
            Constraint::Min(1),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(size);

    frame.render_widget(render_tabs(app), layout[0]);

    match app.page {
        Page::Overview => draw_overview(frame, app, layout[1]),
        Page::Business => draw_business(frame, app, layout[1]),
        Page::Security => draw_security(frame, app, layout[1]),
        Page::Performance => draw_performance(frame, app, layout[1]),
        Page::Visualization => draw_visualization(frame, app, layout[1]),
        Page::Report => {
            let preview = Paragraph::new(app.report_preview())
                .block(titled_block("Report preview (s to save markdown)"))
                .scroll((app.scroll_offset, 0));
            frame.render_widget(preview, layout[1]);
        }
    }

    frame.render_widget(render_status_line(app), layout[2]);
}

fn render_tabs(app: &App) -> Tabs<'static> {
    let titles = Page::ALL
        .iter()
        .enumerate()
        .map(|(idx, page)| format!("{} {}", idx + 1, page.title()))
        .collect::<Vec<_>>();
    Tabs::new(titles)
        .select(app.page.index())
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .block(titled_block(&format!(
            "Architecture inventory: {}",
            app.input.display()
        )))
}

fn render_status_line(app: &App) -> Paragraph<'static> {
    let line = match &app.status {
        Some(status) => Line::from(Span::styled(
            status.clone(),
            Style::default().fg(Color::Green),
        )),
        None => Line::from(Span::styled(HELP, Style::default().fg(Color::DarkGray))),
    };
    Paragraph::new(line)
}

fn draw_overview(frame: &mut Frame, app: &App, area: Rect) {
    let columns = split_horizontal(area, 45);
    let report = &app.report;
    let structural = &report.structural;
    let quality = &report.quality;

    let mut lines = vec![
        heading("Basic information"),
        metric_line("Records", format_count(structural.rows)),
        metric_line("Columns", format_count(structural.columns)),
        metric_line("Missing values", format_count(structural.missing_cells)),
        metric_line("Duplicate records", format_count(structural.duplicate_rows)),
        metric_line(
            "Completeness",
            format!("{:.1}%", structural.completeness_pct),
        ),
        Line::from(""),
        heading("Data quality"),
        metric_line("Completeness", format!("{:.1}", quality.completeness)),
        metric_line("Consistency", format!("{:.1}", quality.consistency)),
        metric_line("Accuracy", format!("{:.1}", quality.accuracy)),
        metric_line(
            "Overall",
            format!("{:.1}/100 ({})", quality.overall, quality.level),
        ),
    ];
    for issue in &quality.issues {
        lines.push(Line::from(format!(
            "  {}: {} {}",
            issue.column,
            issue.rows,
            issue.kind.describe()
        )));
    }
    if !structural.column_kinds.is_empty() {
        lines.push(Line::from(""));
        lines.push(heading("Data types"));
        for entry in &structural.column_kinds {
            lines.push(metric_line(entry.kind.as_str(), entry.columns.to_string()));
        }
    }
    frame.render_widget(summary(lines, "Data overview", app.scroll_offset), columns[0]);

    let rows = structural
        .column_missing
        .iter()
        .map(|entry| {
            Row::new(vec![
                entry.column.clone(),
                entry.kind.to_string(),
                entry.missing.to_string(),
                format!("{:.1}%", entry.missing_pct),
            ])
        })
        .collect::<Vec<_>>();
    let table = TableWidget::new(
        rows,
        [
            Constraint::Min(16),
            Constraint::Length(12),
            Constraint::Length(8),
            Constraint::Length(8),
        ],
    )
    .header(header_row(["Column", "Type", "Missing", "Share"]))
    .block(titled_block("Column analysis"));
    frame.render_widget(table, columns[1]);
}

fn draw_business(frame: &mut Frame, app: &App, area: Rect) {
    let Some(business) = &app.report.business else {
        frame.render_widget(unavailable("Business analysis"), area);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let top = split_horizontal(rows[0], 50);
    let bottom = split_horizontal(rows[1], 50);

    let mut lines = Vec::new();
    if let Some(costs) = &business.costs {
        lines.push(heading("Costs"));
        if let Some(total) = costs.maintenance_total {
            lines.push(metric_line("Maintenance", format_currency(total)));
        }
        if let Some(total) = costs.development_total {
            lines.push(metric_line("Development", format_currency(total)));
        }
        if let Some(total) = costs.total {
            lines.push(metric_line("Total", format_currency(total)));
        }
        lines.push(Line::from(""));
    }
    if let Some(risk) = &business.risk {
        lines.push(heading("Risk"));
        lines.push(metric_line(
            "High/critical",
            format!("{} ({:.1}%)", risk.high_or_critical, risk.high_or_critical_pct),
        ));
        lines.extend(distribution_lines(&risk.distribution));
    }
    frame.render_widget(summary(lines, "Business summary", app.scroll_offset), top[0]);

    match &business.criticality {
        Some(criticality) => draw_distribution_chart(
            frame,
            top[1],
            "Application criticality",
            criticality,
            Color::Magenta,
        ),
        None => frame.render_widget(unavailable("Application criticality"), top[1]),
    }

    match &business.top_expensive {
        Some(top_expensive) => {
            let rows = top_expensive
                .iter()
                .map(|entry| {
                    Row::new(vec![
                        entry.display_name(),
                        format_currency(entry.maintenance_cost),
                        format_currency(entry.development_cost),
                        format_currency(entry.total_cost),
                    ])
                })
                .collect::<Vec<_>>();
            let table = TableWidget::new(
                rows,
                [
                    Constraint::Min(16),
                    Constraint::Length(14),
                    Constraint::Length(14),
                    Constraint::Length(14),
                ],
            )
            .header(header_row(["Application", "Maintenance", "Development", "Total"]))
            .block(titled_block("Most expensive applications"));
            frame.render_widget(table, bottom[0]);
        }
        None => frame.render_widget(unavailable("Most expensive applications"), bottom[0]),
    }

    match &business.risk {
        Some(risk) => {
            draw_distribution_chart(frame, bottom[1], "Risk levels", &risk.distribution, Color::Red)
        }
        None => frame.render_widget(unavailable("Risk levels"), bottom[1]),
    }
}

fn draw_security(frame: &mut Frame, app: &App, area: Rect) {
    let Some(security) = &app.report.security else {
        frame.render_widget(unavailable("Security"), area);
        return;
    };
    let columns = split_horizontal(area, 45);

    let mut lines = Vec::new();
    if let Some(compliance) = &security.compliance {
        lines.push(heading("Compliance"));
        lines.push(metric_line(
            "Non-compliant",
            format!(
                "{} ({:.1}%)",
                compliance.non_compliant, compliance.non_compliant_pct
            ),
        ));
        lines.extend(distribution_lines(&compliance.distribution));
        lines.push(Line::from(""));
    }
    if let Some(score) = &security.security_score {
        lines.extend(threshold_lines("Security score", score));
    }
    if let Some(vulnerabilities) = &security.vulnerabilities {
        lines.extend(threshold_lines("Vulnerabilities", vulnerabilities));
    }
    frame.render_widget(summary(lines, "Security summary", app.scroll_offset), columns[0]);

    match &app.report.charts.security_histogram {
        Some(histogram) => draw_histogram(
            frame,
            columns[1],
            "Security score distribution",
            histogram,
            Color::Cyan,
        ),
        None => frame.render_widget(unavailable("Security score distribution"), columns[1]),
    }
}

fn draw_performance(frame: &mut Frame, app: &App, area: Rect) {
    let Some(performance) = &app.report.performance else {
        frame.render_widget(unavailable("Performance"), area);
        return;
    };
    let columns = split_horizontal(area, 45);

    let mut lines = Vec::new();
    if let Some(score) = &performance.performance_score {
        lines.extend(threshold_lines("Performance score", score));
    }
    if let Some(availability) = &performance.availability {
        lines.extend(threshold_lines("Availability", availability));
    }
    frame.render_widget(
        summary(lines, "Performance summary", app.scroll_offset),
        columns[0],
    );

    match &app.report.charts.performance_histogram {
        Some(histogram) => draw_histogram(
            frame,
            columns[1],
            "Performance score distribution",
            histogram,
            Color::Green,
        ),
        None => frame.render_widget(unavailable("Performance score distribution"), columns[1]),
    }
}

fn draw_visualization(frame: &mut Frame, app: &App, area: Rect) {
    let charts = &app.report.charts;
    let title = format!("{} (v to switch)", app.visualization.title());

    match app.visualization {
        Visualization::CostDistribution => match &charts.cost_histogram {
            Some(histogram) => draw_histogram(frame, area, &title, histogram, Color::Yellow),
            None => frame.render_widget(unavailable(&title), area),
        },
        Visualization::Correlation => match &charts.correlation {
            Some(matrix) => draw_correlation(frame, area, &title, matrix),
            None => frame.render_widget(unavailable(&title), area),
        },
        Visualization::Departments => match &charts.departments {
            Some(departments) => {
                draw_distribution_chart(frame, area, &title, departments, Color::Blue)
            }
            None => frame.render_widget(unavailable(&title), area),
        },
    }
}

fn draw_distribution_chart(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    distribution: &Distribution,
    color: Color,
) {
    let bars = distribution
        .entries
        .iter()
        .map(|entry| {
            Bar::default()
                .value(entry.count as u64)
                .label(Line::from(entry.label.clone()))
        })
        .collect::<Vec<_>>();
    draw_bars(frame, area, title, &bars, color);
}

fn draw_histogram(frame: &mut Frame, area: Rect, title: &str, histogram: &Histogram, color: Color) {
    let bars = histogram
        .bins
        .iter()
        .map(|bin| {
            Bar::default()
                .value(bin.count as u64)
                .label(Line::from(compact_number(bin.lower)))
        })
        .collect::<Vec<_>>();
    let title = match histogram.mean {
        Some(mean) => format!("{title} - mean {}", compact_number(mean)),
        None => title.to_string(),
    };
    draw_bars(frame, area, &title, &bars, color);
}

fn draw_bars(frame: &mut Frame, area: Rect, title: &str, bars: &[Bar], color: Color) {
    let chart = BarChart::default()
        .block(titled_block(title))
        .data(BarGroup::default().bars(bars))
        .bar_width(fit_bar_width(area, bars.len()))
        .bar_gap(1)
        .bar_style(Style::default().fg(color))
        .value_style(
            Style::default()
                .fg(Color::Black)
                .bg(color)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(chart, area);
}

fn draw_correlation(frame: &mut Frame, area: Rect, title: &str, matrix: &CorrelationMatrix) {
    let mut header = vec![String::new()];
    header.extend(matrix.columns.iter().map(|name| abbreviate(name)));

    let rows = matrix
        .columns
        .iter()
        .zip(&matrix.coefficients)
        .map(|(name, coefficients)| {
            let mut cells = vec![abbreviate(name)];
            cells.extend(coefficients.iter().map(|value| match value {
                Some(value) => format!("{value:+.2}"),
                None => "-".to_string(),
            }));
            Row::new(cells)
        })
        .collect::<Vec<_>>();

    let widths = std::iter::once(Constraint::Length(CORRELATION_CELL_WIDTH + 4)).chain(
        matrix
            .columns
            .iter()
            .map(|_| Constraint::Length(CORRELATION_CELL_WIDTH)),
    );
    let table = TableWidget::new(rows, widths)
        .header(Row::new(header).style(Style::default().add_modifier(Modifier::BOLD)))
        .block(titled_block(&format!(
            "{title} - {} complete rows",
            matrix.observations
        )));
    frame.render_widget(table, area);
}

fn threshold_lines(title: &str, summary: &ThresholdSummary) -> Vec<Line<'static>> {
    let average = summary
        .average
        .map(|value| format!("{value:.2}"))
        .unwrap_or_else(|| "n/a".to_string());
    vec![
        heading(title),
        metric_line("Average", average),
        metric_line(
            &format!("Flagged ({} {})", summary.rule.symbol(), summary.threshold),
            format!("{} ({:.1}%)", summary.flagged, summary.flagged_pct),
        ),
        Line::from(""),
    ]
}

fn distribution_lines(distribution: &Distribution) -> Vec<Line<'static>> {
    distribution
        .entries
        .iter()
        .map(|entry| {
            metric_line(
                &format!("  {}", entry.label),
                format!("{} ({:.1}%)", entry.count, entry.pct),
            )
        })
        .collect()
}

fn summary(lines: Vec<Line<'static>>, title: &str, scroll: u16) -> Paragraph<'static> {
    Paragraph::new(lines)
        .block(titled_block(title))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
}

fn unavailable(title: &str) -> Paragraph<'static> {
    Paragraph::new(Line::from(Span::styled(
        "No data for this section.",
        Style::default().fg(Color::DarkGray),
    )))
    .block(titled_block(title))
}

fn titled_block(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(format!(" {title} "))
}

fn header_row<const N: usize>(titles: [&'static str; N]) -> Row<'static> {
    Row::new(titles).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )
}

fn heading(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))
}

fn metric_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label}: "), Style::default().fg(Color::Gray)),
        Span::styled(value, Style::default().add_modifier(Modifier::BOLD)),
    ])
}

fn split_horizontal(area: Rect, left_pct: u16) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(left_pct),
            Constraint::Percentage(100 - left_pct),
        ])
        .split(area)
}

fn fit_bar_width(area: Rect, bars: usize) -> u16 {
    let inner = area.width.saturating_sub(2);
    let per_bar = inner / u16::try_from(bars.max(1)).unwrap_or(u16::MAX);
    per_bar.saturating_sub(1).clamp(1, 12)
}

/// Short axis label: `1.2k`, `3.4M`, or the value with at most one decimal.
fn compact_number(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if magnitude >= 1_000.0 {
        format!("{:.1}k", value / 1_000.0)
    } else if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

/// Column names shortened to fit a correlation cell.
fn abbreviate(name: &str) -> String {
    let width = CORRELATION_CELL_WIDTH as usize - 1;
    if name.chars().count() <= width {
        return name.to_string();
    }
    let initials = name
        .split('_')
        .filter_map(|part| part.chars().next())
        .collect::<String>();
    if initials.chars().count() > 1 {
        initials
    } else {
        name.chars().take(width).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_numbers_scale_units() {
        assert_eq!(compact_number(950.0), "950");
        assert_eq!(compact_number(12.3), "12.3");
        assert_eq!(compact_number(12_500.0), "12.5k");
        assert_eq!(compact_number(3_400_000.0), "3.4M");
    }

    #[test]
    fn long_column_names_use_initials() {
        assert_eq!(abbreviate("Maintenance_Cost"), "MC");
        assert_eq!(abbreviate("User_Count"), "UC");
        assert_eq!(abbreviate("Risk"), "Risk");
    }

    #[test]
    fn bar_width_stays_in_bounds() {
        let area = Rect::new(0, 0, 80, 20);
        assert_eq!(fit_bar_width(area, 0), 12);
        assert_eq!(fit_bar_width(area, 12), 5);
        assert_eq!(fit_bar_width(Rect::new(0, 0, 4, 4), 10), 1);
        assert_eq!(fit_bar_width(area, 65_536), 1);
        assert_eq!(fit_bar_width(area, usize::MAX), 1);
    }
}

use std::path::PathBuf;

use archlens_eval::{MetricsReport, ReportFormat, render_text_report};
use chrono::{Local, NaiveDateTime};

use crate::CliError;
use crate::artifacts::write_report;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Overview,
    Business,
    Security,
    Performance,
    Visualization,
    Report,
}

impl Page {
    pub const ALL: [Page; 6] = [
        Page::Overview,
        Page::Business,
        Page::Security,
        Page::Performance,
        Page::Visualization,
        Page::Report,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Page::Overview => "Data Overview",
            Page::Business => "Business Analysis",
            Page::Security => "Security",
            Page::Performance => "Performance",
            Page::Visualization => "Visualization",
            Page::Report => "Report",
        }
    }

    pub fn index(&self) -> usize {
        Page::ALL
            .iter()
            .position(|page| page == self)
            .unwrap_or_default()
    }

    pub fn next(&self) -> Self {
        Page::ALL[(self.index() + 1) % Page::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        Page::ALL[(self.index() + Page::ALL.len() - 1) % Page::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visualization {
    CostDistribution,
    Correlation,
    Departments,
}

impl Visualization {
    pub fn title(&self) -> &'static str {
        match self {
            Visualization::CostDistribution => "Cost distribution",
            Visualization::Correlation => "Correlation matrix",
            Visualization::Departments => "Department analysis",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Visualization::CostDistribution => Visualization::Correlation,
            Visualization::Correlation => Visualization::Departments,
            Visualization::Departments => Visualization::CostDistribution,
        }
    }
}

pub struct App {
    pub report: MetricsReport,
    pub input: PathBuf,
    pub out_dir: PathBuf,
    pub page: Page,
    pub visualization: Visualization,
    pub scroll_offset: u16,
    pub status: Option<String>,
    pub should_quit: bool,
    pub opened_at: NaiveDateTime,
}

impl App {
    pub fn new(report: MetricsReport, input: PathBuf, out_dir: PathBuf) -> Self {
        Self {
            report,
            input,
            out_dir,
            page: Page::Overview,
            visualization: Visualization::CostDistribution,
            scroll_offset: 0,
            status: None,
            should_quit: false,
            opened_at: Local::now().naive_local(),
        }
    }

    pub fn select_page(&mut self, page: Page) {
        if self.page != page {
            self.page = page;
            self.scroll_offset = 0;
        }
    }

    /// Plain-text report shown on the report page.
    pub fn report_preview(&self) -> String {
        render_text_report(&self.report, self.opened_at)
    }

    /// Write the markdown report to the output directory.
    pub fn save_report(&self) -> Result<PathBuf, CliError> {
        let generated_at = Local::now().naive_local();
        let path = write_report(
            &self.out_dir,
            ReportFormat::Markdown,
            &self.report,
            generated_at,
        )?;
        tracing::info!(event = "report_written", path = %path.display());
        Ok(path)
    }
}

#[cfg(test)]
pub(crate) fn sample_app(out_dir: PathBuf) -> App {
    use archlens_eval::{EngineConfig, compute_report, load_table_from_reader};
    use chrono::NaiveDate;

    let csv = "Application_Name,Maintenance_Cost,Development_Cost,Owner_Department\n\
               CRM,100,50,Sales\n\
               ERP,300,20,Finance\n";
    let table = load_table_from_reader(csv.as_bytes()).expect("load");
    let config = EngineConfig::for_date(NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date"));
    let report = compute_report(&table, &config).expect("report");
    App::new(report, PathBuf::from("inventory.csv"), out_dir)
}

use std::path::{Path, PathBuf};

use archlens_eval::{MetricsReport, ReportFormat};
use chrono::NaiveDateTime;

use super::ArtifactResult;
use super::atomic::write_bytes_atomic;

/// Render `report` and overwrite `comprehensive_analysis_report.<ext>` in `out_dir`.
pub fn write_report(
    out_dir: &Path,
    format: ReportFormat,
    report: &MetricsReport,
    generated_at: NaiveDateTime,
) -> ArtifactResult<PathBuf> {
    let path = out_dir.join(format.file_name());
    let rendered = format.render(report, generated_at);
    write_bytes_atomic(&path, rendered.as_bytes())?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use archlens_eval::{EngineConfig, compute_report, load_table_from_reader};
    use chrono::NaiveDate;
    use uuid::Uuid;

    #[test]
    fn second_write_replaces_first() {
        let out_dir = std::env::temp_dir().join(format!("archlens-report-{}", Uuid::new_v4()));
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date");
        let config = EngineConfig::for_date(date);
        let table = load_table_from_reader("Application_Name,Risk_Level\nCRM,High\n".as_bytes())
            .expect("load");
        let report = compute_report(&table, &config).expect("report");

        let first_at = date.and_hms_opt(9, 0, 0).expect("valid time");
        let second_at = date.and_hms_opt(10, 0, 0).expect("valid time");
        let path = write_report(&out_dir, ReportFormat::Text, &report, first_at).expect("first");
        write_report(&out_dir, ReportFormat::Text, &report, second_at).expect("second");

        let content = std::fs::read_to_string(&path).expect("read report");
        assert_eq!(
            path.file_name().and_then(|name| name.to_str()),
            Some("comprehensive_analysis_report.txt")
        );
        assert!(content.contains("Analysis Date: 2024-06-01 10:00:00"));
        assert!(!content.contains("09:00:00"));

        std::fs::remove_dir_all(&out_dir).expect("cleanup");
    }
}

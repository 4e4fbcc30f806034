mod artifacts;
mod dashboard;
mod registry;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use archlens_eval::{
    EngineConfig, EvalError, LoadError, MetricsEngine, MetricsReport, ReportFormat,
    load_table_csv, render_console,
};
use chrono::{Local, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use registry::{RUN_FAILED_TARGET, RunContext, init_logging, start_run, write_metrics};
use schemars::schema_for;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
enum CliError {
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error("artifact error: {0}")]
    Artifacts(#[from] artifacts::ArtifactError),
    #[error("failed to load table: {0}")]
    Load(#[from] LoadError),
    #[error("{0}")]
    Eval(#[from] EvalError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "archlens", version, about = "Architecture inventory analyzer")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute metrics for an inventory export and write the reports.
    Analyze(AnalyzeArgs),
    /// Browse the metrics of an inventory export in the terminal.
    Dashboard(DashboardArgs),
    /// Print the JSON Schema of metrics.json.
    Schema,
}

#[derive(Args, Debug, Clone)]
struct EngineArgs {
    /// Inventory export (CSV with a header row).
    #[arg(value_name = "INPUT")]
    input: PathBuf,
    /// Engine configuration file (TOML).
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Directory receiving comprehensive_analysis_report.{txt,md}.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
    /// Reference date for future-dated detection (YYYY-MM-DD).
    #[arg(long, value_name = "DATE")]
    as_of: Option<NaiveDate>,
    /// Length of the most-expensive ranking.
    #[arg(long, value_name = "N")]
    top_n: Option<usize>,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    #[command(flatten)]
    engine: EngineArgs,
    /// Output directory for runs.
    #[arg(long, default_value = "runs")]
    run_dir: PathBuf,
    /// Report artifact format.
    #[arg(long, value_enum, default_value_t = FormatArg::Text)]
    format: FormatArg,
    /// Skip the console report.
    #[arg(long, default_value_t = false)]
    quiet: bool,
}

#[derive(Args, Debug)]
struct DashboardArgs {
    #[command(flatten)]
    engine: EngineArgs,
    /// Append NDJSON logs to this file.
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Text,
    Markdown,
    Both,
}

impl FormatArg {
    fn formats(self) -> Vec<ReportFormat> {
        match self {
            FormatArg::Text => vec![ReportFormat::Text],
            FormatArg::Markdown => vec![ReportFormat::Markdown],
            FormatArg::Both => vec![ReportFormat::Text, ReportFormat::Markdown],
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Analyze(args) => run_analyze(args),
        Command::Dashboard(args) => run_dashboard(args),
        Command::Schema => print_schema(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(target: RUN_FAILED_TARGET, event = "run_failed", error = %err);
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_analyze(args: AnalyzeArgs) -> Result<(), CliError> {
    let AnalyzeArgs {
        engine,
        run_dir,
        format,
        quiet,
    } = args;

    let config = resolve_config(&engine)?;
    let formats = format.formats();

    let run_ctx = RunContext {
        run_id: Uuid::new_v4().to_string(),
        started_at: Utc::now(),
        input: engine.input.clone(),
        run_dir,
        out_dir: engine.out_dir.clone(),
        formats: formats
            .iter()
            .map(|format| format.extension().to_string())
            .collect(),
        engine: config.clone(),
    };

    let run_paths = start_run(&run_ctx)?;
    init_logging(Some(&run_paths.logs_path), true)?;

    tracing::info!(
        event = "run_started",
        run_id = %run_ctx.run_id,
        run_dir = %run_paths.root.display(),
        input = %engine.input.display()
    );

    let timer = Instant::now();

    let report = analyze(&engine, config)?;

    write_metrics(&run_paths, &report)?;
    tracing::info!(event = "metrics_written", path = %run_paths.metrics_path.display());

    if !quiet {
        println!("{}", render_console(&report));
    }

    let generated_at = Local::now().naive_local();
    for format in formats {
        let path = artifacts::write_report(&engine.out_dir, format, &report, generated_at)?;
        tracing::info!(event = "report_written", path = %path.display());
        if !quiet {
            println!("\nReport saved to {}", path.display());
        }
    }

    let duration_ms = timer.elapsed().as_millis();
    tracing::info!(event = "run_finished", status = "success", duration_ms = duration_ms);

    Ok(())
}

fn run_dashboard(args: DashboardArgs) -> Result<(), CliError> {
    let DashboardArgs { engine, log_file } = args;

    let config = resolve_config(&engine)?;
    if let Some(log_file) = &log_file {
        init_logging(Some(log_file), false)?;
    }

    let report = analyze(&engine, config)?;
    dashboard::run(report, engine.input, engine.out_dir)
}

fn print_schema() -> Result<(), CliError> {
    let schema = schema_for!(MetricsReport);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

/// TOML file first, then command-line overrides.
fn resolve_config(args: &EngineArgs) -> Result<EngineConfig, CliError> {
    let mut config = artifacts::load_engine_config(args.config.as_deref())?;
    if let Some(as_of) = args.as_of {
        config.as_of = as_of;
    }
    if let Some(top_n) = args.top_n {
        config.top_n_expensive = top_n;
    }
    config.validate()?;
    Ok(config)
}

fn analyze(args: &EngineArgs, config: EngineConfig) -> Result<MetricsReport, CliError> {
    let table = load_table_csv(&args.input)?;
    tracing::info!(
        event = "table_loaded",
        rows = table.row_count(),
        columns = table.column_count()
    );

    let report = MetricsEngine::new(config).compute(&table)?;
    tracing::info!(
        event = "report_computed",
        overall_quality = report.quality.overall,
        level = %report.quality.level
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyze_flags_parse() {
        let cli = Cli::try_parse_from([
            "archlens",
            "analyze",
            "inventory.csv",
            "--format",
            "both",
            "--as-of",
            "2024-06-01",
            "--top-n",
            "3",
            "--quiet",
        ])
        .expect("parse args");

        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.engine.input, PathBuf::from("inventory.csv"));
        assert_eq!(args.format, FormatArg::Both);
        assert_eq!(args.engine.as_of, NaiveDate::from_ymd_opt(2024, 6, 1));
        assert_eq!(args.engine.top_n, Some(3));
        assert!(args.quiet);
        assert_eq!(args.run_dir, PathBuf::from("runs"));
    }

    #[test]
    fn flags_override_defaults() {
        let args = EngineArgs {
            input: PathBuf::from("inventory.csv"),
            config: None,
            out_dir: PathBuf::from("."),
            as_of: NaiveDate::from_ymd_opt(2023, 12, 31),
            top_n: Some(10),
        };

        let config = resolve_config(&args).expect("config");

        assert_eq!(config.as_of, NaiveDate::from_ymd_opt(2023, 12, 31).expect("date"));
        assert_eq!(config.top_n_expensive, 10);
        assert_eq!(config.security_threshold, 80.0);
    }

    #[test]
    fn both_formats_write_text_then_markdown() {
        assert_eq!(
            FormatArg::Both.formats(),
            vec![ReportFormat::Text, ReportFormat::Markdown]
        );
    }

    #[test]
    fn missing_input_is_a_load_error() {
        let args = EngineArgs {
            input: PathBuf::from("definitely/not/here.csv"),
            config: None,
            out_dir: PathBuf::from("."),
            as_of: None,
            top_n: None,
        };

        let err = analyze(&args, EngineConfig::default()).expect_err("missing file");
        assert!(matches!(err, CliError::Load(LoadError::Io(_))));
    }
}

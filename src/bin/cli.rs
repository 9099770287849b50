use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use cpm_tool::error::CpmError;
use cpm_tool::ingest::{self, LoadedProject};
use cpm_tool::logging::{LogLevel, init_logging};
use cpm_tool::report::{CriticalPathReport, render_cycle_report};
use cpm_tool::table::{render_text_table, schedule_table};
use cpm_tool::{CpmConfig, CpmOutcome, CriticalPathCalculator};

/// Critical path analysis for activity networks.
#[derive(Debug, Parser)]
#[command(name = "cli", version, long_about = None)]
struct CliArgs {
    /// Project snapshot (.json) or activities table (.csv).
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Dependencies table accompanying a CSV activities file.
    #[arg(long, value_name = "PATH")]
    dependencies: Option<PathBuf>,

    /// Engine settings (JSON).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Only list circular dependencies.
    #[arg(long)]
    cycles: bool,

    /// Load and validate the input, then stop.
    #[arg(long)]
    validate_only: bool,

    /// Logging level. Falls back to `CPM_LOG`, then `info`.
    #[arg(long, value_enum, value_name = "LEVEL")]
    log_level: Option<LogLevel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn load(input: &Path, dependencies: Option<&Path>) -> Result<LoadedProject> {
    let is_csv = input
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    let loaded = if is_csv {
        ingest::load_project_from_csv(input, dependencies)
    } else {
        ingest::load_project_from_json(input)
    };
    loaded.with_context(|| format!("failed to load {}", input.display()))
}

fn print_text(loaded: &LoadedProject, outcome: &CpmOutcome, hours_per_day: f64) -> Result<()> {
    let info = &loaded.project.info;
    let report = CriticalPathReport::new(info, outcome, hours_per_day);
    println!("{} ({})", info.project_name, info.project_code);
    println!("{}", report.summary.to_cli_summary());
    println!();

    let df = schedule_table(&loaded.project.activities, outcome)
        .context("failed to build schedule table")?;
    print!("{}", render_text_table(&df));

    for path in &report.critical_paths {
        println!();
        let marker = if path.is_primary { " (primary)" } else { "" };
        println!(
            "Path {}{}: {} activities, {}h / {}d",
            path.path_id, marker, path.activity_count, path.duration_hours, path.duration_days
        );
        for step in &path.activities {
            println!("  {}. [{}] {}", step.sequence, step.task_code, step.task_name);
        }
    }
    Ok(())
}

fn main() -> Result<ExitCode> {
    let args = CliArgs::parse();
    init_logging(args.log_level)?;

    let config = match &args.config {
        Some(path) => CpmConfig::from_json_file(path)
            .with_context(|| format!("failed to read config {}", path.display()))?,
        None => CpmConfig::default(),
    };

    let loaded = load(&args.input, args.dependencies.as_deref())?;
    let project = &loaded.project;

    if args.validate_only {
        println!(
            "valid: {} activities, {} dependencies ({} duplicates, {} dropped dependencies)",
            project.activities.len(),
            project.dependencies.len(),
            loaded.duplicates.values().map(Vec::len).sum::<usize>(),
            loaded.dropped_dependencies.len()
        );
        return Ok(ExitCode::SUCCESS);
    }

    let calculator = CriticalPathCalculator::for_project(project).with_config(config.clone());

    if args.cycles {
        let cycles = calculator.detect_cycles()?;
        match args.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&cycles)?),
            OutputFormat::Text if cycles.is_empty() => println!("no circular dependencies found"),
            OutputFormat::Text => {
                print!("{}", render_cycle_report(&project.info.project_code, &cycles))
            }
        }
        return Ok(ExitCode::SUCCESS);
    }

    let outcome = match calculator.calculate() {
        Ok(outcome) => outcome,
        Err(CpmError::Cycle { cycles }) => {
            eprint!("{}", render_cycle_report(&project.info.project_code, &cycles));
            return Ok(ExitCode::FAILURE);
        }
        Err(err) => return Err(err.into()),
    };

    match args.format {
        OutputFormat::Json => {
            let report = CriticalPathReport::new(&project.info, &outcome, config.hours_per_day);
            println!("{}", report.to_json_pretty()?);
        }
        OutputFormat::Text => print_text(&loaded, &outcome, config.hours_per_day)?,
    }
    Ok(ExitCode::SUCCESS)
}

//! Library module for the `dsquality` binary.
//!
//! Argument parsing and command execution live here so they can be tested
//! without spawning a process. `main.rs` only parses, sets up logging and
//! prints what [`execute`] returns.

pub mod report;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, bail};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use dsquality_core::{
    EvaluationEvent, EvaluationObserver, EvaluationOutcome, LoadOptions, MetricsSnapshot,
    QualityConfig, QualityEngine, QualityResult, RequestStats, SummaryInput, Table, TableFlags,
    load_csv, write_csv,
    quality::{
        DEFAULT_TOP_K, DatasetOverview, MissingRow, ProblematicColumn, missing_table,
        problematic_columns,
    },
};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::report::{JsonSummary, ReportSettings, render_markdown, verdict_message};

/// CLI argument structure
#[derive(Debug, Parser)]
#[command(name = "dsquality")]
#[command(about = "Dataset quality checks for model training")]
#[command(version)]
#[command(long_about = "
dsquality - decide whether a dataset is fit for model training

Two evaluation modes share one set of thresholds:
- summary: coarse 0-1 estimate from aggregate counts only
- inspect: exact 0-100 score from a full scan of CSV files

EXAMPLES:
  dsquality summary --rows 2000 --cols 15 --max-missing-share 0.2 --numeric-cols 8 --categorical-cols 7
  dsquality inspect data/*.csv --metrics
  dsquality --threshold pass_score:60,zero:0.7 inspect sales.csv
  dsquality overview sales.csv --top-k 3
  dsquality report sales.csv --out-dir reports --json-summary
  dsquality sample sales.csv -n 10 --seed 42
")]
pub struct Cli {
    /// Options shared by every subcommand
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Estimate quality from aggregate counts
    Summary(SummaryArgs),
    /// Inspect one or more CSV files
    Inspect(InspectArgs),
    /// Describe a CSV file: missing values, numeric and categorical summaries
    Overview(OverviewArgs),
    /// Write a Markdown quality report (and optionally a JSON summary)
    Report(ReportArgs),
    /// Print the first rows of a CSV file
    Head(HeadArgs),
    /// Print randomly drawn rows of a CSV file
    Sample(SampleArgs),
    /// Print the effective configuration
    Config,
}

/// Arguments of the `summary` subcommand
#[derive(Debug, Args)]
pub struct SummaryArgs {
    /// Number of rows
    #[arg(long)]
    pub rows: u64,

    /// Number of columns
    #[arg(long)]
    pub cols: u64,

    /// Largest per-column missing share (0.0-1.0)
    #[arg(long)]
    pub max_missing_share: f64,

    /// Number of numeric columns
    #[arg(long)]
    pub numeric_cols: u64,

    /// Number of categorical columns
    #[arg(long)]
    pub categorical_cols: u64,
}

/// Arguments of the `inspect` subcommand
#[derive(Debug, Args)]
pub struct InspectArgs {
    /// CSV files to inspect
    #[arg(required = true, value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// CSV reading options
    #[command(flatten)]
    pub csv: CsvArgs,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Include request counters in the report
    #[arg(long)]
    pub metrics: bool,
}

/// Arguments of the `overview` subcommand
#[derive(Debug, Args)]
pub struct OverviewArgs {
    /// CSV file to describe
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// CSV reading options
    #[command(flatten)]
    pub csv: CsvArgs,

    /// Most frequent values reported per categorical column
    #[arg(long, default_value_t = DEFAULT_TOP_K)]
    pub top_k: usize,

    /// Report columns with at least this missing share (0.0-1.0)
    #[arg(long, default_value_t = 0.1)]
    pub min_missing_share: f64,
}

/// Arguments of the `report` subcommand
#[derive(Debug, Args)]
pub struct ReportArgs {
    /// CSV file to report on
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// CSV reading options
    #[command(flatten)]
    pub csv: CsvArgs,

    /// Directory receiving `report.md` (and `summary.json`)
    #[arg(short, long, default_value = "reports", value_name = "DIR")]
    pub out_dir: PathBuf,

    /// Report heading
    #[arg(short, long, default_value = "Dataset Quality Report")]
    pub title: String,

    /// Most frequent values listed per categorical column
    #[arg(long, default_value_t = DEFAULT_TOP_K)]
    pub top_k_categories: usize,

    /// List columns with at least this missing share (0.0-1.0)
    #[arg(long, default_value_t = 0.1)]
    pub min_missing_share: f64,

    /// Also write a compact `summary.json`
    #[arg(long)]
    pub json_summary: bool,
}

/// Arguments of the `head` subcommand
#[derive(Debug, Args)]
pub struct HeadArgs {
    /// CSV file to read
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// CSV reading options
    #[command(flatten)]
    pub csv: CsvArgs,

    /// Number of rows
    #[arg(short = 'n', long = "rows", default_value_t = 5)]
    pub n: usize,
}

/// Arguments of the `sample` subcommand
#[derive(Debug, Args)]
pub struct SampleArgs {
    /// CSV file to read
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// CSV reading options
    #[command(flatten)]
    pub csv: CsvArgs,

    /// Number of rows
    #[arg(short = 'n', long = "rows", default_value_t = 5)]
    pub n: usize,

    /// Seed for a reproducible draw (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,
}

/// CSV reading options shared by the file-based subcommands
#[derive(Debug, Args)]
pub struct CsvArgs {
    /// Field delimiter
    #[arg(long, default_value = ",", value_parser = parse_delimiter)]
    pub delimiter: u8,

    /// Keep whitespace around headers and cells
    #[arg(long)]
    pub no_trim: bool,
}

impl CsvArgs {
    /// Loader options matching these arguments.
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions::new()
            .with_delimiter(self.delimiter)
            .with_trim(!self.no_trim)
    }
}

/// Options shared by every subcommand
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv, -vvv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true, help = "Suppress all logs except errors")]
    pub quiet: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// JSON configuration file
    #[arg(long, global = true, env = "DSQUALITY_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Threshold overrides (format: key:value)
    #[arg(
        long,
        global = true,
        value_delimiter = ',',
        help = "Threshold overrides (min_rows:500,pass_score:60,zero:0.7)"
    )]
    pub threshold: Vec<String>,
}

fn parse_delimiter(value: &str) -> Result<u8, String> {
    let value = if value == "\\t" { "\t" } else { value };
    match value.as_bytes() {
        [byte] if byte.is_ascii() => Ok(*byte),
        _ => Err(format!("delimiter must be a single ASCII character, got '{value}'")),
    }
}

/// Threshold values parsed from `--threshold` arguments.
#[derive(Debug, Default, PartialEq)]
pub struct ThresholdOverrides {
    /// `min_rows`
    pub min_rows: Option<u64>,
    /// `max_columns`
    pub max_columns: Option<u64>,
    /// `missing_limit`
    pub missing_limit: Option<f64>,
    /// `high_missing`
    pub high_missing: Option<f64>,
    /// `cardinality`
    pub cardinality: Option<f64>,
    /// `cardinality_floor`
    pub cardinality_floor: Option<u64>,
    /// `zero`
    pub zero: Option<f64>,
    /// `pass_score`
    pub pass_score: Option<f64>,
}

impl ThresholdOverrides {
    /// Applies every present override on top of `config`.
    #[must_use]
    pub fn apply(&self, config: QualityConfig) -> QualityConfig {
        let mut summary = config.summary;
        let mut table = config.table;

        if let Some(v) = self.min_rows {
            summary = summary.with_min_rows(v);
        }
        if let Some(v) = self.max_columns {
            summary = summary.with_max_columns(v);
        }
        if let Some(v) = self.missing_limit {
            summary = summary.with_missing_limit(v);
        }
        if let Some(v) = self.high_missing {
            table = table.with_high_missing_limit(v);
        }
        if let Some(v) = self.cardinality {
            table = table.with_cardinality_limit(v);
        }
        if let Some(v) = self.cardinality_floor {
            table = table.with_cardinality_floor(v);
        }
        if let Some(v) = self.zero {
            table = table.with_zero_limit(v);
        }
        if let Some(v) = self.pass_score {
            table = table.with_pass_score(v);
        }

        QualityConfig::new().with_summary(summary).with_table(table)
    }
}

/// Parses threshold overrides from CLI arguments.
///
/// Unknown keys and unparsable values are logged and skipped.
#[must_use]
pub fn parse_thresholds(thresholds: &[String]) -> ThresholdOverrides {
    let mut overrides = ThresholdOverrides::default();

    for threshold in thresholds {
        let Some((key, value)) = threshold.split_once(':') else {
            warn!("Ignoring threshold without key:value form: {}", threshold);
            continue;
        };
        let key = key.trim().to_lowercase();
        let value = value.trim();

        match key.as_str() {
            "min_rows" | "max_columns" | "cardinality_floor" => {
                let Ok(v) = value.parse::<u64>() else {
                    warn!("Invalid threshold value for {}: {}", key, value);
                    continue;
                };
                match key.as_str() {
                    "min_rows" => overrides.min_rows = Some(v),
                    "max_columns" => overrides.max_columns = Some(v),
                    _ => overrides.cardinality_floor = Some(v),
                }
            }
            "missing_limit" | "high_missing" | "cardinality" | "zero" | "pass_score" => {
                let Ok(v) = value.parse::<f64>() else {
                    warn!("Invalid threshold value for {}: {}", key, value);
                    continue;
                };
                match key.as_str() {
                    "missing_limit" => overrides.missing_limit = Some(v),
                    "high_missing" => overrides.high_missing = Some(v),
                    "cardinality" => overrides.cardinality = Some(v),
                    "zero" => overrides.zero = Some(v),
                    _ => overrides.pass_score = Some(v),
                }
            }
            _ => warn!("Unknown threshold: {}", key),
        }
    }

    overrides
}

/// Builds the effective configuration: defaults, then the config file, then
/// `--threshold` overrides.
///
/// # Errors
///
/// Fails if the config file cannot be read or parsed, or if the resulting
/// configuration does not validate.
pub fn load_config(global: &GlobalArgs) -> anyhow::Result<QualityConfig> {
    let base = match &global.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            let config = QualityConfig::from_json_str(&text)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?;
            debug!("Loaded configuration from {}", path.display());
            config
        }
        None => QualityConfig::default(),
    };

    let config = parse_thresholds(&global.threshold).apply(base);
    config.validate().context("Invalid quality configuration")?;
    Ok(config)
}

/// One inspected file inside an `inspect` report.
#[derive(Debug, Serialize)]
pub struct FileReport {
    /// Path of the inspected file
    pub file: String,
    /// Identifier shared by all reports of one invocation
    pub run_id: Uuid,
    /// When the report was produced
    pub generated_at: DateTime<Utc>,
    /// Verdict in words
    pub message: String,
    /// Inspection result
    pub result: QualityResult<TableFlags>,
}

/// Output of the `inspect` subcommand.
#[derive(Debug, Serialize)]
pub struct InspectReport {
    /// Successful inspections, in argument order
    pub reports: Vec<FileReport>,
    /// Number of files that could not be loaded or inspected
    pub failures: u64,
    /// Request counters, when `--metrics` is given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<MetricsSnapshot>,
}

/// Output of the `overview` subcommand.
#[derive(Debug, Serialize)]
pub struct OverviewReport {
    /// Path of the described file
    pub file: String,
    /// Descriptive overview
    pub overview: DatasetOverview,
    /// Missing values for every column
    pub missing_table: Vec<MissingRow>,
    /// Columns at or above the requested missing share
    pub problematic_columns: Vec<ProblematicColumn>,
}

/// Executes the parsed command and returns the text to print on stdout.
///
/// # Errors
///
/// Returns an error for invalid configuration, strict summary validation
/// failures, unreadable files, or when no file could be inspected.
pub fn execute(cli: &Cli) -> anyhow::Result<String> {
    let config = load_config(&cli.global)?;

    match &cli.command {
        Command::Summary(args) => run_summary(args, config),
        Command::Inspect(args) => run_inspect(args, config),
        Command::Overview(args) => run_overview(args),
        Command::Report(args) => run_report(args, config),
        Command::Head(args) => run_head(args),
        Command::Sample(args) => run_sample(args),
        Command::Config => to_json(&config),
    }
}

fn run_summary(args: &SummaryArgs, config: QualityConfig) -> anyhow::Result<String> {
    let input = SummaryInput::new(
        args.rows,
        args.cols,
        args.max_missing_share,
        args.numeric_cols,
        args.categorical_cols,
    );
    input.validate()?;

    let result = QualityEngine::new(config).estimate_from_summary(&input);
    info!(
        "Summary estimate: score {:.2}, ok_for_model = {}",
        result.quality_score, result.ok_for_model
    );
    to_json(&result)
}

fn run_inspect(args: &InspectArgs, config: QualityConfig) -> anyhow::Result<String> {
    let engine = QualityEngine::new(config);
    let options = args.csv.load_options();
    let stats = RequestStats::new();
    let run_id = Uuid::new_v4();

    let mut reports = Vec::with_capacity(args.files.len());
    let mut failures: u64 = 0;

    for path in &args.files {
        let started = Instant::now();
        let outcome = load_csv(path, &options).and_then(|table| engine.inspect_table(&table));
        let latency = started.elapsed();

        match outcome {
            Ok(result) => {
                info!(
                    "Inspected {}: score {:.0}, ok_for_model = {}",
                    path.display(),
                    result.quality_score,
                    result.ok_for_model
                );
                stats.record(&EvaluationEvent::new(
                    "inspect",
                    latency,
                    EvaluationOutcome::Ok {
                        ok_for_model: result.ok_for_model,
                    },
                ));
                reports.push(FileReport {
                    file: path.display().to_string(),
                    run_id,
                    generated_at: Utc::now(),
                    message: verdict_message(result.ok_for_model).to_string(),
                    result,
                });
            }
            Err(e) => {
                if e.is_empty_dataset() {
                    warn!("Skipping '{}': {}", path.display(), e);
                } else {
                    warn!("Quality inspection failed for '{}': {}", path.display(), e);
                }
                stats.record(&EvaluationEvent::new(
                    "inspect",
                    latency,
                    EvaluationOutcome::Error,
                ));
                failures += 1;
            }
        }
    }

    if reports.is_empty() {
        bail!("None of the {} file(s) could be inspected", args.files.len());
    }

    let report = InspectReport {
        reports,
        failures,
        metrics: args.metrics.then(|| stats.snapshot()),
    };
    let json = to_json(&report)?;

    match &args.output {
        Some(path) => {
            write_report(path, &json)?;
            Ok(format!(
                "Wrote {} report(s) to {}",
                report.reports.len(),
                path.display()
            ))
        }
        None => Ok(json),
    }
}

fn run_overview(args: &OverviewArgs) -> anyhow::Result<String> {
    let table = load_csv(&args.file, &args.csv.load_options())?;

    let report = OverviewReport {
        file: args.file.display().to_string(),
        overview: DatasetOverview::from_table_with_top_k(&table, args.top_k),
        missing_table: missing_table(&table),
        problematic_columns: problematic_columns(&table, args.min_missing_share),
    };
    to_json(&report)
}

fn run_report(args: &ReportArgs, config: QualityConfig) -> anyhow::Result<String> {
    let table = load_csv(&args.file, &args.csv.load_options())?;
    let file = args.file.display().to_string();
    let result = QualityEngine::new(config)
        .inspect_table(&table)
        .with_context(|| format!("Failed to inspect {file}"))?;
    let overview = DatasetOverview::from_table_with_top_k(&table, args.top_k_categories);
    let problematic = problematic_columns(&table, args.min_missing_share);

    std::fs::create_dir_all(&args.out_dir).with_context(|| {
        format!(
            "Failed to create report directory {}",
            args.out_dir.display()
        )
    })?;

    let settings = ReportSettings {
        title: &args.title,
        file: &file,
        min_missing_share: args.min_missing_share,
        top_k: args.top_k_categories,
    };
    let markdown_path = args.out_dir.join("report.md");
    write_report(
        &markdown_path,
        &render_markdown(&settings, &result, &overview, &problematic),
    )?;
    let mut written = vec![markdown_path];

    if args.json_summary {
        let summary_path = args.out_dir.join("summary.json");
        let summary = JsonSummary::new(&result, &overview, &problematic);
        write_report(&summary_path, &to_json(&summary)?)?;
        written.push(summary_path);
    }

    Ok(written
        .iter()
        .map(|path| format!("Wrote {}", path.display()))
        .collect::<Vec<_>>()
        .join("\n"))
}

fn run_head(args: &HeadArgs) -> anyhow::Result<String> {
    let table = load_csv(&args.file, &args.csv.load_options())?;
    to_csv(&table.head(args.n), args.csv.delimiter)
}

fn run_sample(args: &SampleArgs) -> anyhow::Result<String> {
    let table = load_csv(&args.file, &args.csv.load_options())?;
    let seed = args.seed.unwrap_or_else(rand::random);
    debug!("Sampling {} row(s) with seed {}", args.n, seed);
    to_csv(&table.sample(args.n, seed), args.csv.delimiter)
}

fn to_csv(table: &Table, delimiter: u8) -> anyhow::Result<String> {
    let mut buffer = Vec::new();
    write_csv(table, &mut buffer, delimiter)?;
    let text = String::from_utf8(buffer).context("CSV output is not valid UTF-8")?;
    Ok(text.trim_end().to_string())
}

fn write_report(path: &Path, contents: &str) -> anyhow::Result<()> {
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    info!("Report saved to {}", path.display());
    Ok(())
}

fn to_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output")
}

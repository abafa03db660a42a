//! CLI entry point for the food nutrition analysis pipeline.
//!
//! Loads the per-category nutrition CSV exports, cleans the merged
//! dataset, computes the analysis views, and persists them as JSON
//! documents plus a flat cleaned CSV.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use food_data_analyzer::analyzers::analyzer::analyze;
use food_data_analyzer::cleaner::clean;
use food_data_analyzer::loader::load_and_merge;
use food_data_analyzer::output::{save_analyses, write_cleaned_csv};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "food_data_analyzer")]
#[command(about = "Analyze per-category food nutrition CSV exports", long_about = None)]
struct Cli {
    /// Glob pattern selecting the nutrition CSV files to load
    #[arg(short, long, default_value = "dataset/FOOD-DATA-GROUP*.csv")]
    pattern: String,

    /// Directory the JSON analysis documents are written to
    #[arg(short, long, default_value = "analyses")]
    output_dir: PathBuf,

    /// Path the cleaned dataset CSV is written to
    #[arg(short, long, default_value = "cleaned_food_data.csv")]
    cleaned_csv: PathBuf,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/food_data_analyzer.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("food_data_analyzer.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    run(&cli)
}

/// Runs the whole pipeline: load → clean → analyze → save.
#[tracing::instrument(skip(cli), fields(pattern = %cli.pattern))]
fn run(cli: &Cli) -> Result<()> {
    let mut table = load_and_merge(&cli.pattern)?;
    info!(records = table.row_count(), "Records loaded from CSV files");

    clean(&mut table)?;
    info!("Dataset cleaned");

    let bundle = analyze(&table)?;
    info!("Analyses completed");

    save_analyses(&cli.output_dir, &bundle)?;
    info!(dir = %cli.output_dir.display(), "Analyses saved");

    write_cleaned_csv(&cli.cleaned_csv, &table)?;
    info!(path = %cli.cleaned_csv.display(), "Cleaned dataset saved");

    Ok(())
}

//! Campaign Report Binary - Analysis and Export Façade
//!
//! Thin entry point over the aggregation engine and the export renderers:
//! parses the date window, refreshes the cached rollup, computes the
//! stage-distribution analysis, and writes the requested export files.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release --bin campaign_report -- --from 2025-01-01 --to 2025-01-31 --format xlsx
//! ```
//!
//! ## Arguments
//!
//! - --from YYYY-MM-DD - window start (default: 30 days ago)
//! - --to YYYY-MM-DD - window end (default: today)
//! - --format csv|xlsx|pdf|all - export format (default: xlsx)
//! - --json - also print the analysis result as JSON to stdout
//!
//! ## Environment Variables
//!
//! - LEADFLOW_DB_PATH - SQLite database with the CRM tables (default: data/crm.db)
//! - LEADFLOW_EXPORT_DIR - output directory for export files (default: exports)
//! - LEADFLOW_LOCALE - display locale for translated names (default: en_US)
//! - RUST_LOG - logging level (optional, default: info)

use chrono::{Duration, NaiveDate, Utc};
use leadflow::analysis_core::{AnalysisEngine, DateWindow, LeadStore};
use leadflow::config::Config;
use leadflow::export::{ExportFormat, ExportWriter};
use std::env;

fn arg_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|idx| args.get(idx + 1))
        .cloned()
}

/// Parse a window date, falling back to the default on malformed input
fn parse_date_arg(args: &[String], flag: &str, default: NaiveDate) -> NaiveDate {
    match arg_value(args, flag) {
        Some(raw) => match NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
            Ok(date) => date,
            Err(_) => {
                log::warn!(
                    "⚠️ Invalid {} date '{}', falling back to {}",
                    flag,
                    raw,
                    default
                );
                default
            }
        },
        None => default,
    }
}

fn parse_formats(args: &[String]) -> Vec<ExportFormat> {
    match arg_value(args, "--format").as_deref() {
        Some("all") => ExportFormat::all().to_vec(),
        Some(raw) => match ExportFormat::from_str(raw) {
            Some(format) => vec![format],
            None => {
                log::warn!("⚠️ Unknown format '{}', defaulting to xlsx", raw);
                vec![ExportFormat::Xlsx]
            }
        },
        None => vec![ExportFormat::Xlsx],
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    dotenv::dotenv().ok();

    let config = Config::from_env();
    let args: Vec<String> = env::args().collect();

    let today = Utc::now().date_naive();
    let date_from = parse_date_arg(&args, "--from", today - Duration::days(30));
    let date_to = parse_date_arg(&args, "--to", today);
    let formats = parse_formats(&args);
    let emit_json = args.iter().any(|a| a == "--json");

    let window = DateWindow::from_dates(date_from, date_to)?;

    log::info!("🚀 Starting campaign analysis report");
    log::info!("   Database: {}", config.db_path.display());
    log::info!("   Window: {} to {}", date_from, date_to);
    log::info!("   Export dir: {}", config.export_dir.display());

    let store = LeadStore::open(&config.db_path, &config.locale)?;
    let mut engine = AnalysisEngine::new(store)?;

    // Keep the fast-path rollup warm; a failed refresh is only a warning
    // since the windowed analysis below recomputes from the live tables
    match engine.refresh_rollup() {
        Ok(rows) => log::info!("📊 Rollup refreshed ({} rows)", rows),
        Err(e) => log::warn!("⚠️ Rollup refresh failed, keeping previous snapshot: {}", e),
    }

    let result = engine.compute_analysis(window.date_from, window.date_to)?;
    log::info!(
        "📈 {} campaigns across {} stages in window",
        result.campaigns.len(),
        result.stages.len()
    );

    if emit_json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    let writer = ExportWriter::new(today);
    for format in formats {
        writer
            .save_to_dir(&result, format, &config.export_dir)
            .await?;
    }

    Ok(())
}

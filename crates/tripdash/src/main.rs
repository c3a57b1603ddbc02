use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tripdash_core::{
    ingest_bytes, observed_statuses, DashboardConfig, DashboardSession, IngestedTable,
    StatusFilter,
};

mod render;

#[derive(Parser, Debug)]
#[command(author, version, about = "Booking analytics for travel-desk spreadsheets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run every dashboard view over a bookings spreadsheet
    Report(ReportArgs),
    /// List the Status values present in a spreadsheet
    Statuses(FileArgs),
    /// Show how a spreadsheet was read
    Inspect(FileArgs),
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// Spreadsheet to analyse (.xlsx, .xls, .ods or .csv)
    file: PathBuf,
    /// Keep only rows with this Status; repeatable. All statuses when omitted
    #[arg(long = "status", value_name = "STATUS")]
    statuses: Vec<String>,
    /// Keep rows whose Status is blank; combines with --status
    #[arg(long)]
    blank_status: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
    /// TOML file with dashboard settings
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct FileArgs {
    file: PathBuf,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Report(args) => {
            let mut session = open_session(args.config.as_deref())?;
            let bytes = read_upload(&args.file)?;
            let filter = status_filter(&args);

            let report = session
                .report(&bytes, &filter)
                .with_context(|| format!("failed to analyse {}", args.file.display()))?;
            info!(
                rows = report.row_count,
                views = report.results.len(),
                skipped = report.skipped.len(),
                "report ready"
            );

            match args.format {
                OutputFormat::Table => print!("{}", render::ReportTables(&report)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            }
            Ok(())
        }
        Command::Statuses(args) => {
            let ingested = ingest_file(&args.file)?;
            match observed_statuses(&ingested.table)? {
                Some(observed) => println!("{}", render::status_table(&observed)),
                None => println!("{} has no Status column", args.file.display()),
            }
            Ok(())
        }
        Command::Inspect(args) => {
            let ingested = ingest_file(&args.file)?;
            println!("{}", render::inspect_table(&ingested));
            Ok(())
        }
    }
}

fn status_filter(args: &ReportArgs) -> StatusFilter {
    if args.statuses.is_empty() && !args.blank_status {
        StatusFilter::all_observed()
    } else {
        StatusFilter::only(args.statuses.iter().cloned()).with_missing(args.blank_status)
    }
}

fn open_session(config: Option<&Path>) -> Result<DashboardSession> {
    let config = DashboardConfig::load(config).context("failed to load dashboard config")?;
    Ok(DashboardSession::new(config))
}

fn ingest_file(path: &Path) -> Result<IngestedTable> {
    let bytes = read_upload(path)?;
    ingest_bytes(&bytes).with_context(|| format!("failed to read {}", path.display()))
}

fn read_upload(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

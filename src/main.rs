use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use case_tracker_service::history::{walker, DirSource, HistoryWalker};
use case_tracker_service::series::SeriesBuilder;
use case_tracker_service::snapshot::RecordParser;

#[derive(Parser)]
#[command(name = "case-tracker-service")]
#[command(
    about = "Rebuild the daily outbreak statistics table from a snapshot revision history",
    long_about = None
)]
struct Cli {
    /// Exported snapshot history: one subdirectory per revision, named so
    /// that lexicographic order is chronological order
    #[arg(long, env = "SNAPSHOT_DIR")]
    snapshots: PathBuf,

    /// ZIP codes whose case counts are summed into the neighborhood column
    #[arg(long, env = "NEIGHBORHOOD_ZIP_CODES", value_delimiter = ',')]
    zip_codes: Vec<String>,

    /// Name of the per-revision summary file
    #[arg(long, env = "SUMMARY_FILE_NAME", default_value = walker::SUMMARY_FILE_NAME)]
    summary_file: String,

    /// Name of the per-revision breakdown-by-ZIP file
    #[arg(long, env = "BREAKDOWN_FILE_NAME", default_value = walker::BREAKDOWN_FILE_NAME)]
    breakdown_file: String,

    /// Emit the table as JSON instead of plain text
    #[arg(long)]
    json: bool,

    /// Only print the last N rows
    #[arg(long)]
    tail: Option<usize>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing with environment filter support
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,case_tracker_service=debug")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    // Load environment variables before clap resolves env-backed arguments
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    info!(
        "Reconstructing series from snapshot history at {}",
        cli.snapshots.display()
    );

    let source = DirSource::new(&cli.snapshots);
    let parser = RecordParser::new(cli.zip_codes);
    let walker = HistoryWalker::with_file_names(
        source,
        parser,
        cli.summary_file.as_str(),
        cli.breakdown_file.as_str(),
    )?;

    // A parse failure here is deliberate and fatal: it means the label
    // vocabulary drifted upstream and the tables need a new entry.
    let table = SeriesBuilder::collect(walker)?;
    info!("Reconstructed {} daily rows", table.len());

    let view = match cli.tail {
        Some(n) => table.tail(n),
        None => table,
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        println!("{view}");
    }

    Ok(())
}

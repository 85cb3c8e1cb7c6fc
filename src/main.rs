use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use listing_uploader::automation::{RunOptions, Timeouts};
use listing_uploader::feed::{build_property_xml, FeedClient};
use listing_uploader::pipeline::{self, ValidationRules};
use listing_uploader::portals::Portal;
use listing_uploader::uploader;
use listing_uploader::{Config, UploadError};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_SOURCE: &str = "properties.csv";

#[derive(Parser)]
#[command(name = "listing-uploader")]
#[command(version)]
#[command(about = "Validate vacation-rental listings and upload them to the rental portals")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the source CSV and write the per-portal exports
    Process {
        /// Source CSV
        #[arg(default_value = DEFAULT_SOURCE)]
        csv: PathBuf,

        /// Export directory
        #[arg(long, default_value = "output")]
        output: PathBuf,

        /// Print the validation report without writing exports
        #[arg(long)]
        report_only: bool,
    },

    /// Fill a portal's "add property" wizard for each record
    Upload {
        portal: Portal,

        /// Source CSV or property JSON document (falls back to PROPERTY_DATA)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Only the record at this 0-based index
        #[arg(long)]
        index: Option<usize>,

        #[arg(long)]
        headless: bool,

        /// Print what would be filled without starting the browser
        #[arg(long)]
        dry_run: bool,

        /// Seconds to wait between records
        #[arg(long, default_value_t = 3)]
        pause: u64,

        /// Click the final save control on portals that allow it
        #[arg(long)]
        submit: bool,

        /// Directory for screenshots, HTML snapshots and summary.txt
        #[arg(long, default_value = "artifacts")]
        artifacts: PathBuf,
    },

    /// Publish the records to the Immobiliare.it XML feed
    Publish {
        /// Source CSV or property JSON document (falls back to PROPERTY_DATA)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Print the XML documents instead of sending them
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    match run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<UploadError>() {
                Some(fatal) => error!("❌ {}", fatal),
                None => error!("❌ {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Process {
            csv,
            output,
            report_only,
        } => process(&csv, &output, report_only),
        Commands::Upload {
            portal,
            input,
            index,
            headless,
            dry_run,
            pause,
            submit,
            artifacts,
        } => {
            let options = RunOptions {
                headless,
                dry_run,
                index,
                pause: Duration::from_secs(pause),
                submit,
                artifacts_dir: artifacts,
                interactive: config.interactive,
                timeouts: Timeouts::default(),
            };
            upload(portal, &source_path(input, config), &options, config)
        }
        Commands::Publish { input, dry_run } => {
            publish(&source_path(input, config), dry_run, config).await
        }
    }
}

fn source_path(input: Option<PathBuf>, config: &Config) -> PathBuf {
    input
        .or_else(|| config.property_data.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE))
}

fn process(csv: &Path, output: &Path, report_only: bool) -> Result<()> {
    info!("🏠 Listing Uploader - Validation & Export");
    info!("==========================================");

    let records = pipeline::load_records(csv, &ValidationRules::default())?;
    println!("{}", pipeline::render_report(&records));

    if report_only {
        return Ok(());
    }

    let summary = pipeline::write_exports(&records, output)?;
    for (path, rows) in &summary.written {
        info!("💾 {} rows -> {}", rows, path.display());
    }
    for portal in &summary.skipped {
        warn!("No valid records for {}, nothing written", portal);
    }
    Ok(())
}

fn upload(portal: Portal, input: &Path, options: &RunOptions, config: &Config) -> Result<()> {
    info!("🏠 Listing Uploader - {}", portal);
    info!("==========================================");

    let records = pipeline::load_input(input, &ValidationRules::default())?;
    let selected = uploader::select_records(records, options.index)?;
    if selected.is_empty() {
        return Err(UploadError::NoRecords(input.to_path_buf()).into());
    }
    info!("📋 {} records to upload", selected.len());

    let summary = uploader::run_upload(portal, &selected, options, config)?;
    for outcome in &summary.records {
        info!(
            "✅ {}: {} fields filled, {} not found",
            outcome.name,
            outcome.report.filled(),
            outcome.report.not_found()
        );
    }
    if let Some(path) = &summary.summary_path {
        info!("📝 Summary: {}", path.display());
    }
    Ok(())
}

async fn publish(input: &Path, dry_run: bool, config: &Config) -> Result<()> {
    info!("🏠 Listing Uploader - Immobiliare.it feed");
    info!("==========================================");

    let records = pipeline::load_input(input, &ValidationRules::default())?;
    let selected = uploader::select_records(records, None)?;
    if selected.is_empty() {
        return Err(UploadError::NoRecords(input.to_path_buf()).into());
    }

    if dry_run {
        let settings = config.feed_settings().cloned().unwrap_or_default();
        let now = chrono::Local::now().naive_local();
        for record in &selected {
            let xml = build_property_xml(record, &settings, now)
                .with_context(|| format!("Failed to build XML for {}", record.display_name()))?;
            println!("{xml}");
        }
        info!("Dry run: {} documents, nothing sent", selected.len());
        return Ok(());
    }

    let client = FeedClient::new(config.feed_settings()?.clone())?;
    for record in &selected {
        let receipt = client.publish(record).await?;
        info!("🚀 {} published (HTTP {})", receipt.listing_id, receipt.status);
    }
    Ok(())
}

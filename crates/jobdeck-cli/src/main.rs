//! jobdeck: browse paged job listings from the terminal.
//!
//! Listings come from the HTTP endpoint in `JOBDECK_SOURCE_URL`; bookmarks
//! persist in the SQLite database at `JOBDECK_DATABASE_URL`.

mod output;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jobdeck_core::defaults::CLI_PAGES;
use jobdeck_core::{
    CompensationRange, EmploymentType, ExperienceLevel, FilterSet, RecordId, RecordStore,
};
use jobdeck_db::{database_url_from_env, Database};
use jobdeck_engine::{ListingConfig, ListingController, LoadOutcome};
use jobdeck_source::{HttpPageSource, SourceConfig};

#[derive(Parser)]
#[command(name = "jobdeck")]
#[command(author, version, about = "Browse, search and bookmark job listings")]
#[command(propagate_version = true)]
struct Cli {
    /// Listings endpoint (overrides JOBDECK_SOURCE_URL)
    #[arg(long, global = true)]
    source_url: Option<String>,

    /// Bookmark database URL (overrides JOBDECK_DATABASE_URL)
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load pages and print the listings that match
    Browse(BrowseArgs),

    /// Toggle the bookmark on a listing
    Bookmark {
        /// Listing id
        id: String,

        /// Maximum pages to search for the id
        #[arg(short, long, default_value_t = 5)]
        pages: u32,
    },

    /// List bookmarked listings, newest first
    Saved {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct BrowseArgs {
    /// Number of pages to load (stops early when the source runs out)
    #[arg(short, long, default_value_t = CLI_PAGES)]
    pages: u32,

    /// Free-text search over title, company, location and descriptors
    #[arg(short, long)]
    search: Option<String>,

    /// Experience level: "Entry Level", "Mid Level" or "Senior Level"
    #[arg(long)]
    experience: Option<ExperienceLevel>,

    /// Job type: "Full Time", "Part Time", "Contract" or "Internship"
    #[arg(long)]
    job_type: Option<EmploymentType>,

    /// Salary range: 0-20000, 20000-50000, 50000-100000 or 100000+
    #[arg(long)]
    salary: Option<CompensationRange>,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

impl BrowseArgs {
    fn filters(&self) -> FilterSet {
        FilterSet {
            experience: self.experience,
            employment_type: self.job_type,
            compensation_range: self.salary,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let _log_guard = init_tracing();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Initialise tracing.
///
/// Environment variables:
///   LOG_FORMAT  - "json" or "text" (default: "text")
///   LOG_FILE    - path to log file (optional, enables daily-rotated file logging)
///   RUST_LOG    - standard env filter (default: "warn")
fn init_tracing() -> Option<WorkerGuard> {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();

    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into());
    let registry = tracing_subscriber::registry().with(env_filter);

    let guard = if let Some(ref path) = log_file {
        let path = std::path::Path::new(path);
        let file_dir = path.parent().unwrap_or(std::path::Path::new("."));
        let file_name = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("jobdeck.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false),
                )
                .init();
        }
        Some(guard)
    } else {
        // Logs go to stderr so stdout stays clean for listing output.
        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        } else {
            registry
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
        None
    };

    debug!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stderr)"),
        "Logging initialized"
    );
    guard
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let database_url = cli.database_url.unwrap_or_else(database_url_from_env);
    let db = Database::connect(&database_url)
        .await
        .with_context(|| format!("opening bookmark database {}", database_url))?;

    match cli.command {
        Commands::Saved { json } => {
            let saved = db.bookmarks.list_saved().await?;
            output::print_saved(&saved, json)?;
            Ok(())
        }
        Commands::Browse(args) => {
            let controller = controller(cli.source_url, db)?;
            cmd_browse(&controller, &args).await
        }
        Commands::Bookmark { id, pages } => {
            let controller = controller(cli.source_url, db)?;
            cmd_bookmark(&controller, RecordId::from(id), pages).await
        }
    }
}

fn controller(source_url: Option<String>, db: Database) -> anyhow::Result<ListingController> {
    let mut source_config = SourceConfig::from_env();
    if let Some(url) = source_url {
        source_config.base_url = url;
    }
    let source = HttpPageSource::new(source_config).context("configuring page source")?;
    let store: Arc<dyn RecordStore> = Arc::new(db.bookmarks);
    Ok(ListingController::with_config(
        Arc::new(source),
        store,
        ListingConfig::from_env(),
    ))
}

/// Load up to `pages` pages, stopping at exhaustion or on a failed load.
async fn load_pages(controller: &ListingController, pages: u32) -> anyhow::Result<()> {
    for n in 0..pages {
        let outcome = if n == 0 {
            controller.refresh().await
        } else {
            controller.load_next().await
        };
        match outcome {
            LoadOutcome::Loaded { exhausted: true, .. } | LoadOutcome::Dropped(_) => break,
            LoadOutcome::Loaded { .. } | LoadOutcome::Stale => {}
            LoadOutcome::Failed(error) => bail!("could not load listings: {}", error.message),
        }
    }
    Ok(())
}

async fn cmd_browse(controller: &ListingController, args: &BrowseArgs) -> anyhow::Result<()> {
    if let Some(ref text) = args.search {
        controller.set_search_text(text.as_str()).await;
    }
    controller.set_filters(args.filters()).await;

    load_pages(controller, args.pages).await?;

    let snapshot = controller.snapshot().await;
    info!(
        result_count = snapshot.result_count,
        total_loaded = snapshot.total_loaded,
        "Browse complete"
    );
    output::print_snapshot(&snapshot, args.json)
}

async fn cmd_bookmark(
    controller: &ListingController,
    id: RecordId,
    max_pages: u32,
) -> anyhow::Result<()> {
    for n in 0..max_pages.max(1) {
        if controller.record(&id).await.is_some() {
            break;
        }
        let outcome = if n == 0 {
            controller.refresh().await
        } else {
            controller.load_next().await
        };
        match outcome {
            LoadOutcome::Failed(error) => bail!("could not load listings: {}", error.message),
            LoadOutcome::Loaded { exhausted: true, .. } | LoadOutcome::Dropped(_) => break,
            _ => {}
        }
    }

    let Some(row) = controller.record(&id).await else {
        bail!("listing {} not found in the first {} page(s)", id, max_pages);
    };
    let saved = controller.toggle_bookmark(&id).await?;
    println!(
        "{} {}",
        if saved { "Saved" } else { "Removed" },
        output::headline(&row.record)
    );
    Ok(())
}

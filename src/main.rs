//! Keyword-Harvest main entry point
//!
//! This is the command-line interface for the keyword image harvester.

use anyhow::Context;
use clap::Parser;
use keyword_harvest::audit::{ConfirmationProvider, FixedAnswer, StdinConfirmation};
use keyword_harvest::collector::CommandCollector;
use keyword_harvest::config::{load_config_or_default, validate, Config};
use keyword_harvest::coordinator::Coordinator;
use keyword_harvest::pool::print_report;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Keyword-Harvest: bulk image downloader for keyword datasets
///
/// Reads a keyword list, collects image links per keyword from each enabled
/// source, downloads them into one directory per keyword, and offers to
/// remove keywords with too few images afterwards.
#[derive(Parser, Debug)]
#[command(name = "keyword-harvest")]
#[command(version)]
#[command(about = "Bulk image downloader for keyword datasets", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Keyword list (one per line)
    #[arg(long, value_name = "FILE")]
    keywords: Option<PathBuf>,

    /// Download folder path
    #[arg(long, value_name = "DIR")]
    download_path: Option<PathBuf>,

    /// Skips keywords already downloaded before. Needed when re-downloading.
    #[arg(long, value_name = "BOOL")]
    skip: Option<bool>,

    /// Number of parallel download workers
    #[arg(long, value_name = "N")]
    threads: Option<usize>,

    /// Download from google
    #[arg(long, value_name = "BOOL")]
    google: Option<bool>,

    /// Download from naver
    #[arg(long, value_name = "BOOL")]
    naver: Option<bool>,

    /// Download full resolution images instead of thumbnails (slow)
    #[arg(long, value_name = "BOOL")]
    full: Option<bool>,

    /// Face search mode
    #[arg(long, value_name = "BOOL")]
    face: Option<bool>,

    /// Remove undersized directories without asking
    #[arg(short, long)]
    yes: bool,

    /// Skip the post-run imbalance audit
    #[arg(long)]
    no_audit: bool,

    /// Show the configuration and planned tasks without downloading
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    /// Applies command-line overrides on top of the file configuration
    fn apply(&self, config: &mut Config) {
        if let Some(path) = &self.keywords {
            config.output.keywords_path = path.clone();
        }
        if let Some(path) = &self.download_path {
            config.output.download_path = path.clone();
        }
        if let Some(skip) = self.skip {
            config.crawler.skip_existing = skip;
        }
        if let Some(threads) = self.threads {
            config.crawler.threads = threads;
        }
        if let Some(google) = self.google {
            config.sources.google = google;
        }
        if let Some(naver) = self.naver {
            config.sources.naver = naver;
        }
        if let Some(full) = self.full {
            config.crawler.full_resolution = full;
        }
        if let Some(face) = self.face {
            config.crawler.face = face;
        }
        if self.no_audit {
            config.audit.enabled = false;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = load_config_or_default(cli.config.as_deref())
        .with_context(|| match &cli.config {
            Some(path) => format!("loading configuration from {}", path.display()),
            None => "validating default configuration".to_string(),
        })?;
    cli.apply(&mut config);
    validate(&config).context("validating command-line options")?;

    tracing::info!(
        "Options - skip:{}, threads:{}, google:{}, naver:{}, full_resolution:{}, face:{}",
        config.crawler.skip_existing,
        config.crawler.threads,
        config.sources.google,
        config.sources.naver,
        config.crawler.full_resolution,
        config.crawler.face
    );
    if config.enabled_families().is_empty() {
        tracing::warn!("No source enabled; only the imbalance audit will run");
    }

    let collector = Arc::new(CommandCollector::from_config(&config.collector));
    let coordinator = Coordinator::new(config, collector)?;

    if cli.dry_run {
        handle_dry_run(&coordinator)?;
    } else {
        let mut confirm: Box<dyn ConfirmationProvider> = if cli.yes {
            Box::new(FixedAnswer(true))
        } else {
            Box::new(StdinConfirmation)
        };
        handle_run(&coordinator, confirm.as_mut()).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("keyword_harvest=info,warn"),
            1 => EnvFilter::new("keyword_harvest=debug,info"),
            2 => EnvFilter::new("keyword_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows configuration and the task plan
fn handle_dry_run(coordinator: &Coordinator) -> Result<(), Box<dyn std::error::Error>> {
    let config = coordinator.config();
    println!("=== Keyword-Harvest Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Threads: {}", config.crawler.threads);
    println!("  Skip existing: {}", config.crawler.skip_existing);
    println!("  Resolution: {}", config.resolution());
    println!("  Face mode: {}", config.crawler.face);

    println!("\nSources:");
    for family in config.enabled_families() {
        println!("  - {}", family);
    }

    println!("\nOutput:");
    println!("  Keywords: {}", config.output.keywords_path.display());
    println!("  Download path: {}", config.output.download_path.display());

    println!("\nCollector:");
    println!("  Command: {} {}", config.collector.command, config.collector.args.join(" "));

    let tasks = coordinator.plan()?;
    println!("\nPlanned Tasks ({}):", tasks.len());
    for task in &tasks {
        println!("  - {} from {}", task.keyword, task.source);
    }

    println!("\n✓ Configuration is valid");
    Ok(())
}

/// Handles the main download run
async fn handle_run(
    coordinator: &Coordinator,
    confirm: &mut dyn ConfirmationProvider,
) -> Result<(), Box<dyn std::error::Error>> {
    match coordinator.run(confirm).await {
        Ok(summary) => {
            print_report(&summary.report);
            tracing::info!("End Program ({} keywords)", summary.keywords);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Run failed: {}", e);
            Err(e.into())
        }
    }
}

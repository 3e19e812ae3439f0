//! Bible-Harvest main entry point
//!
//! This is the command-line interface for the Bible-Harvest crawler.

use anyhow::{Context, Result};
use bible_harvest::catalog::{all_books, get_book_by_code, total_chapters};
use bible_harvest::config::{load_config_with_hash, Config, CrawlerOptions};
use bible_harvest::crawler::{Crawler, ProgressObserver};
use bible_harvest::storage::{open_storage, SqliteStorage};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Bible-Harvest: a resumable scripture crawler
///
/// Bible-Harvest fetches every chapter of a Bible edition from its source
/// site, extracts verses, section titles and footnotes, and stores them in
/// SQLite. Interrupted runs resume from the last finished chapter.
#[derive(Parser, Debug)]
#[command(name = "bible-harvest")]
#[command(disable_version_flag = true)]
#[command(about = "A resumable scripture crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Crawl a single book (e.g. "gen") instead of the whole canon
    #[arg(long, value_name = "CODE")]
    book: Option<String>,

    /// Override the corpus version code from the configuration
    #[arg(long = "version", value_name = "CODE")]
    version_code: Option<String>,

    /// Delete stored verses and checkpoints before crawling
    #[arg(long)]
    fresh: bool,

    /// Create the database schema and show what would be crawled
    #[arg(long, conflicts_with_all = ["stats", "validate"])]
    dry_run: bool,

    /// Show checkpoint statistics from the database and exit
    #[arg(long, conflicts_with_all = ["dry_run", "validate"])]
    stats: bool,

    /// Check that every chapter is stored and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats"])]
    validate: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

/// Prints one line per completed chapter
struct ConsoleProgress;

impl ProgressObserver for ConsoleProgress {
    fn on_chapter_done(&self, book_name: &str, chapter: u32, total: u32) {
        println!("{}", progress_line(book_name, chapter, total));
    }
}

fn progress_line(book_name: &str, chapter: u32, total: u32) -> String {
    format!("[{}/{}] {} {}장 크롤링 완료", chapter, total, book_name, chapter)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let mut options = config.crawler_options();
    if let Some(code) = &cli.version_code {
        options = options
            .with_version_code(code)
            .with_context(|| format!("invalid --version {:?}", code))?;
    }

    if let Some(code) = &cli.book {
        if get_book_by_code(code).is_none() {
            anyhow::bail!("unknown book code: {}", code);
        }
    }

    let result = if cli.dry_run {
        handle_dry_run(&config, &options, cli.book.as_deref())
    } else if cli.stats {
        handle_stats(&config, &options)
    } else if cli.validate {
        handle_validate(&config, options)
    } else {
        handle_crawl(&config, options, cli.book.as_deref(), cli.fresh).await
    };

    if let Err(e) = &result {
        tracing::error!("{:#}", e);
    }

    result
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("bible_harvest=info,warn"),
            1 => EnvFilter::new("bible_harvest=debug,info"),
            2 => EnvFilter::new("bible_harvest=trace,debug"),
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

fn open_database(config: &Config) -> Result<SqliteStorage> {
    let path = Path::new(&config.output.database_path);
    open_storage(path).with_context(|| format!("failed to open database {}", path.display()))
}

/// Handles the --dry-run mode: creates the schema and shows the plan
fn handle_dry_run(config: &Config, options: &CrawlerOptions, book: Option<&str>) -> Result<()> {
    open_database(config)?;

    println!("=== Bible-Harvest Dry Run ===\n");

    println!("Source:");
    println!("  Endpoint: {}", options.base_url);
    println!("  Rate: {} requests/sec", options.requests_per_second);
    println!("  Timeout: {}s", options.timeout.as_secs());
    println!("  User agent: {}", options.user_agent);

    println!("\nVersion:");
    println!("  Code: {}", options.version_code);
    println!("  Name: {}", options.version_name);
    println!("  Language: {}", options.version_lang);

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);

    let chapters = match book.and_then(get_book_by_code) {
        Some(info) => {
            println!("\nBook: {} ({}, {} chapters)", info.name, info.code, info.chapter_count);
            info.chapter_count
        }
        None => {
            println!("\nBooks: all {}", all_books().len());
            total_chapters()
        }
    };

    let minutes = f64::from(chapters) / options.requests_per_second / 60.0;

    println!("\n✓ Database schema is ready");
    println!(
        "✓ Would fetch up to {} chapters (about {:.0} minutes at the configured rate)",
        chapters, minutes
    );

    Ok(())
}

/// Handles the --stats mode: shows checkpoint statistics from the database
fn handle_stats(config: &Config, options: &CrawlerOptions) -> Result<()> {
    use bible_harvest::output::{load_statistics, print_statistics};

    println!("Database: {}\n", config.output.database_path);

    let storage = open_database(config)?;
    let stats = load_statistics(&storage, &options.version_code)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the --validate mode
fn handle_validate(config: &Config, options: CrawlerOptions) -> Result<()> {
    let storage = open_database(config)?;
    let version = options.version_code.clone();
    let crawler = Crawler::new(storage, options)?;

    crawler
        .validate(&CancellationToken::new())
        .with_context(|| format!("validation failed for {}", version))?;

    println!("✓ All {} chapters of {} are stored", total_chapters(), version);
    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: &Config,
    options: CrawlerOptions,
    book: Option<&str>,
    fresh: bool,
) -> Result<()> {
    let storage = open_database(config)?;
    let mut crawler =
        Crawler::new(storage, options)?.with_progress(Arc::new(ConsoleProgress));

    if fresh {
        tracing::info!("Starting fresh crawl (removing stored chapters)");
        crawler.reset(book)?;
    } else {
        tracing::info!("Starting crawl (finished chapters are skipped)");
    }

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after the current step");
            trigger.cancel();
        }
    });

    match book {
        Some(code) => crawler
            .crawl_book(&cancel, code)
            .await
            .with_context(|| format!("crawl of {} failed", code))?,
        None => crawler.crawl_all(&cancel).await.context("crawl failed")?,
    }

    tracing::info!("Crawl completed successfully");
    Ok(())
}

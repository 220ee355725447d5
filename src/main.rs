//! Command-line entry point for the Sunspotter ELO ranking
//!
//! Loads a classifications table, replays every pairwise comparison through
//! the adaptive ELO engine and writes the final ratings.

use anyhow::{anyhow, Result};
use clap::Parser;
use std::path::PathBuf;
use sunspotter_elo::config::{validate_config, AppConfig, OutputFormat};
use sunspotter_elo::table::{save_snapshot, MatchSource};
use sunspotter_elo::{BatchRunner, RatingSnapshot};
use tracing::{error, info};

/// Sunspotter ELO - adaptive ELO complexity ranking of active-region images
#[derive(Parser)]
#[command(
    name = "sunspotter-elo",
    version,
    about = "Rank Sunspotter images by complexity from pairwise classifications",
    long_about = "Replays crowdsourced pairwise complexity classifications through an ELO \
                 rating system whose per-image K-value follows the standard deviation of the \
                 image's recent scores, and writes the final ratings table."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Classifications table
    #[arg(long, value_name = "FILE", help = "Path to the classifications table")]
    classifications: Option<PathBuf>,

    /// Results file override
    #[arg(short, long, value_name = "FILE", help = "Where to write the ratings")]
    output: Option<PathBuf>,

    /// Results format override
    #[arg(long, value_enum, help = "Format of the ratings file")]
    format: Option<OutputFormat>,

    /// Input delimiter override
    #[arg(long, value_name = "CHAR", help = "Field delimiter of the classifications table")]
    delimiter: Option<char>,

    #[arg(long, value_name = "NAME", help = "Column holding the first image id")]
    entity_a_column: Option<String>,

    #[arg(long, value_name = "NAME", help = "Column holding the second image id")]
    entity_b_column: Option<String>,

    #[arg(
        long,
        value_name = "NAME",
        help = "Column holding 1 when the first image is more complex"
    )]
    outcome_column: Option<String>,

    #[arg(long, value_name = "SCORE", help = "Initial rating of every image")]
    default_score: Option<f64>,

    #[arg(long, value_name = "K", help = "Initial K-value of every image")]
    initial_k: Option<f64>,

    #[arg(long, value_name = "K", help = "Lower bound of the adaptive K-value")]
    k_min: Option<f64>,

    #[arg(long, value_name = "K", help = "Upper bound of the adaptive K-value")]
    k_max: Option<f64>,

    #[arg(
        long,
        value_name = "N",
        help = "Number of recent scores used for the K-value"
    )]
    score_memory: Option<usize>,

    /// Skip writing the results file
    #[arg(long, help = "Do not write the ratings file")]
    no_save: bool,

    /// Print the top N images
    #[arg(long, value_name = "N", help = "Print the N highest rated images")]
    top: Option<usize>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Dry run mode (validate config and exit)
    #[arg(long, help = "Validate configuration and exit without ranking")]
    dry_run: bool,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load and merge configuration from file, environment and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    // Apply CLI overrides
    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }
    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    if let Some(path) = &args.classifications {
        config.input.path = Some(path.clone());
    }
    if let Some(delimiter) = args.delimiter {
        config.input.delimiter = delimiter;
    }
    if let Some(name) = &args.entity_a_column {
        config.input.columns.entity_a = name.clone();
    }
    if let Some(name) = &args.entity_b_column {
        config.input.columns.entity_b = name.clone();
    }
    if let Some(name) = &args.outcome_column {
        config.input.columns.outcome_for_a = name.clone();
    }

    if let Some(score) = args.default_score {
        config.elo.default_score = score;
    }
    if let Some(k) = args.initial_k {
        config.elo.initial_k = k;
    }
    if let Some(k) = args.k_min {
        config.elo.k_min = k;
    }
    if let Some(k) = args.k_max {
        config.elo.k_max = k;
    }
    if let Some(memory) = args.score_memory {
        config.elo.score_memory = memory;
    }

    if let Some(path) = &args.output {
        config.output.path = path.clone();
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }
    if args.no_save {
        config.output.save_to_disk = false;
    }

    validate_config(&config)?;
    Ok(config)
}

/// Display run parameters
fn display_startup_banner(config: &AppConfig) {
    info!("Sunspotter ELO ranking");
    info!("   Service: {}", config.service.name);
    match &config.input.path {
        Some(path) => info!("   Classifications: {}", path.display()),
        None => info!("   Classifications: <not set>"),
    }
    info!(
        "   Columns: {} / {} / {}",
        config.input.columns.entity_a,
        config.input.columns.entity_b,
        config.input.columns.outcome_for_a
    );
    info!(
        "   Default score: {}, K: {} in [{}, {}], score memory: {}",
        config.elo.default_score,
        config.elo.initial_k,
        config.elo.k_min,
        config.elo.k_max,
        config.elo.score_memory
    );
    if config.output.save_to_disk {
        info!(
            "   Output: {} ({})",
            config.output.path.display(),
            config.output.format
        );
    } else {
        info!("   Output: not saved");
    }
}

/// Print the highest rated images to stdout
fn print_leaderboard(snapshot: &RatingSnapshot, top: usize) {
    println!(
        "{:>4}  {:<24} {:>12} {:>8} {:>6} {:>10}",
        "rank", "image", "score", "k", "count", "std dev"
    );
    for (rank, record) in snapshot.ranked().into_iter().take(top).enumerate() {
        println!(
            "{:>4}  {:<24} {:>12.3} {:>8.3} {:>6} {:>10.3}",
            rank + 1,
            record.entity_id,
            record.score,
            record.k_value,
            record.count,
            record.std_dev
        );
    }
}

fn run(config: &AppConfig, top: Option<usize>) -> Result<()> {
    let path = config
        .input
        .path
        .as_ref()
        .ok_or_else(|| anyhow!("No classifications table given (use --classifications)"))?;

    let source = MatchSource::new(config.input.columns.clone(), config.input.delimiter)?;
    let matches = source.read_path(path)?;

    let runner = BatchRunner::for_matches(config.elo.clone(), &matches)?;
    let snapshot = runner.run(&matches)?;

    if config.output.save_to_disk {
        save_snapshot(&snapshot, &config.output)?;
    }

    if let Some(top) = top {
        print_leaderboard(&snapshot, top);
    }

    Ok(())
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration (CLI args override environment/config file)
    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {:#}", e);
        std::process::exit(1);
    });

    // Initialize logging early (before any other operations)
    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    display_startup_banner(&config);

    if args.dry_run {
        info!("Configuration validation successful");
        info!("Dry run completed - exiting without ranking");
        return Ok(());
    }

    if let Err(e) = run(&config, args.top) {
        error!("Ranking failed: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

//! Main entry point for the Joust tournament core
//!
//! Operational CLI around the rating and pairing components: validate
//! configuration, fetch and normalize ratings against the live platform
//! APIs, and exercise a conversion table lookup.

use anyhow::Result;
use clap::{Parser, Subcommand};
use joust_core::config::AppConfig;
use joust_core::rating::clients::build_sources;
use joust_core::rating::{RatingAggregator, RatingNormalizer, CONTROL_CATEGORY};
use joust_core::types::{Platform, Player, PlatformHandles};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Joust tournament core - pairing sessions and cross-platform ratings
#[derive(Parser)]
#[command(
    name = "joust-core",
    version,
    about = "Pairing-session and rating-normalization core for chess tournaments"
)]
struct Args {
    /// Configuration file path (TOML format)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error)
    #[arg(short, long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Validate configuration and exit without doing anything
    #[arg(long)]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch and normalize ratings for a set of platform handles
    FetchRating {
        /// Chess.com username
        #[arg(long, value_name = "HANDLE")]
        chess_com: Option<String>,

        /// Lichess username
        #[arg(long, value_name = "HANDLE")]
        lichess: Option<String>,

        /// USCF member id
        #[arg(long, value_name = "ID")]
        uscf: Option<String>,
    },

    /// Normalize a raw platform rating onto the common scale
    Normalize {
        /// Platform wire name (chessCom, lichess, uscf)
        #[arg(long)]
        platform: String,

        /// Raw rating value
        #[arg(long)]
        rating: f64,
    },
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

fn load_normalizer(config: &AppConfig) -> Result<RatingNormalizer> {
    match &config.rating.conversion_table_path {
        Some(path) => RatingNormalizer::from_json_file(path),
        None => Ok(RatingNormalizer::with_builtin_tables()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::from_env()?,
    };
    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    init_logging(&config.service.log_level)?;

    if args.dry_run {
        joust_core::config::validate_config(&config)?;
        println!("Configuration OK");
        return Ok(());
    }

    let normalizer = Arc::new(load_normalizer(&config)?);

    match args.command {
        Some(Command::FetchRating {
            chess_com,
            lichess,
            uscf,
        }) => {
            let sources = build_sources(&config.rating)?;
            let aggregator = RatingAggregator::with_timeout(
                sources,
                Arc::clone(&normalizer),
                config.rating.fetch_timeout(),
            );

            let player = Player {
                id: 0,
                name: "cli".to_string(),
                handles: PlatformHandles {
                    chess_com,
                    lichess,
                    uscf,
                },
                neutral_rating: None,
            };

            info!("Fetching ratings from configured platforms...");
            let report = aggregator.aggregate(&player).await?;

            if report.is_empty() {
                println!("No ratings available for the given handles");
                return Ok(());
            }
            for (platform, rating) in report.iter() {
                println!("{:>10}: {:.0}", platform.as_str(), rating);
            }
            if let Some(mean) = report.mean() {
                println!("{:>10}: {:.0}", "neutral", mean);
            }
        }
        Some(Command::Normalize { platform, rating }) => {
            let platform: Platform = platform.parse()?;
            let normalized = normalizer.normalize(rating, platform, CONTROL_CATEGORY)?;
            println!("{:.1}", normalized);
        }
        None => {
            joust_core::config::validate_config(&config)?;
            println!("Configuration OK; run with a subcommand (see --help)");
        }
    }

    Ok(())
}

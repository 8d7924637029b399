//! deckify - build a timeline card deck from a catalog album or playlist
//!
//! Reads the listing, resolves each track's earliest release year and writes
//! one QR code per track plus a `deck.json` manifest.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use deckify_common::config::{load_or_default, locate_config_file};
use deckify_ingest::{build_deck_builder, write_deck, DeckConfig, ListingRef};

/// Command-line arguments for deckify
#[derive(Parser, Debug)]
#[command(name = "deckify")]
#[command(about = "Build a music-timeline card deck from an album or playlist URL")]
#[command(version)]
struct Args {
    /// Album or playlist URL
    url: String,

    /// Output directory (overrides the TOML output_dir)
    #[arg(short, long, env = "DECKIFY_OUTPUT_DIR")]
    out: Option<PathBuf>,

    /// Base name for code image files
    #[arg(short, long, default_value = "deck")]
    name: String,

    /// Config file (default: $DECKIFY_CONFIG, then the platform config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter when RUST_LOG is unset (overrides the TOML level)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = locate_config_file(args.config.as_deref());
    let toml_config = load_or_default(config_path.as_deref()).context("Failed to load configuration")?;

    // Initialize tracing
    let default_filter = args
        .log_level
        .clone()
        .unwrap_or_else(|| toml_config.logging.level.clone());
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting deckify {}", env!("CARGO_PKG_VERSION"));
    if let Some(path) = &config_path {
        info!("Config file: {}", path.display());
    }

    let listing = ListingRef::parse(&args.url).context("Invalid listing URL")?;

    let mut deck_config = DeckConfig::resolve(&toml_config).context("Invalid configuration")?;
    if let Some(out) = args.out {
        deck_config.output_dir = out;
    }

    let builder = build_deck_builder(&deck_config).context("Failed to initialize sources")?;
    let deck = builder.build(&listing).await.context("Failed to build deck")?;

    let manifest = write_deck(&deck_config.output_dir, &args.name, &deck).with_context(|| {
        format!("Failed to write deck to {}", deck_config.output_dir.display())
    })?;

    let known = deck.iter().filter(|t| t.year.is_known()).count();
    println!(
        "{} cards written to {} ({} with a release year)",
        deck.len(),
        manifest.display(),
        known
    );

    Ok(())
}

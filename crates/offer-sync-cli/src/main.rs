mod commands;
mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use offer_sync_store::OfferStore;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "offer-sync")]
#[command(about = "Sync partner offer feeds into a local offer store")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch, validate and save offers from every configured provider
    Sync {
        /// Path to the offer database
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// List stored offers
    List {
        /// Filter by provider name
        #[arg(long)]
        provider: Option<String>,
        /// Path to the offer database
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Show a stored offer in full
    Show {
        /// Offer slug
        slug: String,
        /// Path to the offer database
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))
}

fn cache_dir() -> Result<PathBuf> {
    let base = dirs::cache_dir().context("could not determine cache directory")?;
    let dir = base.join("offer-sync");
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create cache directory: {}", dir.display()))?;
    Ok(dir)
}

/// `--db` wins, then `OFFER_SYNC_DB`, then the cache directory.
fn db_path(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path);
    }
    if let Some(path) = std::env::var_os("OFFER_SYNC_DB") {
        return Ok(PathBuf::from(path));
    }
    Ok(cache_dir()?.join("offers.db"))
}

fn open_store(flag: Option<PathBuf>) -> Result<OfferStore> {
    let path = db_path(flag)?;
    tracing::debug!(path = %path.display(), "Opening offer store");
    OfferStore::open(&path)
        .with_context(|| format!("failed to open offer store at {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing()?;

    match cli.command {
        Command::Sync { db } => {
            let store = open_store(db)?;
            let app_config = config::load_config();
            commands::sync::run(store, &app_config.providers).await
        }
        Command::List { provider, db } => {
            let store = open_store(db)?;
            commands::list::run(&store, provider.as_deref()).await
        }
        Command::Show { slug, db } => {
            let store = open_store(db)?;
            commands::show::run(&store, &slug).await
        }
    }
}

//! faqbot server.
//!
//! Usage:
//!   faqbot-server                          # Serve on 0.0.0.0:8000, seed from ./faqs.json
//!   faqbot-server --config faqbot.toml     # Load settings from a TOML file
//!   faqbot-server --bind 127.0.0.1:9000    # Override the listen address
//!   faqbot-server --no-seed                # Start untrained

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use faqbot_server::{FaqbotConfig, load_seed_or_warn, serve};
use faqbot_service::FaqService;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "faqbot-server", version, about = "FAQ matching chat backend")]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, env = "FAQBOT_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, env = "FAQBOT_BIND")]
    bind: Option<SocketAddr>,

    /// FAQ file to load at startup
    #[arg(long, conflicts_with = "no_seed")]
    seed: Option<PathBuf>,

    /// Start without loading a seed file
    #[arg(long)]
    no_seed: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "faqbot_server=debug,faqbot_service=debug,faqbot_embeddings=debug,faqbot_knowledge=debug,tower_http=debug"
    } else {
        "faqbot_server=info,faqbot_service=info,faqbot_embeddings=info,faqbot_knowledge=info,tower_http=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    let mut config = FaqbotConfig::load(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }
    if let Some(seed) = cli.seed {
        config.server.seed_path = Some(seed);
    }
    if cli.no_seed {
        config.server.seed_path = None;
    }

    let embedding = config.embedding.clone();
    let provider = tokio::task::spawn_blocking(move || embedding.build_provider())
        .await
        .context("embedding provider initialisation panicked")?
        .context("failed to initialise embedding provider")?;

    let service = Arc::new(FaqService::new(provider));
    if let Some(seed) = &config.server.seed_path {
        load_seed_or_warn(&service, seed).await;
    }

    let stats = service.stats().await;
    info!(
        "Starting with {} FAQs ({} / {})",
        stats.entries, stats.provider, stats.model
    );

    serve(&config.server, service).await
}

//! Standalone search index sync
//!
//! Polls the recipes table and keeps the OpenSearch index up to date. Shares
//! its cursor with the API server's scheduled sync.

use anyhow::{Context, Result};
use clap::Parser;
use server_core::config::SearchConfig;
use server_core::domains::search::{RecipeDocument, SearchSync};
use server_core::kernel::OpenSearchClient;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "search_sync")]
#[command(about = "Sync published recipes into the search index")]
struct Cli {
    /// Run a single cycle and exit
    #[arg(long)]
    once: bool,

    /// Start over from the beginning (full reindex)
    #[arg(long)]
    reset: bool,

    /// Seconds to sleep between cycles (default: SEARCH_SYNC_INTERVAL_SECS)
    #[arg(long)]
    interval_secs: Option<u64>,

    /// Rows per batch (default: SEARCH_SYNC_BATCH_SIZE)
    #[arg(long)]
    batch_size: Option<i64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let search = SearchConfig::from_env().context("Failed to load search configuration")?;
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    let index = Arc::new(OpenSearchClient::new(
        &search.url,
        &search.index,
        search.username.clone(),
        search.password.clone(),
        RecipeDocument::index_definition(),
    )?);

    let sync = SearchSync::with_index(pool, index, cli.batch_size.unwrap_or(search.batch_size));

    if cli.reset {
        sync.reset().await?;
    }

    if cli.once {
        let stats = sync.run_cycle().await?;
        tracing::info!(
            "Search sync finished: {} indexed, {} deleted, {} failed",
            stats.indexed,
            stats.deleted,
            stats.failed
        );
        return Ok(());
    }

    let interval = Duration::from_secs(cli.interval_secs.unwrap_or(search.interval_secs));
    tracing::info!(
        "Search sync running every {}s into index '{}'",
        interval.as_secs(),
        search.index
    );
    sync.run_forever(interval).await
}

//! Replays a synthetic store event stream through a sync engine backed
//! by an on-disk Tantivy index and prints the resulting commit health.
//!
//! ```bash
//! sync-driver --products 200 --batch 25 --fail-every 4
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use e2e_tests::{
    product_field, product_sync_config, published_products, replay, InstrumentedClient, Product,
    ReplayPlan, PRODUCT_TYPE,
};
use index_sync_core::{OperationKind, Settings, SyncEngine};
use index_sync_tantivy::{SyncIndex, SyncIndexConfig};

#[derive(Parser, Debug)]
#[command(
    name = "sync-driver",
    about = "Replay synthetic lifecycle events into a search index"
)]
struct Args {
    /// Config file (defaults to ~/.config/index-sync/config.*)
    #[arg(long)]
    config: Option<String>,
    /// Index directory, overrides the configured index_path
    #[arg(long)]
    index_path: Option<PathBuf>,
    /// Log level, overrides the configured log_level
    #[arg(long)]
    log_level: Option<String>,
    /// Number of products to create
    #[arg(long, default_value_t = 100)]
    products: i64,
    /// Events between commit triggers
    #[arg(long, default_value_t = 10)]
    batch: i64,
    /// Fail deletes on every Nth trigger (0 disables)
    #[arg(long, default_value_t = 0)]
    fail_every: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings =
        Settings::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(level) = args.log_level {
        settings.log_level = level;
    }

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.log_level)),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let index_path = args
        .index_path
        .unwrap_or_else(|| settings.expanded_index_path());
    let index = SyncIndex::open_or_create(SyncIndexConfig::new(&index_path))
        .context("Failed to open search index")?;
    let client = Arc::new(InstrumentedClient::new(index.client::<Product>(PRODUCT_TYPE)));

    let mut engine = SyncEngine::<Product>::new(
        product_sync_config(settings.sync.clone()),
        client.clone(),
        Arc::new(published_products),
        Arc::new(product_field),
    )?;

    let plan = ReplayPlan {
        products: args.products,
        batch: args.batch,
        fail_every: args.fail_every,
    };
    replay(&mut engine, &client, &plan);

    for kind in OperationKind::COMMIT_ORDER {
        let health = engine.health().get(kind);
        info!(
            kind = %kind,
            committed = health.committed_total,
            consecutive_failures = health.consecutive_failures,
            "Kind health"
        );
    }

    let documents = client.inner().document_count()?;
    info!(
        documents,
        pending = engine.pending().total(),
        calls = client.calls().len(),
        "Replay complete"
    );

    let health = serde_json::to_string_pretty(engine.health())?;
    println!("{}", health);
    Ok(())
}


//! Seed script for the bookshelf catalog.
//!
//! Run with:
//! ```
//! cargo run -p seed-data --bin seed -- all
//! ```

use std::sync::Arc;

use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;

use bookshelf::{Catalog, PgCatalog};
use seed_data::bootstrap;
use seed_data::db::Seeder;
use seed_data::publisher::BookPublisher;
use seed_data::routines;

#[derive(Parser)]
#[command(name = "seed", about = "Populate the bookshelf catalog with users, authors and books")]
struct Cli {
    #[command(subcommand)]
    routine: Routine,

    /// Seed for the random generator, for reproducible data
    #[arg(long, global = true)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Routine {
    /// Generate users (SEED_USER_COUNT by default)
    Users {
        #[arg(long)]
        count: Option<usize>,
    },
    /// Create author profiles for author-role users
    Authors,
    /// Publish books from the manifest, one per author
    Books,
    /// Users, authors and books in order
    All,
    /// Delete every book, author and user. Stored assets are kept.
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let runtime = bootstrap::initialize(
        |key| std::env::var(key).ok(),
        |url| async move { PgCatalog::connect(url.as_deref()).await },
    )
    .await?;

    tracing::info!("Connected to catalog");

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let generation = &runtime.settings.generation;
    let catalog = &runtime.catalog;

    match cli.routine {
        Routine::Users { count } => {
            let count = count.unwrap_or(generation.user_count);
            routines::seed_users(catalog, generation, count, &mut rng).await?;
        }
        Routine::Authors => {
            routines::seed_authors(catalog, generation, &mut rng).await?;
        }
        Routine::Books => {
            publish(&runtime, &mut rng).await?;
        }
        Routine::All => {
            routines::seed_users(catalog, generation, generation.user_count, &mut rng).await?;
            routines::seed_authors(catalog, generation, &mut rng).await?;
            publish(&runtime, &mut rng).await?;
        }
        Routine::Clear => {
            Seeder::new(catalog).clear_all().await?;
            tracing::info!("Catalog cleared");
        }
    }

    tracing::info!("Seed completed!");
    tracing::info!("  Authors: {}", catalog.author_ids().await?.len());

    Ok(())
}

async fn publish(runtime: &bootstrap::Runtime<PgCatalog>, rng: &mut StdRng) -> anyhow::Result<()> {
    let publisher = Arc::new(BookPublisher::new(
        runtime.catalog.clone(),
        runtime.assets.clone(),
    ));
    let report = routines::seed_books(publisher, &runtime.settings.manifest, rng).await?;

    tracing::info!("  Books created: {}", report.created.len());
    if !report.is_complete() {
        tracing::warn!("  Books skipped: {}", report.failures.len());
    }

    Ok(())
}

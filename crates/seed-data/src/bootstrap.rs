//! Startup: configuration, asset backend, then the catalog connection.
//!
//! Configuration and backend construction both happen before the catalog is
//! contacted, so a bad backend selector never opens a connection.

use std::future::Future;

use thiserror::Error;
use tracing::info;

use bookshelf::{AssetBackend, CatalogError, ConfigError};

use crate::config::Settings;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Everything the seeding routines need, built once per process.
pub struct Runtime<C> {
    pub settings: Settings,
    pub assets: AssetBackend,
    pub catalog: C,
}

/// Loads settings through `lookup`, builds the asset backend and finally
/// calls `connect` with the configured database URL.
pub async fn initialize<C, F, Fut>(
    lookup: impl Fn(&str) -> Option<String>,
    connect: F,
) -> Result<Runtime<C>, StartupError>
where
    F: FnOnce(Option<String>) -> Fut,
    Fut: Future<Output = Result<C, CatalogError>>,
{
    let settings = Settings::from_lookup(lookup)?;
    info!("Using {} asset backend", settings.storage.backend_name());
    let assets = AssetBackend::from_settings(&settings.storage)?;

    info!("Connecting to catalog...");
    let catalog = connect(settings.database_url.clone()).await?;

    Ok(Runtime {
        settings,
        assets,
        catalog,
    })
}

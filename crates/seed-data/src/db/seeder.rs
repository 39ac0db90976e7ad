//! Catalog seeding utilities.

use thiserror::Error;
use tracing::info;

use bookshelf::errors::CatalogError;
use bookshelf::models::{AuthorRecord, UserRecord};
use bookshelf::Catalog;

use crate::manifest::ManifestError;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),
    #[error("Failed to hash seed password: {0}")]
    PasswordHash(String),
}

/// Inserts generated users and authors into a catalog.
pub struct Seeder<C> {
    catalog: C,
    batch_size: usize,
}

impl<C: Catalog> Seeder<C> {
    /// Creates a new seeder over the given catalog.
    pub fn new(catalog: C) -> Self {
        Self {
            catalog,
            batch_size: 50,
        }
    }

    /// Sets the batch size for bulk operations.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Seeds users into the catalog.
    pub async fn seed_users(&self, users: &[UserRecord]) -> Result<(), SeedError> {
        info!("Seeding {} users...", users.len());

        for (i, chunk) in users.chunks(self.batch_size).enumerate() {
            self.catalog.insert_users(chunk).await?;
            let done = (i * self.batch_size + chunk.len()).min(users.len());
            if done < users.len() {
                info!("  Seeded {}/{} users", done, users.len());
            }
        }

        info!("Seeded {} users", users.len());
        Ok(())
    }

    /// Seeds author profiles. Their users must already exist.
    pub async fn seed_authors(&self, authors: &[AuthorRecord]) -> Result<(), SeedError> {
        info!("Seeding {} authors...", authors.len());

        for chunk in authors.chunks(self.batch_size) {
            self.catalog.insert_authors(chunk).await?;
        }

        info!("Seeded {} authors", authors.len());
        Ok(())
    }

    /// Clears all seeded data.
    ///
    /// **WARNING**: This deletes every book, author and user. Stored assets
    /// are left in place.
    pub async fn clear_all(&self) -> Result<(), SeedError> {
        self.catalog.clear_all().await?;
        Ok(())
    }

    /// Returns a reference to the catalog for advanced usage.
    pub fn catalog(&self) -> &C {
        &self.catalog
    }
}

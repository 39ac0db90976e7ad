//! Seed data for bookshelf.
//!
//! Generates users and author profiles, then publishes books from a local
//! manifest of e-book files, cover images and metadata. Each book's e-book is
//! stored privately and its cover publicly through the configured asset
//! backend before the catalog record is written.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use seed_data::prelude::*;
//!
//! let runtime = bootstrap::initialize(|k| std::env::var(k).ok(), |url| async move {
//!     PgCatalog::connect(url.as_deref()).await
//! })
//! .await?;
//!
//! let publisher = Arc::new(BookPublisher::new(runtime.catalog, runtime.assets));
//! let report = routines::seed_books(publisher, &runtime.settings.manifest, &mut rng).await?;
//! ```

pub mod batch;
pub mod bootstrap;
pub mod config;
pub mod db;
pub mod generators;
pub mod manifest;
pub mod publisher;
pub mod routines;

pub use bookshelf::models::{AuthorRecord, BookRecord, BookUploadRequest, UserRecord, UserRole};

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::batch::{BatchFailure, BatchItem, BatchReport, pair_with_authors, publish_batch};
    pub use crate::bootstrap::{self, Runtime, StartupError};
    pub use crate::config::{GenerationSettings, ManifestSettings, Settings};
    pub use crate::db::{SeedError, Seeder};
    pub use crate::generators::{AuthorGenerator, UserGenerator};
    pub use crate::manifest::{Manifest, ManifestError};
    pub use crate::publisher::{BookPublisher, PublishError};
    pub use crate::routines;
    pub use bookshelf::{AssetBackend, AssetStore, Catalog, MemoryCatalog, PgCatalog};
}

//! Catalog library for the bookshelf store.
//!
//! Holds the catalog models, the [`catalog::Catalog`] persistence seam, the
//! slug and size helpers used to build records, and the asset backends that
//! store e-book bodies and cover images.

pub mod assets;
pub mod auth;
pub mod catalog;
pub mod errors;
pub mod models;
pub mod size;
pub mod slug;

pub use assets::{AssetBackend, AssetStore, StorageSettings, StoredAsset};
pub use catalog::{Catalog, MemoryCatalog, PgCatalog};
pub use errors::{AssetError, CatalogError, ConfigError};
pub use models::{AuthorRecord, BookRecord, BookUploadRequest, Cover, FileInfo, Price, UserRecord, UserRole};

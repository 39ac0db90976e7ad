use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

/// Boxed error carried by asset write failures so both object storage and
/// HTTP failures fit the same variant.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Startup configuration errors. All of these are fatal and are raised before
/// any catalog connection is attempted.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("STORAGE_BACKEND is not set; expected one of: s3, local")]
    MissingBackend,

    #[error("unsupported storage backend '{0}'; expected one of: s3, local")]
    UnknownBackend(String),

    #[error("{0} is required for the selected storage backend")]
    MissingVar(&'static str),

    #[error("invalid value for {name}: {reason}")]
    InvalidVar { name: &'static str, reason: String },

    #[error("failed to build {backend} storage client: {source}")]
    Backend {
        backend: &'static str,
        #[source]
        source: object_store::Error,
    },
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog connection failed: {0}")]
    Connection(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Author not found: {0}")]
    AuthorNotFound(Uuid),
}

#[derive(Debug, Error)]
pub enum AssetError {
    /// The source file could not be read before upload.
    #[error("Asset source not readable: {}", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The storage medium rejected or could not receive the write.
    #[error("Failed to store asset {key}: {source}")]
    Write {
        key: String,
        #[source]
        source: BoxError,
    },

    #[error("Failed to read stored asset {identifier}: {source}")]
    Read {
        identifier: String,
        #[source]
        source: BoxError,
    },
}

impl AssetError {
    pub(crate) fn write(key: &str, source: impl Into<BoxError>) -> Self {
        AssetError::Write {
            key: key.to_string(),
            source: source.into(),
        }
    }

    pub(crate) fn read(identifier: &str, source: impl Into<BoxError>) -> Self {
        AssetError::Read {
            identifier: identifier.to_string(),
            source: source.into(),
        }
    }
}

//! Asset persistence for e-book bodies and cover images.
//!
//! Two interchangeable backends implement [`AssetStore`]:
//! - [`ObjectStorageBackend`]: a private and a public bucket, public URLs
//!   built from a fixed template
//! - [`LocalCdnBackend`]: private files on the local disk, public files pushed
//!   to an image CDN which hands back the URL
//!
//! The backend is chosen once at startup into an [`AssetBackend`] and never
//! re-checked per call.

mod cdn;
mod local_cdn;
mod object_storage;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::errors::{AssetError, ConfigError};

pub use cdn::{CdnClient, CdnSettings, CdnUpload};
pub use local_cdn::{LocalCdnBackend, LocalCdnSettings};
pub use object_storage::{DEFAULT_PUBLIC_HOST, ObjectStorageBackend, ObjectStorageSettings};

/// Result of storing one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAsset {
    /// Backend-specific key the bytes were stored under.
    pub identifier: String,
    /// `None` for privately stored assets.
    pub public_url: Option<String>,
}

/// Capability shared by every asset backend.
///
/// Both operations return only once the bytes are durably written, since
/// callers embed the returned identifiers in catalog records.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Stores a file that is never served directly (the e-book body).
    async fn store_private(&self, key: &str, source: &Path) -> Result<StoredAsset, AssetError>;

    /// Stores a publicly served file and returns its URL.
    async fn store_public(
        &self,
        key: &str,
        source: &Path,
        content_type: &str,
    ) -> Result<StoredAsset, AssetError>;
}

#[async_trait]
impl<T: AssetStore + ?Sized> AssetStore for Arc<T> {
    async fn store_private(&self, key: &str, source: &Path) -> Result<StoredAsset, AssetError> {
        (**self).store_private(key, source).await
    }

    async fn store_public(
        &self,
        key: &str,
        source: &Path,
        content_type: &str,
    ) -> Result<StoredAsset, AssetError> {
        (**self).store_public(key, source, content_type).await
    }
}

#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    Epub,
    Png,
    Jpeg,
    Webp,
    Other,
}

impl FileType {
    /// Classifies a file by its extension. Unknown extensions map to
    /// [`FileType::Other`].
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("epub") => FileType::Epub,
            Some("png") => FileType::Png,
            Some("jpg") | Some("jpeg") => FileType::Jpeg,
            Some("webp") => FileType::Webp,
            _ => FileType::Other,
        }
    }

    pub fn as_mime_str(self) -> &'static str {
        match self {
            FileType::Epub => "application/epub+zip",
            FileType::Png => "image/png",
            FileType::Jpeg => "image/jpeg",
            FileType::Webp => "image/webp",
            FileType::Other => "application/octet-stream",
        }
    }

    pub fn is_image(self) -> bool {
        matches!(self, FileType::Png | FileType::Jpeg | FileType::Webp)
    }
}

/// Backend selection, resolved from configuration once per process.
#[derive(Debug, Clone)]
pub enum StorageSettings {
    ObjectStorage(ObjectStorageSettings),
    LocalCdn(LocalCdnSettings),
}

impl StorageSettings {
    pub fn backend_name(&self) -> &'static str {
        match self {
            StorageSettings::ObjectStorage(_) => "s3",
            StorageSettings::LocalCdn(_) => "local",
        }
    }
}

#[derive(Debug, Clone)]
pub enum AssetBackend {
    ObjectStorage(ObjectStorageBackend),
    LocalCdn(LocalCdnBackend),
}

impl AssetBackend {
    pub fn from_settings(settings: &StorageSettings) -> Result<Self, ConfigError> {
        let backend = match settings {
            StorageSettings::ObjectStorage(s3) => {
                AssetBackend::ObjectStorage(ObjectStorageBackend::from_settings(s3)?)
            }
            StorageSettings::LocalCdn(local) => {
                AssetBackend::LocalCdn(LocalCdnBackend::from_settings(local))
            }
        };

        Ok(backend)
    }

    pub fn name(&self) -> &'static str {
        match self {
            AssetBackend::ObjectStorage(_) => "s3",
            AssetBackend::LocalCdn(_) => "local",
        }
    }

    /// Reads back a privately stored asset by its identifier.
    pub async fn fetch_private(&self, identifier: &str) -> Result<Bytes, AssetError> {
        match self {
            AssetBackend::ObjectStorage(backend) => backend.fetch_private(identifier).await,
            AssetBackend::LocalCdn(backend) => backend.fetch_private(identifier).await,
        }
    }
}

#[async_trait]
impl AssetStore for AssetBackend {
    async fn store_private(&self, key: &str, source: &Path) -> Result<StoredAsset, AssetError> {
        match self {
            AssetBackend::ObjectStorage(backend) => backend.store_private(key, source).await,
            AssetBackend::LocalCdn(backend) => backend.store_private(key, source).await,
        }
    }

    async fn store_public(
        &self,
        key: &str,
        source: &Path,
        content_type: &str,
    ) -> Result<StoredAsset, AssetError> {
        match self {
            AssetBackend::ObjectStorage(backend) => {
                backend.store_public(key, source, content_type).await
            }
            AssetBackend::LocalCdn(backend) => backend.store_public(key, source, content_type).await,
        }
    }
}

/// Reads an asset's source file into memory.
pub(crate) async fn read_source(path: &Path) -> Result<Bytes, AssetError> {
    tokio::fs::read(path)
        .await
        .map(Bytes::from)
        .map_err(|source| AssetError::NotFound {
            path: path.to_path_buf(),
            source,
        })
}

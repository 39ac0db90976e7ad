use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use object_store::{ObjectStore, PutOptions, local::LocalFileSystem, path::Path as ObjectPath};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::{AssetStore, CdnClient, CdnSettings, StoredAsset, read_source};
use crate::errors::AssetError;

#[derive(Debug, Clone)]
pub struct LocalCdnSettings {
    /// Directory receiving private files; created on first write.
    pub upload_dir: PathBuf,
    pub cdn: CdnSettings,
}

/// Writes private files to a local directory and hands public files to an
/// image CDN.
#[derive(Debug, Clone)]
pub struct LocalCdnBackend {
    upload_dir: PathBuf,
    store: OnceCell<Arc<LocalFileSystem>>,
    cdn: CdnClient,
}

impl LocalCdnBackend {
    pub fn from_settings(settings: &LocalCdnSettings) -> Self {
        Self::new(
            settings.upload_dir.clone(),
            CdnClient::new(settings.cdn.clone()),
        )
    }

    pub fn new(upload_dir: impl Into<PathBuf>, cdn: CdnClient) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            store: OnceCell::new(),
            cdn,
        }
    }

    async fn local_store(&self, key: &str) -> Result<&Arc<LocalFileSystem>, AssetError> {
        self.store
            .get_or_try_init(|| async {
                if !tokio::fs::try_exists(&self.upload_dir).await.unwrap_or(false) {
                    info!("Creating upload directory {}", self.upload_dir.display());
                }
                tokio::fs::create_dir_all(&self.upload_dir)
                    .await
                    .map_err(|e| AssetError::write(key, e))?;

                LocalFileSystem::new_with_prefix(&self.upload_dir)
                    .map(Arc::new)
                    .map_err(|e| AssetError::write(key, e))
            })
            .await
    }

    pub async fn fetch_private(&self, identifier: &str) -> Result<Bytes, AssetError> {
        let store = self
            .local_store(identifier)
            .await
            .map_err(|e| AssetError::read(identifier, e))?;

        let result = store
            .get(&ObjectPath::from(identifier))
            .await
            .map_err(|e| AssetError::read(identifier, e))?;

        result
            .bytes()
            .await
            .map_err(|e| AssetError::read(identifier, e))
    }
}

#[async_trait]
impl AssetStore for LocalCdnBackend {
    async fn store_private(&self, key: &str, source: &Path) -> Result<StoredAsset, AssetError> {
        let content = read_source(source).await?;
        let store = self.local_store(key).await?;
        let size = content.len();

        // LocalFileSystem rejects attributes, so the content type is not recorded
        store
            .put_opts(&ObjectPath::from(key), content.into(), PutOptions::default())
            .await
            .map_err(|e| AssetError::write(key, e))?;

        debug!("Wrote {} bytes to {}", size, self.upload_dir.join(key).display());

        Ok(StoredAsset {
            identifier: key.to_string(),
            public_url: None,
        })
    }

    async fn store_public(
        &self,
        key: &str,
        source: &Path,
        content_type: &str,
    ) -> Result<StoredAsset, AssetError> {
        let public_id = Path::new(key)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(key);

        let upload = self.cdn.upload(public_id, source, content_type).await?;

        Ok(StoredAsset {
            identifier: upload.public_id,
            public_url: Some(upload.secure_url),
        })
    }
}

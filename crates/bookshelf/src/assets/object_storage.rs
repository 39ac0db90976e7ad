use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use object_store::{
    Attribute, ObjectStore, PutOptions, aws::AmazonS3Builder, path::Path as ObjectPath,
};
use tracing::debug;

use super::{AssetStore, StoredAsset, read_source};
use crate::errors::{AssetError, ConfigError};

pub const DEFAULT_PUBLIC_HOST: &str = "s3.amazonaws.com";

#[derive(Debug, Clone)]
pub struct ObjectStorageSettings {
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub private_bucket: String,
    pub public_bucket: String,
    /// Host appended after the bucket name in public URLs.
    pub public_host: String,
    /// Custom endpoint for S3-compatible providers.
    pub endpoint: Option<String>,
}

/// Stores e-books in a private bucket and covers in a public bucket.
#[derive(Clone, Debug)]
pub struct ObjectStorageBackend {
    private: Arc<dyn ObjectStore>,
    public: Arc<dyn ObjectStore>,
    public_bucket: String,
    public_host: String,
}

impl ObjectStorageBackend {
    pub fn from_settings(settings: &ObjectStorageSettings) -> Result<Self, ConfigError> {
        let private = build_bucket(settings, &settings.private_bucket)?;
        let public = build_bucket(settings, &settings.public_bucket)?;

        Ok(Self::with_stores(
            Arc::new(private),
            Arc::new(public),
            settings.public_bucket.clone(),
            settings.public_host.clone(),
        ))
    }

    /// Builds the backend over already constructed stores.
    pub fn with_stores(
        private: Arc<dyn ObjectStore>,
        public: Arc<dyn ObjectStore>,
        public_bucket: impl Into<String>,
        public_host: impl Into<String>,
    ) -> Self {
        Self {
            private,
            public,
            public_bucket: public_bucket.into(),
            public_host: public_host.into(),
        }
    }

    /// Public URL of an object in the public bucket. No request is made.
    pub fn public_url(&self, key: &str) -> String {
        format!("https://{}.{}/{}", self.public_bucket, self.public_host, key)
    }

    pub async fn fetch_private(&self, identifier: &str) -> Result<Bytes, AssetError> {
        fetch(self.private.as_ref(), identifier).await
    }

    pub async fn fetch_public(&self, identifier: &str) -> Result<Bytes, AssetError> {
        fetch(self.public.as_ref(), identifier).await
    }
}

#[async_trait]
impl AssetStore for ObjectStorageBackend {
    async fn store_private(&self, key: &str, source: &Path) -> Result<StoredAsset, AssetError> {
        let content = read_source(source).await?;
        put(self.private.as_ref(), key, content, PutOptions::default()).await?;

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
        let content = read_source(source).await?;

        let mut opts = PutOptions::default();
        opts.attributes
            .insert(Attribute::ContentType, content_type.to_string().into());

        put(self.public.as_ref(), key, content, opts).await?;

        Ok(StoredAsset {
            identifier: key.to_string(),
            public_url: Some(self.public_url(key)),
        })
    }
}

fn build_bucket(
    settings: &ObjectStorageSettings,
    bucket: &str,
) -> Result<impl ObjectStore, ConfigError> {
    let mut builder = AmazonS3Builder::new()
        .with_region(&settings.region)
        .with_bucket_name(bucket)
        .with_access_key_id(&settings.access_key_id)
        .with_secret_access_key(&settings.secret_access_key);

    if let Some(endpoint) = &settings.endpoint {
        builder = builder
            .with_endpoint(endpoint)
            .with_allow_http(endpoint.starts_with("http://"));
    }

    builder
        .build()
        .map_err(|source| ConfigError::Backend {
            backend: "s3",
            source,
        })
}

async fn put(
    store: &dyn ObjectStore,
    key: &str,
    content: Bytes,
    opts: PutOptions,
) -> Result<(), AssetError> {
    let size = content.len();
    let path = ObjectPath::from(key);

    store
        .put_opts(&path, content.into(), opts)
        .await
        .map_err(|e| AssetError::write(key, e))?;

    debug!("Stored {} bytes at {}", size, key);
    Ok(())
}

async fn fetch(store: &dyn ObjectStore, identifier: &str) -> Result<Bytes, AssetError> {
    let path = ObjectPath::from(identifier);

    let result = store
        .get(&path)
        .await
        .map_err(|e| AssetError::read(identifier, e))?;

    result
        .bytes()
        .await
        .map_err(|e| AssetError::read(identifier, e))
}

use std::path::Path;

use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::debug;

use super::read_source;
use crate::errors::AssetError;

#[derive(Debug, Clone)]
pub struct CdnSettings {
    /// Upload endpoint, e.g. `https://api.cloudinary.com/v1_1/<cloud>/image/upload`.
    pub upload_url: String,
    /// Unsigned upload preset configured on the CDN account.
    pub upload_preset: String,
    pub folder: Option<String>,
}

/// Identifier and delivery URL assigned by the CDN.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CdnUpload {
    pub public_id: String,
    pub secure_url: String,
}

/// Minimal client for an image CDN's unsigned upload API.
#[derive(Debug, Clone)]
pub struct CdnClient {
    client: Client,
    settings: CdnSettings,
}

impl CdnClient {
    pub fn new(settings: CdnSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    /// Uploads a local file. The returned id and URL are authoritative; they
    /// are never derived locally.
    pub async fn upload(
        &self,
        public_id: &str,
        source: &Path,
        content_type: &str,
    ) -> Result<CdnUpload, AssetError> {
        let content = read_source(source).await?;
        let file_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| public_id.to_string());

        let file_part = Part::bytes(content.to_vec())
            .file_name(file_name)
            .mime_str(content_type)
            .map_err(|e| AssetError::write(public_id, e))?;

        let mut form = Form::new()
            .text("upload_preset", self.settings.upload_preset.clone())
            .text("public_id", public_id.to_string())
            .part("file", file_part);

        if let Some(folder) = &self.settings.folder {
            form = form.text("folder", folder.clone());
        }

        debug!("Uploading {} to image CDN", public_id);

        let resp = self
            .client
            .post(&self.settings.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AssetError::write(public_id, e))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(AssetError::write(
                public_id,
                format!("CDN upload returned status {status}: {body}"),
            ));
        }

        resp.json::<CdnUpload>()
            .await
            .map_err(|e| AssetError::write(public_id, e))
    }
}

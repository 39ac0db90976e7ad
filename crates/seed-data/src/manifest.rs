//! Local book manifest: e-book files, cover images and their metadata.
//!
//! Files and metadata entries are paired by position after sorting the file
//! listings by name, so the Nth e-book, the Nth cover and the Nth metadata
//! entry describe the same book.

use std::path::{Path, PathBuf};

use rand::Rng;
use serde::Deserialize;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{info, warn};

use bookshelf::assets::FileType;
use bookshelf::models::{BookUploadRequest, Price};

use crate::config::ManifestSettings;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to list {}: {source}", path.display())]
    ListDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to read metadata file {}: {source}", path.display())]
    ReadMetadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid metadata file {}: {source}", path.display())]
    ParseMetadata {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Descriptive fields of one book, as listed in the metadata file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookMetadata {
    pub title: String,
    pub description: String,
    pub price: Price,
    pub genre: String,
    pub publication_name: String,
    pub language: String,
}

#[derive(Debug, Clone)]
pub struct Manifest {
    pub epubs: Vec<PathBuf>,
    pub covers: Vec<PathBuf>,
    pub metadata: Vec<BookMetadata>,
}

impl Manifest {
    pub async fn load(settings: &ManifestSettings) -> Result<Self, ManifestError> {
        let epubs = list_files(&settings.epub_dir, |t| t == FileType::Epub).await?;
        let covers = list_files(&settings.cover_dir, FileType::is_image).await?;
        let metadata = load_metadata(&settings.metadata_path).await?;

        info!(
            "Manifest lists {} e-books, {} covers and {} metadata entries",
            epubs.len(),
            covers.len(),
            metadata.len()
        );

        Ok(Self {
            epubs,
            covers,
            metadata,
        })
    }

    /// Number of complete books the manifest describes.
    pub fn len(&self) -> usize {
        self.epubs
            .len()
            .min(self.covers.len())
            .min(self.metadata.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Builds one upload request per complete book, each with a random
    /// publication date inside the configured window.
    ///
    /// Lists of unequal length are truncated to the shortest one.
    pub fn into_requests(
        self,
        settings: &ManifestSettings,
        rng: &mut impl Rng,
    ) -> Vec<BookUploadRequest> {
        let complete = self.len();
        let longest = self
            .epubs
            .len()
            .max(self.covers.len())
            .max(self.metadata.len());
        if longest > complete {
            warn!(
                "Manifest lists are uneven ({} e-books, {} covers, {} metadata entries); dropping {} incomplete items",
                self.epubs.len(),
                self.covers.len(),
                self.metadata.len(),
                longest - complete
            );
        }

        self.epubs
            .into_iter()
            .zip(self.covers)
            .zip(self.metadata)
            .map(|((epub_source, cover_source), meta)| BookUploadRequest {
                title: meta.title,
                description: meta.description,
                price: meta.price,
                genre: meta.genre,
                publication_name: meta.publication_name,
                language: meta.language,
                published_at: random_date(
                    settings.published_after,
                    settings.published_before,
                    rng,
                ),
                epub_source,
                cover_source,
            })
            .collect()
    }
}

/// Returns a uniformly random instant in `[from, to)`, or `from` when the
/// window is empty.
pub fn random_date(from: OffsetDateTime, to: OffsetDateTime, rng: &mut impl Rng) -> OffsetDateTime {
    let start = from.unix_timestamp();
    let end = to.unix_timestamp();
    if end <= start {
        return from;
    }

    OffsetDateTime::from_unix_timestamp(rng.gen_range(start..end)).unwrap_or(from)
}

/// Lists regular files in `dir` whose type passes `keep`, sorted by name.
async fn list_files(
    dir: &Path,
    keep: impl Fn(FileType) -> bool,
) -> Result<Vec<PathBuf>, ManifestError> {
    let list_err = |source| ManifestError::ListDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = tokio::fs::read_dir(dir).await.map_err(list_err)?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(list_err)? {
        let path = entry.path();
        let is_file = entry.file_type().await.map_err(list_err)?.is_file();
        if is_file && keep(FileType::from_path(&path)) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

async fn load_metadata(path: &Path) -> Result<Vec<BookMetadata>, ManifestError> {
    let raw = tokio::fs::read(path)
        .await
        .map_err(|source| ManifestError::ReadMetadata {
            path: path.to_path_buf(),
            source,
        })?;

    serde_json::from_slice(&raw).map_err(|source| ManifestError::ParseMetadata {
        path: path.to_path_buf(),
        source,
    })
}

//! Per-book persistence: assets first, then the catalog record, then the
//! author's book list.

use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use bookshelf::assets::FileType;
use bookshelf::models::{BookRecord, BookUploadRequest, Cover, FileInfo};
use bookshelf::size::format_bytes;
use bookshelf::slug::derive_slug;
use bookshelf::{AssetError, AssetStore, Catalog, CatalogError};

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Unknown author: {0}")]
    UnknownAuthor(Uuid),
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Creates books by composing slug derivation, asset storage and catalog
/// writes.
///
/// Holds no mutable state, so one publisher can be shared across tasks.
pub struct BookPublisher<C, A> {
    catalog: C,
    assets: A,
}

impl<C: Catalog, A: AssetStore> BookPublisher<C, A> {
    pub fn new(catalog: C, assets: A) -> Self {
        Self { catalog, assets }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn assets(&self) -> &A {
        &self.assets
    }

    /// Stores the e-book privately and the cover publicly, inserts the book
    /// record and appends it to the author's list.
    ///
    /// The author is checked before any asset is written. Assets already
    /// stored when a later step fails are left in place.
    pub async fn create_book(
        &self,
        request: &BookUploadRequest,
        author_id: Uuid,
    ) -> Result<BookRecord, PublishError> {
        if !self.catalog.author_exists(author_id).await? {
            return Err(PublishError::UnknownAuthor(author_id));
        }

        let id = self.catalog.allocate_book_id();
        let discriminator = id.to_string();
        let slug = derive_slug(&request.title, &discriminator, None);
        let epub_key = derive_slug(&request.title, &discriminator, Some(".epub"));
        let cover_key = derive_slug(&request.title, &discriminator, Some(".png"));

        let size = tokio::fs::metadata(&request.epub_source)
            .await
            .map_err(|source| AssetError::NotFound {
                path: request.epub_source.clone(),
                source,
            })?
            .len();

        let epub = self
            .assets
            .store_private(&epub_key, &request.epub_source)
            .await?;
        debug!("Stored e-book {} as {}", epub_key, epub.identifier);

        let cover_type = match FileType::from_path(&request.cover_source) {
            t if t.is_image() => t,
            _ => {
                warn!(
                    "Cover {} is not a known image type; storing as PNG",
                    request.cover_source.display()
                );
                FileType::Png
            }
        };
        let cover = self
            .assets
            .store_public(&cover_key, &request.cover_source, cover_type.as_mime_str())
            .await?;
        let cover_url = cover.public_url.ok_or_else(|| AssetError::Write {
            key: cover_key.clone(),
            source: "backend returned no public URL".into(),
        })?;
        debug!("Stored cover {} at {}", cover_key, cover_url);

        let book = BookRecord {
            id,
            slug,
            title: request.title.clone(),
            description: request.description.clone(),
            file_info: FileInfo {
                id: epub.identifier,
                size: format_bytes(size),
            },
            cover: Cover {
                id: cover.identifier,
                url: cover_url,
            },
            price: request.price,
            genre: request.genre.clone(),
            publication_name: request.publication_name.clone(),
            language: request.language.clone(),
            published_at: request.published_at,
            author: author_id,
        };

        self.catalog.insert_book(&book).await?;
        self.catalog.append_author_book(author_id, book.id).await?;

        info!("Created book {}", book.slug);
        Ok(book)
    }
}

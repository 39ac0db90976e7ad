use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Reader,
    Author,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AuthorRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub about: String,
    pub slug: String,
    /// Ids of the books written by this author, in creation order.
    pub books: Vec<Uuid>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub mrp: f64,
    pub sale: f64,
}

/// Location and display size of the stored e-book body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub id: String,
    pub size: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cover {
    pub id: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub file_info: FileInfo,
    pub cover: Cover,
    pub price: Price,
    pub genre: String,
    pub publication_name: String,
    pub language: String,
    pub published_at: OffsetDateTime,
    pub author: Uuid,
}

/// Flat row shape of the `books` table.
#[derive(Debug, FromRow)]
pub(crate) struct BookRow {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub file_id: String,
    pub file_size: String,
    pub cover_id: String,
    pub cover_url: String,
    pub price_mrp: f64,
    pub price_sale: f64,
    pub genre: String,
    pub publication_name: String,
    pub language: String,
    pub published_at: OffsetDateTime,
    pub author_id: Uuid,
}

impl From<BookRow> for BookRecord {
    fn from(row: BookRow) -> Self {
        Self {
            id: row.id,
            slug: row.slug,
            title: row.title,
            description: row.description,
            file_info: FileInfo {
                id: row.file_id,
                size: row.file_size,
            },
            cover: Cover {
                id: row.cover_id,
                url: row.cover_url,
            },
            price: Price {
                mrp: row.price_mrp,
                sale: row.price_sale,
            },
            genre: row.genre,
            publication_name: row.publication_name,
            language: row.language,
            published_at: row.published_at,
            author: row.author_id,
        }
    }
}

/// Everything needed to publish one book. Built per item by the seeding
/// tool and never persisted as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct BookUploadRequest {
    pub title: String,
    pub description: String,
    pub price: Price,
    pub genre: String,
    pub publication_name: String,
    pub language: String,
    pub published_at: OffsetDateTime,
    pub epub_source: PathBuf,
    pub cover_source: PathBuf,
}

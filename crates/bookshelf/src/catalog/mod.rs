//! Catalog persistence for users, authors and books.
//!
//! [`Catalog`] is the only view the seeding flow has of the store. Two
//! implementations ship with the crate:
//! - [`PgCatalog`]: PostgreSQL via sqlx
//! - [`MemoryCatalog`]: process-local, for tests and dry runs

mod memory;
mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::CatalogError;
use crate::models::{AuthorRecord, BookRecord, UserRecord, UserRole};

pub use memory::MemoryCatalog;
pub use postgres::PgCatalog;

#[async_trait]
pub trait Catalog: Send + Sync {
    /// Allocates the id of a book that is about to be created.
    fn allocate_book_id(&self) -> Uuid {
        Uuid::new_v4()
    }

    async fn insert_users(&self, users: &[UserRecord]) -> Result<(), CatalogError>;

    async fn find_user(&self, id: Uuid) -> Result<Option<UserRecord>, CatalogError>;

    async fn find_users_by_role(&self, role: UserRole) -> Result<Vec<UserRecord>, CatalogError>;

    async fn insert_authors(&self, authors: &[AuthorRecord]) -> Result<(), CatalogError>;

    async fn find_author(&self, id: Uuid) -> Result<Option<AuthorRecord>, CatalogError>;

    async fn author_exists(&self, id: Uuid) -> Result<bool, CatalogError>;

    /// Ids of all authors, oldest first.
    async fn author_ids(&self) -> Result<Vec<Uuid>, CatalogError>;

    async fn insert_book(&self, book: &BookRecord) -> Result<(), CatalogError>;

    async fn find_book(&self, id: Uuid) -> Result<Option<BookRecord>, CatalogError>;

    /// Appends a book to an author's book list as a single atomic update.
    async fn append_author_book(&self, author_id: Uuid, book_id: Uuid)
    -> Result<(), CatalogError>;

    /// Deletes every book, author and user.
    async fn clear_all(&self) -> Result<(), CatalogError>;
}

#[async_trait]
impl<T: Catalog + ?Sized> Catalog for &T {
    fn allocate_book_id(&self) -> Uuid {
        (**self).allocate_book_id()
    }

    async fn insert_users(&self, users: &[UserRecord]) -> Result<(), CatalogError> {
        (**self).insert_users(users).await
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<UserRecord>, CatalogError> {
        (**self).find_user(id).await
    }

    async fn find_users_by_role(&self, role: UserRole) -> Result<Vec<UserRecord>, CatalogError> {
        (**self).find_users_by_role(role).await
    }

    async fn insert_authors(&self, authors: &[AuthorRecord]) -> Result<(), CatalogError> {
        (**self).insert_authors(authors).await
    }

    async fn find_author(&self, id: Uuid) -> Result<Option<AuthorRecord>, CatalogError> {
        (**self).find_author(id).await
    }

    async fn author_exists(&self, id: Uuid) -> Result<bool, CatalogError> {
        (**self).author_exists(id).await
    }

    async fn author_ids(&self) -> Result<Vec<Uuid>, CatalogError> {
        (**self).author_ids().await
    }

    async fn insert_book(&self, book: &BookRecord) -> Result<(), CatalogError> {
        (**self).insert_book(book).await
    }

    async fn find_book(&self, id: Uuid) -> Result<Option<BookRecord>, CatalogError> {
        (**self).find_book(id).await
    }

    async fn append_author_book(
        &self,
        author_id: Uuid,
        book_id: Uuid,
    ) -> Result<(), CatalogError> {
        (**self).append_author_book(author_id, book_id).await
    }

    async fn clear_all(&self) -> Result<(), CatalogError> {
        (**self).clear_all().await
    }
}

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::Catalog;
use crate::errors::CatalogError;
use crate::models::{AuthorRecord, BookRecord, UserRecord, UserRole};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<UserRecord>,
    authors: Vec<AuthorRecord>,
    books: Vec<BookRecord>,
}

/// Catalog kept in process memory. Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all stored books in insertion order.
    pub async fn books(&self) -> Vec<BookRecord> {
        self.tables.lock().await.books.clone()
    }

    pub async fn users(&self) -> Vec<UserRecord> {
        self.tables.lock().await.users.clone()
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn insert_users(&self, users: &[UserRecord]) -> Result<(), CatalogError> {
        let mut tables = self.tables.lock().await;
        for user in users {
            if !tables
                .users
                .iter()
                .any(|u| u.id == user.id || u.email == user.email)
            {
                tables.users.push(user.clone());
            }
        }
        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<UserRecord>, CatalogError> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_users_by_role(&self, role: UserRole) -> Result<Vec<UserRecord>, CatalogError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .users
            .iter()
            .filter(|u| u.role == role)
            .cloned()
            .collect())
    }

    async fn insert_authors(&self, authors: &[AuthorRecord]) -> Result<(), CatalogError> {
        let mut tables = self.tables.lock().await;
        for author in authors {
            if !tables.authors.iter().any(|a| a.user_id == author.user_id) {
                tables.authors.push(author.clone());
            }
        }
        Ok(())
    }

    async fn find_author(&self, id: Uuid) -> Result<Option<AuthorRecord>, CatalogError> {
        let tables = self.tables.lock().await;
        Ok(tables.authors.iter().find(|a| a.id == id).cloned())
    }

    async fn author_exists(&self, id: Uuid) -> Result<bool, CatalogError> {
        let tables = self.tables.lock().await;
        Ok(tables.authors.iter().any(|a| a.id == id))
    }

    async fn author_ids(&self) -> Result<Vec<Uuid>, CatalogError> {
        let tables = self.tables.lock().await;
        Ok(tables.authors.iter().map(|a| a.id).collect())
    }

    async fn insert_book(&self, book: &BookRecord) -> Result<(), CatalogError> {
        let mut tables = self.tables.lock().await;
        if !tables.authors.iter().any(|a| a.id == book.author) {
            return Err(CatalogError::AuthorNotFound(book.author));
        }
        tables.books.push(book.clone());
        Ok(())
    }

    async fn find_book(&self, id: Uuid) -> Result<Option<BookRecord>, CatalogError> {
        let tables = self.tables.lock().await;
        Ok(tables.books.iter().find(|b| b.id == id).cloned())
    }

    async fn append_author_book(
        &self,
        author_id: Uuid,
        book_id: Uuid,
    ) -> Result<(), CatalogError> {
        let mut tables = self.tables.lock().await;
        let author = tables
            .authors
            .iter_mut()
            .find(|a| a.id == author_id)
            .ok_or(CatalogError::AuthorNotFound(author_id))?;
        author.books.push(book_id);
        Ok(())
    }

    async fn clear_all(&self) -> Result<(), CatalogError> {
        let mut tables = self.tables.lock().await;
        *tables = Tables::default();
        Ok(())
    }
}

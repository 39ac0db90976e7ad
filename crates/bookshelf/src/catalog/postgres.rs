use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use uuid::Uuid;

use super::Catalog;
use crate::errors::CatalogError;
use crate::models::{AuthorRecord, BookRecord, BookRow, UserRecord, UserRole};

#[derive(Clone)]
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects and applies the catalog migrations.
    ///
    /// A missing URI is reported as a connection failure so callers treat it
    /// the same way as an unreachable server.
    pub async fn connect(database_url: Option<&str>) -> Result<Self, CatalogError> {
        let database_url = database_url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| CatalogError::Connection("DATABASE_URL is not set".to_string()))?;

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(|e| CatalogError::Connection(e.to_string()))?;

        info!("Connected to catalog database");

        let catalog = Self::new(pool);
        catalog.migrate().await?;
        Ok(catalog)
    }

    pub async fn migrate(&self) -> Result<(), CatalogError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Returns a reference to the pool for advanced usage.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Catalog for PgCatalog {
    async fn insert_users(&self, users: &[UserRecord]) -> Result<(), CatalogError> {
        for user in users {
            sqlx::query(
                r#"
                INSERT INTO users (id, name, email, password_hash, role, created_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(user.id)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role)
            .bind(user.created_at)
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<UserRecord>, CatalogError> {
        let user = sqlx::query_as(
            r#"
            SELECT id, name, email, password_hash, role, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_users_by_role(&self, role: UserRole) -> Result<Vec<UserRecord>, CatalogError> {
        let users = sqlx::query_as(
            r#"
            SELECT id, name, email, password_hash, role, created_at
            FROM users
            WHERE role = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(role)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn insert_authors(&self, authors: &[AuthorRecord]) -> Result<(), CatalogError> {
        for author in authors {
            sqlx::query(
                r#"
                INSERT INTO authors (id, user_id, name, about, slug, books, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                ON CONFLICT (user_id) DO NOTHING
                "#,
            )
            .bind(author.id)
            .bind(author.user_id)
            .bind(&author.name)
            .bind(&author.about)
            .bind(&author.slug)
            .bind(&author.books)
            .bind(author.created_at)
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }

    async fn find_author(&self, id: Uuid) -> Result<Option<AuthorRecord>, CatalogError> {
        let author = sqlx::query_as(
            r#"
            SELECT id, user_id, name, about, slug, books, created_at
            FROM authors
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(author)
    }

    async fn author_exists(&self, id: Uuid) -> Result<bool, CatalogError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM authors WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    async fn author_ids(&self) -> Result<Vec<Uuid>, CatalogError> {
        let ids = sqlx::query_scalar("SELECT id FROM authors ORDER BY created_at, id")
            .fetch_all(&self.pool)
            .await?;

        Ok(ids)
    }

    async fn insert_book(&self, book: &BookRecord) -> Result<(), CatalogError> {
        sqlx::query(
            r#"
            INSERT INTO books (
                id, slug, title, description,
                file_id, file_size, cover_id, cover_url,
                price_mrp, price_sale, genre, publication_name, language,
                published_at, author_id
            )
            VALUES (
                $1, $2, $3, $4,
                $5, $6, $7, $8,
                $9, $10, $11, $12, $13,
                $14, $15
            )
            "#,
        )
        .bind(book.id)
        .bind(&book.slug)
        .bind(&book.title)
        .bind(&book.description)
        .bind(&book.file_info.id)
        .bind(&book.file_info.size)
        .bind(&book.cover.id)
        .bind(&book.cover.url)
        .bind(book.price.mrp)
        .bind(book.price.sale)
        .bind(&book.genre)
        .bind(&book.publication_name)
        .bind(&book.language)
        .bind(book.published_at)
        .bind(book.author)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_book(&self, id: Uuid) -> Result<Option<BookRecord>, CatalogError> {
        let row: Option<BookRow> = sqlx::query_as(
            r#"
            SELECT id, slug, title, description,
                   file_id, file_size, cover_id, cover_url,
                   price_mrp, price_sale, genre, publication_name, language,
                   published_at, author_id
            FROM books
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(BookRecord::from))
    }

    async fn append_author_book(
        &self,
        author_id: Uuid,
        book_id: Uuid,
    ) -> Result<(), CatalogError> {
        let result = sqlx::query("UPDATE authors SET books = array_append(books, $2) WHERE id = $1")
            .bind(author_id)
            .bind(book_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::AuthorNotFound(author_id));
        }

        Ok(())
    }

    async fn clear_all(&self) -> Result<(), CatalogError> {
        info!("Clearing all seeded data...");

        // Order matters due to foreign key constraints
        sqlx::query("DELETE FROM books").execute(&self.pool).await?;
        sqlx::query("DELETE FROM authors")
            .execute(&self.pool)
            .await?;
        sqlx::query("DELETE FROM users").execute(&self.pool).await?;

        info!("All data cleared");
        Ok(())
    }
}

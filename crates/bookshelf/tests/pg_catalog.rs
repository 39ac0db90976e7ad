//! Integration tests for the PostgreSQL catalog.
//!
//! To run these tests, you need a PostgreSQL database and DATABASE_URL set.
//! Migrations are applied on connect.
//!
//! Run with: `DATABASE_URL=postgres://... cargo nextest run -p bookshelf pg_catalog`
//!
//! Note: These tests create and clean up their own rows using unique IDs,
//! so they can safely run against a development database.

use bookshelf::models::{Cover, FileInfo, Price};
use bookshelf::{AuthorRecord, BookRecord, Catalog, CatalogError, PgCatalog, UserRecord, UserRole};
use std::env;
use time::OffsetDateTime;
use uuid::Uuid;

/// Get a catalog, skipping tests if DATABASE_URL is not set.
async fn get_test_catalog() -> Option<PgCatalog> {
    let database_url = match env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: DATABASE_URL not set");
            return None;
        }
    };

    match PgCatalog::connect(Some(&database_url)).await {
        Ok(catalog) => Some(catalog),
        Err(e) => {
            eprintln!("Skipping test: Failed to connect to database: {e}");
            None
        }
    }
}

fn test_author(test_id: &str) -> (UserRecord, AuthorRecord) {
    let user = UserRecord {
        id: Uuid::new_v4(),
        name: format!("Test Author {test_id}"),
        email: format!("author-{test_id}-{}@example.com", Uuid::new_v4()),
        password_hash: "hash".to_string(),
        role: UserRole::Author,
        created_at: OffsetDateTime::now_utc(),
    };
    let author = AuthorRecord {
        id: Uuid::new_v4(),
        user_id: user.id,
        name: user.name.clone(),
        about: "Writes tests.".to_string(),
        slug: format!("test-author-{}", Uuid::new_v4()),
        books: Vec::new(),
        created_at: OffsetDateTime::now_utc(),
    };
    (user, author)
}

/// Cleanup helper to remove test data.
async fn cleanup(catalog: &PgCatalog, user_id: Uuid, author_id: Uuid) {
    let _ = sqlx::query("DELETE FROM books WHERE author_id = $1")
        .bind(author_id)
        .execute(catalog.pool())
        .await;
    let _ = sqlx::query("DELETE FROM authors WHERE id = $1")
        .bind(author_id)
        .execute(catalog.pool())
        .await;
    let _ = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(catalog.pool())
        .await;
}

#[tokio::test]
async fn test_connect_without_uri_fails() {
    let err = PgCatalog::connect(None).await.err().unwrap();
    assert!(matches!(err, CatalogError::Connection(_)));
}

#[tokio::test]
async fn test_book_roundtrip_and_author_append() {
    let Some(catalog) = get_test_catalog().await else {
        return;
    };

    let (user, author) = test_author("roundtrip");
    catalog.insert_users(&[user.clone()]).await.unwrap();
    catalog.insert_authors(&[author.clone()]).await.unwrap();
    assert!(catalog.author_exists(author.id).await.unwrap());

    let book_id = catalog.allocate_book_id();
    let book = BookRecord {
        id: book_id,
        slug: format!("pg-book-{book_id}"),
        title: "PG Book".to_string(),
        description: "Stored in postgres".to_string(),
        file_info: FileInfo {
            id: format!("pg-book-{book_id}.epub"),
            size: "1 KB".to_string(),
        },
        cover: Cover {
            id: format!("pg-book-{book_id}.png"),
            url: format!("https://covers.s3.amazonaws.com/pg-book-{book_id}.png"),
        },
        price: Price {
            mrp: 499.0,
            sale: 299.0,
        },
        genre: "Fiction".to_string(),
        publication_name: "Test Press".to_string(),
        language: "English".to_string(),
        published_at: OffsetDateTime::from_unix_timestamp(1_000_000_000).unwrap(),
        author: author.id,
    };

    catalog.insert_book(&book).await.unwrap();
    catalog.append_author_book(author.id, book_id).await.unwrap();

    let stored = catalog.find_book(book_id).await.unwrap().unwrap();
    assert_eq!(stored, book);

    let stored_author = catalog.find_author(author.id).await.unwrap().unwrap();
    assert_eq!(stored_author.books, vec![book_id]);

    cleanup(&catalog, user.id, author.id).await;
}

#[tokio::test]
async fn test_append_to_missing_author() {
    let Some(catalog) = get_test_catalog().await else {
        return;
    };

    let missing = Uuid::new_v4();
    let err = catalog
        .append_author_book(missing, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::AuthorNotFound(id) if id == missing));
}

#[tokio::test]
async fn test_duplicate_email_does_not_abort_insert() {
    let Some(catalog) = get_test_catalog().await else {
        return;
    };

    let (first, _) = test_author("dup_email");
    let second = UserRecord {
        id: Uuid::new_v4(),
        ..first.clone()
    };

    catalog
        .insert_users(&[first.clone(), second.clone()])
        .await
        .unwrap();

    let stored = catalog.find_user(first.id).await.unwrap().unwrap();
    assert_eq!(stored.email, first.email);
    assert_eq!(catalog.find_user(second.id).await.unwrap(), None);

    let _ = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(first.id)
        .execute(catalog.pool())
        .await;
}

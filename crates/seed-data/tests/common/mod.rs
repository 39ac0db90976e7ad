//! Shared fixtures: a stub image CDN, author records and book files on disk.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Multipart, Path as UrlPath, State},
    http::StatusCode,
    routing::{get, post},
};
use object_store::memory::InMemory;
use serde_json::{Value, json};
use time::OffsetDateTime;
use tokio::sync::Mutex;
use uuid::Uuid;

use bookshelf::assets::{CdnSettings, LocalCdnSettings, ObjectStorageBackend};
use bookshelf::models::{AuthorRecord, BookUploadRequest, Price};
use bookshelf::{AssetBackend, StorageSettings};

pub const PUBLIC_BUCKET: &str = "bookshelf-covers";
pub const PUBLIC_HOST: &str = "s3.example.test";

#[derive(Clone, Default)]
struct StubState {
    base_url: String,
    assets: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

/// Image CDN accepting multipart uploads and serving them back.
pub struct CdnStub {
    addr: SocketAddr,
}

impl CdnStub {
    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let state = StubState {
            base_url: format!("http://{addr}"),
            ..Default::default()
        };

        let app = Router::new()
            .route("/upload", post(upload))
            .route("/assets/{*public_id}", get(asset))
            .with_state(state);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn upload_url(&self) -> String {
        format!("http://{}/upload", self.addr)
    }
}

async fn upload(
    State(state): State<StubState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, StatusCode> {
    let mut public_id = None;
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?
    {
        match field.name().unwrap_or_default() {
            "file" => {
                let bytes = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;
                file = Some(bytes.to_vec());
            }
            "public_id" => {
                public_id = Some(field.text().await.map_err(|_| StatusCode::BAD_REQUEST)?);
            }
            _ => {}
        }
    }

    let (public_id, file) = public_id.zip(file).ok_or(StatusCode::BAD_REQUEST)?;
    state.assets.lock().await.insert(public_id.clone(), file);

    Ok(Json(json!({
        "public_id": public_id,
        "secure_url": format!("{}/assets/{}", state.base_url, public_id),
    })))
}

async fn asset(
    State(state): State<StubState>,
    UrlPath(public_id): UrlPath<String>,
) -> Result<Vec<u8>, StatusCode> {
    state
        .assets
        .lock()
        .await
        .get(&public_id)
        .cloned()
        .ok_or(StatusCode::NOT_FOUND)
}

/// Object storage backend over two in-memory buckets.
pub fn memory_backend() -> AssetBackend {
    AssetBackend::ObjectStorage(ObjectStorageBackend::with_stores(
        Arc::new(InMemory::new()),
        Arc::new(InMemory::new()),
        PUBLIC_BUCKET,
        PUBLIC_HOST,
    ))
}

pub fn local_backend(upload_dir: &Path, stub: &CdnStub) -> AssetBackend {
    AssetBackend::from_settings(&StorageSettings::LocalCdn(LocalCdnSettings {
        upload_dir: upload_dir.to_path_buf(),
        cdn: CdnSettings {
            upload_url: stub.upload_url(),
            upload_preset: "bookshelf-seed".to_string(),
            folder: None,
        },
    }))
    .unwrap()
}

pub fn author(name: &str) -> AuthorRecord {
    AuthorRecord {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        name: name.to_string(),
        about: format!("{name} writes books."),
        slug: name.to_lowercase().replace(' ', "-"),
        books: Vec::new(),
        created_at: OffsetDateTime::now_utc(),
    }
}

/// Writes an e-book of `epub_len` bytes and a small cover under `dir`.
pub fn book_request(dir: &Path, title: &str, epub_len: usize) -> BookUploadRequest {
    let stem = title.to_lowercase().replace(' ', "_");
    let epub_source = dir.join(format!("{stem}.epub"));
    let cover_source = dir.join(format!("{stem}.png"));
    std::fs::write(&epub_source, vec![b'e'; epub_len]).unwrap();
    std::fs::write(&cover_source, format!("cover of {title}")).unwrap();

    BookUploadRequest {
        title: title.to_string(),
        description: format!("The book called {title}"),
        price: Price {
            mrp: 499.0,
            sale: 299.0,
        },
        genre: "Science Fiction".to_string(),
        publication_name: "Seed Press".to_string(),
        language: "English".to_string(),
        published_at: OffsetDateTime::now_utc(),
        epub_source,
        cover_source,
    }
}

//! Local disk + image CDN backend against a stub CDN.

mod common;

use bookshelf::assets::{CdnClient, CdnSettings, LocalCdnBackend, LocalCdnSettings};
use bookshelf::{AssetBackend, AssetError, AssetStore, StorageSettings};
use common::CdnStub;
use tempfile::TempDir;

fn local_backend(upload_dir: &std::path::Path, upload_url: String, folder: Option<&str>) -> AssetBackend {
    AssetBackend::from_settings(&StorageSettings::LocalCdn(LocalCdnSettings {
        upload_dir: upload_dir.to_path_buf(),
        cdn: CdnSettings {
            upload_url,
            upload_preset: "bookshelf-seed".to_string(),
            folder: folder.map(str::to_string),
        },
    }))
    .unwrap()
}

#[tokio::test]
async fn test_private_roundtrip_preserves_bytes() {
    let stub = CdnStub::start().await;
    let temp = TempDir::new().unwrap();
    let backend = local_backend(&temp.path().join("uploads"), stub.upload_url(), None);

    let payloads: Vec<Vec<u8>> = vec![
        Vec::new(),
        b"PK\x03\x04 minimal epub".to_vec(),
        (0..=255u8).cycle().take(70_000).collect(),
    ];

    for (i, payload) in payloads.iter().enumerate() {
        let source = temp.path().join(format!("book-{i}.epub"));
        std::fs::write(&source, payload).unwrap();

        let stored = backend
            .store_private(&format!("book-{i}.epub"), &source)
            .await
            .unwrap();
        assert_eq!(stored.public_url, None);

        let fetched = backend.fetch_private(&stored.identifier).await.unwrap();
        assert_eq!(fetched.as_ref(), payload.as_slice());
    }
}

#[tokio::test]
async fn test_public_url_comes_from_cdn_and_resolves() {
    let stub = CdnStub::start().await;
    let temp = TempDir::new().unwrap();
    let backend = local_backend(&temp.path().join("uploads"), stub.upload_url(), Some("covers"));

    let cover = temp.path().join("cover.png");
    let bytes = b"\x89PNG\r\n\x1a\n fake cover".to_vec();
    std::fs::write(&cover, &bytes).unwrap();

    let stored = backend
        .store_public("dune-42.png", &cover, "image/png")
        .await
        .unwrap();

    assert_eq!(stored.identifier, "covers/dune-42");
    let url = stored.public_url.expect("public assets carry a URL");
    assert!(url.starts_with("http://127.0.0.1:"));

    let served = reqwest::get(&url).await.unwrap().bytes().await.unwrap();
    assert_eq!(served.as_ref(), bytes.as_slice());

    let forms = stub.forms().await;
    assert_eq!(forms.len(), 1);
    assert_eq!(forms[0]["upload_preset"], "bookshelf-seed");
    assert_eq!(forms[0]["public_id"], "dune-42");

    // Public uploads never touch the local directory
    assert!(!temp.path().join("uploads").join("dune-42.png").exists());
}

#[tokio::test]
async fn test_cdn_rejection_is_write_error() {
    let stub = CdnStub::start().await;
    let temp = TempDir::new().unwrap();
    let backend = LocalCdnBackend::new(
        temp.path().join("uploads"),
        CdnClient::new(CdnSettings {
            upload_url: stub.reject_url(),
            upload_preset: "bookshelf-seed".to_string(),
            folder: None,
        }),
    );

    let cover = temp.path().join("cover.png");
    std::fs::write(&cover, b"cover").unwrap();

    let err = backend
        .store_public("cover-1.png", &cover, "image/png")
        .await
        .unwrap_err();
    assert!(matches!(err, AssetError::Write { .. }), "got: {err:?}");
}

#[tokio::test]
async fn test_unreachable_cdn_is_write_error() {
    let temp = TempDir::new().unwrap();
    // Bind then drop a listener so the port is known to be closed
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let backend = local_backend(temp.path(), format!("http://{addr}/upload"), None);

    let cover = temp.path().join("cover.png");
    std::fs::write(&cover, b"cover").unwrap();

    let err = backend
        .store_public("cover-1.png", &cover, "image/png")
        .await
        .unwrap_err();
    assert!(matches!(err, AssetError::Write { .. }), "got: {err:?}");
}

#[tokio::test]
async fn test_missing_cover_is_not_found() {
    let stub = CdnStub::start().await;
    let temp = TempDir::new().unwrap();
    let backend = local_backend(temp.path(), stub.upload_url(), None);

    let err = backend
        .store_public("cover-1.png", &temp.path().join("nope.png"), "image/png")
        .await
        .unwrap_err();
    assert!(matches!(err, AssetError::NotFound { .. }));
    assert!(stub.forms().await.is_empty());
}

#[tokio::test]
async fn test_uncreatable_upload_dir_is_write_error() {
    let stub = CdnStub::start().await;
    let temp = TempDir::new().unwrap();

    // The upload directory would have to live inside a regular file
    let blocker = temp.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").unwrap();
    let backend = local_backend(&blocker.join("uploads"), stub.upload_url(), None);

    let source = temp.path().join("book.epub");
    std::fs::write(&source, b"epub").unwrap();

    let err = backend
        .store_private("book-1.epub", &source)
        .await
        .unwrap_err();
    match err {
        AssetError::Write { key, .. } => assert_eq!(key, "book-1.epub"),
        other => panic!("expected write error, got: {other:?}"),
    }
}

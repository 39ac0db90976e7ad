//! Stub image CDN used by the integration tests.
//!
//! Accepts unsigned multipart uploads on `/upload`, serves the stored bytes
//! back on `/assets/{public_id}` and always rejects uploads on `/reject`.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::{get, post},
};
use serde_json::{Value, json};
use tokio::sync::Mutex;

#[derive(Clone, Default)]
struct StubState {
    base_url: String,
    assets: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    forms: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

pub struct CdnStub {
    addr: SocketAddr,
    state: StubState,
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
            .route("/reject", post(reject))
            .route("/assets/{*public_id}", get(asset))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn upload_url(&self) -> String {
        format!("http://{}/upload", self.addr)
    }

    pub fn reject_url(&self) -> String {
        format!("http://{}/reject", self.addr)
    }

    /// Text fields of every upload received so far.
    pub async fn forms(&self) -> Vec<HashMap<String, String>> {
        self.state.forms.lock().await.clone()
    }
}

async fn upload(
    State(state): State<StubState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, StatusCode> {
    let mut fields = HashMap::new();
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            let bytes = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;
            file = Some(bytes.to_vec());
        } else {
            let value = field.text().await.map_err(|_| StatusCode::BAD_REQUEST)?;
            fields.insert(name, value);
        }
    }

    let file = file.ok_or(StatusCode::BAD_REQUEST)?;
    if !fields.contains_key("upload_preset") {
        return Err(StatusCode::BAD_REQUEST);
    }
    let public_id = fields
        .get("public_id")
        .cloned()
        .ok_or(StatusCode::BAD_REQUEST)?;
    let public_id = match fields.get("folder") {
        Some(folder) => format!("{folder}/{public_id}"),
        None => public_id,
    };

    state.assets.lock().await.insert(public_id.clone(), file);
    state.forms.lock().await.push(fields);

    Ok(Json(json!({
        "public_id": public_id,
        "secure_url": format!("{}/assets/{}", state.base_url, public_id),
    })))
}

async fn reject() -> StatusCode {
    StatusCode::UNAUTHORIZED
}

async fn asset(
    State(state): State<StubState>,
    Path(public_id): Path<String>,
) -> Result<Vec<u8>, StatusCode> {
    state
        .assets
        .lock()
        .await
        .get(&public_id)
        .cloned()
        .ok_or(StatusCode::NOT_FOUND)
}

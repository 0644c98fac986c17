#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use storefront_api::auth::jwt::{generate_access_token, JwtConfig};
use storefront_api::config::ServerConfig;
use storefront_api::router::build_app_router;
use storefront_api::state::AppState;
use storefront_core::error::CoreError;
use storefront_core::images::ImageStore;
use storefront_core::roles::{ROLE_ADMIN, ROLE_CUSTOMER};
use tower::ServiceExt;

/// Image store that records every removal request instead of touching disk.
#[derive(Default)]
pub struct RecordingImageStore {
    removed: Mutex<Vec<Vec<String>>>,
}

impl RecordingImageStore {
    /// Every `remove_images` call, in order.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.removed.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageStore for RecordingImageStore {
    async fn remove_images(&self, image_ids: &[String]) -> Result<(), CoreError> {
        self.removed.lock().unwrap().push(image_ids.to_vec());
        Ok(())
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        image_storage_dir: PathBuf::from("/tmp/storefront-test-images"),
        jwt: JwtConfig {
            secret: "storefront-test-secret".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router on `pool`, returning the image store
/// so tests can assert on removals.
pub fn build_test_app_with_store(pool: PgPool) -> (Router, Arc<RecordingImageStore>) {
    let config = test_config();
    let store = Arc::new(RecordingImageStore::default());
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        image_store: store.clone(),
    };
    (build_app_router(state, &config), store)
}

/// Build the full application router on `pool`.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_store(pool).0
}

// ---------------------------------------------------------------------------
// Auth helpers
// ---------------------------------------------------------------------------

pub fn admin_token() -> String {
    generate_access_token(1, ROLE_ADMIN, &test_config().jwt).unwrap()
}

pub fn customer_token(user_id: i64) -> String {
    generate_access_token(user_id, ROLE_CUSTOMER, &test_config().jwt).unwrap()
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Collect a response body as raw bytes.
pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

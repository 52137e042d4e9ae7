#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use estates_api::config::{ServerConfig, StorageBackend};
use estates_api::router::build_app_router;
use estates_api::state::AppState;
use estates_core::media::MediaStore;
use estates_db::store::JsonFileStore;

pub const ADMIN_PASS: &str = "let-me-in";
const BOUNDARY: &str = "----estates-test-boundary";

/// Build a test `ServerConfig` rooted in `dir`.
pub fn test_config(dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        storage: StorageBackend::File {
            data_file: dir.join("data/properties.json"),
        },
        uploads_dir: dir.join("public/uploads"),
        public_dir: dir.join("public"),
        media_base_url: None,
        site_url: "https://estates.example".to_string(),
        admin_pass: Some(ADMIN_PASS.to_string()),
        max_images: 4,
        max_videos: 2,
        max_upload_bytes: 10 * 1024 * 1024,
    }
}

/// A router over a file-backed store in a fresh temporary directory.
///
/// The directory lives as long as this value.
pub struct TestApp {
    pub dir: TempDir,
    pub config: ServerConfig,
    pub router: Router,
}

impl TestApp {
    pub fn uploads_dir(&self) -> PathBuf {
        self.config.uploads_dir.clone()
    }

    pub fn data_file(&self) -> PathBuf {
        match &self.config.storage {
            StorageBackend::File { data_file } => data_file.clone(),
            StorageBackend::Postgres { .. } => unreachable!("test app is file-backed"),
        }
    }

    /// On-disk path for a `/uploads/...` reference.
    pub fn media_path(&self, reference: &str) -> PathBuf {
        let relative = reference
            .strip_prefix("/uploads/")
            .expect("local media reference");
        self.uploads_dir().join(relative)
    }

    pub fn app(&self) -> Router {
        self.router.clone()
    }
}

/// Build the full application router exactly as `main.rs` does.
pub async fn build_test_app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let StorageBackend::File { data_file } = &config.storage else {
        unreachable!()
    };
    let store = JsonFileStore::new(data_file);
    store.migrate().await.unwrap();

    let media = MediaStore::new(&config.uploads_dir);
    media.ensure_dirs().await.unwrap();

    let state = AppState::new(Arc::new(store), Arc::new(media), config.clone());
    let router = build_app_router(state, &config);

    TestApp {
        dir,
        config,
        router,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(
        app,
        Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// ---------------------------------------------------------------------------
// Multipart
// ---------------------------------------------------------------------------

enum Part {
    Text { name: String, value: String },
    File { name: String, file_name: String, data: Vec<u8> },
}

/// Minimal `multipart/form-data` body builder.
#[derive(Default)]
pub struct MultipartForm {
    parts: Vec<Part>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.parts.push(Part::Text {
            name: name.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, data: &[u8]) -> Self {
        self.parts.push(Part::File {
            name: name.to_string(),
            file_name: file_name.to_string(),
            data: data.to_vec(),
        });
        self
    }

    fn into_body(self) -> Vec<u8> {
        let mut body = Vec::new();
        for part in self.parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::Text { name, value } => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n")
                            .as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
                Part::File {
                    name,
                    file_name,
                    data,
                } => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                             Content-Type: application/octet-stream\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(&data);
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    pub fn request(self, method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(self.into_body()))
            .unwrap()
    }
}

pub async fn post_form(app: Router, uri: &str, form: MultipartForm) -> Response<Body> {
    send(app, form.request(Method::POST, uri)).await
}

pub async fn put_form(app: Router, uri: &str, form: MultipartForm) -> Response<Body> {
    send(app, form.request(Method::PUT, uri)).await
}

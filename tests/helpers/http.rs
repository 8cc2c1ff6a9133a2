use super::db::TestDb;
use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use stopover::blob::BlobStore;
use stopover::describe::DescriptionGenerator;
use stopover::settings::Settings;
use stopover::web::{self, AppState};
use tempfile::TempDir;
use tower::ServiceExt;

/// Tiny byte blobs that pass (or fail) the image sniff.
pub const PNG: &[u8] = b"\x89PNG\r\n\x1a\ntest-image-one";
pub const PNG_ALT: &[u8] = b"\x89PNG\r\n\x1a\ntest-image-two";
pub const PDF: &[u8] = b"%PDF-1.4 definitely a document";

const BOUNDARY: &str = "X-STOPOVER-TEST-BOUNDARY";

/// In-process application: router over a throwaway database and upload dir.
pub struct TestApp {
    pub db: DatabaseConnection,
    router: Router,
    uploads: TempDir,
    _db: TestDb,
}

impl TestApp {
    pub async fn new() -> Self {
        let test_db = TestDb::new().await;
        let uploads = TempDir::new().expect("Failed to create uploads dir");
        let state = AppState {
            settings: Arc::new(Settings::default()),
            db: test_db.connection().clone(),
            blobs: Arc::new(BlobStore::new(uploads.path())),
            describer: Arc::new(DescriptionGenerator::new()),
        };
        Self {
            db: test_db.connection().clone(),
            router: web::router(state),
            uploads,
            _db: test_db,
        }
    }

    pub fn uploads_root(&self) -> &Path {
        self.uploads.path()
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request");
        self.send(request).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request");
        self.send(request).await
    }

    /// Sends a multipart form with the given method (POST/PUT/PATCH).
    pub async fn submit(
        &self,
        method: &str,
        uri: &str,
        form: MultipartBuilder,
    ) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(form.build()))
            .expect("Failed to build request");
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Body is not JSON")
        };
        (status, body)
    }
}

/// Hand-rolled multipart/form-data body.
#[derive(Default)]
pub struct MultipartBuilder {
    body: Vec<u8>,
}

impl MultipartBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
                 filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    fn build(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.body
    }
}

//! Common test utilities

use axum::body::{to_bytes, Body, Bytes};
use axum::Router;
use http::{header, Method, Request, StatusCode};
use phonebook_daemon::config::ServerSettings;
use phonebook_daemon::contact::{Contact, DuplicatePolicy};
use phonebook_daemon::directory::ContactDirectory;
use phonebook_daemon::server::build_router;
use phonebook_daemon::storage::{open_store, BackendKind};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

/// Every backend the directory runs on
#[allow(dead_code)] // Test utility for integration tests
pub const ALL_BACKENDS: [BackendKind; 3] =
    [BackendKind::Memory, BackendKind::File, BackendKind::Document];

/// Create a temporary directory for testing
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Where `kind` keeps its data inside `temp`
pub fn data_path(temp: &TempDir, kind: BackendKind) -> PathBuf {
    match kind {
        BackendKind::Memory => temp.path().to_path_buf(),
        BackendKind::File => temp.path().join("db.json"),
        BackendKind::Document => temp.path().join("persons"),
    }
}

/// Open a directory over `kind`. `seed` only applies to the memory backend.
pub async fn open_directory(
    temp: &TempDir,
    kind: BackendKind,
    policy: DuplicatePolicy,
    seed: Vec<Contact>,
) -> Arc<ContactDirectory> {
    let store = open_store(kind, &data_path(temp, kind), seed)
        .await
        .expect("Failed to open store");
    Arc::new(ContactDirectory::new(store, policy))
}

/// Router over `directory` with default server settings
#[allow(dead_code)] // Test utility for integration tests
pub fn test_router(directory: Arc<ContactDirectory>) -> Router {
    build_router(directory, &ServerSettings::default())
}

/// Send one request through the router and collect the whole response
#[allow(dead_code)] // Test utility for integration tests
pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Bytes) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("Failed to build request");

    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("Router is infallible");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    (status, bytes)
}

/// Like [`send`], parsing the body as JSON
#[allow(dead_code)] // Test utility for integration tests
pub async fn send_json(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let (status, bytes) = send(router, method, uri, body).await;
    let json = serde_json::from_slice(&bytes).expect("Response body should be JSON");
    (status, json)
}

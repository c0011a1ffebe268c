//! Shared fixtures for handler tests: an in-memory store, a throwaway upload
//! directory and helpers to build authenticated requests.

use crate::services;
use crate::state::AppState;
use crate::storage::UploadStorage;
use crate::store::Store;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header::{AUTHORIZATION, CONTENT_TYPE};
use actix_web::test::TestRequest;
use actix_web::{web, App, Error};
use common::model::user::{Role, User};
use tempfile::TempDir;

pub const BOUNDARY: &str = "----chart-test-boundary";

pub struct TestContext {
    pub state: AppState,
    // Dropped with the context, which removes the upload directory.
    pub dir: TempDir,
}

pub fn context() -> TestContext {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open_in_memory().unwrap();
    let uploads = UploadStorage::new(dir.path().join("uploads")).unwrap();
    let state = AppState::new(store, uploads).unwrap();
    TestContext { state, dir }
}

pub fn app(
    state: &AppState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state.clone()))
        .configure(services::configure)
}

/// Inserts an account and opens a session for it.
pub fn sign_in(state: &AppState, name: &str, role: Role) -> (User, String) {
    let user = state
        .store
        .insert_user(name, &format!("{}@example.com", name), "not-a-real-hash", role)
        .unwrap();
    let token = state.store.create_session(&user.id).unwrap();
    (user, token)
}

pub fn bearer(token: &str) -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {}", token))
}

/// A `multipart/form-data` body with one `file` part and an optional `name`
/// part.
pub fn multipart_body(
    file_name: &str,
    content_type: &str,
    bytes: &[u8],
    display_name: Option<&str>,
) -> Vec<u8> {
    let mut body = Vec::new();
    if let Some(name) = display_name {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"name\"\r\n\r\n{}\r\n",
                BOUNDARY, name
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
            BOUNDARY, file_name, content_type
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn upload_request(token: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> TestRequest {
    TestRequest::post()
        .uri("/api/files/upload")
        .insert_header(bearer(token))
        .insert_header((
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        ))
        .set_payload(multipart_body(file_name, content_type, bytes, None))
}

pub const SALES_CSV: &[u8] = b"month,sales\nJan,10\nFeb,20\nJan,5\n";

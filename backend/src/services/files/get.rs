//! # File Retrieval
//!
//! Serves `GET /api/files/{id}` and `GET /api/files/{id}/data`. Both go through
//! `load_file`, which is also what chart creation uses to resolve its source file.

use crate::auth::Principal;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::file::FileRecord;
use common::responses::ApiResponse;

/// Actix web handler for `GET /api/files/{id}`.
///
/// # Returns
/// - `200 OK` with the full `FileRecord`.
/// - `403 Forbidden` if the caller neither owns the file nor is an admin.
/// - `404 Not Found` if there is no such file.
pub async fn process(
    principal: Principal,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let file = load_file(&state, &principal, &id, true)?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(file)))
}

/// `GET /api/files/{id}/data`: the parsed table alone.
pub async fn data(
    principal: Principal,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let file = load_file(&state, &principal, &id, true)?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(file.data)))
}

/// Fetches a file the caller may use. Admins pass the ownership check only
/// when `admin_allowed` is set.
pub fn load_file(
    state: &AppState,
    principal: &Principal,
    id: &str,
    admin_allowed: bool,
) -> ApiResult<FileRecord> {
    let file = state
        .store
        .get_file(id)?
        .ok_or_else(|| ApiError::NotFound("File not found".to_string()))?;
    if !principal.can_access(&file.uploaded_by, admin_allowed) {
        return Err(ApiError::Forbidden(
            "Not authorized to access this file".to_string(),
        ));
    }
    Ok(file)
}

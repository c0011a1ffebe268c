//! # File Deletion
//!
//! Backend logic for `DELETE /api/files/{id}`.
//!
//! ## Workflow
//!
//! 1.  The file is loaded and the caller must own it or be an admin.
//! 2.  `remove_file` drops the charts built on it, then the record, then the stored
//!     bytes. A missing byte file only logs a warning, since the record is already gone.
//!
//! `remove_file` is shared with the admin routes and the retention sweep.

use crate::auth::Principal;
use crate::error::ApiResult;
use crate::services::files::get::load_file;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::responses::ApiResponse;
use log::{info, warn};

/// Actix web handler for `DELETE /api/files/{id}`.
///
/// # Arguments
/// * `id` - The file id from the URL path.
///
/// # Returns
/// - `200 OK` with a confirmation message.
/// - `403 Forbidden` or `404 Not Found` when the file cannot be loaded.
pub async fn process(
    principal: Principal,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let file = load_file(&state, &principal, &id, true)?;
    let charts = remove_file(&state, &file.id, &file.path)?;
    info!(
        "user {} deleted file {} and {} chart(s)",
        principal.id(),
        file.id,
        charts
    );
    Ok(HttpResponse::Ok().json(ApiResponse::message("File deleted successfully")))
}

/// Deletes a file record, every chart built on it and its stored bytes.
/// Returns the number of charts removed.
pub fn remove_file(state: &AppState, file_id: &str, path: &str) -> ApiResult<usize> {
    let charts = state.store.delete_charts_for_file(file_id)?;
    state.store.delete_file(file_id)?;
    if let Err(e) = state.uploads.remove(path) {
        warn!("could not remove stored bytes {}: {}", path, e);
    }
    Ok(charts)
}

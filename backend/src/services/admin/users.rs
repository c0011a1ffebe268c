//! # Admin User Management
//!
//! Listing, inspecting and deleting accounts.
//!
//! ## Deleting a user
//!
//! 1.  The acting admin's own id is refused with `400 Bad Request`.
//! 2.  `remove_user` removes each of the user's files through `remove_file`, so their
//!     charts and stored bytes go with them.
//! 3.  Charts the user built on other people's files are deleted next, then the account
//!     itself. Its sessions are dropped along with the account row.

use super::paged;
use crate::auth::AdminPrincipal;
use crate::error::{ApiError, ApiResult};
use crate::services::files::remove_file;
use crate::state::AppState;
use crate::store::ListParams;
use actix_web::{web, HttpResponse};
use common::model::stats::{UserDetails, UserStorage};
use common::requests::ListQuery;
use common::responses::ApiResponse;
use log::info;

pub async fn list(
    _admin: AdminPrincipal,
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> ApiResult<HttpResponse> {
    let params = ListParams::from_query(&query);
    let (users, total) = state.store.list_users(&params)?;
    Ok(paged(users, total, &params))
}

/// One account with everything it owns and its storage totals.
pub async fn details(
    _admin: AdminPrincipal,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user = state
        .store
        .get_user(&id)?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
    let files = state.store.files_for_user(&user.id)?;
    let charts = state.store.charts_for_user(&user.id)?;
    let stats = UserStorage {
        total_files: files.len(),
        total_charts: charts.len(),
        total_storage: files.iter().map(|f| f.size).sum(),
    };
    Ok(HttpResponse::Ok().json(ApiResponse::ok(UserDetails {
        user,
        files,
        charts,
        stats,
    })))
}

/// Actix web handler for `DELETE /api/admin/users/{id}`.
///
/// # Returns
/// - `200 OK` with a confirmation message.
/// - `400 Bad Request` when an admin targets their own account.
/// - `404 Not Found` if there is no such user.
pub async fn remove(
    admin: AdminPrincipal,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    if admin.0.id() == id.as_str() {
        return Err(ApiError::BadRequest(
            "Admins cannot delete their own account".to_string(),
        ));
    }
    if !remove_user(&state, &id)? {
        return Err(ApiError::NotFound("User not found".to_string()));
    }
    info!("admin {} deleted user {}", admin.0.id(), id);
    Ok(HttpResponse::Ok().json(ApiResponse::message("User deleted successfully")))
}

/// Deletes an account together with its files (and their charts and bytes),
/// its remaining charts and its sessions. Returns false if no such user.
pub fn remove_user(state: &AppState, user_id: &str) -> ApiResult<bool> {
    if state.store.get_user(user_id)?.is_none() {
        return Ok(false);
    }
    for (file_id, path) in state.store.file_locations_for_user(user_id)? {
        remove_file(state, &file_id, &path)?;
    }
    state.store.delete_charts_for_user(user_id)?;
    Ok(state.store.delete_user(user_id)?)
}

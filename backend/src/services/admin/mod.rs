//! # Admin Service Module
//!
//! Administrative routes under `/api/admin`. Every handler takes an
//! `AdminPrincipal`, so non-admin sessions get 403 before any work is done.
//!
//! List endpoints accept `page`, `limit`, `search`, `sortBy` and `sortOrder`
//! and answer with a `pagination` block next to the page of items.
//!
//! ## Sub-modules:
//! - `stats`: Dashboard figures.
//! - `users`, `files`, `charts`: Paged listings, lookups and cascading deletes.
//! - `settings`: The system settings document.

use crate::store::ListParams;
use actix_web::web::{delete, get, put, scope};
use actix_web::{HttpResponse, Scope};
use common::responses::{ApiResponse, Pagination};
use serde::Serialize;

mod charts;
mod files;
mod settings;
mod stats;
mod users;


const API_PATH: &str = "/api/admin";

/// Configures and returns the Actix `Scope` for the admin routes.
///
/// # Registered Routes:
///
/// *   **`GET /stats`**:
///     - **Handler**: `stats::process`
///     - **Description**: Account, file and chart totals, sign-ups in the last 30 days,
///       uploads per month and the top uploaders.
///
/// *   **`GET /users`**, **`GET /files`**, **`GET /charts`**:
///     - **Handler**: `users::list`, `files::list`, `charts::list`
///     - **Description**: Paged, searchable and sortable listings.
///
/// *   **`GET /users/{id}`**:
///     - **Handler**: `users::details`
///     - **Description**: One account with its files, charts and storage totals.
///
/// *   **`GET /charts/{id}`**:
///     - **Handler**: `charts::get`
///     - **Description**: Any chart, regardless of owner.
///
/// *   **`DELETE /users/{id}`**, **`DELETE /files/{id}`**, **`DELETE /charts/{id}`**:
///     - **Handler**: `users::remove`, `files::remove`, `charts::remove`
///     - **Description**: Deletes the record and everything that depends on it. An admin
///       cannot delete their own account.
///
/// *   **`GET /system-settings`**, **`PUT /system-settings`**:
///     - **Handler**: `settings::get`, `settings::update`
///     - **Description**: Reads or partially updates the system settings. An invalid
///       update is rejected as a whole.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/stats", get().to(stats::process))
        .route("/users", get().to(users::list))
        .route("/users/{id}", get().to(users::details))
        .route("/users/{id}", delete().to(users::remove))
        .route("/files", get().to(files::list))
        .route("/files/{id}", delete().to(files::remove))
        .route("/charts", get().to(charts::list))
        .route("/charts/{id}", get().to(charts::get))
        .route("/charts/{id}", delete().to(charts::remove))
        .route("/system-settings", get().to(settings::get))
        .route("/system-settings", put().to(settings::update))
}

/// Wraps one page of `items` in the list envelope with its `pagination` block.
fn paged<T: Serialize>(items: Vec<T>, total: u64, params: &ListParams) -> HttpResponse {
    let pagination = Pagination::new(params.page, params.limit, total);
    HttpResponse::Ok().json(ApiResponse::paged(items, pagination))
}

//! # Chart Service Module
//!
//! Charts derived from an uploaded file. The series of a chart is always computed
//! here from the stored table, never taken from the client.
//!
//! ## Sub-modules:
//! - `aggregate`: Groups rows by one column and sums another.
//! - `create`, `update`: Build and rebuild a chart's series.
//! - `list`, `get`, `delete`: The remaining CRUD handlers.

use crate::error::{ApiError, ApiResult};
use actix_web::web::{delete, get, post, put, scope};
use actix_web::Scope;

pub mod aggregate;
mod create;
mod delete;
mod get;
mod list;
mod update;


const API_PATH: &str = "/api/charts";

/// Configures and returns the Actix `Scope` for the chart routes.
///
/// # Registered Routes:
///
/// *   **`POST /`**:
///     - **Handler**: `create::process`
///     - **Description**: Groups the rows of one of the caller's files by `xAxis`, sums
///       `yAxis` per group and stores the resulting series.
///
/// *   **`GET /`**:
///     - **Handler**: `list::process`
///     - **Description**: The caller's charts, newest first.
///
/// *   **`GET /{id}`**:
///     - **Handler**: `get::process`
///     - **Description**: One chart, for its owner or an admin.
///
/// *   **`PUT /{id}`**:
///     - **Handler**: `update::process`
///     - **Description**: Partial update of title, type and axes. Changed axes recompute
///       the series from the source file.
///
/// *   **`DELETE /{id}`**:
///     - **Handler**: `delete::process`
///     - **Description**: Removes one chart, for its owner or an admin.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", post().to(create::process))
        .route("", get().to(list::process))
        .route("/{id}", get().to(get::process))
        .route("/{id}", put().to(update::process))
        .route("/{id}", delete().to(delete::process))
}

/// Trims `value` and rejects it when nothing is left.
fn required(value: &str, field: &str) -> ApiResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::BadRequest(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

//! # File Service Module
//!
//! Spreadsheet uploads owned by the caller. Reads and deletes are allowed for the
//! owner and for admins.
//!
//! ## Sub-modules:
//! - `upload`: Multipart upload, policy checks and parsing.
//! - `parse`: Turns xlsx, xls and csv bytes into a `ParsedTable`.
//! - `list`, `get`: The caller's files and single-file lookups.
//! - `delete`: Removes a file with its charts and stored bytes.

use actix_web::web::{delete, get, post, scope};
use actix_web::Scope;

mod delete;
mod get;
mod list;
pub mod parse;
mod upload;


pub use delete::remove_file;
pub use get::load_file;

const API_PATH: &str = "/api/files";

/// Configures and returns the Actix `Scope` for the file routes.
///
/// # Registered Routes:
///
/// *   **`POST /upload`**:
///     - **Handler**: `upload::process`
///     - **Description**: Accepts a multipart form with a `file` part (xlsx, xls or csv)
///       and an optional `name` part. The bytes are parsed into a `ParsedTable`, written
///       to upload storage and recorded with the parsed table embedded.
///
/// *   **`GET /`**:
///     - **Handler**: `list::process`
///     - **Description**: The caller's files, newest first, without their tables.
///
/// *   **`GET /{id}`**:
///     - **Handler**: `get::process`
///     - **Description**: One file including its parsed table.
///
/// *   **`GET /{id}/data`**:
///     - **Handler**: `get::data`
///     - **Description**: Only the parsed table of one file.
///
/// *   **`DELETE /{id}`**:
///     - **Handler**: `delete::process`
///     - **Description**: Removes the record, every chart built on it and the stored bytes.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/upload", post().to(upload::process))
        .route("", get().to(list::process))
        .route("/{id}", get().to(get::process))
        .route("/{id}/data", get().to(get::data))
        .route("/{id}", delete().to(delete::process))
}

//! HTTP surface: one scope per resource, each defined in its own module.

use crate::error::ApiError;
use actix_web::web;

pub mod admin;
pub mod auth;
pub mod charts;
pub mod files;

const JSON_LIMIT: usize = 10 * 1024 * 1024;

/// Registers every scope plus extractor settings that turn malformed bodies
/// and query strings into the usual error envelope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(JSON_LIMIT)
            .error_handler(|err, _| ApiError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _| ApiError::BadRequest(err.to_string()).into()),
    )
    .service(auth::configure_routes())
    .service(files::configure_routes())
    .service(charts::configure_routes())
    .service(admin::configure_routes());
}

use super::paged;
use crate::auth::AdminPrincipal;
use crate::error::{ApiError, ApiResult};
use crate::services::files::remove_file;
use crate::state::AppState;
use crate::store::ListParams;
use actix_web::{web, HttpResponse};
use common::requests::ListQuery;
use common::responses::ApiResponse;
use log::info;

pub async fn list(
    _admin: AdminPrincipal,
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> ApiResult<HttpResponse> {
    let params = ListParams::from_query(&query);
    let (files, total) = state.store.list_files(&params)?;
    Ok(paged(files, total, &params))
}

/// Deletes any file with its charts and bytes, whoever owns it.
pub async fn remove(
    admin: AdminPrincipal,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let file = state
        .store
        .get_file(&id)?
        .ok_or_else(|| ApiError::NotFound("File not found".to_string()))?;
    let charts = remove_file(&state, &file.id, &file.path)?;
    info!(
        "admin {} deleted file {} and {} chart(s)",
        admin.0.id(),
        file.id,
        charts
    );
    Ok(HttpResponse::Ok().json(ApiResponse::message("File deleted successfully")))
}

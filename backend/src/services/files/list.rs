//! `GET /api/files`: the caller's uploads, newest first, as `FileSummary` items
//! so the parsed tables stay out of the listing.

use crate::auth::Principal;
use crate::error::ApiResult;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::responses::ApiResponse;

pub async fn process(principal: Principal, state: web::Data<AppState>) -> ApiResult<HttpResponse> {
    let files = state.store.files_for_user(principal.id())?;
    Ok(HttpResponse::Ok().json(ApiResponse::list(files)))
}

//! `GET /api/admin/stats`: dashboard figures computed against the current time.

use crate::auth::AdminPrincipal;
use crate::error::ApiResult;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use common::responses::ApiResponse;

pub async fn process(_admin: AdminPrincipal, state: web::Data<AppState>) -> ApiResult<HttpResponse> {
    let stats = state.store.dashboard_stats(Utc::now())?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(stats)))
}

//! `GET /api/charts`: the caller's charts, newest first.

use crate::auth::Principal;
use crate::error::ApiResult;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::responses::ApiResponse;

pub async fn process(principal: Principal, state: web::Data<AppState>) -> ApiResult<HttpResponse> {
    let charts = state.store.charts_for_user(principal.id())?;
    Ok(HttpResponse::Ok().json(ApiResponse::list(charts)))
}

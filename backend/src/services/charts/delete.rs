use super::get::load_chart;
use crate::auth::Principal;
use crate::error::ApiResult;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::responses::ApiResponse;

pub async fn process(
    principal: Principal,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let chart = load_chart(&state, &principal, &id, true)?;
    state.store.delete_chart(&chart.id)?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Chart deleted successfully")))
}

use super::paged;
use crate::auth::AdminPrincipal;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::store::ListParams;
use actix_web::{web, HttpResponse};
use common::requests::ListQuery;
use common::responses::ApiResponse;

pub async fn list(
    _admin: AdminPrincipal,
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> ApiResult<HttpResponse> {
    let params = ListParams::from_query(&query);
    let (charts, total) = state.store.list_charts(&params)?;
    Ok(paged(charts, total, &params))
}

pub async fn get(
    _admin: AdminPrincipal,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let chart = state
        .store
        .get_chart(&id)?
        .ok_or_else(|| ApiError::NotFound("Chart not found".to_string()))?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(chart)))
}

pub async fn remove(
    _admin: AdminPrincipal,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    if !state.store.delete_chart(&id)? {
        return Err(ApiError::NotFound("Chart not found".to_string()));
    }
    Ok(HttpResponse::Ok().json(ApiResponse::message("Chart deleted successfully")))
}

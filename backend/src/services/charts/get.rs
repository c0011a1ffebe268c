use crate::auth::Principal;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::chart::ChartRecord;
use common::responses::ApiResponse;

pub async fn process(
    principal: Principal,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let chart = load_chart(&state, &principal, &id, true)?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(chart)))
}

/// Fetches a chart the caller may see or change. The admin bypass applies only
/// when `admin_allowed` is set.
pub(super) fn load_chart(
    state: &AppState,
    principal: &Principal,
    id: &str,
    admin_allowed: bool,
) -> ApiResult<ChartRecord> {
    let chart = state
        .store
        .get_chart(id)?
        .ok_or_else(|| ApiError::NotFound("Chart not found".to_string()))?;
    if !principal.can_access(&chart.created_by, admin_allowed) {
        return Err(ApiError::Forbidden(
            "Not authorized to access this chart".to_string(),
        ));
    }
    Ok(chart)
}

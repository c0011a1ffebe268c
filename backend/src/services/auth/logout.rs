use crate::auth::Principal;
use crate::error::ApiResult;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::responses::ApiResponse;

/// Ends the session behind the presented token only.
pub async fn process(principal: Principal, state: web::Data<AppState>) -> ApiResult<HttpResponse> {
    state.store.delete_session(&principal.token)?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Logged out successfully")))
}

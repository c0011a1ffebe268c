use crate::auth::Principal;
use crate::error::ApiResult;
use actix_web::HttpResponse;
use common::responses::ApiResponse;

pub async fn process(principal: Principal) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::ok(principal.user)))
}

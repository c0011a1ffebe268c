//! `POST /api/auth/login`. Unknown emails and wrong passwords produce the same
//! `401 Invalid credentials`.

use crate::auth::password::verify_password;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::requests::LoginRequest;
use common::responses::ApiResponse;
use log::info;

pub async fn process(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let LoginRequest { email, password } = body.into_inner();
    let email = email.trim().to_ascii_lowercase();

    let invalid = || ApiError::Unauthorized("Invalid credentials".to_string());
    let (user, hash) = state.store.find_credentials(&email)?.ok_or_else(invalid)?;
    let matches = web::block(move || verify_password(&password, &hash)).await?;
    if !matches {
        return Err(invalid());
    }

    let token = state.store.create_session(&user.id)?;
    info!("user {} signed in", user.id);
    Ok(HttpResponse::Ok().json(ApiResponse::ok(user).with_token(token)))
}

//! # Registration
//!
//! Backend logic for `POST /api/auth/register`.
//!
//! ## Workflow
//!
//! 1.  **Normalisation**: The name is trimmed and the email trimmed and lower-cased.
//! 2.  **Validation**: `validate` requires a name, a `local@domain.tld` email and a
//!     password of at least six characters.
//! 3.  **Uniqueness**: An email that is already registered answers `409 Conflict`.
//! 4.  **Account Creation**: The password is hashed with Argon2 on the blocking pool,
//!     the user stored with the `user` role and a session opened.
//! 5.  **HTTP Response**: `201 Created` with the user and its `token`.

use super::MIN_PASSWORD_LEN;
use crate::auth::password::hash_password;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::user::Role;
use common::requests::RegisterRequest;
use common::responses::ApiResponse;
use log::info;
use regex::Regex;

/// Actix web handler for `POST /api/auth/register`.
///
/// # Returns
/// - `201 Created` with the new user and a bearer token.
/// - `400 Bad Request` for invalid input, `409 Conflict` for a taken email.
pub async fn process(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest {
        name,
        email,
        password,
    } = body.into_inner();
    let name = name.trim().to_string();
    let email = email.trim().to_ascii_lowercase();
    validate(&name, &email, &password)?;

    if state.store.email_taken(&email)? {
        return Err(ApiError::Conflict("User already exists".to_string()));
    }

    let hash = web::block(move || hash_password(&password)).await??;
    let user = state.store.insert_user(&name, &email, &hash, Role::User)?;
    let token = state.store.create_session(&user.id)?;

    info!("registered user {} ({})", user.id, user.email);
    Ok(HttpResponse::Created().json(ApiResponse::ok(user).with_token(token)))
}

fn validate(name: &str, email: &str, password: &str) -> ApiResult<()> {
    if name.is_empty() {
        return Err(ApiError::BadRequest("Please add a name".to_string()));
    }
    let email_re = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
        .map_err(|e| ApiError::Internal(format!("Regex error: {}", e)))?;
    if !email_re.is_match(email) {
        return Err(ApiError::BadRequest("Please add a valid email".to_string()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

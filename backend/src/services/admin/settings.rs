//! System settings for admins. Updates are validated as a whole, saved, and then
//! reloaded into the shared `SettingsState` so later requests see them.

use crate::auth::AdminPrincipal;
use crate::error::ApiResult;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::requests::SettingsUpdate;
use common::responses::ApiResponse;

pub async fn get(_admin: AdminPrincipal, state: web::Data<AppState>) -> ApiResult<HttpResponse> {
    let settings = state.settings.snapshot().await;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(settings)))
}

/// Actix web handler for `PUT /api/admin/system-settings`.
///
/// # Arguments
/// * `admin` - The acting admin, recorded as `updatedBy`.
/// * `body` - A `SettingsUpdate` where absent fields keep their current value.
///
/// # Returns
/// - `200 OK` with the settings as saved.
/// - `400 Bad Request` if any value is out of range; nothing is changed.
pub async fn update(
    admin: AdminPrincipal,
    state: web::Data<AppState>,
    body: web::Json<SettingsUpdate>,
) -> ApiResult<HttpResponse> {
    let saved = state
        .settings
        .update(&state.store, body.into_inner(), admin.0.id())
        .await?;
    Ok(HttpResponse::Ok()
        .json(ApiResponse::ok(saved).with_message("System settings updated successfully")))
}

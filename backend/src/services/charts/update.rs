//! # Chart Update Service
//!
//! `PUT /api/charts/{id}` applies a partial update. Only fields present in the body
//! change, and only the owner may update a chart.
//!
//! The stored series is recomputed when `xAxis` or `yAxis` actually changes. If the
//! source file has since been deleted the old series is kept and a warning logged.

use super::aggregate::aggregate;
use super::get::load_chart;
use super::required;
use crate::auth::Principal;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use common::requests::UpdateChartRequest;
use common::responses::ApiResponse;
use log::warn;

/// Actix web handler for `PUT /api/charts/{id}`.
///
/// # Returns
/// - `200 OK` with the chart as stored after the update.
/// - `400 Bad Request` if a present field is blank.
/// - `403 Forbidden` for anyone but the owner, `404 Not Found` for an unknown id.
pub async fn process(
    principal: Principal,
    state: web::Data<AppState>,
    id: web::Path<String>,
    body: web::Json<UpdateChartRequest>,
) -> ApiResult<HttpResponse> {
    let mut chart = load_chart(&state, &principal, &id, false)?;
    let changes = body.into_inner();

    if let Some(title) = changes.title {
        chart.title = required(&title, "title")?;
    }
    if let Some(kind) = changes.kind {
        chart.kind = kind;
    }
    let mut axes_changed = false;
    if let Some(x_axis) = changes.x_axis {
        let x_axis = required(&x_axis, "xAxis")?;
        axes_changed |= x_axis != chart.x_axis;
        chart.x_axis = x_axis;
    }
    if let Some(y_axis) = changes.y_axis {
        let y_axis = required(&y_axis, "yAxis")?;
        axes_changed |= y_axis != chart.y_axis;
        chart.y_axis = y_axis;
    }

    if axes_changed {
        match state.store.get_file(&chart.file)? {
            Some(file) => chart.data = aggregate(&file.data.rows, &chart.x_axis, &chart.y_axis),
            None => warn!(
                "chart {} points at missing file {}; keeping its stored series",
                chart.id, chart.file
            ),
        }
    }
    chart.updated_at = Utc::now();

    if !state.store.update_chart(&chart)? {
        return Err(ApiError::NotFound("Chart not found".to_string()));
    }
    let chart = state
        .store
        .get_chart(&chart.id)?
        .ok_or_else(|| ApiError::NotFound("Chart not found".to_string()))?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(chart)))
}

//! # Chart Creation Service
//!
//! Backend logic for `POST /api/charts`.
//!
//! ## Workflow
//!
//! 1.  **Validation**: `title`, `xAxis` and `yAxis` are trimmed and must not be empty.
//!
//! 2.  **Source File**: The referenced file is loaded. Only its owner may chart it;
//!     the admin bypass does not apply here.
//!
//! 3.  **Aggregation**: `aggregate` groups the file's rows by `xAxis` in first-seen
//!     order and sums `yAxis` per group.
//!
//! 4.  **Persistence**: The `ChartRecord` is stored with the file's display name
//!     denormalised onto it, and returned with `201 Created`.

use super::aggregate::aggregate;
use super::required;
use crate::auth::Principal;
use crate::error::ApiResult;
use crate::services::files::load_file;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use common::model::chart::ChartRecord;
use common::requests::CreateChartRequest;
use common::responses::ApiResponse;
use log::info;

/// Actix web handler for `POST /api/charts`.
///
/// Any `data` sent by the client is ignored; the series always comes from the file.
///
/// # Arguments
/// * `principal` - The caller, who must own the source file.
/// * `body` - A `CreateChartRequest` naming the file, chart type and axes.
///
/// # Returns
/// - `201 Created` with the stored `ChartRecord`.
/// - `400 Bad Request` if a required field is blank.
/// - `403 Forbidden` or `404 Not Found` if the file cannot be used.
pub async fn process(
    principal: Principal,
    state: web::Data<AppState>,
    body: web::Json<CreateChartRequest>,
) -> ApiResult<HttpResponse> {
    let request = body.into_inner();
    let title = required(&request.title, "title")?;
    let x_axis = required(&request.x_axis, "xAxis")?;
    let y_axis = required(&request.y_axis, "yAxis")?;
    let file = load_file(&state, &principal, &request.file_id, false)?;

    let data = aggregate(&file.data.rows, &x_axis, &y_axis);
    let now = Utc::now();
    let chart = ChartRecord {
        id: uuid::Uuid::new_v4().to_string(),
        title,
        kind: request.kind,
        file: file.id.clone(),
        file_name: Some(file.name.clone()),
        x_axis,
        y_axis,
        data,
        created_by: principal.id().to_string(),
        created_at: now,
        updated_at: now,
    };
    state.store.insert_chart(&chart)?;

    info!(
        "user {} created {} chart {} from file {} ({} groups)",
        principal.id(),
        chart.kind,
        chart.id,
        file.id,
        chart.data.labels.len()
    );
    Ok(HttpResponse::Created().json(ApiResponse::ok(chart)))
}

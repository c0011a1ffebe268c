use crate::model::chart::{ChartKind, ChartSeries};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `POST /api/charts`.
///
/// `data` is accepted for compatibility with older clients but the stored
/// series is always recomputed from the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChartRequest {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub file_id: String,
    pub x_axis: String,
    pub y_axis: String,
    #[serde(default)]
    pub data: Option<ChartSeries>,
}

/// Body of `PUT /api/charts/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateChartRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<ChartKind>,
    #[serde(default)]
    pub x_axis: Option<String>,
    #[serde(default)]
    pub y_axis: Option<String>,
}

/// Query string shared by the admin listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub sort_order: Option<String>,
}

/// Partial update of the system settings; absent fields keep their value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    #[serde(default)]
    pub max_file_size: Option<u32>,
    #[serde(default)]
    pub allowed_file_types: Option<Vec<String>>,
    #[serde(default)]
    pub max_files_per_user: Option<u32>,
    #[serde(default)]
    pub data_retention_days: Option<u32>,
    #[serde(default)]
    pub enable_notifications: Option<bool>,
    #[serde(default)]
    pub enable_analytics: Option<bool>,
}

use crate::model::chart::ChartRecord;
use crate::model::file::FileSummary;
use crate::model::user::User;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyUploads {
    pub year: i32,
    pub month: u32,
    pub count: u64,
    pub total_size: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopUploader {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub file_count: u64,
    pub total_size: u64,
}

/// Figures shown on the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: u64,
    pub total_files: u64,
    pub total_charts: u64,
    pub total_admins: u64,
    /// Accounts created in the last 30 days.
    pub recent_users: u64,
    /// Most recent months first, at most twelve entries.
    pub file_stats: Vec<MonthlyUploads>,
    pub top_users: Vec<TopUploader>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStorage {
    pub total_files: usize,
    pub total_charts: usize,
    pub total_storage: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDetails {
    pub user: User,
    pub files: Vec<FileSummary>,
    pub charts: Vec<ChartRecord>,
    pub stats: UserStorage,
}

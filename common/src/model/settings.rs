use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Operator-tunable limits applied to uploads and stored data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSettings {
    /// Upload size limit in megabytes.
    pub max_file_size: u32,
    /// Lower-case extensions accepted by the upload endpoint.
    pub allowed_file_types: Vec<String>,
    pub max_files_per_user: u32,
    pub data_retention_days: u32,
    pub enable_notifications: bool,
    pub enable_analytics: bool,
    #[serde(default)]
    pub updated_by: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for SystemSettings {
    fn default() -> Self {
        SystemSettings {
            max_file_size: 10,
            allowed_file_types: vec!["xlsx".to_string(), "xls".to_string(), "csv".to_string()],
            max_files_per_user: 100,
            data_retention_days: 365,
            enable_notifications: true,
            enable_analytics: true,
            updated_by: None,
            updated_at: None,
        }
    }
}

impl SystemSettings {
    pub const MIN_FILE_SIZE_MB: u32 = 1;
    pub const MAX_FILE_SIZE_MB: u32 = 100;
    pub const MIN_RETENTION_DAYS: u32 = 30;
    /// One hundred years.
    pub const MAX_RETENTION_DAYS: u32 = 36_500;

    pub fn max_file_size_bytes(&self) -> u64 {
        u64::from(self.max_file_size) * 1024 * 1024
    }

    /// Case-insensitive check against `allowed_file_types`.
    pub fn allows_extension(&self, extension: &str) -> bool {
        self.allowed_file_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(extension))
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(Self::MIN_FILE_SIZE_MB..=Self::MAX_FILE_SIZE_MB).contains(&self.max_file_size) {
            return Err(format!(
                "maxFileSize must be between {} and {} MB",
                Self::MIN_FILE_SIZE_MB,
                Self::MAX_FILE_SIZE_MB
            ));
        }
        if self.allowed_file_types.is_empty() {
            return Err("allowedFileTypes must not be empty".to_string());
        }
        if self.max_files_per_user < 1 {
            return Err("maxFilesPerUser must be at least 1".to_string());
        }
        if !(Self::MIN_RETENTION_DAYS..=Self::MAX_RETENTION_DAYS).contains(&self.data_retention_days)
        {
            return Err(format!(
                "dataRetentionDays must be between {} and {}",
                Self::MIN_RETENTION_DAYS,
                Self::MAX_RETENTION_DAYS
            ));
        }
        Ok(())
    }
}

use crate::model::table::ParsedTable;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored upload together with the table parsed from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: String,
    pub name: String,
    pub original_name: String,
    /// Where the raw bytes were written by the upload storage.
    pub path: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub content_type: String,
    #[serde(rename = "rows")]
    pub row_count: usize,
    #[serde(rename = "columns")]
    pub column_count: usize,
    pub data: ParsedTable,
    pub uploaded_by: String,
    pub uploaded_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

/// `FileRecord` without the embedded table, used by listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSummary {
    pub id: String,
    pub name: String,
    pub original_name: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub content_type: String,
    #[serde(rename = "rows")]
    pub row_count: usize,
    #[serde(rename = "columns")]
    pub column_count: usize,
    pub uploaded_by: String,
    pub uploaded_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

impl From<&FileRecord> for FileSummary {
    fn from(record: &FileRecord) -> Self {
        FileSummary {
            id: record.id.clone(),
            name: record.name.clone(),
            original_name: record.original_name.clone(),
            size: record.size,
            content_type: record.content_type.clone(),
            row_count: record.row_count,
            column_count: record.column_count,
            uploaded_by: record.uploaded_by.clone(),
            uploaded_at: record.uploaded_at,
            last_modified: record.last_modified,
        }
    }
}

use super::listing::{Collection, ListParams};
use super::{count_column, json_column, to_json, Store};
use chrono::{DateTime, Utc};
use common::model::file::{FileRecord, FileSummary};
use rusqlite::{params, params_from_iter, OptionalExtension};

const FILES: Collection = Collection {
    search_columns: &["name"],
    sort_fields: &[
        ("name", "name"),
        ("originalName", "original_name"),
        ("size", "size"),
        ("type", "content_type"),
        ("rows", "row_count"),
        ("columns", "column_count"),
        ("uploadedAt", "uploaded_at"),
        ("lastModified", "last_modified"),
    ],
    default_sort: "uploaded_at",
};

const SUMMARY_COLUMNS: &str = "id, name, original_name, size, content_type, row_count, \
     column_count, uploaded_by, uploaded_at, last_modified";

fn summary_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<FileSummary> {
    Ok(FileSummary {
        id: row.get(0)?,
        name: row.get(1)?,
        original_name: row.get(2)?,
        size: count_column(row, 3)?,
        content_type: row.get(4)?,
        row_count: count_column(row, 5)? as usize,
        column_count: count_column(row, 6)? as usize,
        uploaded_by: row.get(7)?,
        uploaded_at: row.get(8)?,
        last_modified: row.get(9)?,
    })
}

fn record_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<FileRecord> {
    let summary = summary_from_row(row)?;
    Ok(FileRecord {
        id: summary.id,
        name: summary.name,
        original_name: summary.original_name,
        path: row.get(10)?,
        size: summary.size,
        content_type: summary.content_type,
        row_count: summary.row_count,
        column_count: summary.column_count,
        data: json_column(row, 11)?,
        uploaded_by: summary.uploaded_by,
        uploaded_at: summary.uploaded_at,
        last_modified: summary.last_modified,
    })
}

impl Store {
    pub fn insert_file(&self, file: &FileRecord) -> rusqlite::Result<()> {
        let data = to_json(&file.data)?;
        self.conn().execute(
            "INSERT INTO files (id, name, original_name, path, size, content_type, row_count,
                                column_count, data, uploaded_by, uploaded_at, last_modified)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                file.id,
                file.name,
                file.original_name,
                file.path,
                file.size as i64,
                file.content_type,
                file.row_count as i64,
                file.column_count as i64,
                data,
                file.uploaded_by,
                file.uploaded_at,
                file.last_modified
            ],
        )?;
        Ok(())
    }

    pub fn get_file(&self, id: &str) -> rusqlite::Result<Option<FileRecord>> {
        self.conn()
            .query_row(
                &format!("SELECT {}, path, data FROM files WHERE id = ?1", SUMMARY_COLUMNS),
                params![id],
                record_from_row,
            )
            .optional()
    }

    /// A user's files, newest first.
    pub fn files_for_user(&self, user_id: &str) -> rusqlite::Result<Vec<FileSummary>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM files WHERE uploaded_by = ?1 ORDER BY uploaded_at DESC",
            SUMMARY_COLUMNS
        ))?;
        let files = stmt
            .query_map(params![user_id], summary_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(files)
    }

    pub fn count_files_for_user(&self, user_id: &str) -> rusqlite::Result<u64> {
        self.conn().query_row(
            "SELECT COUNT(*) FROM files WHERE uploaded_by = ?1",
            params![user_id],
            |row| count_column(row, 0),
        )
    }

    pub fn list_files(&self, list: &ListParams) -> rusqlite::Result<(Vec<FileSummary>, u64)> {
        let (filter, bound) = FILES.filter(list);
        let conn = self.conn();
        let total = conn.query_row(
            &format!("SELECT COUNT(*) FROM files {}", filter),
            params_from_iter(bound.iter()),
            |row| count_column(row, 0),
        )?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM files {} {}",
            SUMMARY_COLUMNS,
            filter,
            FILES.page_clause(list)
        ))?;
        let files = stmt
            .query_map(params_from_iter(bound.iter()), summary_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok((files, total))
    }

    /// Ids and storage paths of the user's files, so the caller can cascade
    /// each delete without loading the parsed tables.
    pub fn file_locations_for_user(
        &self,
        user_id: &str,
    ) -> rusqlite::Result<Vec<(String, String)>> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT id, path FROM files WHERE uploaded_by = ?1")?;
        let locations = stmt
            .query_map(params![user_id], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(locations)
    }

    /// Ids and storage paths of files uploaded before `cutoff`.
    pub fn files_uploaded_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> rusqlite::Result<Vec<(String, String)>> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT id, path FROM files WHERE uploaded_at < ?1")?;
        let expired = stmt
            .query_map(params![cutoff], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(expired)
    }

    pub fn delete_file(&self, id: &str) -> rusqlite::Result<bool> {
        let deleted = self
            .conn()
            .execute("DELETE FROM files WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }
}

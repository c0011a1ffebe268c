use super::{count_column, Store};
use chrono::{DateTime, Duration, Utc};
use common::model::stats::{DashboardStats, MonthlyUploads, TopUploader};
use rusqlite::params;

const RECENT_USER_DAYS: i64 = 30;
const MONTHS_SHOWN: u32 = 12;
const TOP_UPLOADERS: u32 = 10;

impl Store {
    pub fn dashboard_stats(&self, now: DateTime<Utc>) -> rusqlite::Result<DashboardStats> {
        let conn = self.conn();
        let count = |sql: &str| conn.query_row(sql, [], |row| count_column(row, 0));

        let total_users = count("SELECT COUNT(*) FROM users")?;
        let total_files = count("SELECT COUNT(*) FROM files")?;
        let total_charts = count("SELECT COUNT(*) FROM charts")?;
        let total_admins = count("SELECT COUNT(*) FROM users WHERE role = 'admin'")?;
        let recent_users = conn.query_row(
            "SELECT COUNT(*) FROM users WHERE created_at >= ?1",
            params![now - Duration::days(RECENT_USER_DAYS)],
            |row| count_column(row, 0),
        )?;

        // Timestamps are stored as "YYYY-MM-DD HH:MM:SS...", so the month is a
        // fixed-width prefix.
        let mut stmt = conn.prepare(&format!(
            "SELECT CAST(substr(uploaded_at, 1, 4) AS INTEGER) AS year,
                    CAST(substr(uploaded_at, 6, 2) AS INTEGER) AS month,
                    COUNT(*), COALESCE(SUM(size), 0)
             FROM files
             GROUP BY year, month
             ORDER BY year DESC, month DESC
             LIMIT {}",
            MONTHS_SHOWN
        ))?;
        let file_stats = stmt
            .query_map([], |row| {
                Ok(MonthlyUploads {
                    year: row.get(0)?,
                    month: row.get(1)?,
                    count: count_column(row, 2)?,
                    total_size: count_column(row, 3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT u.id, u.name, u.email, COUNT(f.id) AS file_count, COALESCE(SUM(f.size), 0)
             FROM files f JOIN users u ON u.id = f.uploaded_by
             GROUP BY u.id
             ORDER BY file_count DESC, u.name ASC
             LIMIT {}",
            TOP_UPLOADERS
        ))?;
        let top_users = stmt
            .query_map([], |row| {
                Ok(TopUploader {
                    user_id: row.get(0)?,
                    name: row.get(1)?,
                    email: row.get(2)?,
                    file_count: count_column(row, 3)?,
                    total_size: count_column(row, 4)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(DashboardStats {
            total_users,
            total_files,
            total_charts,
            total_admins,
            recent_users,
            file_stats,
            top_users,
        })
    }
}

use super::listing::{Collection, ListParams};
use super::{count_column, json_column, parsed_column, to_json, Store};
use common::model::chart::ChartRecord;
use rusqlite::{params, params_from_iter, OptionalExtension};

const CHARTS: Collection = Collection {
    search_columns: &["c.title"],
    sort_fields: &[
        ("title", "c.title"),
        ("type", "c.kind"),
        ("xAxis", "c.x_axis"),
        ("yAxis", "c.y_axis"),
        ("createdAt", "c.created_at"),
        ("updatedAt", "c.updated_at"),
    ],
    default_sort: "c.created_at",
};

const CHART_SELECT: &str = "SELECT c.id, c.title, c.kind, c.file_id, f.name, c.x_axis, c.y_axis, \
     c.data, c.created_by, c.created_at, c.updated_at \
     FROM charts c LEFT JOIN files f ON f.id = c.file_id";

fn chart_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ChartRecord> {
    Ok(ChartRecord {
        id: row.get(0)?,
        title: row.get(1)?,
        kind: parsed_column(row, 2)?,
        file: row.get(3)?,
        file_name: row.get(4)?,
        x_axis: row.get(5)?,
        y_axis: row.get(6)?,
        data: json_column(row, 7)?,
        created_by: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

impl Store {
    pub fn insert_chart(&self, chart: &ChartRecord) -> rusqlite::Result<()> {
        let data = to_json(&chart.data)?;
        self.conn().execute(
            "INSERT INTO charts (id, title, kind, file_id, x_axis, y_axis, data, created_by,
                                 created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                chart.id,
                chart.title,
                chart.kind.as_str(),
                chart.file,
                chart.x_axis,
                chart.y_axis,
                data,
                chart.created_by,
                chart.created_at,
                chart.updated_at
            ],
        )?;
        Ok(())
    }

    pub fn get_chart(&self, id: &str) -> rusqlite::Result<Option<ChartRecord>> {
        self.conn()
            .query_row(
                &format!("{} WHERE c.id = ?1", CHART_SELECT),
                params![id],
                chart_from_row,
            )
            .optional()
    }

    /// Rewrites the editable fields and the series of an existing chart.
    pub fn update_chart(&self, chart: &ChartRecord) -> rusqlite::Result<bool> {
        let data = to_json(&chart.data)?;
        let updated = self.conn().execute(
            "UPDATE charts SET title = ?2, kind = ?3, x_axis = ?4, y_axis = ?5, data = ?6,
                               updated_at = ?7
             WHERE id = ?1",
            params![
                chart.id,
                chart.title,
                chart.kind.as_str(),
                chart.x_axis,
                chart.y_axis,
                data,
                chart.updated_at
            ],
        )?;
        Ok(updated > 0)
    }

    /// A user's charts, newest first.
    pub fn charts_for_user(&self, user_id: &str) -> rusqlite::Result<Vec<ChartRecord>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "{} WHERE c.created_by = ?1 ORDER BY c.created_at DESC",
            CHART_SELECT
        ))?;
        let charts = stmt
            .query_map(params![user_id], chart_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(charts)
    }

    pub fn list_charts(&self, list: &ListParams) -> rusqlite::Result<(Vec<ChartRecord>, u64)> {
        let (filter, bound) = CHARTS.filter(list);
        let conn = self.conn();
        let total = conn.query_row(
            &format!("SELECT COUNT(*) FROM charts c {}", filter),
            params_from_iter(bound.iter()),
            |row| count_column(row, 0),
        )?;
        let mut stmt = conn.prepare(&format!(
            "{} {} {}",
            CHART_SELECT,
            filter,
            CHARTS.page_clause(list)
        ))?;
        let charts = stmt
            .query_map(params_from_iter(bound.iter()), chart_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok((charts, total))
    }

    pub fn delete_chart(&self, id: &str) -> rusqlite::Result<bool> {
        let deleted = self
            .conn()
            .execute("DELETE FROM charts WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    pub fn delete_charts_for_file(&self, file_id: &str) -> rusqlite::Result<usize> {
        self.conn()
            .execute("DELETE FROM charts WHERE file_id = ?1", params![file_id])
    }

    pub fn delete_charts_for_user(&self, user_id: &str) -> rusqlite::Result<usize> {
        self.conn()
            .execute("DELETE FROM charts WHERE created_by = ?1", params![user_id])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fixtures;
    use common::model::chart::ChartKind;

    #[test]
    fn reads_carry_the_file_name_while_the_file_exists() {
        let store = Store::open_in_memory().unwrap();
        let file = fixtures::file("u1", "sales.csv");
        store.insert_file(&file).unwrap();
        let chart = fixtures::chart("u1", &file.id, "Monthly sales");
        store.insert_chart(&chart).unwrap();

        let loaded = store.get_chart(&chart.id).unwrap().unwrap();
        assert_eq!(loaded.file_name.as_deref(), Some("sales.csv"));
        assert_eq!(loaded.data, chart.data);
        assert_eq!(loaded.kind, ChartKind::Bar);

        store.delete_file(&file.id).unwrap();
        let orphan = store.get_chart(&chart.id).unwrap().unwrap();
        assert_eq!(orphan.file_name, None);
    }

    #[test]
    fn update_rewrites_editable_fields() {
        let store = Store::open_in_memory().unwrap();
        let mut chart = fixtures::chart("u1", "f1", "Draft");
        store.insert_chart(&chart).unwrap();

        chart.title = "Final".to_string();
        chart.kind = ChartKind::Pie3d;
        assert!(store.update_chart(&chart).unwrap());

        let loaded = store.get_chart(&chart.id).unwrap().unwrap();
        assert_eq!(loaded.title, "Final");
        assert_eq!(loaded.kind, ChartKind::Pie3d);
    }

    #[test]
    fn cascades_by_file_and_by_owner() {
        let store = Store::open_in_memory().unwrap();
        store.insert_chart(&fixtures::chart("u1", "f1", "a")).unwrap();
        store.insert_chart(&fixtures::chart("u1", "f2", "b")).unwrap();
        store.insert_chart(&fixtures::chart("u2", "f1", "c")).unwrap();

        assert_eq!(store.delete_charts_for_file("f1").unwrap(), 2);
        assert_eq!(store.charts_for_user("u1").unwrap().len(), 1);
        assert_eq!(store.delete_charts_for_user("u1").unwrap(), 1);
        assert!(store.charts_for_user("u1").unwrap().is_empty());
    }

    #[test]
    fn admin_listing_searches_titles() {
        let store = Store::open_in_memory().unwrap();
        for title in ["Revenue 2024", "Revenue 2025", "Headcount"] {
            store.insert_chart(&fixtures::chart("u1", "f1", title)).unwrap();
        }
        let list = ListParams {
            search: Some("revenue".to_string()),
            sort_by: Some("title".to_string()),
            ascending: false,
            ..ListParams::default()
        };
        let (charts, total) = store.list_charts(&list).unwrap();
        assert_eq!(total, 2);
        assert_eq!(charts[0].title, "Revenue 2025");
    }
}

use super::{json_column, to_json, Store};
use common::model::settings::SystemSettings;
use rusqlite::{params, OptionalExtension};

impl Store {
    /// The stored settings document, if one was ever saved.
    pub fn load_settings(&self) -> rusqlite::Result<Option<SystemSettings>> {
        self.conn()
            .query_row("SELECT document FROM settings WHERE id = 1", [], |row| {
                json_column(row, 0)
            })
            .optional()
    }

    pub fn save_settings(&self, settings: &SystemSettings) -> rusqlite::Result<()> {
        let document = to_json(settings)?;
        self.conn().execute(
            "INSERT INTO settings (id, document) VALUES (1, ?1)
             ON CONFLICT(id) DO UPDATE SET document = excluded.document",
            params![document],
        )?;
        Ok(())
    }
}

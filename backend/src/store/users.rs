use super::listing::{Collection, ListParams};
use super::{count_column, parsed_column, Store};
use chrono::Utc;
use common::model::user::{Role, User};
use rusqlite::{params, params_from_iter, OptionalExtension};

const USERS: Collection = Collection {
    search_columns: &["name", "email"],
    sort_fields: &[
        ("name", "name"),
        ("email", "email"),
        ("role", "role"),
        ("createdAt", "created_at"),
    ],
    default_sort: "created_at",
};

const USER_COLUMNS: &str = "id, name, email, role, created_at";

fn user_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        role: parsed_column(row, 3)?,
        created_at: row.get(4)?,
    })
}

impl Store {
    pub fn insert_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> rusqlite::Result<User> {
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            role,
            created_at: Utc::now(),
        };
        self.conn().execute(
            "INSERT INTO users (id, name, email, password_hash, role, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                user.id,
                user.name,
                user.email,
                password_hash,
                user.role.as_str(),
                user.created_at
            ],
        )?;
        Ok(user)
    }

    pub fn email_taken(&self, email: &str) -> rusqlite::Result<bool> {
        self.conn()
            .query_row(
                "SELECT 1 FROM users WHERE email = ?1",
                params![email],
                |_| Ok(()),
            )
            .optional()
            .map(|found| found.is_some())
    }

    /// The account and its password hash, for login.
    pub fn find_credentials(&self, email: &str) -> rusqlite::Result<Option<(User, String)>> {
        self.conn()
            .query_row(
                &format!("SELECT {}, password_hash FROM users WHERE email = ?1", USER_COLUMNS),
                params![email],
                |row| Ok((user_from_row(row)?, row.get(5)?)),
            )
            .optional()
    }

    pub fn get_user(&self, id: &str) -> rusqlite::Result<Option<User>> {
        self.conn()
            .query_row(
                &format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS),
                params![id],
                user_from_row,
            )
            .optional()
    }

    pub fn list_users(&self, list: &ListParams) -> rusqlite::Result<(Vec<User>, u64)> {
        let (filter, bound) = USERS.filter(list);
        let conn = self.conn();
        let total = conn.query_row(
            &format!("SELECT COUNT(*) FROM users {}", filter),
            params_from_iter(bound.iter()),
            |row| count_column(row, 0),
        )?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM users {} {}",
            USER_COLUMNS,
            filter,
            USERS.page_clause(list)
        ))?;
        let users = stmt
            .query_map(params_from_iter(bound.iter()), user_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok((users, total))
    }

    /// Deletes the account and its sessions. Files and charts are left to the
    /// caller.
    pub fn delete_user(&self, id: &str) -> rusqlite::Result<bool> {
        let conn = self.conn();
        conn.execute("DELETE FROM sessions WHERE user_id = ?1", params![id])?;
        let deleted = conn.execute("DELETE FROM users WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    pub fn admin_exists(&self) -> rusqlite::Result<bool> {
        self.conn()
            .query_row(
                "SELECT 1 FROM users WHERE role = 'admin' LIMIT 1",
                [],
                |_| Ok(()),
            )
            .optional()
            .map(|found| found.is_some())
    }

    pub fn create_session(&self, user_id: &str) -> rusqlite::Result<String> {
        let token = uuid::Uuid::new_v4().simple().to_string();
        self.conn().execute(
            "INSERT INTO sessions (token, user_id, created_at) VALUES (?1, ?2, ?3)",
            params![token, user_id, Utc::now()],
        )?;
        Ok(token)
    }

    pub fn user_for_token(&self, token: &str) -> rusqlite::Result<Option<User>> {
        self.conn()
            .query_row(
                "SELECT u.id, u.name, u.email, u.role, u.created_at
                 FROM sessions s JOIN users u ON u.id = s.user_id
                 WHERE s.token = ?1",
                params![token],
                user_from_row,
            )
            .optional()
    }

    pub fn delete_session(&self, token: &str) -> rusqlite::Result<()> {
        self.conn()
            .execute("DELETE FROM sessions WHERE token = ?1", params![token])?;
        Ok(())
    }
}

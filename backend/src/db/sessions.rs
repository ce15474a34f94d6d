//! Session records: one row per signed-in user, keyed by the provider's user id.
//!
//! The user id doubles as the opaque value of the session cookie. Tokens stay
//! in this table; only [`SessionRecord::view`] leaves the server.

use super::Database;
use crate::error::StoreError;
use chrono::Utc;
use common::model::session::UserView;
use rusqlite::{params, OptionalExtension, Row};

#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Access token expiry, epoch milliseconds.
    pub expires_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl SessionRecord {
    /// The client-facing projection, without any credential.
    pub fn view(&self) -> UserView {
        UserView {
            id: self.user_id.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            picture: self.picture.clone(),
        }
    }

    /// True when the access token is expired or expires within a minute.
    pub fn needs_refresh(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at - 60_000 <= Utc::now().timestamp_millis(),
            None => false,
        }
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            user_id: row.get(0)?,
            email: row.get(1)?,
            name: row.get(2)?,
            picture: row.get(3)?,
            access_token: row.get(4)?,
            refresh_token: row.get(5)?,
            expires_at: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }
}

const COLUMNS: &str = "user_id, email, name, picture, access_token, refresh_token, expires_at, created_at, updated_at";

impl Database {
    /// Inserts or replaces the session for `record.user_id`.
    ///
    /// `created_at` of an existing row is preserved and `updated_at` is set to
    /// now. A missing refresh token keeps the stored one, since providers only
    /// send it on the first consent.
    pub fn save_session(&self, record: &SessionRecord) -> Result<(), StoreError> {
        let conn = self.connect()?;
        let now = Utc::now().timestamp_millis();
        conn.execute(
            "INSERT INTO sessions (user_id, email, name, picture, access_token, refresh_token, expires_at, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
             ON CONFLICT(user_id) DO UPDATE SET
                email = excluded.email,
                name = excluded.name,
                picture = excluded.picture,
                access_token = excluded.access_token,
                refresh_token = COALESCE(excluded.refresh_token, sessions.refresh_token),
                expires_at = excluded.expires_at,
                updated_at = excluded.updated_at",
            params![
                record.user_id,
                record.email,
                record.name,
                record.picture,
                record.access_token,
                record.refresh_token,
                record.expires_at,
                now
            ],
        )?;
        Ok(())
    }

    pub fn get_session(&self, user_id: &str) -> Result<Option<SessionRecord>, StoreError> {
        let conn = self.connect()?;
        let record = conn
            .query_row(
                &format!("SELECT {} FROM sessions WHERE user_id = ?1", COLUMNS),
                params![user_id],
                SessionRecord::from_row,
            )
            .optional()?;
        Ok(record)
    }

    pub fn get_session_by_email(&self, email: &str) -> Result<Option<SessionRecord>, StoreError> {
        let conn = self.connect()?;
        let record = conn
            .query_row(
                &format!(
                    "SELECT {} FROM sessions WHERE email = ?1 ORDER BY updated_at DESC LIMIT 1",
                    COLUMNS
                ),
                params![email],
                SessionRecord::from_row,
            )
            .optional()?;
        Ok(record)
    }

    /// Returns whether a row was removed.
    pub fn delete_session(&self, user_id: &str) -> Result<bool, StoreError> {
        let conn = self.connect()?;
        let removed = conn.execute("DELETE FROM sessions WHERE user_id = ?1", params![user_id])?;
        Ok(removed > 0)
    }

    pub fn update_access_token(
        &self,
        user_id: &str,
        access_token: &str,
        expires_at: Option<i64>,
    ) -> Result<bool, StoreError> {
        let conn = self.connect()?;
        let updated = conn.execute(
            "UPDATE sessions SET access_token = ?2, expires_at = ?3, updated_at = ?4 WHERE user_id = ?1",
            params![user_id, access_token, expires_at, Utc::now().timestamp_millis()],
        )?;
        Ok(updated > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(user_id: &str) -> SessionRecord {
        SessionRecord {
            user_id: user_id.to_string(),
            email: format!("{}@example.com", user_id),
            name: "Test User".to_string(),
            picture: None,
            access_token: "access-1".to_string(),
            refresh_token: Some("refresh-1".to_string()),
            expires_at: Some(Utc::now().timestamp_millis() + 3_600_000),
            created_at: 0,
            updated_at: 0,
        }
    }

    fn database() -> (TempDir, Database) {
        let dir = TempDir::new().unwrap();
        let db = Database::open(dir.path().join("nested/sessions.sqlite")).unwrap();
        (dir, db)
    }

    #[test]
    fn save_get_delete() {
        let (_dir, db) = database();
        db.save_session(&record("u1")).unwrap();

        let stored = db.get_session("u1").unwrap().unwrap();
        assert_eq!(stored.email, "u1@example.com");
        assert!(stored.created_at > 0);
        assert_eq!(stored.created_at, stored.updated_at);
        assert_eq!(
            db.get_session_by_email("u1@example.com").unwrap().map(|r| r.user_id),
            Some("u1".to_string())
        );

        assert!(db.delete_session("u1").unwrap());
        assert!(db.get_session("u1").unwrap().is_none());
        assert!(!db.delete_session("u1").unwrap());
    }

    #[test]
    fn resave_keeps_created_at_and_refresh_token() {
        let (_dir, db) = database();
        db.save_session(&record("u1")).unwrap();
        let first = db.get_session("u1").unwrap().unwrap();

        let mut again = record("u1");
        again.access_token = "access-2".to_string();
        again.refresh_token = None;
        db.save_session(&again).unwrap();

        let stored = db.get_session("u1").unwrap().unwrap();
        assert_eq!(stored.created_at, first.created_at);
        assert_eq!(stored.access_token, "access-2");
        assert_eq!(stored.refresh_token.as_deref(), Some("refresh-1"));
    }

    #[test]
    fn access_token_updates_in_place() {
        let (_dir, db) = database();
        db.save_session(&record("u1")).unwrap();
        assert!(db.update_access_token("u1", "fresh", Some(42)).unwrap());
        let stored = db.get_session("u1").unwrap().unwrap();
        assert_eq!(stored.access_token, "fresh");
        assert!(stored.needs_refresh());
        assert!(!db.update_access_token("nobody", "x", None).unwrap());
    }

    #[test]
    fn view_has_no_credentials() {
        let json = serde_json::to_string(&record("u1").view()).unwrap();
        assert!(!json.contains("access"));
        assert!(!json.contains("refresh"));
    }
}

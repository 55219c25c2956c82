// Database access layer (SQLite via sqlx).

use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Cache {
    pub id: i64,
    pub codeword: String,
    pub latitude: f64,
    pub longitude: f64,
    pub media_ref: String,
    pub media_kind: String,
    pub created_by: i64,
    pub created_at: String,
}

/// One hunt per user. Inactive rows are kept for history; `cache_id` is
/// not a foreign key so a cache can disappear under a live session, which
/// the engine treats as an expected absence.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct NavSession {
    pub user_id: i64,
    pub cache_id: i64,
    pub last_latitude: Option<f64>,
    pub last_longitude: Option<f64>,
    pub last_message_id: Option<i64>,
    pub last_message_text: Option<String>,
    pub is_active: bool,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct WizardSession {
    pub user_id: i64,
    pub step: String,
    pub codeword: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub updated_at: String,
}

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS caches (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                codeword TEXT NOT NULL UNIQUE,
                latitude REAL NOT NULL,
                longitude REAL NOT NULL,
                media_ref TEXT NOT NULL,
                media_kind TEXT NOT NULL DEFAULT 'photo',
                created_by INTEGER NOT NULL,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            )
        "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS nav_sessions (
                user_id INTEGER PRIMARY KEY,
                cache_id INTEGER NOT NULL,
                last_latitude REAL,
                last_longitude REAL,
                last_message_id INTEGER,
                last_message_text TEXT,
                is_active INTEGER NOT NULL DEFAULT 1,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            )
        "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS wizard_sessions (
                user_id INTEGER PRIMARY KEY,
                step TEXT NOT NULL,
                codeword TEXT,
                latitude REAL,
                longitude REAL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            )
        "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // ── Caches ────────────────────────────────────────────────────────

    pub async fn create_cache(
        &self,
        codeword: &str,
        latitude: f64,
        longitude: f64,
        media_ref: &str,
        media_kind: &str,
        created_by: i64,
    ) -> Result<Cache, sqlx::Error> {
        let row = sqlx::query_as::<_, Cache>(
            "INSERT INTO caches (codeword, latitude, longitude, media_ref, media_kind, created_by) VALUES (?, ?, ?, ?, ?, ?) RETURNING id, codeword, latitude, longitude, media_ref, media_kind, created_by, created_at",
        )
        .bind(codeword)
        .bind(latitude)
        .bind(longitude)
        .bind(media_ref)
        .bind(media_kind)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn get_cache_by_codeword(&self, codeword: &str) -> Result<Option<Cache>, sqlx::Error> {
        let row = sqlx::query_as::<_, Cache>(
            "SELECT id, codeword, latitude, longitude, media_ref, media_kind, created_by, created_at FROM caches WHERE codeword = ?",
        )
        .bind(codeword)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn get_cache(&self, id: i64) -> Result<Option<Cache>, sqlx::Error> {
        let row = sqlx::query_as::<_, Cache>(
            "SELECT id, codeword, latitude, longitude, media_ref, media_kind, created_by, created_at FROM caches WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    // ── Navigation sessions ───────────────────────────────────────────

    /// Start (or restart) the one hunt a user can have. Any previous row
    /// is overwritten and its progress reset.
    pub async fn upsert_session(&self, user_id: i64, cache_id: i64) -> Result<NavSession, sqlx::Error> {
        let row = sqlx::query_as::<_, NavSession>(
            r#"
            INSERT INTO nav_sessions (user_id, cache_id, is_active, updated_at)
            VALUES (?, ?, 1, datetime('now'))
            ON CONFLICT(user_id) DO UPDATE SET
                cache_id = excluded.cache_id,
                last_latitude = NULL,
                last_longitude = NULL,
                last_message_id = NULL,
                last_message_text = NULL,
                is_active = 1,
                updated_at = datetime('now')
            RETURNING user_id, cache_id, last_latitude, last_longitude, last_message_id, last_message_text, is_active, updated_at
        "#,
        )
        .bind(user_id)
        .bind(cache_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn get_active_session(&self, user_id: i64) -> Result<Option<NavSession>, sqlx::Error> {
        let row = sqlx::query_as::<_, NavSession>(
            "SELECT user_id, cache_id, last_latitude, last_longitude, last_message_id, last_message_text, is_active, updated_at FROM nav_sessions WHERE user_id = ? AND is_active = 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update_session_progress(
        &self,
        user_id: i64,
        latitude: f64,
        longitude: f64,
        message_id: Option<i64>,
        message_text: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE nav_sessions SET last_latitude = ?, last_longitude = ?, last_message_id = ?, last_message_text = ?, updated_at = datetime('now') WHERE user_id = ?",
        )
        .bind(latitude)
        .bind(longitude)
        .bind(message_id)
        .bind(message_text)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn deactivate_session(&self, user_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE nav_sessions SET is_active = 0, updated_at = datetime('now') WHERE user_id = ? AND is_active = 1",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn clear_session(&self, user_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM nav_sessions WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ── Wizard sessions ───────────────────────────────────────────────

    pub async fn upsert_wizard(
        &self,
        user_id: i64,
        step: &str,
        codeword: Option<&str>,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO wizard_sessions (user_id, step, codeword, latitude, longitude, updated_at)
            VALUES (?, ?, ?, ?, ?, datetime('now'))
            ON CONFLICT(user_id) DO UPDATE SET
                step = excluded.step,
                codeword = excluded.codeword,
                latitude = excluded.latitude,
                longitude = excluded.longitude,
                updated_at = datetime('now')
        "#,
        )
        .bind(user_id)
        .bind(step)
        .bind(codeword)
        .bind(latitude)
        .bind(longitude)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get_wizard(&self, user_id: i64) -> Result<Option<WizardSession>, sqlx::Error> {
        let row = sqlx::query_as::<_, WizardSession>(
            "SELECT user_id, step, codeword, latitude, longitude, updated_at FROM wizard_sessions WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn delete_wizard(&self, user_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM wizard_sessions WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

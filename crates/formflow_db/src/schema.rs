//! Database schema creation for the FormFlow tables.
//!
//! All CREATE TABLE statements live here - single source of truth.

use crate::error::Result;
use crate::FormFlowDb;
use tracing::info;

impl FormFlowDb {
    /// Ensure all tables exist.
    pub(crate) async fn ensure_schema(&self) -> Result<()> {
        // Enable WAL mode for better concurrent access
        sqlx::query("PRAGMA journal_mode=WAL")
            .execute(self.pool())
            .await?;
        sqlx::query("PRAGMA synchronous=NORMAL")
            .execute(self.pool())
            .await?;
        sqlx::query("PRAGMA foreign_keys=ON")
            .execute(self.pool())
            .await?;

        // Forms: operator-defined schemas
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS forms (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT,
                status TEXT NOT NULL DEFAULT 'draft',
                published_at INTEGER,
                expires_at INTEGER,
                owner_id INTEGER NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            )"#,
        )
        .execute(self.pool())
        .await?;

        // Fields: ordered, typed definitions scoped to one form
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS form_fields (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                form_id INTEGER NOT NULL REFERENCES forms(id) ON DELETE CASCADE,
                label TEXT NOT NULL,
                field_name TEXT NOT NULL,
                field_type TEXT NOT NULL DEFAULT 'text',
                is_required INTEGER NOT NULL DEFAULT 0,
                placeholder TEXT,
                help_text TEXT,
                options_json TEXT,
                order_number INTEGER NOT NULL DEFAULT 0,
                is_active INTEGER NOT NULL DEFAULT 1,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            )"#,
        )
        .execute(self.pool())
        .await?;

        // Flattened answer rows: one (field, value) pair per row; rows of one
        // logical submission share a submission_key
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS form_submission_rows (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                submission_key TEXT NOT NULL,
                field_id INTEGER NOT NULL REFERENCES form_fields(id),
                value TEXT NOT NULL,
                file_name TEXT,
                created_at INTEGER NOT NULL
            )"#,
        )
        .execute(self.pool())
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_forms_owner ON forms(owner_id)")
            .execute(self.pool())
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_fields_form ON form_fields(form_id)")
            .execute(self.pool())
            .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_rows_key ON form_submission_rows(submission_key)",
        )
        .execute(self.pool())
        .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_rows_field ON form_submission_rows(field_id)")
            .execute(self.pool())
            .await?;

        info!("Database schema verified");
        Ok(())
    }
}

//! Form definition operations.

use crate::error::{DbError, Result};
use crate::types::*;
use crate::FormFlowDb;
use sqlx::Row;

impl FormFlowDb {
    /// Create a form. New forms start in Draft.
    pub async fn form_create(&self, new: &NewForm) -> Result<Form> {
        let now = Self::now_millis();

        let result = sqlx::query(
            r#"
            INSERT INTO forms (title, description, status, expires_at, owner_id, created_at, updated_at)
            VALUES (?, ?, 'draft', ?, ?, ?, ?)
            "#,
        )
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.expires_at.map(|dt| dt.timestamp_millis()))
        .bind(new.owner_id)
        .bind(now)
        .bind(now)
        .execute(self.pool())
        .await?;

        let id = result.last_insert_rowid();
        self.form_get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Form not found after creation"))
    }

    /// Get a form by ID.
    pub async fn form_get(&self, id: i64) -> Result<Option<Form>> {
        let row = sqlx::query("SELECT * FROM forms WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        match row {
            Some(row) => Ok(Some(self.row_to_form(&row)?)),
            None => Ok(None),
        }
    }

    /// List non-archived forms, newest first, optionally scoped to an owner.
    pub async fn form_list(&self, owner_id: Option<i64>) -> Result<Vec<Form>> {
        let rows = match owner_id {
            Some(owner) => {
                sqlx::query(
                    "SELECT * FROM forms WHERE status != 'archived' AND owner_id = ? ORDER BY created_at DESC, id DESC",
                )
                .bind(owner)
                .fetch_all(self.pool())
                .await?
            }
            None => {
                sqlx::query(
                    "SELECT * FROM forms WHERE status != 'archived' ORDER BY created_at DESC, id DESC",
                )
                .fetch_all(self.pool())
                .await?
            }
        };

        rows.iter().map(|row| self.row_to_form(row)).collect()
    }

    /// Persist a form's mutable columns (title, description, expiry, status).
    pub async fn form_update(&self, form: &Form) -> Result<()> {
        let now = Self::now_millis();

        sqlx::query(
            r#"
            UPDATE forms SET
                title = ?,
                description = ?,
                status = ?,
                published_at = ?,
                expires_at = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&form.title)
        .bind(&form.description)
        .bind(form.status.as_str())
        .bind(form.published_at.map(|dt| dt.timestamp_millis()))
        .bind(form.expires_at.map(|dt| dt.timestamp_millis()))
        .bind(now)
        .bind(form.id)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    fn row_to_form(&self, row: &sqlx::sqlite::SqliteRow) -> Result<Form> {
        let status_str: String = row.get("status");
        let status = FormStatus::parse(&status_str)
            .ok_or_else(|| DbError::invalid_state(format!("Unknown form status: {}", status_str)))?;

        let published_at: Option<i64> = row.get("published_at");
        let expires_at: Option<i64> = row.get("expires_at");
        let created_at: i64 = row.get("created_at");
        let updated_at: i64 = row.get("updated_at");

        Ok(Form {
            id: row.get("id"),
            title: row.get("title"),
            description: row.get("description"),
            status,
            published_at: published_at.map(Self::millis_to_datetime),
            expires_at: expires_at.map(Self::millis_to_datetime),
            owner_id: row.get("owner_id"),
            created_at: Self::millis_to_datetime(created_at),
            updated_at: Self::millis_to_datetime(updated_at),
        })
    }
}

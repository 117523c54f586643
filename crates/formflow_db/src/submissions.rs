//! Flattened answer-row operations.
//!
//! There is no submission table: a logical submission is the set of rows
//! sharing one correlation key, reconstructed on read.

use crate::error::{DbError, Result};
use crate::types::*;
use crate::FormFlowDb;
use formflow_ids::SubmissionKey;
use sqlx::Row;

const RECORD_SELECT: &str = r#"
    SELECT
        r.id AS row_id,
        r.submission_key,
        r.value,
        r.file_name,
        r.created_at,
        f.form_id,
        f.id AS field_id,
        f.label AS field_label,
        f.field_type,
        f.order_number AS field_order
    FROM form_submission_rows r
    JOIN form_fields f ON f.id = r.field_id
"#;

impl FormFlowDb {
    /// Insert every row of one logical submission as a single transaction.
    ///
    /// All rows share the key and one created_at instant. If any insert
    /// fails the transaction rolls back and no row is persisted.
    pub async fn submission_insert(&self, key: &SubmissionKey, rows: &[NewAnswerRow]) -> Result<()> {
        let now = Self::now_millis();
        let mut tx = self.pool().begin().await?;

        for row in rows {
            sqlx::query(
                r#"
                INSERT INTO form_submission_rows (submission_key, field_id, value, file_name, created_at)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(key.as_str())
            .bind(row.field_id)
            .bind(&row.value)
            .bind(&row.file_name)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// One page of distinct correlation keys for a form, newest first.
    ///
    /// Pagination applies to logical submissions, never to raw rows, so a
    /// submission cannot split across pages.
    pub async fn submission_keys_page(
        &self,
        form_id: i64,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<String>> {
        let rows = sqlx::query(
            r#"
            SELECT DISTINCT r.submission_key
            FROM form_submission_rows r
            JOIN form_fields f ON f.id = r.field_id
            WHERE f.form_id = ?
            ORDER BY r.submission_key DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(form_id)
        .bind(limit as i64)
        // Clamped: a negative OFFSET would read from the start instead.
        .bind(offset.min(i64::MAX as u64) as i64)
        .fetch_all(self.pool())
        .await?;

        Ok(rows
            .iter()
            .map(|row| row.get::<String, _>("submission_key"))
            .collect())
    }

    /// Count distinct logical submissions for a form.
    pub async fn submission_count(&self, form_id: i64) -> Result<u64> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(DISTINCT r.submission_key) AS n
            FROM form_submission_rows r
            JOIN form_fields f ON f.id = r.field_id
            WHERE f.form_id = ?
            "#,
        )
        .bind(form_id)
        .fetch_one(self.pool())
        .await?;

        Ok(row.get::<i64, _>("n") as u64)
    }

    /// All answer records sharing one correlation key, in field order.
    pub async fn records_for_key(&self, key: &str) -> Result<Vec<AnswerRecord>> {
        let sql = format!(
            "{} WHERE r.submission_key = ? ORDER BY f.order_number ASC, f.id ASC",
            RECORD_SELECT
        );

        let rows = sqlx::query(&sql).bind(key).fetch_all(self.pool()).await?;
        rows.iter().map(|row| self.row_to_record(row)).collect()
    }

    /// Answer records for a set of keys (one reconstruction page).
    pub async fn records_for_keys(&self, keys: &[String]) -> Result<Vec<AnswerRecord>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; keys.len()].join(", ");
        let sql = format!(
            "{} WHERE r.submission_key IN ({}) ORDER BY r.submission_key DESC, f.order_number ASC, f.id ASC",
            RECORD_SELECT, placeholders
        );

        let mut query = sqlx::query(&sql);
        for key in keys {
            query = query.bind(key);
        }

        let rows = query.fetch_all(self.pool()).await?;
        rows.iter().map(|row| self.row_to_record(row)).collect()
    }

    /// Every answer record of a form, oldest submission first (export order).
    pub async fn records_for_form(&self, form_id: i64) -> Result<Vec<AnswerRecord>> {
        let sql = format!(
            "{} WHERE f.form_id = ? ORDER BY r.submission_key ASC, f.order_number ASC, f.id ASC",
            RECORD_SELECT
        );

        let rows = sqlx::query(&sql)
            .bind(form_id)
            .fetch_all(self.pool())
            .await?;
        rows.iter().map(|row| self.row_to_record(row)).collect()
    }

    /// Delete every row of one logical submission. Returns rows removed.
    pub async fn submission_delete(&self, key: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM form_submission_rows WHERE submission_key = ?")
            .bind(key)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected())
    }

    /// Raw row count vs. distinct correlation keys for a form.
    pub async fn submission_stats(&self, form_id: i64) -> Result<SubmissionStats> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS total_rows,
                COUNT(DISTINCT r.submission_key) AS distinct_submissions
            FROM form_submission_rows r
            JOIN form_fields f ON f.id = r.field_id
            WHERE f.form_id = ?
            "#,
        )
        .bind(form_id)
        .fetch_one(self.pool())
        .await?;

        Ok(SubmissionStats {
            total_rows: row.get::<i64, _>("total_rows") as u64,
            distinct_submissions: row.get::<i64, _>("distinct_submissions") as u64,
        })
    }

    fn row_to_record(&self, row: &sqlx::sqlite::SqliteRow) -> Result<AnswerRecord> {
        let type_str: String = row.get("field_type");
        let field_type = FieldType::parse(&type_str)
            .ok_or_else(|| DbError::invalid_state(format!("Unknown field type: {}", type_str)))?;

        let created_at: i64 = row.get("created_at");

        Ok(AnswerRecord {
            row_id: row.get("row_id"),
            submission_key: row.get("submission_key"),
            form_id: row.get("form_id"),
            field_id: row.get("field_id"),
            field_label: row.get("field_label"),
            field_type,
            field_order: row.get("field_order"),
            value: row.get("value"),
            file_name: row.get("file_name"),
            created_at: Self::millis_to_datetime(created_at),
        })
    }
}

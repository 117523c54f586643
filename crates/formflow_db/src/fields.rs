//! Field definition operations, including the atomic reorder batch.

use crate::error::{DbError, Result};
use crate::types::*;
use crate::FormFlowDb;
use sqlx::Row;

impl FormFlowDb {
    /// Create a field.
    pub async fn field_create(&self, new: &NewField) -> Result<FormField> {
        let options_json = match &new.options {
            Some(options) => Some(serde_json::to_string(options)?),
            None => None,
        };
        let now = Self::now_millis();

        let result = sqlx::query(
            r#"
            INSERT INTO form_fields (
                form_id, label, field_name, field_type, is_required,
                placeholder, help_text, options_json, order_number, is_active,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 1, ?, ?)
            "#,
        )
        .bind(new.form_id)
        .bind(&new.label)
        .bind(&new.field_name)
        .bind(new.field_type.as_str())
        .bind(new.is_required)
        .bind(&new.placeholder)
        .bind(&new.help_text)
        .bind(&options_json)
        .bind(new.order_number)
        .bind(now)
        .bind(now)
        .execute(self.pool())
        .await?;

        let id = result.last_insert_rowid();
        self.field_get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Field not found after creation"))
    }

    /// Get a field by ID (active or not).
    pub async fn field_get(&self, id: i64) -> Result<Option<FormField>> {
        let row = sqlx::query("SELECT * FROM form_fields WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        match row {
            Some(row) => Ok(Some(self.row_to_field(&row)?)),
            None => Ok(None),
        }
    }

    /// Resolve a field by (id, form, active) - the ingestion lookup.
    pub async fn field_get_active(&self, id: i64, form_id: i64) -> Result<Option<FormField>> {
        let row =
            sqlx::query("SELECT * FROM form_fields WHERE id = ? AND form_id = ? AND is_active = 1")
                .bind(id)
                .bind(form_id)
                .fetch_optional(self.pool())
                .await?;

        match row {
            Some(row) => Ok(Some(self.row_to_field(&row)?)),
            None => Ok(None),
        }
    }

    /// List active fields of a form, ascending by order number.
    ///
    /// Order-number ties resolve by field id to keep the ordering
    /// deterministic; uniqueness of order numbers is not enforced.
    pub async fn fields_for_form(&self, form_id: i64) -> Result<Vec<FormField>> {
        let rows = sqlx::query(
            "SELECT * FROM form_fields WHERE form_id = ? AND is_active = 1 ORDER BY order_number ASC, id ASC",
        )
        .bind(form_id)
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(|row| self.row_to_field(row)).collect()
    }

    /// Persist a field's mutable columns.
    pub async fn field_update(&self, field: &FormField) -> Result<()> {
        let options_json = match &field.options {
            Some(options) => Some(serde_json::to_string(options)?),
            None => None,
        };
        let now = Self::now_millis();

        sqlx::query(
            r#"
            UPDATE form_fields SET
                label = ?,
                field_name = ?,
                field_type = ?,
                is_required = ?,
                placeholder = ?,
                help_text = ?,
                options_json = ?,
                order_number = ?,
                is_active = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&field.label)
        .bind(&field.field_name)
        .bind(field.field_type.as_str())
        .bind(field.is_required)
        .bind(&field.placeholder)
        .bind(&field.help_text)
        .bind(&options_json)
        .bind(field.order_number)
        .bind(field.is_active)
        .bind(now)
        .bind(field.id)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Soft-delete a field (activity flag off).
    pub async fn field_deactivate(&self, id: i64) -> Result<()> {
        let now = Self::now_millis();

        sqlx::query("UPDATE form_fields SET is_active = 0, updated_at = ? WHERE id = ?")
            .bind(now)
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(())
    }

    /// Apply a reorder batch as one transaction.
    ///
    /// Each pair updates only a field belonging to `form_id`; pairs naming
    /// foreign fields are no-ops. Fields not mentioned keep their previous
    /// order number. Either every update commits or none do.
    pub async fn fields_reorder(&self, form_id: i64, orders: &[FieldOrder]) -> Result<Vec<FormField>> {
        let now = Self::now_millis();
        let mut tx = self.pool().begin().await?;

        for order in orders {
            sqlx::query(
                "UPDATE form_fields SET order_number = ?, updated_at = ? WHERE id = ? AND form_id = ?",
            )
            .bind(order.order_number)
            .bind(now)
            .bind(order.field_id)
            .bind(form_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.fields_for_form(form_id).await
    }

    fn row_to_field(&self, row: &sqlx::sqlite::SqliteRow) -> Result<FormField> {
        let type_str: String = row.get("field_type");
        let field_type = FieldType::parse(&type_str)
            .ok_or_else(|| DbError::invalid_state(format!("Unknown field type: {}", type_str)))?;

        let options_json: Option<String> = row.get("options_json");
        let options = match options_json {
            Some(json) => Some(serde_json::from_str(&json)?),
            None => None,
        };

        let created_at: i64 = row.get("created_at");
        let updated_at: i64 = row.get("updated_at");

        Ok(FormField {
            id: row.get("id"),
            form_id: row.get("form_id"),
            label: row.get("label"),
            field_name: row.get("field_name"),
            field_type,
            is_required: row.get("is_required"),
            placeholder: row.get("placeholder"),
            help_text: row.get("help_text"),
            options,
            order_number: row.get("order_number"),
            is_active: row.get("is_active"),
            created_at: Self::millis_to_datetime(created_at),
            updated_at: Self::millis_to_datetime(updated_at),
        })
    }
}

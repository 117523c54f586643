//! Schema store operations: form and field definitions.
//!
//! Mutations and owner-scoped reads check the acting operator against the
//! form owner. Forms and fields are never hard-deleted: archiving a form
//! or deactivating a field is a state flip.

use crate::error::{Result, ServiceError};
use crate::FormFlow;
use chrono::{DateTime, Utc};
use formflow_db::{FieldOrder, FieldType, Form, FormField, NewField, NewForm};
use tracing::info;

/// Partial update for a form. `Some` fields are applied; `None` fields keep
/// their current value. Nullable columns take a nested option so
/// `Some(None)` clears the stored value (e.g. removing an expiry).
#[derive(Debug, Clone, Default)]
pub struct FormPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub expires_at: Option<Option<DateTime<Utc>>>,
}

/// Partial update for a field definition. Nullable columns follow the same
/// nested-option convention as [`FormPatch`].
#[derive(Debug, Clone, Default)]
pub struct FieldPatch {
    pub label: Option<String>,
    pub field_name: Option<String>,
    pub field_type: Option<FieldType>,
    pub is_required: Option<bool>,
    pub placeholder: Option<Option<String>>,
    pub help_text: Option<Option<String>>,
    pub options: Option<Option<Vec<String>>>,
    pub order_number: Option<i64>,
}

impl FormFlow {
    // ========================================================================
    // Form Operations
    // ========================================================================

    /// Create a form owned by `actor`. Starts in Draft.
    pub async fn create_form(&self, actor: i64, mut new: NewForm) -> Result<Form> {
        new.owner_id = actor;
        let form = self.db().form_create(&new).await?;
        info!(form_id = form.id, owner = actor, "Form created");
        Ok(form)
    }

    /// List the actor's non-archived forms, newest first.
    pub async fn list_forms(&self, actor: i64) -> Result<Vec<Form>> {
        Ok(self.db().form_list(Some(actor)).await?)
    }

    /// Fetch a form the actor owns.
    pub async fn get_form(&self, actor: i64, form_id: i64) -> Result<Form> {
        let form = self.require_form(form_id).await?;
        Self::require_owner(&form, actor)?;
        Ok(form)
    }

    /// Apply a patch to a form the actor owns.
    pub async fn update_form(&self, actor: i64, form_id: i64, patch: FormPatch) -> Result<Form> {
        let mut form = self.require_form(form_id).await?;
        Self::require_owner(&form, actor)?;

        if let Some(title) = patch.title {
            form.title = title;
        }
        if let Some(description) = patch.description {
            form.description = description;
        }
        if let Some(expires_at) = patch.expires_at {
            form.expires_at = expires_at;
        }

        self.db().form_update(&form).await?;
        Ok(form)
    }

    /// Draft -> Published.
    pub async fn publish_form(&self, actor: i64, form_id: i64) -> Result<Form> {
        let mut form = self.require_form(form_id).await?;
        Self::require_owner(&form, actor)?;

        form.publish(Utc::now())?;
        self.db().form_update(&form).await?;
        info!(form_id, "Form published");
        Ok(form)
    }

    /// Published -> Draft.
    pub async fn unpublish_form(&self, actor: i64, form_id: i64) -> Result<Form> {
        let mut form = self.require_form(form_id).await?;
        Self::require_owner(&form, actor)?;

        form.unpublish()?;
        self.db().form_update(&form).await?;
        Ok(form)
    }

    /// Soft-delete: any non-archived state -> Archived.
    pub async fn archive_form(&self, actor: i64, form_id: i64) -> Result<()> {
        let mut form = self.require_form(form_id).await?;
        Self::require_owner(&form, actor)?;

        form.archive()?;
        self.db().form_update(&form).await?;
        info!(form_id, "Form archived");
        Ok(())
    }

    // ========================================================================
    // Field Operations
    // ========================================================================

    /// Create a field on a form the actor owns.
    pub async fn create_field(&self, actor: i64, new: NewField) -> Result<FormField> {
        let form = self.require_form(new.form_id).await?;
        Self::require_owner(&form, actor)?;

        Ok(self.db().field_create(&new).await?)
    }

    /// Active fields of a form, ordered ascending by order number (ties by id).
    pub async fn list_fields(&self, form_id: i64) -> Result<Vec<FormField>> {
        self.require_form(form_id).await?;
        Ok(self.db().fields_for_form(form_id).await?)
    }

    /// Fetch a field by id.
    pub async fn get_field(&self, field_id: i64) -> Result<FormField> {
        self.db()
            .field_get(field_id)
            .await?
            .ok_or(ServiceError::FieldNotFound(field_id))
    }

    /// Apply a patch to a field on a form the actor owns.
    pub async fn update_field(
        &self,
        actor: i64,
        field_id: i64,
        patch: FieldPatch,
    ) -> Result<FormField> {
        let mut field = self.get_field(field_id).await?;
        let form = self.require_form(field.form_id).await?;
        Self::require_owner(&form, actor)?;

        if let Some(label) = patch.label {
            field.label = label;
        }
        if let Some(field_name) = patch.field_name {
            field.field_name = field_name;
        }
        if let Some(field_type) = patch.field_type {
            field.field_type = field_type;
        }
        if let Some(is_required) = patch.is_required {
            field.is_required = is_required;
        }
        if let Some(placeholder) = patch.placeholder {
            field.placeholder = placeholder;
        }
        if let Some(help_text) = patch.help_text {
            field.help_text = help_text;
        }
        if let Some(options) = patch.options {
            field.options = options;
        }
        if let Some(order_number) = patch.order_number {
            field.order_number = order_number;
        }

        self.db().field_update(&field).await?;
        Ok(field)
    }

    /// Soft-delete a field (activity flag -> false).
    pub async fn delete_field(&self, actor: i64, field_id: i64) -> Result<()> {
        let field = self.get_field(field_id).await?;
        let form = self.require_form(field.form_id).await?;
        Self::require_owner(&form, actor)?;

        self.db().field_deactivate(field_id).await?;
        Ok(())
    }

    /// Apply a reorder batch to a form the actor owns.
    ///
    /// The batch commits atomically; pairs naming fields of other forms are
    /// skipped, unmentioned fields keep their order number. Returns the
    /// resulting field list.
    pub async fn reorder_fields(
        &self,
        actor: i64,
        form_id: i64,
        orders: &[FieldOrder],
    ) -> Result<Vec<FormField>> {
        let form = self.require_form(form_id).await?;
        Self::require_owner(&form, actor)?;

        Ok(self.db().fields_reorder(form_id, orders).await?)
    }

    // ========================================================================
    // Shared guards
    // ========================================================================

    pub(crate) async fn require_form(&self, form_id: i64) -> Result<Form> {
        self.db()
            .form_get(form_id)
            .await?
            .ok_or(ServiceError::FormNotFound(form_id))
    }

    pub(crate) fn require_owner(form: &Form, actor: i64) -> Result<()> {
        if form.owner_id == actor {
            Ok(())
        } else {
            Err(ServiceError::Forbidden)
        }
    }
}

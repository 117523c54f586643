//! Entity types for the FormFlow database.
//!
//! These types are the single source of truth; every interface over the
//! store should use them.

use crate::error::DbError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Form Types
// ============================================================================

/// Lifecycle state of a form.
///
/// `Draft`, `Published` and `Archived` are stored. `Expired` is never
/// written: it is the effective state of a published form whose expiry
/// instant has passed (see [`Form::effective_status`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormStatus {
    Draft,
    Published,
    Expired,
    Archived,
}

impl FormStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Expired => "expired",
            Self::Archived => "archived",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "published" => Some(Self::Published),
            "expired" => Some(Self::Expired),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }
}

impl std::fmt::Display for FormStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An operator-defined form: an ordered set of typed fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: FormStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Form {
    /// The state the form is effectively in at `now`.
    pub fn effective_status(&self, now: DateTime<Utc>) -> FormStatus {
        match (self.status, self.expires_at) {
            (FormStatus::Published, Some(expiry)) if expiry <= now => FormStatus::Expired,
            (status, _) => status,
        }
    }

    /// Whether a submission may be accepted at `now`.
    pub fn is_accepting(&self, now: DateTime<Utc>) -> bool {
        self.effective_status(now) == FormStatus::Published
    }

    /// Transition Draft -> Published, recording the publication instant.
    pub fn publish(&mut self, now: DateTime<Utc>) -> Result<(), DbError> {
        if self.status != FormStatus::Draft {
            return Err(DbError::invalid_state(format!(
                "Cannot publish form {} from state '{}'",
                self.id, self.status
            )));
        }
        self.status = FormStatus::Published;
        self.published_at = Some(now);
        Ok(())
    }

    /// Transition Published -> Draft.
    pub fn unpublish(&mut self) -> Result<(), DbError> {
        if self.status != FormStatus::Published {
            return Err(DbError::invalid_state(format!(
                "Cannot unpublish form {} from state '{}'",
                self.id, self.status
            )));
        }
        self.status = FormStatus::Draft;
        self.published_at = None;
        Ok(())
    }

    /// Transition to Archived. Terminal; archiving twice is an error.
    pub fn archive(&mut self) -> Result<(), DbError> {
        if self.status == FormStatus::Archived {
            return Err(DbError::invalid_state(format!(
                "Form {} is already archived",
                self.id
            )));
        }
        self.status = FormStatus::Archived;
        Ok(())
    }
}

/// Input for creating a form. New forms start in Draft.
#[derive(Debug, Clone)]
pub struct NewForm {
    pub title: String,
    pub description: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub owner_id: i64,
}

// ============================================================================
// Field Types
// ============================================================================

/// The closed set of field type tags. Validation behavior is dispatched
/// on this tag at submission time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Email,
    Number,
    Date,
    LongText,
    Select,
    Radio,
    Checkbox,
    File,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Number => "number",
            Self::Date => "date",
            Self::LongText => "longtext",
            Self::Select => "select",
            Self::Radio => "radio",
            Self::Checkbox => "checkbox",
            Self::File => "file",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(Self::Text),
            "email" => Some(Self::Email),
            "number" => Some(Self::Number),
            "date" => Some(Self::Date),
            "longtext" => Some(Self::LongText),
            "select" => Some(Self::Select),
            "radio" => Some(Self::Radio),
            "checkbox" => Some(Self::Checkbox),
            "file" => Some(Self::File),
            _ => None,
        }
    }

    /// Whether this type carries a declared choice list.
    pub fn has_options(&self) -> bool {
        matches!(self, Self::Select | Self::Radio | Self::Checkbox)
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A field definition belonging to one form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    pub id: i64,
    pub form_id: i64,
    /// Display label shown to end users.
    pub label: String,
    /// Stable machine name.
    pub field_name: String,
    pub field_type: FieldType,
    pub is_required: bool,
    pub placeholder: Option<String>,
    pub help_text: Option<String>,
    /// Declared choices for select/radio/checkbox types.
    pub options: Option<Vec<String>>,
    pub order_number: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a field.
#[derive(Debug, Clone)]
pub struct NewField {
    pub form_id: i64,
    pub label: String,
    pub field_name: String,
    pub field_type: FieldType,
    pub is_required: bool,
    pub placeholder: Option<String>,
    pub help_text: Option<String>,
    pub options: Option<Vec<String>>,
    pub order_number: i64,
}

/// One (fieldId, newOrderNumber) pair of a reorder batch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldOrder {
    pub field_id: i64,
    pub order_number: i64,
}

// ============================================================================
// Submission Row Types
// ============================================================================

/// One answer destined for the row store; part of a batch sharing a key.
#[derive(Debug, Clone)]
pub struct NewAnswerRow {
    pub field_id: i64,
    pub value: String,
    pub file_name: Option<String>,
}

/// A persisted flattened answer row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRow {
    pub id: i64,
    pub submission_key: String,
    pub field_id: i64,
    pub value: String,
    pub file_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// An answer row joined with the field it answers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub row_id: i64,
    pub submission_key: String,
    pub form_id: i64,
    pub field_id: i64,
    pub field_label: String,
    pub field_type: FieldType,
    pub field_order: i64,
    pub value: String,
    pub file_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Submission counts for one form.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionStats {
    /// Raw answer rows stored for the form.
    pub total_rows: u64,
    /// Distinct correlation keys among those rows (true submission count).
    pub distinct_submissions: u64,
}

//! Service-level error taxonomy.
//!
//! Every failure a caller can observe is one of these kinds; raw internal
//! detail never crosses the service boundary. None are retried
//! automatically - each is a terminal outcome of one request.

use formflow_db::DbError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Service operation result type.
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Why a form is not accepting submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RejectReason {
    /// The form is still in Draft.
    Unpublished,
    /// The form was archived.
    Archived,
    /// The form's expiry instant has passed.
    Expired,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unpublished => "unpublished",
            Self::Archived => "archived",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One validation failure, structured enough to name the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Violation {
    /// The submitted field id does not resolve to an active field of the form.
    UnknownField { field_id: i64 },
    /// A required field's value was empty or whitespace-only.
    MissingRequired { label: String },
    /// The value failed the field type's own check.
    InvalidValue { label: String, reason: String },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownField { field_id } => {
                write!(f, "Field with ID {} not found", field_id)
            }
            Self::MissingRequired { label } => {
                write!(f, "Field '{}' is required", label)
            }
            Self::InvalidValue { label, reason } => {
                write!(f, "Field '{}': {}", label, reason)
            }
        }
    }
}

/// Service errors.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Form not found: {0}")]
    FormNotFound(i64),

    #[error("Field not found: {0}")]
    FieldNotFound(i64),

    #[error("Submission not found: {0}")]
    SubmissionNotFound(String),

    /// Ownership mismatch between the acting operator and the form owner.
    #[error("Access denied")]
    Forbidden,

    #[error("Form is not accepting submissions: {0}")]
    NotAcceptingSubmissions(RejectReason),

    #[error("Validation failed: {}", format_violations(.0))]
    ValidationFailed(Vec<Violation>),

    #[error("Unsupported export format: {0}")]
    UnsupportedExportFormat(String),

    /// Export serialization failed mid-render.
    #[error("Export error: {0}")]
    ExportRender(String),

    /// An uploaded file could not be matched to any field of the submission.
    #[error("Orphan attachment: {0}")]
    OrphanAttachment(String),

    #[error(transparent)]
    Db(#[from] DbError),
}

fn format_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_names_every_field() {
        let err = ServiceError::ValidationFailed(vec![
            Violation::UnknownField { field_id: 42 },
            Violation::MissingRequired {
                label: "Name".into(),
            },
        ]);
        let msg = err.to_string();
        assert!(msg.contains("42"));
        assert!(msg.contains("'Name'"));
    }
}

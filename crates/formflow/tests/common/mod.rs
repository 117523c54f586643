//! Shared fixtures for the integration tests.

use formflow::{AnswerInput, FieldType, Form, FormField, FormFlow, NewField, NewForm};
use tempfile::TempDir;

pub const OWNER: i64 = 7;
pub const STRANGER: i64 = 8;

/// Open an engine backed by a temp directory. Keep the TempDir alive for
/// the duration of the test.
pub async fn engine() -> (FormFlow, TempDir) {
    let tmp = TempDir::new().unwrap();
    let engine = FormFlow::open(tmp.path().join("formflow.sqlite3"), tmp.path().join("uploads"))
        .await
        .unwrap();
    (engine, tmp)
}

pub async fn published_form(engine: &FormFlow, title: &str) -> Form {
    let form = engine
        .create_form(
            OWNER,
            NewForm {
                title: title.to_string(),
                description: None,
                expires_at: None,
                owner_id: OWNER,
            },
        )
        .await
        .unwrap();
    engine.publish_form(OWNER, form.id).await.unwrap()
}

pub async fn add_field(
    engine: &FormFlow,
    form_id: i64,
    label: &str,
    field_type: FieldType,
    required: bool,
    order: i64,
) -> FormField {
    engine
        .create_field(
            OWNER,
            NewField {
                form_id,
                label: label.to_string(),
                field_name: label.to_lowercase().replace(' ', "_"),
                field_type,
                is_required: required,
                placeholder: None,
                help_text: None,
                options: None,
                order_number: order,
            },
        )
        .await
        .unwrap()
}

pub fn answers(pairs: &[(i64, &str)]) -> Vec<AnswerInput> {
    pairs
        .iter()
        .map(|(field_id, value)| AnswerInput {
            field_id: *field_id,
            value: value.to_string(),
        })
        .collect()
}

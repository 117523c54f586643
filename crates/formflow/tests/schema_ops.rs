//! Schema store tests: form lifecycle, field ordering, reorder atomicity,
//! ownership checks.

mod common;

use common::{add_field, answers, engine, published_form, OWNER, STRANGER};
use formflow::{FieldOrder, FieldPatch, FieldType, FormPatch, RejectReason, ServiceError};

#[tokio::test]
async fn reorder_moves_named_fields_and_keeps_the_rest() {
    let (engine, _tmp) = engine().await;
    let form = published_form(&engine, "Survey").await;
    let a = add_field(&engine, form.id, "A", FieldType::Text, false, 1).await;
    let b = add_field(&engine, form.id, "B", FieldType::Text, false, 2).await;
    let c = add_field(&engine, form.id, "C", FieldType::Text, false, 3).await;

    let fields = engine
        .reorder_fields(
            OWNER,
            form.id,
            &[
                FieldOrder {
                    field_id: a.id,
                    order_number: 2,
                },
                FieldOrder {
                    field_id: b.id,
                    order_number: 1,
                },
            ],
        )
        .await
        .unwrap();

    let labels: Vec<&str> = fields.iter().map(|f| f.label.as_str()).collect();
    assert_eq!(labels, vec!["B", "A", "C"]);
    assert_eq!(fields.iter().find(|f| f.id == c.id).unwrap().order_number, 3);
}

#[tokio::test]
async fn reorder_skips_fields_of_other_forms() {
    let (engine, _tmp) = engine().await;
    let form = published_form(&engine, "Survey").await;
    let other = published_form(&engine, "Other").await;
    let mine = add_field(&engine, form.id, "Mine", FieldType::Text, false, 1).await;
    let foreign = add_field(&engine, other.id, "Foreign", FieldType::Text, false, 5).await;

    engine
        .reorder_fields(
            OWNER,
            form.id,
            &[
                FieldOrder {
                    field_id: mine.id,
                    order_number: 9,
                },
                FieldOrder {
                    field_id: foreign.id,
                    order_number: 1,
                },
            ],
        )
        .await
        .unwrap();

    // The foreign field kept its order even though the pair named it.
    let untouched = engine.get_field(foreign.id).await.unwrap();
    assert_eq!(untouched.order_number, 5);

    let moved = engine.get_field(mine.id).await.unwrap();
    assert_eq!(moved.order_number, 9);
}

#[tokio::test]
async fn order_ties_resolve_by_field_id() {
    let (engine, _tmp) = engine().await;
    let form = published_form(&engine, "Survey").await;
    let first = add_field(&engine, form.id, "First", FieldType::Text, false, 1).await;
    let second = add_field(&engine, form.id, "Second", FieldType::Text, false, 1).await;

    let fields = engine.list_fields(form.id).await.unwrap();
    assert_eq!(fields[0].id, first.id);
    assert_eq!(fields[1].id, second.id);
}

#[tokio::test]
async fn deactivated_field_disappears_and_rejects_answers() {
    let (engine, _tmp) = engine().await;
    let form = published_form(&engine, "Survey").await;
    let name = add_field(&engine, form.id, "Name", FieldType::Text, false, 1).await;
    let extra = add_field(&engine, form.id, "Extra", FieldType::Text, false, 2).await;

    engine.delete_field(OWNER, extra.id).await.unwrap();

    let fields = engine.list_fields(form.id).await.unwrap();
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].id, name.id);

    // Answering an inactive field is an unknown-field violation.
    let err = engine
        .submit_form(form.id, &answers(&[(extra.id, "ghost")]), &[])
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ValidationFailed(_)));
}

#[tokio::test]
async fn archive_hides_the_form_and_blocks_submissions() {
    let (engine, _tmp) = engine().await;
    let form = published_form(&engine, "Retired").await;
    let name = add_field(&engine, form.id, "Name", FieldType::Text, false, 1).await;

    engine.archive_form(OWNER, form.id).await.unwrap();

    let listed = engine.list_forms(OWNER).await.unwrap();
    assert!(listed.iter().all(|f| f.id != form.id));

    let err = engine
        .submit_form(form.id, &answers(&[(name.id, "x")]), &[])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::NotAcceptingSubmissions(RejectReason::Archived)
    ));
}

#[tokio::test]
async fn publishing_twice_is_an_invalid_transition() {
    let (engine, _tmp) = engine().await;
    let form = published_form(&engine, "Survey").await;

    let err = engine.publish_form(OWNER, form.id).await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Db(formflow_db::DbError::InvalidState(_))
    ));

    // Unpublish goes back to Draft, after which publish works again.
    engine.unpublish_form(OWNER, form.id).await.unwrap();
    engine.publish_form(OWNER, form.id).await.unwrap();
}

#[tokio::test]
async fn mutations_by_non_owners_are_forbidden() {
    let (engine, _tmp) = engine().await;
    let form = published_form(&engine, "Private").await;
    let name = add_field(&engine, form.id, "Name", FieldType::Text, false, 1).await;

    let err = engine
        .update_form(
            STRANGER,
            form.id,
            FormPatch {
                title: Some("Hijacked".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden));

    let err = engine
        .update_field(
            STRANGER,
            name.id,
            FieldPatch {
                label: Some("Hijacked".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden));

    let err = engine.archive_form(STRANGER, form.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden));
}

#[tokio::test]
async fn form_patch_applies_only_provided_fields() {
    let (engine, _tmp) = engine().await;
    let form = published_form(&engine, "Before").await;

    let updated = engine
        .update_form(
            OWNER,
            form.id,
            FormPatch {
                title: Some("After".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "After");
    assert_eq!(updated.status, form.status);
    assert_eq!(updated.expires_at, form.expires_at);
}

#[tokio::test]
async fn clearing_the_expiry_reopens_the_form() {
    let (engine, _tmp) = engine().await;
    let form = published_form(&engine, "Survey").await;
    let name = add_field(&engine, form.id, "Name", FieldType::Text, true, 1).await;

    engine
        .update_form(
            OWNER,
            form.id,
            FormPatch {
                expires_at: Some(Some(chrono::Utc::now() - chrono::Duration::minutes(5))),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let err = engine
        .submit_form(form.id, &answers(&[(name.id, "late")]), &[])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::NotAcceptingSubmissions(RejectReason::Expired)
    ));

    let updated = engine
        .update_form(
            OWNER,
            form.id,
            FormPatch {
                expires_at: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(updated.expires_at.is_none());

    engine
        .submit_form(form.id, &answers(&[(name.id, "welcome back")]), &[])
        .await
        .unwrap();
}

#[tokio::test]
async fn choice_fields_validate_membership() {
    let (engine, _tmp) = engine().await;
    let form = published_form(&engine, "Poll").await;
    let color = engine
        .create_field(
            OWNER,
            formflow::NewField {
                form_id: form.id,
                label: "Color".into(),
                field_name: "color".into(),
                field_type: FieldType::Select,
                is_required: true,
                placeholder: None,
                help_text: None,
                options: Some(vec!["red".into(), "green".into()]),
                order_number: 1,
            },
        )
        .await
        .unwrap();

    engine
        .submit_form(form.id, &answers(&[(color.id, "red")]), &[])
        .await
        .unwrap();

    let err = engine
        .submit_form(form.id, &answers(&[(color.id, "blue")]), &[])
        .await
        .unwrap_err();
    assert!(err.to_string().contains("'Color'"));
}

//! Pagination over logical submissions: a submission never splits across
//! pages, and ordering is newest first.

mod common;

use common::{add_field, answers, engine, published_form, OWNER, STRANGER};
use formflow::{FieldType, ServiceError};
use std::collections::HashSet;

#[tokio::test]
async fn twenty_five_submissions_paginate_into_three_whole_pages() {
    let (engine, _tmp) = engine().await;
    let form = published_form(&engine, "Survey").await;
    let name = add_field(&engine, form.id, "Name", FieldType::Text, true, 1).await;
    let age = add_field(&engine, form.id, "Age", FieldType::Number, false, 2).await;

    let mut submitted_keys = Vec::new();
    for i in 1..=25 {
        let key = engine
            .submit_form(
                form.id,
                &answers(&[(name.id, &format!("person-{i}")), (age.id, &i.to_string())]),
                &[],
            )
            .await
            .unwrap();
        submitted_keys.push(key.into_string());
    }

    let page1 = engine.list_submissions(OWNER, form.id, 1, 10).await.unwrap();
    let page2 = engine.list_submissions(OWNER, form.id, 2, 10).await.unwrap();
    let page3 = engine.list_submissions(OWNER, form.id, 3, 10).await.unwrap();

    assert_eq!(page1.total, 25);
    assert_eq!(page1.submissions.len(), 10);
    assert_eq!(page2.submissions.len(), 10);
    assert_eq!(page3.submissions.len(), 5);

    // Every page item is a complete logical submission.
    for page in [&page1, &page2, &page3] {
        for submission in &page.submissions {
            assert_eq!(submission.answers.len(), 2);
        }
    }

    // No key appears on two pages.
    let mut seen = HashSet::new();
    for page in [&page1, &page2, &page3] {
        for submission in &page.submissions {
            assert!(seen.insert(submission.submission_key.clone()));
        }
    }
    assert_eq!(seen.len(), 25);

    // Newest first: page 1 starts with the 25th submission, and the very
    // first submission is the last item of page 3.
    assert_eq!(
        page1.submissions[0].submission_key,
        submitted_keys[24]
    );
    assert_eq!(
        page3.submissions.last().unwrap().submission_key,
        submitted_keys[0]
    );
}

#[tokio::test]
async fn empty_form_lists_an_empty_page() {
    let (engine, _tmp) = engine().await;
    let form = published_form(&engine, "Quiet").await;

    let page = engine.list_submissions(OWNER, form.id, 1, 10).await.unwrap();
    assert_eq!(page.total, 0);
    assert!(page.submissions.is_empty());
}

#[tokio::test]
async fn huge_page_numbers_yield_an_empty_page() {
    let (engine, _tmp) = engine().await;
    let form = published_form(&engine, "Survey").await;
    let name = add_field(&engine, form.id, "Name", FieldType::Text, true, 1).await;

    engine
        .submit_form(form.id, &answers(&[(name.id, "Alice")]), &[])
        .await
        .unwrap();

    let page = engine
        .list_submissions(OWNER, form.id, u32::MAX, u32::MAX)
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert!(page.submissions.is_empty());
}

#[tokio::test]
async fn listing_someone_elses_form_is_forbidden() {
    let (engine, _tmp) = engine().await;
    let form = published_form(&engine, "Private").await;

    let err = engine
        .list_submissions(STRANGER, form.id, 1, 10)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden));
}

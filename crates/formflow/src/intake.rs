//! Submission ingestion.
//!
//! Validates one incoming answer set against the schema store, correlates
//! uploaded files, and persists the batch as flattened rows sharing one
//! correlation key - all rows or none.

use crate::attachments::{self, UploadedFile};
use crate::error::{RejectReason, Result, ServiceError, Violation};
use crate::{validate, FormFlow};
use chrono::Utc;
use formflow_db::{FormStatus, NewAnswerRow};
use formflow_ids::SubmissionKey;
use std::collections::HashSet;
use tracing::{debug, info};

/// One submitted (fieldId, value) pair.
#[derive(Debug, Clone)]
pub struct AnswerInput {
    pub field_id: i64,
    pub value: String,
}

impl FormFlow {
    /// Accept one anonymous submission against a form.
    ///
    /// The form must exist and be effectively Published at the submission
    /// instant; every answer must resolve to an active field of the form
    /// and satisfy its type's rule; every upload must correlate to a
    /// submitted field. All violations are reported together and nothing
    /// is persisted unless the whole batch is valid. Returns the
    /// correlation key identifying the new logical submission.
    pub async fn submit_form(
        &self,
        form_id: i64,
        answers: &[AnswerInput],
        files: &[UploadedFile],
    ) -> Result<SubmissionKey> {
        let form = self.require_form(form_id).await?;

        let now = Utc::now();
        match form.effective_status(now) {
            FormStatus::Published => {}
            FormStatus::Draft => {
                return Err(ServiceError::NotAcceptingSubmissions(
                    RejectReason::Unpublished,
                ))
            }
            FormStatus::Archived => {
                return Err(ServiceError::NotAcceptingSubmissions(RejectReason::Archived))
            }
            FormStatus::Expired => {
                return Err(ServiceError::NotAcceptingSubmissions(RejectReason::Expired))
            }
        }

        let submitted_ids: HashSet<i64> = answers.iter().map(|a| a.field_id).collect();
        let file_map = attachments::correlate(files, &submitted_ids)?;

        let mut violations = Vec::new();
        let mut rows = Vec::with_capacity(answers.len());

        for answer in answers {
            let field = match self.db().field_get_active(answer.field_id, form_id).await? {
                Some(field) => field,
                None => {
                    violations.push(Violation::UnknownField {
                        field_id: answer.field_id,
                    });
                    continue;
                }
            };

            if let Err(violation) = validate::check_value(&field, &answer.value) {
                violations.push(violation);
                continue;
            }

            rows.push(NewAnswerRow {
                field_id: answer.field_id,
                value: answer.value.clone(),
                file_name: file_map
                    .get(&answer.field_id)
                    .map(|file| file.stored_name.clone()),
            });
        }

        if !violations.is_empty() {
            debug!(form_id, count = violations.len(), "Submission rejected");
            return Err(ServiceError::ValidationFailed(violations));
        }

        // One key for the whole batch; the insert is a single transaction.
        let key = SubmissionKey::new();
        self.db().submission_insert(&key, &rows).await?;

        info!(form_id, key = %key, rows = rows.len(), "Submission accepted");
        Ok(key)
    }
}

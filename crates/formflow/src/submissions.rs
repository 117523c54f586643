//! Submission reconstruction.
//!
//! Logical submissions are derived, not stored: the rows sharing one
//! correlation key are grouped back together on read. Pagination applies
//! to logical submissions, so a submission never splits across pages.

use crate::error::{Result, ServiceError};
use crate::FormFlow;
use chrono::{DateTime, Utc};
use formflow_db::{AnswerRecord, FieldType, SubmissionStats};
use serde::Serialize;
use tracing::info;

/// One reconstructed answer inside a logical submission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerView {
    pub field_id: i64,
    pub field_label: String,
    pub field_type: FieldType,
    pub value: String,
    pub file_name: Option<String>,
}

/// A logical submission reconstructed from its row group.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogicalSubmission {
    pub submission_key: String,
    pub form_id: i64,
    /// Creation instant of the earliest row in the group.
    pub submitted_at: DateTime<Utc>,
    pub answers: Vec<AnswerView>,
}

/// One page of logical submissions.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPage {
    pub submissions: Vec<LogicalSubmission>,
    /// Total logical submissions for the form (not just this page).
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

impl FormFlow {
    /// Page over a form's logical submissions, newest first.
    ///
    /// `page` is 1-based. Distinct correlation keys are paginated, then the
    /// rows of this page's keys are fetched and grouped.
    pub async fn list_submissions(
        &self,
        actor: i64,
        form_id: i64,
        page: u32,
        limit: u32,
    ) -> Result<SubmissionPage> {
        let form = self.require_form(form_id).await?;
        Self::require_owner(&form, actor)?;

        let page = page.max(1);
        let limit = limit.max(1);
        // Widened before multiplying: large caller-supplied page numbers
        // must not overflow u32.
        let offset = (page as u64 - 1) * limit as u64;

        let total = self.db().submission_count(form_id).await?;
        let keys = self.db().submission_keys_page(form_id, limit, offset).await?;
        let records = self.db().records_for_keys(&keys).await?;

        let submissions = group_records(&keys, records);

        Ok(SubmissionPage {
            submissions,
            total,
            page,
            limit,
        })
    }

    /// Reconstruct a single submission by its correlation key.
    pub async fn get_submission(&self, actor: i64, key: &str) -> Result<LogicalSubmission> {
        let records = self.db().records_for_key(key).await?;
        let submission = assemble(key, records)
            .ok_or_else(|| ServiceError::SubmissionNotFound(key.to_string()))?;

        let form = self.require_form(submission.form_id).await?;
        Self::require_owner(&form, actor)?;

        Ok(submission)
    }

    /// Delete a submission: every row of the group plus its stored files.
    pub async fn delete_submission(&self, actor: i64, key: &str) -> Result<()> {
        let submission = self.get_submission(actor, key).await?;

        let removed = self.db().submission_delete(key).await?;
        for answer in &submission.answers {
            if let Some(file_name) = &answer.file_name {
                self.attachments().remove(file_name);
            }
        }

        info!(key, rows = removed, "Submission deleted");
        Ok(())
    }

    /// Raw row count vs. distinct logical submissions for a form.
    pub async fn submission_stats(&self, actor: i64, form_id: i64) -> Result<SubmissionStats> {
        let form = self.require_form(form_id).await?;
        Self::require_owner(&form, actor)?;

        Ok(self.db().submission_stats(form_id).await?)
    }
}

/// Group page records by key, preserving the page's key order.
fn group_records(keys: &[String], records: Vec<AnswerRecord>) -> Vec<LogicalSubmission> {
    keys.iter()
        .filter_map(|key| {
            let group: Vec<AnswerRecord> = records
                .iter()
                .filter(|r| &r.submission_key == key)
                .cloned()
                .collect();
            assemble(key, group)
        })
        .collect()
}

/// Build one logical submission from its row group. None when no rows exist.
fn assemble(key: &str, records: Vec<AnswerRecord>) -> Option<LogicalSubmission> {
    let first = records.first()?;
    let form_id = first.form_id;
    let submitted_at = records
        .iter()
        .map(|r| r.created_at)
        .min()
        .unwrap_or(first.created_at);

    let answers = records
        .into_iter()
        .map(|r| AnswerView {
            field_id: r.field_id,
            field_label: r.field_label,
            field_type: r.field_type,
            value: r.value,
            file_name: r.file_name,
        })
        .collect();

    Some(LogicalSubmission {
        submission_key: key.to_string(),
        form_id,
        submitted_at,
        answers,
    })
}

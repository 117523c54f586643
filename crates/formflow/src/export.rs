//! Export rendering: serialize a form's reconstructed submissions to CSV
//! or JSON. Both shapes operate over all rows of the form, not a page.

use crate::error::{Result, ServiceError};
use crate::FormFlow;
use formflow_db::AnswerRecord;
use serde::Serialize;
use std::collections::BTreeMap;

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Json => "application/json",
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportedSubmission {
    submission_id: String,
    data: BTreeMap<String, String>,
}

impl FormFlow {
    /// Export every submission of a form the actor owns.
    ///
    /// Unknown format identifiers are a distinct error, reported before any
    /// rows are read.
    pub async fn export_submissions(
        &self,
        actor: i64,
        form_id: i64,
        format: &str,
    ) -> Result<String> {
        let format = ExportFormat::parse(format)
            .ok_or_else(|| ServiceError::UnsupportedExportFormat(format.to_string()))?;

        let form = self.require_form(form_id).await?;
        Self::require_owner(&form, actor)?;

        let records = self.db().records_for_form(form_id).await?;

        match format {
            ExportFormat::Csv => render_csv(&records),
            ExportFormat::Json => render_json(&records),
        }
    }
}

/// Distinct field labels in first-seen order, plus per-key label->value maps
/// keyed in first-seen submission order.
fn group_for_export(
    records: &[AnswerRecord],
) -> (Vec<String>, Vec<(String, BTreeMap<String, String>)>) {
    let mut labels: Vec<String> = Vec::new();
    let mut groups: Vec<(String, BTreeMap<String, String>)> = Vec::new();

    for record in records {
        if !labels.iter().any(|l| l == &record.field_label) {
            labels.push(record.field_label.clone());
        }

        match groups.iter_mut().find(|(key, _)| key == &record.submission_key) {
            Some((_, data)) => {
                data.insert(record.field_label.clone(), record.value.clone());
            }
            None => {
                let mut data = BTreeMap::new();
                data.insert(record.field_label.clone(), record.value.clone());
                groups.push((record.submission_key.clone(), data));
            }
        }
    }

    (labels, groups)
}

/// Header `Submission ID` + labels; one record per logical submission,
/// blank cells where a submission has no value for a column. The csv
/// writer quotes embedded delimiters, quotes and line breaks.
fn render_csv(records: &[AnswerRecord]) -> Result<String> {
    if records.is_empty() {
        return Ok(String::new());
    }

    let (labels, groups) = group_for_export(records);

    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec!["Submission ID".to_string()];
    header.extend(labels.iter().cloned());
    writer
        .write_record(&header)
        .map_err(|e| render_error(e.to_string()))?;

    for (key, data) in &groups {
        let mut row = vec![key.clone()];
        for label in &labels {
            row.push(data.get(label).cloned().unwrap_or_default());
        }
        writer
            .write_record(&row)
            .map_err(|e| render_error(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| render_error(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| render_error(e.to_string()))
}

/// Pretty-printed array of `{submissionId, data: {label: value}}`.
fn render_json(records: &[AnswerRecord]) -> Result<String> {
    let (_, groups) = group_for_export(records);

    let exported: Vec<ExportedSubmission> = groups
        .into_iter()
        .map(|(submission_id, data)| ExportedSubmission {
            submission_id,
            data,
        })
        .collect();

    serde_json::to_string_pretty(&exported).map_err(|e| render_error(e.to_string()))
}

fn render_error(msg: String) -> ServiceError {
    ServiceError::ExportRender(msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use formflow_db::FieldType;

    fn record(key: &str, label: &str, value: &str, order: i64) -> AnswerRecord {
        AnswerRecord {
            row_id: 0,
            submission_key: key.to_string(),
            form_id: 1,
            field_id: order,
            field_label: label.to_string(),
            field_type: FieldType::Text,
            field_order: order,
            value: value.to_string(),
            file_name: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn csv_header_and_blank_cells() {
        let records = vec![
            record("k1", "Name", "Alice", 1),
            record("k1", "Age", "30", 2),
            record("k2", "Name", "Bob", 1),
            record("k2", "Age", "", 2),
        ];

        let csv = render_csv(&records).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), "Submission ID,Name,Age");
        assert_eq!(lines.next().unwrap(), "k1,Alice,30");
        assert_eq!(lines.next().unwrap(), "k2,Bob,");
        assert!(lines.next().is_none());
    }

    #[test]
    fn csv_quotes_embedded_delimiters() {
        let records = vec![
            record("k1", "Comment", "one, two", 1),
            record("k2", "Comment", "line\nbreak", 1),
        ];

        let csv = render_csv(&records).unwrap();
        assert!(csv.contains("\"one, two\""));
        assert!(csv.contains("\"line\nbreak\""));
    }

    #[test]
    fn csv_of_nothing_is_empty() {
        assert_eq!(render_csv(&[]).unwrap(), "");
    }

    #[test]
    fn json_shape() {
        let records = vec![
            record("k1", "Name", "Alice", 1),
            record("k1", "Age", "30", 2),
        ];

        let json = render_json(&records).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["submissionId"], "k1");
        assert_eq!(parsed[0]["data"]["Name"], "Alice");
        assert_eq!(parsed[0]["data"]["Age"], "30");
    }

    #[test]
    fn format_parse() {
        assert_eq!(ExportFormat::parse("csv"), Some(ExportFormat::Csv));
        assert_eq!(ExportFormat::parse("JSON"), Some(ExportFormat::Json));
        assert!(ExportFormat::parse("xlsx").is_none());
    }
}

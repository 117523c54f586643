//! FormFlow - form definition and submission engine.
//!
//! An operator defines a form as an ordered set of typed fields; anonymous
//! callers submit answers against it. Each answer is stored as an
//! independent flattened row; rows of one logical submission share a
//! correlation key and are reconstructed on read for listing, export and
//! aggregation. Transport and authentication live outside this crate: the
//! acting operator's id is an input where ownership matters.
//!
//! # Usage
//!
//! ```rust,ignore
//! use formflow::FormFlow;
//!
//! let engine = FormFlow::open(db_path, uploads_dir).await?;
//!
//! let form = engine.create_form(owner, new_form).await?;
//! engine.publish_form(owner, form.id).await?;
//! let key = engine.submit_form(form.id, &answers, &files).await?;
//! let page = engine.list_submissions(owner, form.id, 1, 10).await?;
//! ```

pub mod attachments;
pub mod error;
pub mod export;
pub mod intake;
pub mod submissions;
pub mod validate;

mod schema;

pub use attachments::{AttachmentStore, UploadedFile};
pub use error::{RejectReason, Result, ServiceError, Violation};
pub use export::ExportFormat;
pub use intake::AnswerInput;
pub use schema::{FieldPatch, FormPatch};
pub use submissions::{AnswerView, LogicalSubmission, SubmissionPage};

pub use formflow_db::{
    FieldOrder, FieldType, Form, FormField, FormFlowDb, FormStatus, NewField, NewForm,
    SubmissionStats,
};
pub use formflow_ids::SubmissionKey;

use std::path::Path;

/// The submission engine: schema store, ingestion, reconstruction, export
/// and aggregation over one database and one uploads directory.
///
/// Operations are grouped by domain across this crate's modules; all of
/// them hang off this struct.
#[derive(Clone)]
pub struct FormFlow {
    db: FormFlowDb,
    attachments: AttachmentStore,
}

impl FormFlow {
    /// Open (or create) the database and uploads directory.
    pub async fn open(db_path: impl AsRef<Path>, uploads_root: impl AsRef<Path>) -> Result<Self> {
        let db = FormFlowDb::open(db_path).await?;
        let attachments = AttachmentStore::new(uploads_root.as_ref())
            .map_err(formflow_db::DbError::from)?;
        Ok(Self { db, attachments })
    }

    /// Open at the default home location (`FORMFLOW_HOME` or `~/.formflow`).
    pub async fn open_default() -> Result<Self> {
        formflow_logging::ensure_dirs().map_err(|e| {
            formflow_db::DbError::Io(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))
        })?;
        Self::open(
            formflow_logging::database_path(),
            formflow_logging::uploads_dir(),
        )
        .await
    }

    /// Wrap an already-open database and store.
    pub fn with_parts(db: FormFlowDb, attachments: AttachmentStore) -> Self {
        Self { db, attachments }
    }

    pub fn db(&self) -> &FormFlowDb {
        &self.db
    }

    pub fn attachments(&self) -> &AttachmentStore {
        &self.attachments
    }
}

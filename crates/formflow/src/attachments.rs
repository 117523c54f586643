//! File correlation and the on-disk attachment store.
//!
//! Uploads declare the field they answer through a `field_<id>` parameter
//! name. Attachments whose id cannot be parsed, or whose id is not among
//! the submitted pairs, are orphans and are surfaced, never dropped.

use crate::error::{Result, ServiceError};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::warn;

const FIELD_PARAM_PREFIX: &str = "field_";

/// An uploaded binary attachment as handed over by the transport layer.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Parameter name declaring the answered field (`field_<id>`).
    pub field_param: String,
    /// Name the transport stored the file under (inside the uploads dir).
    pub stored_name: String,
    /// Name the end user uploaded the file as.
    pub original_name: String,
}

/// Parse a `field_<id>` parameter name into a field id.
pub fn parse_field_param(name: &str) -> Option<i64> {
    name.strip_prefix(FIELD_PARAM_PREFIX)?.parse::<i64>().ok()
}

/// Map uploads to the field ids of the current submission.
///
/// Fails with [`ServiceError::OrphanAttachment`] for the first upload that
/// cannot be matched, naming the offending parameter and original name.
pub fn correlate<'a>(
    files: &'a [UploadedFile],
    submitted_field_ids: &HashSet<i64>,
) -> Result<HashMap<i64, &'a UploadedFile>> {
    let mut by_field = HashMap::new();

    for file in files {
        let field_id = parse_field_param(&file.field_param).ok_or_else(|| {
            ServiceError::OrphanAttachment(format!(
                "parameter '{}' (file '{}') does not name a field",
                file.field_param, file.original_name
            ))
        })?;

        if !submitted_field_ids.contains(&field_id) {
            return Err(ServiceError::OrphanAttachment(format!(
                "parameter '{}' (file '{}') matches no field in this submission",
                file.field_param, file.original_name
            )));
        }

        by_field.insert(field_id, file);
    }

    Ok(by_field)
}

/// Owns the uploads directory and removes stored files when a submission
/// is deleted.
#[derive(Debug, Clone)]
pub struct AttachmentStore {
    root: PathBuf,
}

impl AttachmentStore {
    /// Create a store rooted at `root`, creating the directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> std::io::Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a stored file lives at.
    pub fn path_of(&self, stored_name: &str) -> PathBuf {
        self.root.join(stored_name)
    }

    /// Remove a stored file. A missing file is logged, not fatal: the row
    /// group must still be deletable.
    pub fn remove(&self, stored_name: &str) {
        let path = self.path_of(stored_name);
        match std::fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(file = %path.display(), "Stored file already missing");
            }
            Err(e) => {
                warn!(file = %path.display(), error = %e, "Failed to remove stored file");
            }
        }
    }
}

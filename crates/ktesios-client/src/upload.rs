//! Multipart upload batching.
//!
//! The upload endpoint accepts at most three file parts per request
//! body, and an operation carries at most twelve files. The planner
//! partitions an upload request into body plans without touching the
//! network or the filesystem; the client materializes each plan into a
//! multipart form.

use std::path::PathBuf;

use crate::error::ClientError;
use crate::model::{RepositoryFormat, UploadComponentReq};

/// Hard cap on files per upload operation.
pub const MAX_UPLOAD_FILES: usize = 12;

/// File parts per multipart body.
pub const PARTS_PER_BODY: usize = 3;

/// One part of a planned multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartPlan {
    /// A file part with its field name and advertised file name.
    File {
        /// Multipart field name (`raw.assertN` / `maven2.assertN`).
        field: String,
        /// Local file to read.
        path: PathBuf,
        /// File name sent with the part.
        file_name: String,
    },

    /// A text part.
    Text {
        /// Multipart field name.
        field: String,
        /// Field value.
        value: String,
    },
}

/// One planned multipart request body.
#[derive(Debug, Clone, Default)]
pub struct BodyPlan {
    /// Parts in submission order.
    pub parts: Vec<PartPlan>,

    /// Number of file parts in this body.
    pub file_count: usize,
}

impl BodyPlan {
    fn push_file(&mut self, field: String, path: PathBuf, file_name: String) {
        self.parts.push(PartPlan::File {
            field,
            path,
            file_name,
        });
        self.file_count += 1;
    }

    fn push_text(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.parts.push(PartPlan::Text {
            field: field.into(),
            value: value.into(),
        });
    }
}

/// Partitions an upload request into multipart body plans.
///
/// Files are grouped three per body; field names cycle `assert1` to
/// `assert3` within each body under the format's prefix. Each file part
/// carries a `filename` companion, and for `maven2` an `extension`
/// companion plus a `classifier` when one is set. Body-level metadata
/// is appended when a body closes (after its third file or the final
/// file): the target directory for `raw`, the coordinate and descriptor
/// fields for `maven2`.
///
/// An empty file list yields an empty plan.
///
/// # Errors
///
/// Returns [`ClientError::Validation`] when more than
/// [`MAX_UPLOAD_FILES`] files are supplied, when the format does not
/// support uploads, or when a file reference has no usable file name.
pub fn build_upload_plan(
    format: RepositoryFormat,
    req: &UploadComponentReq,
) -> Result<Vec<BodyPlan>, ClientError> {
    if !format.is_write_supported() {
        return Err(ClientError::validation(format!(
            "format '{format}' does not support uploads, only maven2 and raw"
        )));
    }
    if req.files.len() > MAX_UPLOAD_FILES {
        return Err(ClientError::validation(format!(
            "upload of {} files exceeds the cap of {MAX_UPLOAD_FILES}",
            req.files.len()
        )));
    }

    let prefix = format.field_prefix();
    let mut bodies = Vec::new();
    let mut body = BodyPlan::default();

    for (i, file) in req.files.iter().enumerate() {
        let field = format!("{prefix}.assert{}", i % PARTS_PER_BODY + 1);
        let file_name = file
            .file_name()
            .ok_or_else(|| {
                ClientError::validation(format!("no file name in path {}", file.path.display()))
            })?
            .to_string();

        body.push_file(field.clone(), file.path.clone(), file_name.clone());
        body.push_text(format!("{field}.filename"), file_name);
        if format == RepositoryFormat::Maven2 {
            if let Some(ext) = file.extension() {
                body.push_text(format!("{field}.extension"), ext);
            }
            if let Some(classifier) = file.classifier.as_deref() {
                body.push_text(format!("{field}.classifier"), classifier);
            }
        }

        let last = i + 1 == req.files.len();
        if last || (i + 1) % PARTS_PER_BODY == 0 {
            match format {
                RepositoryFormat::Raw => {
                    body.push_text("raw.directory", req.to_directory());
                }
                _ => {
                    body.push_text("maven2.groupId", &req.group);
                    body.push_text("maven2.artifactId", &req.artifact_id);
                    body.push_text("maven2.generate-pom", req.generate_pom.to_string());
                    if req.generate_pom {
                        body.push_text("maven2.packaging", &req.packaging);
                    }
                }
            }
            bodies.push(std::mem::take(&mut body));
        }
    }

    Ok(bodies)
}

//! Download artifacts.
//!
//! # Responsibility
//! - Build the `.doap` (Turtle) and `.json` (record) downloads.
//! - Write artifacts into a target directory.
//!
//! # Invariants
//! - Both artifacts share one basename: the project name, or the configured
//!   default when the name is empty.

use crate::document::{encode_document, DocumentError};
use crate::form::FormState;
use crate::model::description::ProjectDescription;
use crate::model::vocab::ProjectField;
use crate::render::turtle::render_turtle;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const TURTLE_MEDIA_TYPE: &str = "application/x-turtle";
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// In-memory file ready for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadArtifact {
    pub file_name: String,
    pub media_type: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Debug)]
pub enum ExportError {
    Encode(DocumentError),
    Io { path: PathBuf, source: std::io::Error },
    InvalidFileName(String),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(err) => write!(f, "{err}"),
            Self::Io { path, source } => write!(f, "failed to write {}: {source}", path.display()),
            Self::InvalidFileName(name) => write!(f, "invalid download file name `{name}`"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Encode(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            Self::InvalidFileName(_) => None,
        }
    }
}

impl From<DocumentError> for ExportError {
    fn from(value: DocumentError) -> Self {
        Self::Encode(value)
    }
}

/// Basename for both downloads.
pub fn download_basename<'a>(form: &'a FormState, default_basename: &'a str) -> &'a str {
    let name = form.project_field(ProjectField::Name).trim();
    if name.is_empty() {
        default_basename
    } else {
        name
    }
}

/// Turtle download (`<base>.doap`).
pub fn doap_artifact(description: &ProjectDescription, basename: &str) -> DownloadArtifact {
    DownloadArtifact {
        file_name: format!("{basename}.doap"),
        media_type: TURTLE_MEDIA_TYPE,
        bytes: render_turtle(description).into_bytes(),
    }
}

/// JSON record download (`<base>.json`).
pub fn json_artifact(
    description: &ProjectDescription,
    basename: &str,
) -> Result<DownloadArtifact, ExportError> {
    Ok(DownloadArtifact {
        file_name: format!("{basename}.json"),
        media_type: JSON_MEDIA_TYPE,
        bytes: encode_document(description)?,
    })
}

/// Writes one artifact under `dir` and returns the written path.
///
/// # Errors
/// - `ExportError::InvalidFileName` when the name would escape `dir`.
/// - `ExportError::Io` on write failure.
pub fn write_artifact(dir: &Path, artifact: &DownloadArtifact) -> Result<PathBuf, ExportError> {
    let name = artifact.file_name.as_str();
    if name.contains(['/', '\\']) || name.starts_with('.') {
        return Err(ExportError::InvalidFileName(artifact.file_name.clone()));
    }
    let path = dir.join(name);
    std::fs::write(&path, &artifact.bytes).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;
    info!(
        "event=download module=export status=ok media_type={} bytes={}",
        artifact.media_type,
        artifact.bytes.len()
    );
    Ok(path)
}

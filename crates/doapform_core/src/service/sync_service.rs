//! Synchronizer use-case service.
//!
//! # Responsibility
//! - Own the current project-description record and its rendered preview.
//! - Orchestrate capture, apply, load and download with logging.
//!
//! # Invariants
//! - A failed load or apply leaves both the current record and the form
//!   unchanged.
//! - Every successful capture replaces the record wholesale.

use crate::config::SyncConfig;
use crate::document::{load_persisted_document, DocumentError};
use crate::export::{
    doap_artifact, download_basename, json_artifact, DownloadArtifact, ExportError,
};
use crate::form::FormState;
use crate::model::description::ProjectDescription;
use crate::render::turtle::render_preview;
use crate::sync::apply::{apply_state_to_form, ApplyError};
use crate::sync::capture::{capture_state_from_form, CaptureNotice};
use chrono::{SecondsFormat, Utc};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for synchronizer use-cases.
#[derive(Debug)]
pub enum SyncError {
    Document(DocumentError),
    Apply(ApplyError),
    Export(ExportError),
    /// Operation needs a record but none was captured or loaded yet.
    Uninitialized,
}

impl Display for SyncError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Document(err) => write!(f, "{err}"),
            Self::Apply(err) => write!(f, "{err}"),
            Self::Export(err) => write!(f, "{err}"),
            Self::Uninitialized => write!(f, "no project description captured or loaded yet"),
        }
    }
}

impl Error for SyncError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Document(err) => Some(err),
            Self::Apply(err) => Some(err),
            Self::Export(err) => Some(err),
            Self::Uninitialized => None,
        }
    }
}

impl From<DocumentError> for SyncError {
    fn from(value: DocumentError) -> Self {
        Self::Document(value)
    }
}

impl From<ApplyError> for SyncError {
    fn from(value: ApplyError) -> Self {
        Self::Apply(value)
    }
}

impl From<ExportError> for SyncError {
    fn from(value: ExportError) -> Self {
        Self::Export(value)
    }
}

/// Outcome returned to the host after a capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureReport {
    /// Escaped preview text for display.
    pub preview: String,
    pub notices: Vec<CaptureNotice>,
}

impl CaptureReport {
    pub fn is_missing_project_uri(&self) -> bool {
        self.notices.contains(&CaptureNotice::ProjectUriRequired)
    }
}

/// Source of `dc:issued` timestamps.
pub type Clock = Box<dyn Fn() -> String + Send + Sync>;

/// Current UTC time, RFC 3339 with millisecond precision.
pub fn utc_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Synchronizer facade owning the current record.
pub struct StateSynchronizer {
    config: SyncConfig,
    clock: Clock,
    current: Option<ProjectDescription>,
    preview: String,
}

impl StateSynchronizer {
    pub fn new(config: SyncConfig) -> Self {
        Self::with_clock(config, Box::new(utc_timestamp))
    }

    /// Creates a synchronizer with a caller-provided timestamp source.
    pub fn with_clock(config: SyncConfig, clock: Clock) -> Self {
        Self {
            config,
            clock,
            current: None,
            preview: String::new(),
        }
    }

    pub fn current(&self) -> Option<&ProjectDescription> {
        self.current.as_ref()
    }

    /// Last rendered preview; empty until the first capture or load.
    pub fn preview(&self) -> &str {
        &self.preview
    }

    /// Rebuilds the record from `form` and re-renders the preview.
    ///
    /// A restored `dc:issued` on the form is kept only while the form still
    /// reproduces the current record; any edit gets a fresh timestamp.
    pub fn capture(&mut self, form: &FormState) -> CaptureReport {
        let generated_at = (self.clock)();
        let mut capture = capture_state_from_form(form, &generated_at);
        if form.issued.is_some() && self.current.as_ref() != Some(&capture.description) {
            let mut edited = form.clone();
            edited.issued = None;
            capture = capture_state_from_form(&edited, &generated_at);
            debug!("event=capture module=sync status=ok issued=regenerated");
        }
        if capture.is_missing_project_uri() {
            warn!("event=capture module=sync status=incomplete reason=project_uri_required");
        } else {
            info!(
                "event=capture module=sync status=ok contributors={} testsuites={}",
                capture.description.contributors.len(),
                capture.description.testsuites.len()
            );
        }

        self.preview = render_preview(&capture.description);
        self.current = Some(capture.description);
        CaptureReport {
            preview: self.preview.clone(),
            notices: capture.notices,
        }
    }

    /// Writes the current record into `form`.
    ///
    /// # Errors
    /// - `SyncError::Uninitialized` before any capture or load.
    /// - `SyncError::Apply` on field lookup failure; `form` is untouched.
    pub fn apply(&mut self, form: &mut FormState) -> Result<(), SyncError> {
        let description = self.current.as_ref().ok_or(SyncError::Uninitialized)?;
        if let Err(err) = apply_state_to_form(description, form) {
            error!("event=apply module=sync status=error error={err}");
            return Err(err.into());
        }
        self.preview = render_preview(description);
        info!(
            "event=apply module=sync status=ok developers={} testsuites={}",
            form.developers.len(),
            form.testsuites.len()
        );
        Ok(())
    }

    /// Parses a persisted document and repopulates `form` from it.
    ///
    /// # Errors
    /// - `SyncError::Document` for malformed input.
    /// - `SyncError::Apply` when the document does not map onto the form.
    ///
    /// In both cases the current record and `form` keep their previous state.
    pub fn load(&mut self, raw: &[u8], form: &mut FormState) -> Result<(), SyncError> {
        let description = match load_persisted_document(raw) {
            Ok(description) => description,
            Err(err) => {
                error!(
                    "event=load module=sync status=error bytes={} error={err}",
                    raw.len()
                );
                return Err(err.into());
            }
        };

        if let Err(err) = apply_state_to_form(&description, form) {
            error!("event=load module=sync status=error stage=apply error={err}");
            return Err(err.into());
        }

        self.preview = render_preview(&description);
        info!(
            "event=load module=sync status=ok complete={} contributors={}",
            description.is_complete(),
            description.contributors.len()
        );
        self.current = Some(description);
        Ok(())
    }

    /// Builds the `.doap` and `.json` downloads for the current record.
    pub fn downloads(&self, form: &FormState) -> Result<Vec<DownloadArtifact>, SyncError> {
        let description = self.current.as_ref().ok_or(SyncError::Uninitialized)?;
        let basename = download_basename(form, &self.config.default_basename);
        Ok(vec![
            doap_artifact(description, basename),
            json_artifact(description, basename)?,
        ])
    }
}

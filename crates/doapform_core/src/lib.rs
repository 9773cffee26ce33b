//! Core logic for the DOAP project form.
//! Converts between form state, the project-description record and its
//! persisted JSON document, and renders the Turtle preview.

pub mod config;
pub mod document;
pub mod export;
pub mod form;
pub mod logging;
pub mod model;
pub mod render;
pub mod service;
pub mod sync;

pub use config::{load_config, ConfigError, LoggingConfig, SyncConfig, DEFAULT_BASENAME};
pub use document::{
    encode_document, encode_document_pretty, load_persisted_document, DocumentError,
    DocumentShapeError,
};
pub use export::{write_artifact, DownloadArtifact, ExportError};
pub use form::{DeveloperRow, FormState, TestSuiteRow};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::description::{Prefix, ProjectDescription, Property, Subject, TestSuite};
pub use model::vocab::{parse_developer_role, DeveloperRole, ProjectField};
pub use render::turtle::{escape_angle_brackets, render_preview, render_turtle};
pub use service::sync_service::{utc_timestamp, CaptureReport, StateSynchronizer, SyncError};
pub use sync::apply::{apply_state_to_form, ApplyError};
pub use sync::capture::{capture_state_from_form, Capture, CaptureNotice};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

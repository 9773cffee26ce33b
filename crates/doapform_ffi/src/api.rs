//! UI-facing API for the form host.
//!
//! # Responsibility
//! - Expose capture/load/render as sync calls over JSON strings.
//! - Keep error semantics simple: every call returns an envelope.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - The host owns the form and document; no record is kept here between
//!   calls.

use doapform_core::{
    core_version as core_version_inner, encode_document, escape_angle_brackets,
    init_logging as init_logging_inner, load_persisted_document, render_turtle, utc_timestamp,
    FormState, StateSynchronizer, SyncConfig,
};
use log::warn;

/// Result of a capture call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormCaptureResponse {
    pub ok: bool,
    /// True when the project URI is empty and the primary topic was omitted.
    pub project_uri_missing: bool,
    /// Escaped preview text.
    pub preview: String,
    /// Record JSON for the `.json` download; empty on failure.
    pub document_json: String,
    pub message: String,
}

/// Result of a load call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormLoadResponse {
    pub ok: bool,
    /// Repopulated form state as JSON; empty on failure.
    pub form_json: String,
    pub preview: String,
    pub message: String,
}

/// Result of a render call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderResponse {
    pub ok: bool,
    pub text: String,
    pub message: String,
}

/// Exposes the core crate version.
///
/// # FFI contract
/// - Sync call, non-blocking, never throws.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// # FFI contract
/// - `level`: `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory for rolling logs.
/// - Returns an empty string on success and the error message otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Captures a form (JSON-encoded `FormState`) into preview and document.
///
/// # FFI contract
/// - `issued`: optional fixed timestamp; defaults to the current UTC time.
///   A timestamp restored into the form is not reused, since no record is
///   kept between calls to prove the form unedited.
/// - A missing project URI is reported via `project_uri_missing`, with
///   `ok == true`.
#[flutter_rust_bridge::frb(sync)]
pub fn capture_form(form_json: String, issued: Option<String>) -> FormCaptureResponse {
    let form: FormState = match serde_json::from_str(&form_json) {
        Ok(form) => form,
        Err(err) => return capture_failure(format!("capture_form failed: invalid form: {err}")),
    };

    let issued = issued
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(utc_timestamp);
    let mut sync =
        StateSynchronizer::with_clock(SyncConfig::default(), Box::new(move || issued.clone()));
    let report = sync.capture(&form);

    let document_json = match sync.current().map(encode_document) {
        Some(Ok(bytes)) => String::from_utf8_lossy(&bytes).into_owned(),
        Some(Err(err)) => return capture_failure(format!("capture_form failed: {err}")),
        None => return capture_failure("capture_form failed: no record produced"),
    };

    let message = match report.notices.first() {
        Some(notice) => notice.to_string(),
        None => "Captured.".to_string(),
    };
    FormCaptureResponse {
        ok: true,
        project_uri_missing: report.is_missing_project_uri(),
        preview: report.preview,
        document_json,
        message,
    }
}

/// Loads a saved document into a blank form.
///
/// # FFI contract
/// - Malformed documents return `ok == false`; the host keeps its form.
#[flutter_rust_bridge::frb(sync)]
pub fn load_document(document_json: String) -> FormLoadResponse {
    let mut sync = StateSynchronizer::new(SyncConfig::default());
    let mut form = FormState::new();
    if let Err(err) = sync.load(document_json.as_bytes(), &mut form) {
        warn!("event=ffi_load module=ffi status=error");
        return FormLoadResponse {
            ok: false,
            form_json: String::new(),
            preview: String::new(),
            message: format!("load_document failed: {err}"),
        };
    }

    match serde_json::to_string(&form) {
        Ok(form_json) => FormLoadResponse {
            ok: true,
            form_json,
            preview: sync.preview().to_string(),
            message: "Loaded.".to_string(),
        },
        Err(err) => FormLoadResponse {
            ok: false,
            form_json: String::new(),
            preview: String::new(),
            message: format!("load_document failed: {err}"),
        },
    }
}

/// Renders a saved document as Turtle text (`html == false`) or escaped
/// preview text (`html == true`) for the `.doap` download.
#[flutter_rust_bridge::frb(sync)]
pub fn render_document(document_json: String, html: bool) -> RenderResponse {
    match load_persisted_document(document_json.as_bytes()) {
        Ok(description) => {
            let turtle = render_turtle(&description);
            RenderResponse {
                ok: true,
                text: if html {
                    escape_angle_brackets(&turtle)
                } else {
                    turtle
                },
                message: String::new(),
            }
        }
        Err(err) => RenderResponse {
            ok: false,
            text: String::new(),
            message: format!("render_document failed: {err}"),
        },
    }
}

fn capture_failure(message: impl Into<String>) -> FormCaptureResponse {
    FormCaptureResponse {
        ok: false,
        project_uri_missing: false,
        preview: String::new(),
        document_json: String::new(),
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::{capture_form, core_version, init_logging, load_document, render_document};

    const FORM: &str = r#"{
        "fields": {
            "project_uri": "https://example.org/proj",
            "project_name": "Proj"
        },
        "developers": [
            { "uri": "https://github.com/alice", "name": "Alice", "role": "maker" }
        ],
        "testsuites": [
            { "attached_file": "suite1.ttl", "manifest": "manifest.json" }
        ]
    }"#;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_bad_input() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
        assert!(!init_logging("verbose".to_string(), "/tmp/doapform".to_string()).is_empty());
    }

    #[test]
    fn capture_then_load_restores_the_form() {
        let captured = capture_form(
            FORM.to_string(),
            Some("2026-10-19T08:00:00.000Z".to_string()),
        );
        assert!(captured.ok, "{}", captured.message);
        assert!(!captured.project_uri_missing);
        assert!(captured.document_json.contains("\"foaf:Person\""));

        let loaded = load_document(captured.document_json);
        assert!(loaded.ok, "{}", loaded.message);
        assert_eq!(loaded.preview, captured.preview);
        let form: serde_json::Value = serde_json::from_str(&loaded.form_json).unwrap();
        assert_eq!(form["developers"][0]["name"], "Alice");
        assert_eq!(form["testsuites"][0]["file_label"], "suite1.ttl");
        assert_eq!(form["testsuites"][0]["locked"], true);
    }

    #[test]
    fn capture_reports_missing_uri_without_failing() {
        let response = capture_form(r#"{"fields": {"project_name": "Proj"}}"#.to_string(), None);
        assert!(response.ok);
        assert!(response.project_uri_missing);
        assert_eq!(response.message, "Project URI Required");
    }

    #[test]
    fn malformed_inputs_return_failure_envelopes() {
        assert!(!capture_form("{".to_string(), None).ok);
        let loaded = load_document("not json".to_string());
        assert!(!loaded.ok);
        assert!(loaded.message.contains("load_document failed"));
        assert!(!render_document("[]".to_string(), false).ok);
    }

    #[test]
    fn render_document_supports_plain_and_escaped_text() {
        let captured = capture_form(FORM.to_string(), None);
        let plain = render_document(captured.document_json.clone(), false);
        let escaped = render_document(captured.document_json, true);
        assert!(plain.text.contains("<https://github.com/alice> a foaf:Person"));
        assert!(escaped.text.contains("&lt;https://github.com/alice&gt; a foaf:Person"));
    }
}

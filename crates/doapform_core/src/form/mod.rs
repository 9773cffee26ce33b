//! On-screen form state.
//!
//! # Responsibility
//! - Model the form as a flat lookup of named fields plus two repeatable row
//!   collections (developers, test suites).
//! - Provide the row add/remove/clear operations a host wires to its buttons.
//!
//! # Invariants
//! - Missing fields read as empty strings.
//! - New rows start from a blank template; rows are never shared.

use crate::model::vocab::{DeveloperRole, ProjectField};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One developer sub-form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeveloperRow {
    /// Profile URI, e.g. a GitHub profile.
    #[serde(default)]
    pub uri: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Selected role option.
    #[serde(default)]
    pub role: DeveloperRole,
}

impl DeveloperRow {
    pub fn new(uri: impl Into<String>, name: impl Into<String>, role: DeveloperRole) -> Self {
        Self {
            uri: uri.into(),
            name: name.into(),
            role,
        }
    }
}

/// One test-suite sub-form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSuiteRow {
    /// Name of the locally attached file, if one is attached.
    #[serde(default)]
    pub attached_file: Option<String>,
    /// Filename rendered as text after a reload.
    #[serde(default)]
    pub file_label: Option<String>,
    /// Manifest identifier/path.
    #[serde(default)]
    pub manifest: String,
    /// Whether the file slot accepts a new attachment.
    #[serde(default)]
    pub locked: bool,
}

impl TestSuiteRow {
    /// Row with a live attachment.
    pub fn attached(file: impl Into<String>, manifest: impl Into<String>) -> Self {
        Self {
            attached_file: Some(file.into()),
            file_label: None,
            manifest: manifest.into(),
            locked: false,
        }
    }

    /// Row restored from a document: the file is shown as text only.
    pub fn restored(file: impl Into<String>, manifest: impl Into<String>) -> Self {
        Self {
            attached_file: None,
            file_label: Some(file.into()),
            manifest: manifest.into(),
            locked: true,
        }
    }

    /// Effective filename: attached file first, rendered label second.
    pub fn file_name(&self) -> &str {
        self.attached_file
            .as_deref()
            .filter(|name| !name.is_empty())
            .or(self.file_label.as_deref())
            .unwrap_or("")
    }
}

/// Whole form state owned by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    /// Named input values keyed by field id (`project_uri`, ...).
    #[serde(default)]
    fields: BTreeMap<String, String>,
    /// Hidden generation timestamp restored from a loaded document.
    ///
    /// `capture_state_from_form` always reuses it. `StateSynchronizer::capture`
    /// reuses it only while the form is unedited since the load.
    #[serde(default)]
    pub issued: Option<String>,
    #[serde(default)]
    pub developers: Vec<DeveloperRow>,
    #[serde(default)]
    pub testsuites: Vec<TestSuiteRow>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a field by id; missing fields read as empty.
    pub fn field(&self, field_id: &str) -> &str {
        self.fields.get(field_id).map(String::as_str).unwrap_or("")
    }

    /// Reads a recognized project field.
    pub fn project_field(&self, field: ProjectField) -> &str {
        self.field(&field.field_id())
    }

    pub fn set_field(&mut self, field_id: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field_id.into(), value.into());
    }

    pub fn set_project_field(&mut self, field: ProjectField, value: impl Into<String>) {
        self.set_field(field.field_id(), value);
    }

    /// Builder-style variant of `set_project_field`.
    pub fn with_project_field(mut self, field: ProjectField, value: impl Into<String>) -> Self {
        self.set_project_field(field, value);
        self
    }

    /// Empties every recognized project field and the hidden timestamp.
    pub fn clear_project_fields(&mut self) {
        for field in ProjectField::ALL {
            self.fields.remove(&field.field_id());
        }
        self.issued = None;
    }

    /// Appends a blank developer row and returns it for editing.
    pub fn add_developer(&mut self) -> &mut DeveloperRow {
        self.developers.push(DeveloperRow::default());
        let last = self.developers.len() - 1;
        &mut self.developers[last]
    }

    /// Appends a blank test-suite row and returns it for editing.
    pub fn add_testsuite(&mut self) -> &mut TestSuiteRow {
        self.testsuites.push(TestSuiteRow::default());
        let last = self.testsuites.len() - 1;
        &mut self.testsuites[last]
    }

    /// Removes one developer row; out-of-range indexes are ignored.
    pub fn remove_developer(&mut self, index: usize) -> Option<DeveloperRow> {
        (index < self.developers.len()).then(|| self.developers.remove(index))
    }

    /// Removes one test-suite row; out-of-range indexes are ignored.
    pub fn remove_testsuite(&mut self, index: usize) -> Option<TestSuiteRow> {
        (index < self.testsuites.len()).then(|| self.testsuites.remove(index))
    }

    /// Drops every repeatable row.
    pub fn clear_rows(&mut self) {
        self.developers.clear();
        self.testsuites.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::{FormState, TestSuiteRow};
    use crate::model::vocab::{DeveloperRole, ProjectField};

    #[test]
    fn missing_fields_read_as_empty() {
        let form = FormState::new();
        assert_eq!(form.project_field(ProjectField::Name), "");
        assert_eq!(form.field("unknown"), "");
    }

    #[test]
    fn added_rows_start_blank() {
        let mut form = FormState::new();
        let row = form.add_developer();
        assert!(row.uri.is_empty());
        assert_eq!(row.role, DeveloperRole::Maker);
        row.uri = "https://github.com/alice".to_string();

        assert_eq!(form.developers.len(), 1);
        assert_eq!(form.developers[0].uri, "https://github.com/alice");
        assert!(form.remove_developer(3).is_none());
        assert!(form.remove_developer(0).is_some());
        assert!(form.developers.is_empty());
    }

    #[test]
    fn testsuite_file_name_prefers_attachment() {
        let mut row = TestSuiteRow::restored("old.ttl", "manifest.json");
        assert_eq!(row.file_name(), "old.ttl");
        row.attached_file = Some("new.ttl".to_string());
        assert_eq!(row.file_name(), "new.ttl");
        assert_eq!(TestSuiteRow::default().file_name(), "");
    }

    #[test]
    fn clear_project_fields_keeps_unrecognized_fields() {
        let mut form = FormState::new()
            .with_project_field(ProjectField::Name, "Proj")
            .with_project_field(ProjectField::Uri, "https://example.org/proj");
        form.set_field("notes", "keep");
        form.issued = Some("2026-01-01T00:00:00.000Z".to_string());

        form.clear_project_fields();
        assert_eq!(form.project_field(ProjectField::Name), "");
        assert_eq!(form.field("notes"), "keep");
        assert!(form.issued.is_none());
    }
}

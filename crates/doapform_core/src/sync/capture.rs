//! Form-to-record capture.
//!
//! # Responsibility
//! - Rebuild a `ProjectDescription` from the current form state.
//! - Report the missing project URI as a recoverable notice.
//!
//! # Invariants
//! - Every capture starts from the fixed skeleton; nothing carries over
//!   between calls.
//! - Empty fields never produce empty-string properties.
//! - A contributor URI produces at most one `foaf:Person` subject per pass.

use crate::form::FormState;
use crate::model::description::{ProjectDescription, Subject, TestSuite};
use crate::model::vocab::{ProjectField, DC_ISSUED};
use log::debug;
use std::collections::HashSet;
use std::fmt::{Display, Formatter};

/// Recoverable conditions surfaced to the user after a capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureNotice {
    /// The project URI field is empty, so no primary topic was produced.
    ProjectUriRequired,
}

impl Display for CaptureNotice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProjectUriRequired => write!(f, "Project URI Required"),
        }
    }
}

/// Result of one capture pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    pub description: ProjectDescription,
    pub notices: Vec<CaptureNotice>,
}

impl Capture {
    pub fn is_missing_project_uri(&self) -> bool {
        self.notices.contains(&CaptureNotice::ProjectUriRequired)
    }
}

/// Builds a record from form state.
///
/// `generated_at` is used for `dc:issued` unless the form carries a restored
/// timestamp.
pub fn capture_state_from_form(form: &FormState, generated_at: &str) -> Capture {
    let project_uri = form.project_field(ProjectField::Uri);
    let mut description = ProjectDescription::skeleton(project_uri);
    let mut notices = Vec::new();

    if project_uri.is_empty() {
        notices.push(CaptureNotice::ProjectUriRequired);
    } else {
        let issued = form
            .issued
            .as_deref()
            .filter(|value| !value.is_empty())
            .unwrap_or(generated_at);
        let mut primary = Subject::primary_topic(project_uri);
        primary.push_property(DC_ISSUED, issued);
        description.primary_topic = Some(primary);
    }

    for field in ProjectField::ALL {
        let value = form.project_field(field);
        if !value.is_empty() {
            description.project.push_property(field.predicate(), value);
        }
    }

    // Insertion order of `contributors` doubles as the ordered seen set.
    let mut seen: HashSet<&str> = HashSet::new();
    for row in &form.developers {
        if row.uri.is_empty() {
            continue;
        }
        // Without a primary topic, `maker` falls back to the project subject.
        let target = match description.primary_topic.as_mut() {
            Some(primary) if row.role.targets_primary_topic() => primary,
            _ => &mut description.project,
        };
        target.push_property(row.role.predicate(), row.uri.as_str());

        if !row.name.is_empty() && seen.insert(row.uri.as_str()) {
            description
                .contributors
                .push(Subject::person(row.uri.as_str(), row.name.as_str()));
        }
    }

    description.testsuites = form
        .testsuites
        .iter()
        .map(|row| TestSuite {
            file: row.file_name().to_string(),
            manifest: row.manifest.clone(),
        })
        .collect();

    debug!(
        "event=capture_built module=sync status=ok complete={} project_properties={} contributors={} testsuites={}",
        description.is_complete(),
        description.project.properties.len(),
        description.contributors.len(),
        description.testsuites.len()
    );

    Capture {
        description,
        notices,
    }
}

#[cfg(test)]
mod tests {
    use super::{capture_state_from_form, CaptureNotice};
    use crate::form::{DeveloperRow, FormState};
    use crate::model::vocab::{DeveloperRole, ProjectField};

    const NOW: &str = "2026-10-19T08:00:00.000Z";

    #[test]
    fn restored_timestamp_wins_over_generation_time() {
        let mut form =
            FormState::new().with_project_field(ProjectField::Uri, "https://example.org/proj");
        form.issued = Some("2020-01-01T00:00:00.000Z".to_string());
        let capture = capture_state_from_form(&form, NOW);
        assert_eq!(
            capture.description.issued(),
            Some("2020-01-01T00:00:00.000Z")
        );
    }

    #[test]
    fn maker_without_primary_topic_lands_on_project() {
        let mut form = FormState::new().with_project_field(ProjectField::Name, "Proj");
        form.developers.push(DeveloperRow::new(
            "https://github.com/alice",
            "Alice",
            DeveloperRole::Maker,
        ));

        let capture = capture_state_from_form(&form, NOW);
        assert_eq!(capture.notices, vec![CaptureNotice::ProjectUriRequired]);
        assert!(capture.description.primary_topic.is_none());
        assert_eq!(
            capture
                .description
                .project
                .property_value("http://xmlns.com/foaf/0.1/maker"),
            Some("https://github.com/alice")
        );
        assert_eq!(capture.description.contributors.len(), 1);
    }

    #[test]
    fn rows_without_uri_are_ignored() {
        let mut form =
            FormState::new().with_project_field(ProjectField::Uri, "https://example.org/proj");
        form.developers
            .push(DeveloperRow::new("", "Nobody", DeveloperRole::Developer));

        let capture = capture_state_from_form(&form, NOW);
        assert!(capture.description.contributors.is_empty());
        assert_eq!(capture.description.project.properties.len(), 1);
    }
}

//! Fixed vocabulary shared by capture, apply and rendering.
//!
//! # Responsibility
//! - Own the namespace-prefix table emitted into every document header.
//! - Enumerate recognized project fields and developer roles once, so the
//!   form-to-record and record-to-form directions cannot drift apart.
//!
//! # Invariants
//! - `ProjectField::ALL` order is the property emission order for the project
//!   subject.
//! - Role names never collide with project field names.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const DC_NS: &str = "http://purl.org/dc/terms/";
pub const EARL_NS: &str = "http://www.w3.org/ns/earl#";
pub const DOAP_NS: &str = "http://usefulinc.com/ns/doap#";
pub const FOAF_NS: &str = "http://xmlns.com/foaf/0.1/";
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";

/// Placeholder id for "this document".
pub const THIS_DOCUMENT: &str = "<>";
/// Literal `type` marker for `rdf:type` statements.
pub const RDF_TYPE_MARKER: &str = "a";

pub const FOAF_PRIMARY_TOPIC: &str = "http://xmlns.com/foaf/0.1/primaryTopic";
pub const FOAF_MAKER: &str = "http://xmlns.com/foaf/0.1/maker";
pub const FOAF_NAME: &str = "foaf:name";
pub const FOAF_PERSON: &str = "foaf:Person";
pub const DOAP_PROJECT: &str = "doap:Project";
pub const DC_ISSUED: &str = "dc:issued";

/// Form field id marker prepended to a predicate's local name.
pub const FIELD_ID_MARKER: &str = "project_";

const PREFIX_TABLE: &[(&str, &str)] = &[
    ("dc", DC_NS),
    ("earl", EARL_NS),
    ("doap", DOAP_NS),
    ("foaf", FOAF_NS),
    ("xsd", XSD_NS),
];

/// Returns the fixed `(short_name, namespace)` table in header order.
pub fn prefix_table() -> &'static [(&'static str, &'static str)] {
    PREFIX_TABLE
}

/// Returns the local part of a predicate.
///
/// Handles prefixed names (`doap:name`) and full IRIs ending in `#local` or
/// `/local`. Unqualified names are returned unchanged.
pub fn local_name(predicate: &str) -> &str {
    if let Some(pos) = predicate.rfind(['#', '/']) {
        return &predicate[pos + 1..];
    }
    match predicate.split_once(':') {
        Some((_, local)) => local,
        None => predicate,
    }
}

/// Recognized project property fields in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProjectField {
    Uri,
    Name,
    Description,
    Homepage,
    Organization,
    ProgrammingLanguage,
    VersionName,
    VersionCreated,
    VersionRevision,
}

impl ProjectField {
    pub const ALL: [ProjectField; 9] = [
        Self::Uri,
        Self::Name,
        Self::Description,
        Self::Homepage,
        Self::Organization,
        Self::ProgrammingLanguage,
        Self::VersionName,
        Self::VersionCreated,
        Self::VersionRevision,
    ];

    /// Display label, also the predicate local name.
    pub fn display(self) -> &'static str {
        match self {
            Self::Uri => "uri",
            Self::Name => "name",
            Self::Description => "description",
            Self::Homepage => "homepage",
            Self::Organization => "organization",
            Self::ProgrammingLanguage => "programming-language",
            Self::VersionName => "version-name",
            Self::VersionCreated => "version-created",
            Self::VersionRevision => "version-revision",
        }
    }

    /// Namespaced predicate emitted on the project subject.
    pub fn predicate(self) -> String {
        format!("doap:{}", self.display())
    }

    /// Whether the value is an IRI rather than a literal.
    pub fn takes_resource(self) -> bool {
        matches!(self, Self::Uri | Self::Homepage)
    }

    /// Resolves a namespaced predicate back to a recognized field.
    pub fn from_predicate(predicate: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.predicate() == predicate)
    }

    /// Form field identifier, e.g. `project_name`.
    pub fn field_id(self) -> String {
        format!("{FIELD_ID_MARKER}{}", self.display())
    }

    /// Resolves a form field identifier back to a recognized field.
    pub fn from_field_id(field_id: &str) -> Option<Self> {
        let label = field_id.strip_prefix(FIELD_ID_MARKER)?;
        Self::ALL.into_iter().find(|field| field.display() == label)
    }
}

/// Developer role options offered by each developer row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeveloperRole {
    #[default]
    Maker,
    Developer,
    Documenter,
    Maintainer,
    Creator,
}

impl DeveloperRole {
    pub const ALL: [DeveloperRole; 5] = [
        Self::Maker,
        Self::Developer,
        Self::Documenter,
        Self::Maintainer,
        Self::Creator,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Maker => "maker",
            Self::Developer => "developer",
            Self::Documenter => "documenter",
            Self::Maintainer => "maintainer",
            Self::Creator => "creator",
        }
    }

    /// Predicate used for the back-reference property.
    ///
    /// `maker` lives on the primary topic as a full FOAF IRI; every other role
    /// lives on the project subject in the DOAP namespace.
    pub fn predicate(self) -> String {
        match self {
            Self::Maker => FOAF_MAKER.to_string(),
            other => format!("doap:{}", other.as_str()),
        }
    }

    /// Whether the back-reference belongs to the primary-topic subject.
    pub fn targets_primary_topic(self) -> bool {
        matches!(self, Self::Maker)
    }

    /// Matches a predicate against the role names by local name.
    pub fn from_predicate(predicate: &str) -> Option<Self> {
        parse_developer_role(local_name(predicate)).ok()
    }
}

impl Display for DeveloperRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a role option value.
pub fn parse_developer_role(value: &str) -> Result<DeveloperRole, UnknownRoleError> {
    let normalized = value.trim();
    DeveloperRole::ALL
        .into_iter()
        .find(|role| role.as_str() == normalized)
        .ok_or_else(|| UnknownRoleError(normalized.to_string()))
}

/// Role option outside the fixed enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRoleError(pub String);

impl Display for UnknownRoleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown developer role `{}`; expected maker|developer|documenter|maintainer|creator",
            self.0
        )
    }
}

impl Error for UnknownRoleError {}

#[cfg(test)]
mod tests {
    use super::{local_name, parse_developer_role, DeveloperRole, ProjectField};

    #[test]
    fn local_name_handles_prefixed_and_full_iris() {
        assert_eq!(local_name("doap:name"), "name");
        assert_eq!(local_name("http://xmlns.com/foaf/0.1/maker"), "maker");
        assert_eq!(local_name("http://usefulinc.com/ns/doap#developer"), "developer");
        assert_eq!(local_name("plain"), "plain");
    }

    #[test]
    fn role_predicates_round_trip_through_local_name() {
        for role in DeveloperRole::ALL {
            assert_eq!(DeveloperRole::from_predicate(&role.predicate()), Some(role));
        }
        assert_eq!(DeveloperRole::from_predicate("doap:name"), None);
    }

    #[test]
    fn field_ids_round_trip() {
        for field in ProjectField::ALL {
            assert_eq!(ProjectField::from_field_id(&field.field_id()), Some(field));
            assert!(DeveloperRole::from_predicate(&field.predicate()).is_none());
        }
        assert_eq!(ProjectField::from_field_id("project_license"), None);
        assert_eq!(
            ProjectField::from_predicate("doap:homepage"),
            Some(ProjectField::Homepage)
        );
        assert_eq!(ProjectField::from_predicate("doap:license"), None);
    }

    #[test]
    fn parse_role_rejects_unknown_values() {
        assert_eq!(parse_developer_role(" creator "), Ok(DeveloperRole::Creator));
        let err = parse_developer_role("tester").unwrap_err();
        assert!(err.to_string().contains("tester"));
    }
}

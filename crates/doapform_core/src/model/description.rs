//! Project description record.
//!
//! # Responsibility
//! - Define the in-memory shape of the persisted "state" document.
//! - Replace positional subject conventions with named fields.
//!
//! # Invariants
//! - `project` always exists; `primary_topic` exists only when a project URI
//!   was provided.
//! - Each contributor `id` appears at most once in `contributors`.
//!
//! # See also
//! - `crate::document` for the wire encoding.

use crate::model::vocab::{
    prefix_table, DC_ISSUED, DOAP_PROJECT, FOAF_NAME, FOAF_PERSON, FOAF_PRIMARY_TOPIC,
    RDF_TYPE_MARKER, THIS_DOCUMENT,
};
use serde::{Deserialize, Serialize};

/// One `(short_name, namespace)` header entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefix {
    pub short_name: String,
    /// Bare namespace IRI, without angle brackets.
    pub namespace: String,
}

impl Prefix {
    pub fn new(short_name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            short_name: short_name.into(),
            namespace: namespace.into(),
        }
    }
}

/// One predicate/value pair attached to a subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    /// Serialized as `type` to match the document schema.
    #[serde(rename = "type")]
    pub predicate: String,
    pub value: String,
}

impl Property {
    pub fn new(predicate: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            predicate: predicate.into(),
            value: value.into(),
        }
    }
}

/// A described entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    /// Either the literal `a` or a predicate IRI.
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
    #[serde(default)]
    pub properties: Vec<Property>,
}

impl Subject {
    /// Primary-topic record pointing at the project URI.
    pub fn primary_topic(project_uri: impl Into<String>) -> Self {
        Self {
            id: THIS_DOCUMENT.to_string(),
            kind: FOAF_PRIMARY_TOPIC.to_string(),
            value: project_uri.into(),
            properties: Vec::new(),
        }
    }

    /// DOAP project record; an empty URI falls back to the `<>` placeholder.
    pub fn project(project_uri: &str) -> Self {
        let id = if project_uri.is_empty() {
            THIS_DOCUMENT
        } else {
            project_uri
        };
        Self {
            id: id.to_string(),
            kind: RDF_TYPE_MARKER.to_string(),
            value: DOAP_PROJECT.to_string(),
            properties: Vec::new(),
        }
    }

    /// `foaf:Person` record carrying one `foaf:name`.
    pub fn person(uri: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: uri.into(),
            kind: RDF_TYPE_MARKER.to_string(),
            value: FOAF_PERSON.to_string(),
            properties: vec![Property::new(FOAF_NAME, name)],
        }
    }

    pub fn push_property(&mut self, predicate: impl Into<String>, value: impl Into<String>) {
        self.properties.push(Property::new(predicate, value));
    }

    /// Returns the first value recorded for `predicate`.
    pub fn property_value(&self, predicate: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|property| property.predicate == predicate)
            .map(|property| property.value.as_str())
    }

    pub fn is_type_statement(&self) -> bool {
        self.kind == RDF_TYPE_MARKER
    }
}

/// One `(file, manifest)` test-suite entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSuite {
    pub file: String,
    pub manifest: String,
}

/// The persisted project-description record.
///
/// Encoded through `crate::document::DocumentWire`, which restores the
/// positional `header.subject` layout on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "crate::document::DocumentWire",
    into = "crate::document::DocumentWire"
)]
pub struct ProjectDescription {
    pub prefixes: Vec<Prefix>,
    pub primary_topic: Option<Subject>,
    pub project: Subject,
    pub contributors: Vec<Subject>,
    pub testsuites: Vec<TestSuite>,
}

impl ProjectDescription {
    /// Fresh skeleton: fixed prefix table and an empty project subject.
    pub fn skeleton(project_uri: &str) -> Self {
        Self {
            prefixes: prefix_table()
                .iter()
                .map(|(short, namespace)| Prefix::new(*short, *namespace))
                .collect(),
            primary_topic: None,
            project: Subject::project(project_uri),
            contributors: Vec::new(),
            testsuites: Vec::new(),
        }
    }

    /// Whether the required primary topic is present.
    pub fn is_complete(&self) -> bool {
        self.primary_topic.is_some()
    }

    /// Finds a contributor subject by URI.
    pub fn contributor(&self, uri: &str) -> Option<&Subject> {
        self.contributors.iter().find(|subject| subject.id == uri)
    }

    /// Generation timestamp recorded on the primary topic.
    pub fn issued(&self) -> Option<&str> {
        self.primary_topic
            .as_ref()
            .and_then(|subject| subject.property_value(DC_ISSUED))
    }

    /// Subjects in wire order.
    pub fn subjects(&self) -> impl Iterator<Item = &Subject> {
        self.primary_topic
            .iter()
            .chain(std::iter::once(&self.project))
            .chain(self.contributors.iter())
    }
}

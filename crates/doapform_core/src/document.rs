//! Persisted JSON document encoding.
//!
//! # Responsibility
//! - Map `ProjectDescription` to and from the bit-exact document shape
//!   (`header.prefix`, `header.subject`, `testsuites`).
//! - Classify load failures into syntax errors and shape errors.
//!
//! # Invariants
//! - On the wire, subject 0 is the primary topic when present, then the
//!   project, then contributors.
//! - Prefix namespaces are written wrapped in angle brackets; brackets are
//!   optional on input.
//! - Loading never mutates caller state; it only returns a new record.

use crate::model::description::{Prefix, ProjectDescription, Subject, TestSuite};
use serde::{Deserialize, Serialize};
use serde_json::error::Category;
use std::collections::{BTreeMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type DocumentResult<T> = Result<T, DocumentError>;

/// Error returned by document load/encode paths.
#[derive(Debug)]
pub enum DocumentError {
    /// Input is not valid JSON.
    Parse(serde_json::Error),
    /// Input is valid JSON but not a project-description document.
    Shape(serde_json::Error),
    /// Record could not be encoded.
    Encode(serde_json::Error),
}

impl Display for DocumentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "malformed document JSON: {err}"),
            Self::Shape(err) => write!(f, "invalid document shape: {err}"),
            Self::Encode(err) => write!(f, "failed to encode document: {err}"),
        }
    }
}

impl Error for DocumentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) | Self::Shape(err) | Self::Encode(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for DocumentError {
    fn from(value: serde_json::Error) -> Self {
        match value.classify() {
            Category::Data => Self::Shape(value),
            Category::Io | Category::Syntax | Category::Eof => Self::Parse(value),
        }
    }
}

/// Parses persisted bytes into a record.
///
/// # Errors
/// - `DocumentError::Parse` for malformed JSON.
/// - `DocumentError::Shape` for JSON missing the project subject, carrying
///   duplicate contributors or malformed prefix entries.
pub fn load_persisted_document(raw: &[u8]) -> DocumentResult<ProjectDescription> {
    Ok(serde_json::from_slice(raw)?)
}

/// Encodes a record as compact JSON bytes.
pub fn encode_document(description: &ProjectDescription) -> DocumentResult<Vec<u8>> {
    serde_json::to_vec(description).map_err(DocumentError::Encode)
}

/// Encodes a record as indented JSON text.
pub fn encode_document_pretty(description: &ProjectDescription) -> DocumentResult<String> {
    serde_json::to_string_pretty(description).map_err(DocumentError::Encode)
}

/// Wire shape of the persisted document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentWire {
    header: HeaderWire,
    #[serde(default)]
    testsuites: Vec<TestSuite>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct HeaderWire {
    prefix: Vec<PrefixWire>,
    #[serde(default)]
    subject: Vec<Subject>,
}

/// Single-entry `{ "<short>": "<namespace>" }` object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
struct PrefixWire(BTreeMap<String, String>);

impl From<ProjectDescription> for DocumentWire {
    fn from(value: ProjectDescription) -> Self {
        let mut subject = Vec::with_capacity(2 + value.contributors.len());
        subject.extend(value.primary_topic);
        subject.push(value.project);
        subject.extend(value.contributors);

        let prefix = value
            .prefixes
            .into_iter()
            .map(|prefix| {
                let mut entry = BTreeMap::new();
                entry.insert(prefix.short_name, format!("<{}>", prefix.namespace));
                PrefixWire(entry)
            })
            .collect();

        Self {
            header: HeaderWire { prefix, subject },
            testsuites: value.testsuites,
        }
    }
}

impl TryFrom<DocumentWire> for ProjectDescription {
    type Error = DocumentShapeError;

    fn try_from(value: DocumentWire) -> Result<Self, Self::Error> {
        let mut prefixes = Vec::with_capacity(value.header.prefix.len());
        for PrefixWire(entry) in value.header.prefix {
            if entry.len() != 1 {
                return Err(DocumentShapeError::MalformedPrefix(entry.len()));
            }
            for (short_name, namespace) in entry {
                prefixes.push(Prefix::new(short_name, strip_angle_brackets(&namespace)));
            }
        }

        let mut subjects = value.header.subject.into_iter().peekable();
        let primary_topic = match subjects.peek() {
            Some(first) if !first.is_type_statement() => subjects.next(),
            _ => None,
        };
        let project = subjects
            .next()
            .ok_or(DocumentShapeError::MissingProjectSubject)?;

        let contributors: Vec<Subject> = subjects.collect();
        let mut seen = HashSet::new();
        for contributor in &contributors {
            if !seen.insert(contributor.id.as_str()) {
                return Err(DocumentShapeError::DuplicateContributor(
                    contributor.id.clone(),
                ));
            }
        }

        Ok(Self {
            prefixes,
            primary_topic,
            project,
            contributors,
            testsuites: value.testsuites,
        })
    }
}

/// Structural violations found while decoding a well-formed JSON document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentShapeError {
    MissingProjectSubject,
    DuplicateContributor(String),
    MalformedPrefix(usize),
}

impl Display for DocumentShapeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingProjectSubject => write!(f, "document has no project subject"),
            Self::DuplicateContributor(id) => {
                write!(f, "contributor subject is duplicated: {id}")
            }
            Self::MalformedPrefix(len) => {
                write!(f, "prefix entry must have exactly one key, found {len}")
            }
        }
    }
}

impl Error for DocumentShapeError {}

fn strip_angle_brackets(value: &str) -> &str {
    value
        .strip_prefix('<')
        .and_then(|rest| rest.strip_suffix('>'))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::{load_persisted_document, strip_angle_brackets, DocumentError};

    #[test]
    fn strip_angle_brackets_only_strips_balanced_pairs() {
        assert_eq!(strip_angle_brackets("<http://x/>"), "http://x/");
        assert_eq!(strip_angle_brackets("http://x/"), "http://x/");
        assert_eq!(strip_angle_brackets("<http://x/"), "<http://x/");
    }

    #[test]
    fn truncated_input_is_a_parse_error() {
        let err = load_persisted_document(br#"{"header": {"prefix": ["#).unwrap_err();
        assert!(matches!(err, DocumentError::Parse(_)), "unexpected: {err}");
    }

    #[test]
    fn missing_project_subject_is_a_shape_error() {
        let err = load_persisted_document(br#"{"header": {"prefix": [], "subject": []}}"#)
            .unwrap_err();
        assert!(matches!(err, DocumentError::Shape(_)), "unexpected: {err}");
        assert!(err.to_string().contains("no project subject"));
    }
}

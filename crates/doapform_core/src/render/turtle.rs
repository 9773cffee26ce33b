//! Turtle-style preview rendering.
//!
//! # Responsibility
//! - Render a record as indented Turtle text for preview and `.doap` export.
//! - Escape angle brackets for on-screen display.
//!
//! # Invariants
//! - Output is deterministic for a given record.
//! - Rendering never fails; unknown shapes fall back to quoted literals.

use crate::model::description::{Prefix, ProjectDescription, Subject};
use crate::model::vocab::{ProjectField, DC_ISSUED, FOAF_NAME, RDF_TYPE_MARKER, THIS_DOCUMENT};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::Write;

/// Absolute IRI: a scheme, then no whitespace or characters Turtle forbids.
static IRI_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^[A-Za-z][A-Za-z0-9+.\-]*:[^\s<>"{}|^`\\]+$"#).expect("valid iri regex")
});
static PREFIXED_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z][\w\-]*):[A-Za-z_][\w\-]*$").expect("valid prefixed name regex")
});
static LOCAL_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][\w\-]*$").expect("valid local name regex"));

const INDENT: &str = "    ";
const DESCRIPTION_PREDICATE: &str = "doap:description";

/// Renders the record as Turtle text.
pub fn render_turtle(description: &ProjectDescription) -> String {
    let mut out = String::new();
    for prefix in &description.prefixes {
        let _ = writeln!(out, "@prefix {}: <{}> .", prefix.short_name, prefix.namespace);
    }

    for subject in description.subjects() {
        out.push('\n');
        render_subject(&mut out, subject, &description.prefixes);
    }
    out
}

/// Renders the record as display-safe preview text.
pub fn render_preview(description: &ProjectDescription) -> String {
    escape_angle_brackets(&render_turtle(description))
}

/// Replaces `<` and `>` with their HTML entities.
pub fn escape_angle_brackets(value: &str) -> String {
    value.replace('<', "&lt;").replace('>', "&gt;")
}

fn render_subject(out: &mut String, subject: &Subject, prefixes: &[Prefix]) {
    let _ = write!(
        out,
        "{} {} {}",
        resource_term(&subject.id, prefixes),
        predicate_term(&subject.kind, prefixes),
        object_term(&subject.kind, &subject.value, prefixes)
    );
    for property in &subject.properties {
        let _ = write!(
            out,
            " ;\n{INDENT}{} {}",
            predicate_term(&property.predicate, prefixes),
            object_term(&property.predicate, &property.value, prefixes)
        );
    }
    out.push_str(" .\n");
}

fn predicate_term(predicate: &str, prefixes: &[Prefix]) -> String {
    if predicate == RDF_TYPE_MARKER {
        return RDF_TYPE_MARKER.to_string();
    }
    resource_term(predicate, prefixes)
}

fn object_term(predicate: &str, value: &str, prefixes: &[Prefix]) -> String {
    if predicate == RDF_TYPE_MARKER {
        return resource_term(value, prefixes);
    }
    if !takes_literal(predicate) && is_resource(value) {
        return resource_term(value, prefixes);
    }
    let literal = quote_literal(value);
    match predicate {
        DC_ISSUED => format!("{literal}^^xsd:dateTime"),
        DESCRIPTION_PREDICATE => format!("{literal}@en"),
        _ => literal,
    }
}

/// Predicates whose objects are always literals, whatever the value looks like.
fn takes_literal(predicate: &str) -> bool {
    if predicate == FOAF_NAME || predicate == DC_ISSUED {
        return true;
    }
    ProjectField::from_predicate(predicate).is_some_and(|field| !field.takes_resource())
}

fn is_resource(value: &str) -> bool {
    value == THIS_DOCUMENT || IRI_RE.is_match(value)
}

/// Compacts an IRI against the prefix table, or wraps it in angle brackets.
///
/// Prefixed names pass through only when their prefix is declared.
fn resource_term(value: &str, prefixes: &[Prefix]) -> String {
    if value == THIS_DOCUMENT {
        return value.to_string();
    }
    if let Some(captures) = PREFIXED_NAME_RE.captures(value) {
        let declared = prefixes
            .iter()
            .any(|prefix| prefix.short_name == captures[1]);
        if declared {
            return value.to_string();
        }
    }
    for prefix in prefixes {
        if let Some(local) = value.strip_prefix(prefix.namespace.as_str()) {
            if LOCAL_NAME_RE.is_match(local) {
                return format!("{}:{local}", prefix.short_name);
            }
        }
    }
    format!("<{value}>")
}

fn quote_literal(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            other => quoted.push(other),
        }
    }
    quoted.push('"');
    quoted
}

use doapform_core::{
    capture_state_from_form, encode_document, load_persisted_document, DeveloperRole,
    DeveloperRow, DocumentError, FormState, ProjectField, TestSuiteRow,
};
use serde_json::json;

const NOW: &str = "2026-10-19T08:00:00.000Z";

#[test]
fn encoded_document_matches_wire_shape() {
    let mut form = FormState::new()
        .with_project_field(ProjectField::Uri, "https://example.org/proj")
        .with_project_field(ProjectField::Name, "Proj");
    form.developers.push(DeveloperRow::new(
        "https://github.com/alice",
        "Alice",
        DeveloperRole::Maker,
    ));
    form.testsuites
        .push(TestSuiteRow::restored("suite1.ttl", "manifest.json"));

    let description = capture_state_from_form(&form, NOW).description;
    let bytes = encode_document(&description).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(
        value,
        json!({
            "header": {
                "prefix": [
                    { "dc": "<http://purl.org/dc/terms/>" },
                    { "earl": "<http://www.w3.org/ns/earl#>" },
                    { "doap": "<http://usefulinc.com/ns/doap#>" },
                    { "foaf": "<http://xmlns.com/foaf/0.1/>" },
                    { "xsd": "<http://www.w3.org/2001/XMLSchema#>" }
                ],
                "subject": [
                    {
                        "id": "<>",
                        "type": "http://xmlns.com/foaf/0.1/primaryTopic",
                        "value": "https://example.org/proj",
                        "properties": [
                            { "type": "dc:issued", "value": NOW },
                            {
                                "type": "http://xmlns.com/foaf/0.1/maker",
                                "value": "https://github.com/alice"
                            }
                        ]
                    },
                    {
                        "id": "https://example.org/proj",
                        "type": "a",
                        "value": "doap:Project",
                        "properties": [
                            { "type": "doap:uri", "value": "https://example.org/proj" },
                            { "type": "doap:name", "value": "Proj" }
                        ]
                    },
                    {
                        "id": "https://github.com/alice",
                        "type": "a",
                        "value": "foaf:Person",
                        "properties": [ { "type": "foaf:name", "value": "Alice" } ]
                    }
                ]
            },
            "testsuites": [ { "file": "suite1.ttl", "manifest": "manifest.json" } ]
        })
    );

    let decoded = load_persisted_document(&bytes).unwrap();
    assert_eq!(decoded, description);
}

#[test]
fn document_without_primary_topic_starts_with_project() {
    let raw = json!({
        "header": {
            "prefix": [ { "doap": "http://usefulinc.com/ns/doap#" } ],
            "subject": [
                { "id": "<>", "type": "a", "value": "doap:Project",
                  "properties": [ { "type": "doap:name", "value": "Proj" } ] }
            ]
        }
    })
    .to_string();

    let description = load_persisted_document(raw.as_bytes()).unwrap();
    assert!(description.primary_topic.is_none());
    assert_eq!(description.project.property_value("doap:name"), Some("Proj"));
    assert_eq!(description.prefixes[0].namespace, "http://usefulinc.com/ns/doap#");
    assert!(description.testsuites.is_empty());
    assert!(description.contributors.is_empty());
}

#[test]
fn missing_properties_default_to_empty() {
    let raw = json!({
        "header": {
            "prefix": [],
            "subject": [
                { "id": "<>", "type": "http://xmlns.com/foaf/0.1/primaryTopic",
                  "value": "https://example.org/proj" },
                { "id": "https://example.org/proj", "type": "a", "value": "doap:Project" }
            ]
        },
        "testsuites": []
    })
    .to_string();

    let description = load_persisted_document(raw.as_bytes()).unwrap();
    let primary = description.primary_topic.expect("primary topic");
    assert!(primary.properties.is_empty());
    assert!(description.project.properties.is_empty());
}

#[test]
fn malformed_inputs_are_rejected_with_classified_errors() {
    let err = load_persisted_document(b"not json").unwrap_err();
    assert!(matches!(err, DocumentError::Parse(_)), "unexpected: {err}");

    let err = load_persisted_document(br#"{"testsuites": []}"#).unwrap_err();
    assert!(matches!(err, DocumentError::Shape(_)), "unexpected: {err}");

    let duplicate = json!({
        "header": {
            "prefix": [],
            "subject": [
                { "id": "<>", "type": "a", "value": "doap:Project" },
                { "id": "https://github.com/bob", "type": "a", "value": "foaf:Person" },
                { "id": "https://github.com/bob", "type": "a", "value": "foaf:Person" }
            ]
        }
    })
    .to_string();
    let err = load_persisted_document(duplicate.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("duplicated"), "unexpected: {err}");

    let two_key_prefix = json!({
        "header": {
            "prefix": [ { "dc": "<http://purl.org/dc/terms/>", "xsd": "<x>" } ],
            "subject": [ { "id": "<>", "type": "a", "value": "doap:Project" } ]
        }
    })
    .to_string();
    let err = load_persisted_document(two_key_prefix.as_bytes()).unwrap_err();
    assert!(matches!(err, DocumentError::Shape(_)), "unexpected: {err}");
}

use doapform_core::{
    capture_state_from_form, render_preview, render_turtle, DeveloperRole, DeveloperRow,
    FormState, ProjectField,
};

const NOW: &str = "2026-10-19T08:00:00.000Z";

fn scenario_form() -> FormState {
    let mut form = FormState::new()
        .with_project_field(ProjectField::Uri, "https://example.org/proj")
        .with_project_field(ProjectField::Name, "Proj");
    form.developers.push(DeveloperRow::new(
        "https://github.com/alice",
        "Alice",
        DeveloperRole::Maker,
    ));
    form
}

#[test]
fn turtle_lists_prefixes_then_one_block_per_subject() {
    let description = capture_state_from_form(&scenario_form(), NOW).description;
    let expected = "\
@prefix dc: <http://purl.org/dc/terms/> .
@prefix earl: <http://www.w3.org/ns/earl#> .
@prefix doap: <http://usefulinc.com/ns/doap#> .
@prefix foaf: <http://xmlns.com/foaf/0.1/> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .

<> foaf:primaryTopic <https://example.org/proj> ;
    dc:issued \"2026-10-19T08:00:00.000Z\"^^xsd:dateTime ;
    foaf:maker <https://github.com/alice> .

<https://example.org/proj> a doap:Project ;
    doap:uri <https://example.org/proj> ;
    doap:name \"Proj\" .

<https://github.com/alice> a foaf:Person ;
    foaf:name \"Alice\" .
";
    assert_eq!(render_turtle(&description), expected);
}

#[test]
fn preview_escapes_angle_brackets() {
    let description = capture_state_from_form(&scenario_form(), NOW).description;
    let preview = render_preview(&description);
    assert!(!preview.contains('<'));
    assert!(!preview.contains('>'));
    assert!(preview.contains("&lt;https://github.com/alice&gt; a foaf:Person"));
}

#[test]
fn description_literal_is_language_tagged_and_escaped() {
    let form = FormState::new()
        .with_project_field(ProjectField::Uri, "https://example.org/proj")
        .with_project_field(ProjectField::Description, "Say \"hi\"");
    let description = capture_state_from_form(&form, NOW).description;
    let turtle = render_turtle(&description);
    assert!(
        turtle.contains("doap:description \"Say \\\"hi\\\"\"@en"),
        "{turtle}"
    );
}

#[test]
fn role_references_render_as_resources() {
    let mut form = scenario_form();
    form.developers.push(DeveloperRow::new(
        "https://github.com/bob",
        "",
        DeveloperRole::Maintainer,
    ));
    let description = capture_state_from_form(&form, NOW).description;
    let turtle = render_turtle(&description);
    assert!(turtle.contains("doap:maintainer <https://github.com/bob>"), "{turtle}");
    assert!(!turtle.contains("<https://github.com/bob> a foaf:Person"));
}

#[test]
fn text_containing_a_url_stays_a_literal() {
    let form = FormState::new()
        .with_project_field(ProjectField::Uri, "https://example.org/proj")
        .with_project_field(ProjectField::Name, "see http://x.org")
        .with_project_field(ProjectField::Description, "Mirror of https://example.org/x")
        .with_project_field(ProjectField::VersionName, "release:https://example.org/v1");
    let description = capture_state_from_form(&form, NOW).description;
    let turtle = render_turtle(&description);
    assert!(
        turtle.contains("doap:description \"Mirror of https://example.org/x\"@en"),
        "{turtle}"
    );
    assert!(turtle.contains("doap:name \"see http://x.org\""), "{turtle}");
    assert!(
        turtle.contains("doap:version-name \"release:https://example.org/v1\""),
        "{turtle}"
    );
    assert!(turtle.contains("doap:uri <https://example.org/proj>"), "{turtle}");
}

#[test]
fn undeclared_prefixed_names_are_wrapped_as_iris() {
    let mut form = scenario_form();
    form.developers.push(DeveloperRow::new(
        "github:bob",
        "Bob",
        DeveloperRole::Developer,
    ));
    let description = capture_state_from_form(&form, NOW).description;
    let turtle = render_turtle(&description);
    assert!(turtle.contains("doap:developer <github:bob>"), "{turtle}");
    assert!(turtle.contains("\n<github:bob> a foaf:Person"), "{turtle}");
    assert!(!turtle.contains("\ngithub:bob "), "{turtle}");
}

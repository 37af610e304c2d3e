//! Rendering behaviour of the Swagger doc pipeline against real spec files.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use routedoc_core::{DocInfo, DocProvider, DocRegistry, SWAGGER_DOC_NAME, SwaggerDoc};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn petstore_info() -> DocInfo {
    DocInfo::new()
        .with_title("Petstore")
        .with_version("1.2.3")
        .with_host("api.example.com")
        .with_base_path("/v1")
        .with_schemes(["http", "https"])
        .with_description("A sample API")
}

#[test]
fn substitutes_placeholders_and_keeps_valid_json() {
    let doc = SwaggerDoc::new(fixture("petstore.json"), petstore_info());
    let rendered = doc.render();

    assert!(!rendered.contains("{{"), "placeholders left in: {rendered}");
    let json: serde_json::Value = serde_json::from_str(&rendered).expect("rendered doc is JSON");
    assert_eq!(json["info"]["title"], "Petstore");
    assert_eq!(json["info"]["version"], "1.2.3");
    assert_eq!(json["host"], "api.example.com");
    assert_eq!(json["basePath"], "/v1");
    assert_eq!(json["schemes"], serde_json::json!(["http", "https"]));
}

#[test]
fn schemes_are_marshalled_as_a_json_array() {
    let doc = SwaggerDoc::new(fixture("petstore.yaml"), petstore_info());
    let rendered = doc.render();
    assert!(rendered.contains(r#"schemes: ["http","https"]"#), "{rendered}");
    assert!(rendered.contains(r#"title: "Petstore""#));
}

#[test]
fn empty_schemes_marshal_to_empty_array() {
    let doc = SwaggerDoc::new(fixture("petstore.json"), DocInfo::default());
    let json: serde_json::Value = serde_json::from_str(&doc.render()).unwrap();
    assert_eq!(json["schemes"], serde_json::json!([]));
    assert_eq!(json["info"]["title"], "");
}

#[test]
fn description_newlines_are_escaped() {
    let info = petstore_info().with_description("first line\nsecond line");
    let doc = SwaggerDoc::new(fixture("petstore.json"), info);
    let rendered = doc.render();

    assert!(rendered.contains(r#""description": "first line\nsecond line""#), "{rendered}");
    let json: serde_json::Value = serde_json::from_str(&rendered).unwrap();
    assert_eq!(json["info"]["description"], "first line\nsecond line");
}

#[test]
fn missing_file_returns_error_text() {
    let path = fixture("does-not-exist.json");
    let rendered = SwaggerDoc::new(&path, petstore_info()).render();

    assert!(!rendered.is_empty());
    assert!(rendered.starts_with(&format!("open {}: ", path.display())), "{rendered}");
    assert!(!rendered.contains('{'));
    assert!(serde_json::from_str::<serde_json::Value>(&rendered).is_err());
}

#[test]
fn empty_path_names_the_empty_file() {
    let rendered = SwaggerDoc::new("", petstore_info()).render();
    assert!(rendered.starts_with("open : "), "{rendered}");
}

#[test]
fn malformed_template_is_served_byte_for_byte() {
    let path = fixture("malformed.json");
    let original = fs::read_to_string(&path).unwrap();

    let rendered = SwaggerDoc::new(&path, petstore_info()).render();
    assert_eq!(rendered, original);
}

#[test]
fn unknown_field_is_served_unrendered() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("spec.json");
    let original = r#"{"title": "{{.Title}}", "contact": "{{.Contact}}"}"#;
    fs::write(&path, original).unwrap();

    let rendered = SwaggerDoc::new(&path, petstore_info()).render();
    assert_eq!(rendered, original);
}

#[test]
fn rendering_is_idempotent() {
    let doc = SwaggerDoc::new(fixture("petstore.json"), petstore_info());
    let first = doc.render();
    let second = doc.render();
    assert_eq!(first, second);
}

#[test]
fn file_is_reread_on_every_call() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("spec.yaml");
    fs::write(&path, "title: {{.Title}}").unwrap();

    let doc = SwaggerDoc::new(&path, petstore_info());
    assert_eq!(doc.render(), "title: Petstore");

    fs::write(&path, "name: {{.Title}}").unwrap();
    assert_eq!(doc.render(), "name: Petstore");
}

#[test]
fn served_through_the_registry_by_name() {
    let registry = DocRegistry::new();
    let doc = SwaggerDoc::new(fixture("petstore.json"), petstore_info());
    let expected = doc.render();

    registry.register(SWAGGER_DOC_NAME, Arc::new(doc)).unwrap();

    assert_eq!(registry.read_doc(SWAGGER_DOC_NAME).unwrap(), expected);
    let provider = registry.get("swagger").unwrap();
    assert_eq!(provider.read_doc().unwrap(), expected);
}

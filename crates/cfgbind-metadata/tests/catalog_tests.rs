use cfgbind_binder::{KeyResolver, NameBinder};
use cfgbind_key::{AccessType, Catalog, DeclarationResolveResult, Deprecation, DeprecationLevel};
use cfgbind_metadata::{Diagnostic, DocumentKind, MetadataCatalogBuilder};
use cfgbind_test_utils::{sample_type_model, APP_PROPERTIES, SAMPLE_METADATA};
use pretty_assertions::assert_eq;

fn sample_builder() -> MetadataCatalogBuilder {
    MetadataCatalogBuilder::new("sample-lib").with_type_model(sample_type_model())
}

fn sample_catalog() -> Catalog {
    let (keys, diagnostics) = sample_builder().parse(SAMPLE_METADATA);
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    Catalog::from(keys)
}

#[test]
fn test_scenario_scalar_key() {
    let (keys, diagnostics) = MetadataCatalogBuilder::new("demo")
        .parse(r#"{"properties":[{"name":"server.port","type":"java.lang.Integer"}]}"#);
    assert!(diagnostics.is_empty());
    assert_eq!(keys.len(), 1);
    assert_eq!(keys[0].name(), "server.port");
    assert_eq!(keys[0].access_type(), AccessType::Normal);
    assert_eq!(keys[0].declared_type().unwrap().name(), "java.lang.Integer");
}

#[test]
fn test_scenario_deprecated_without_reason() {
    let catalog = sample_catalog();
    let key = catalog.by_name("app.old-name").next().unwrap();
    assert_eq!(key.deprecation(), &Deprecation::DeprecatedWithoutReason);
    assert_eq!(key.deprecation().level(), Some(DeprecationLevel::Warning));
}

#[test]
fn test_scenario_array_default_value() {
    let catalog = sample_catalog();
    let servers = catalog.by_name("app.servers").next().unwrap();
    assert_eq!(servers.default_value(), Some("a, b"));
    let port = catalog.by_name("server.port").next().unwrap();
    assert_eq!(port.default_value(), Some("8080"));
}

#[test]
fn test_sample_access_types() {
    let catalog = sample_catalog();
    let access: Vec<_> = catalog
        .iter()
        .map(|key| (key.name(), key.access_type()))
        .collect();
    assert_eq!(
        access,
        [
            ("server.port", AccessType::Normal),
            ("app.display-name", AccessType::Normal),
            ("app.labels", AccessType::Map),
            ("app.servers", AccessType::Indexed),
            ("logging.level", AccessType::EnumMap),
            ("app.old-name", AccessType::Normal),
            ("app.legacy", AccessType::Normal),
        ]
    );
}

#[test]
fn test_structured_deprecation() {
    let catalog = sample_catalog();
    let key = catalog.by_name("app.legacy").next().unwrap();
    assert_eq!(
        key.deprecation(),
        &Deprecation::Deprecated {
            reason: Some("Replaced".to_string()),
            level: DeprecationLevel::Error,
            replacement: Some("app.display-name".to_string()),
        }
    );
}

#[test]
fn test_scalar_hints() {
    let catalog = sample_catalog();
    let port = catalog.by_name("server.port").next().unwrap();
    let values: Vec<_> = port
        .value_hint()
        .values()
        .iter()
        .map(|v| (v.value(), v.description()))
        .collect();
    assert_eq!(values, [("8080", Some("Default")), ("8443", None)]);
    assert!(port.key_hint().is_empty());
}

#[test]
fn test_map_hints_use_keys_and_values_suffixes() {
    let catalog = sample_catalog();
    let labels = catalog.by_name("app.labels").next().unwrap();

    let keys: Vec<_> = labels.key_hint().values().iter().map(|v| v.value()).collect();
    assert_eq!(keys, ["env", "team"]);

    let providers: Vec<_> = labels.value_hint().providers().iter().map(|p| p.name()).collect();
    assert_eq!(providers, ["any", "handle-as"]);
    assert_eq!(
        labels.value_hint().provider("handle-as").unwrap().parameter("target"),
        Some("java.lang.String")
    );
}

#[test]
fn test_declaration_provenance() {
    let catalog = sample_catalog();

    let display = catalog.by_name("app.display-name").next().unwrap();
    assert_eq!(display.declaration().result(), DeclarationResolveResult::Property);
    assert_eq!(display.declaration().source_type(), Some(APP_PROPERTIES));
    assert_eq!(display.declaration().navigation_property(), Some("displayName"));
    assert_eq!(display.declaration().library(), "sample-lib");

    let port = catalog.by_name("server.port").next().unwrap();
    assert_eq!(port.declaration().result(), DeclarationResolveResult::Json);

    let (keys, _) = MetadataCatalogBuilder::new("local")
        .with_kind(DocumentKind::Additional)
        .parse(r#"{"properties":[{"name":"a.b"},{"name":"a.c","sourceType":"org.example.Missing"}]}"#);
    assert_eq!(keys[0].declaration().result(), DeclarationResolveResult::AdditionalJson);
    assert_eq!(
        keys[1].declaration().result(),
        DeclarationResolveResult::JsonUnresolvedSourceType
    );
}

#[test]
fn test_properties_type_alias() {
    let (keys, _) = MetadataCatalogBuilder::new("demo")
        .parse(r#"{"properties":[{"name":"app.env","type":"java.util.Properties"}]}"#);
    assert_eq!(keys[0].access_type(), AccessType::Map);
    assert_eq!(
        keys[0].declared_type().unwrap().to_string(),
        "java.util.Map<java.lang.String,java.lang.String>"
    );
}

#[test]
fn test_duplicate_names_survive() {
    let (keys, _) = MetadataCatalogBuilder::new("demo").parse(
        r#"{"properties":[
            {"name":"app.mode","type":"java.lang.String","description":"first"},
            {"name":"app.mode","type":"java.lang.Boolean","description":"second"}
        ]}"#,
    );
    let catalog = Catalog::from(keys);
    assert_eq!(catalog.by_name("app.mode").count(), 2);

    let resolution = KeyResolver::new(NameBinder::Strict)
        .resolve(&catalog, "app.mode")
        .unwrap();
    assert_eq!(resolution.key().description(), Some("first"));
}

#[test]
fn test_malformed_document_is_empty() {
    let (keys, diagnostics) = MetadataCatalogBuilder::new("demo").parse(r#"{"properties": [ "#);
    assert!(keys.is_empty());
    assert!(diagnostics.is_document_rejected());
    assert!(matches!(
        diagnostics.iter().next(),
        Some(Diagnostic::MalformedDocument { .. })
    ));

    let (keys, diagnostics) = MetadataCatalogBuilder::new("demo").parse("[]");
    assert!(keys.is_empty());
    assert_eq!(diagnostics.iter().next(), Some(&Diagnostic::NotAnObject));

    let (keys, diagnostics) = MetadataCatalogBuilder::new("demo").parse("");
    assert!(keys.is_empty());
    assert!(diagnostics.is_document_rejected());
}

#[test]
fn test_lenient_bom_and_trailing_data() {
    let document = "\u{feff}{\"properties\":[{\"name\":\"a.b\"}]} trailing {garbage";
    let (keys, diagnostics) = MetadataCatalogBuilder::new("demo").parse(document);
    assert_eq!(keys.len(), 1);
    assert!(diagnostics.is_empty());
}

#[test]
fn test_comments_and_trailing_commas_are_accepted() {
    let document = r#"{
        // generated by the annotation processor
        "properties": [
            {"name": "app.home", "defaultValue": "http://example.com/#home"},
            /* kept for compatibility */
            {"name": "app.mode",},
        ],
    }"#;
    let (keys, diagnostics) = MetadataCatalogBuilder::new("demo").parse(document);
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    let names: Vec<_> = keys.iter().map(|k| k.name()).collect();
    assert_eq!(names, ["app.home", "app.mode"]);
    assert_eq!(keys[0].default_value(), Some("http://example.com/#home"));
}

#[test]
fn test_bad_entries_are_skipped() {
    let (keys, diagnostics) = MetadataCatalogBuilder::new("demo").parse(
        r#"{"properties":[
            1,
            {"name":"a.kept"},
            {"name":"   "},
            {"description":"no name"},
            {"name":"a.typed","type":"java.util.List<"}
        ]}"#,
    );
    let names: Vec<_> = keys.iter().map(|k| k.name()).collect();
    assert_eq!(names, ["a.kept", "a.typed"]);
    assert!(keys[1].declared_type().is_none());
    assert_eq!(keys[1].access_type(), AccessType::Normal);

    let diagnostics: Vec<_> = diagnostics.iter().cloned().collect();
    assert_eq!(
        diagnostics,
        [
            Diagnostic::InvalidEntry {
                member: "properties",
                index: 0
            },
            Diagnostic::UnparseableType {
                name: "a.typed".to_string(),
                type_text: "java.util.List<".to_string()
            },
        ]
    );
}

#[test]
fn test_properties_not_an_array() {
    let (keys, diagnostics) =
        MetadataCatalogBuilder::new("demo").parse(r#"{"properties":{"name":"a"}}"#);
    assert!(keys.is_empty());
    assert_eq!(
        diagnostics.iter().next(),
        Some(&Diagnostic::NotAnArray {
            member: "properties"
        })
    );
}

#[test]
fn test_resolution_over_parsed_catalog() {
    let catalog = sample_catalog();
    let resolver = KeyResolver::new(NameBinder::Relaxed);

    let resolution = resolver.resolve(&catalog, "app.servers[1].host").unwrap();
    assert_eq!(resolution.key().name(), "app.servers");
    assert_eq!(resolution.key_index(), Some("1"));

    let resolution = KeyResolver::new(NameBinder::Strict)
        .resolve(&catalog, "logging.level.org.example")
        .unwrap();
    assert_eq!(resolution.key().name(), "logging.level");
    assert_eq!(resolution.key_index(), Some("org.example"));
}

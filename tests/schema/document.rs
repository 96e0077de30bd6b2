//! Integration tests for SchemaDocument
//!
//! Tests building schemas from data, including JSON with the `serde` feature.

use tierset_foundation::ErrorKind;
use tierset_schema::{
    EntityPurposeDefinition, EntityTypeDocument, SchemaBuilder, SchemaDocument, SettingDefinition,
};

fn org() -> EntityTypeDocument {
    EntityTypeDocument::new("Org", "Organization").with_purpose(
        EntityPurposeDefinition::new("Profile")
            .with_setting(SettingDefinition::new("Theme", "").with_default("Light")),
    )
}

#[test]
fn document_builds_schema() {
    let schema = SchemaDocument::new()
        .with_purpose("Profile", "Profile settings")
        .with_entity_type(org())
        .build()
        .unwrap();

    assert_eq!(schema.purpose("Profile").unwrap().description, "Profile settings");
    assert!(schema.entity_type("Org").unwrap().setting("Profile", "Theme").is_some());
}

#[test]
fn document_errors_match_fluent_api() {
    let err = SchemaDocument::new().with_entity_type(org()).build().unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownPurpose { .. }));
}

#[test]
fn document_extends_existing_builder() {
    let builder = SchemaBuilder::new();
    builder.register_purpose("Profile", "").unwrap();
    SchemaDocument::new().with_entity_type(org()).apply(&builder).unwrap();

    let schema = builder.build();
    assert!(schema.entity_type("Org").is_some());
}

#[cfg(feature = "serde")]
#[test]
fn document_json_round_trip() {
    let doc = SchemaDocument::new()
        .with_purpose("Profile", "")
        .with_entity_type(org());
    let json = serde_json::to_string(&doc).unwrap();
    assert!(json.contains("\"default\":\"Light\""));

    let back: SchemaDocument = serde_json::from_str(&json).unwrap();
    assert_eq!(back, doc);
}

#[cfg(feature = "serde")]
#[test]
fn document_json_policy_names_are_trimmed() {
    let json = r#"{
        "purposes": [{ "name": "Profile" }],
        "entity_types": [
            {
                "name": "Org",
                "purposes": [{
                    "name": "Profile",
                    "settings": [{ "name": "Theme" }, { "name": "Locale" }],
                    "inheritability": { "type": "Inherit", "settings": [" Theme "] }
                }]
            },
            {
                "name": "Dept",
                "purposes": [{
                    "name": "Profile",
                    "parent": "Org",
                    "inheritance": { "type": "Inherit", "settings": [""] }
                }]
            }
        ]
    }"#;
    let doc: SchemaDocument = serde_json::from_str(json).unwrap();
    let schema = doc.build().unwrap();

    let dept = schema.entity_type("Dept").unwrap();
    assert!(dept.setting("Profile", "Theme").is_some());
    assert!(dept.setting("Profile", "Locale").is_none());
}

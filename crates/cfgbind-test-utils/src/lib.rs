//! Testing utilities for cfgbind workspace
//!
//! Shared key fixtures, a type model and sample metadata documents.

#![allow(missing_docs)]

use cfgbind_key::{ConfigKey, TypeModel, TypeRef, TypeRegistry};
use std::sync::Arc;

pub const STRING_LIST: &str = "java.util.List<java.lang.String>";
pub const STRING_MAP: &str = "java.util.Map<java.lang.String,java.lang.String>";
pub const LOG_LEVEL_ENUM: &str = "org.example.logging.LogLevel";
pub const SERVER_BEAN: &str = "org.example.app.Server";
pub const APP_PROPERTIES: &str = "org.example.app.AppProperties";

/// Metadata document exercising every access type, hints and deprecation
pub const SAMPLE_METADATA: &str = r#"{
  "groups": [{ "name": "app", "type": "org.example.app.AppProperties" }],
  "properties": [
    { "name": "server.port", "type": "java.lang.Integer", "defaultValue": 8080,
      "description": "Server HTTP port." },
    { "name": "app.display-name", "type": "java.lang.String",
      "sourceType": "org.example.app.AppProperties" },
    { "name": "app.labels", "type": "java.util.Map<java.lang.String,java.lang.String>" },
    { "name": "app.servers", "type": "java.util.List<org.example.app.Server>",
      "defaultValue": ["a", "b"] },
    { "name": "logging.level", "type": "java.util.Map<org.example.logging.LogLevel,java.lang.String>" },
    { "name": "app.old-name", "type": "java.lang.String", "deprecated": true },
    { "name": "app.legacy", "type": "java.lang.String",
      "deprecation": { "reason": "Replaced", "level": "error", "replacement": "app.display-name" } }
  ],
  "hints": [
    { "name": "server.port", "values": [{ "value": 8080, "description": "Default" }, { "value": 8443 }] },
    { "name": "app.labels.keys", "values": [{ "value": "env" }, { "value": "team" }] },
    { "name": "app.labels.values",
      "providers": [{ "name": "any" }, { "name": "handle-as", "parameters": { "target": "java.lang.String" } }] }
  ]
}"#;

/// Type model knowing the sample enum, bean and source type
pub fn sample_type_model() -> Arc<dyn TypeModel> {
    Arc::new(
        TypeRegistry::new()
            .with_enum(LOG_LEVEL_ENUM)
            .with_bean(SERVER_BEAN, ["host", "port", "maxConnections"])
            .with_type(APP_PROPERTIES),
    )
}

pub fn typed_key(name: &str, type_text: &str) -> ConfigKey {
    ConfigKey::builder(name)
        .declared_type(TypeRef::parse(type_text).unwrap())
        .type_model(sample_type_model())
        .build()
}

pub fn scalar_key(name: &str) -> ConfigKey {
    typed_key(name, "java.lang.String")
}

pub fn list_key(name: &str) -> ConfigKey {
    typed_key(name, STRING_LIST)
}

pub fn map_key(name: &str) -> ConfigKey {
    typed_key(name, STRING_MAP)
}

pub fn enum_map_key(name: &str) -> ConfigKey {
    typed_key(name, &format!("java.util.Map<{LOG_LEVEL_ENUM},java.lang.String>"))
}

pub fn server_list_key(name: &str) -> ConfigKey {
    typed_key(name, &format!("java.util.List<{SERVER_BEAN}>"))
}

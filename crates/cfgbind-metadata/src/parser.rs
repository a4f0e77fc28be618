//! Metadata document parsing
//!
//! Turns one metadata JSON document into [`ConfigKey`]s. Parsing is
//! lenient: a leading byte order mark, `//`, `#` and `/* */` comments,
//! trailing commas and anything after the first top-level value are
//! ignored. Bad entries are skipped, and a document that cannot be read at
//! all yields no keys. Every problem is recorded in
//! the returned [`Diagnostics`].

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::document::DocumentKind;
use crate::error::{MetadataError, MetadataResult};
use cfgbind_key::{
    resolve_type_alias, AccessType, ConfigKey, Declaration, Deprecation, DeprecationLevel,
    ItemHint, NoTypeModel, TypeModel, TypeRef, ValueHint, ValueProvider,
};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

const UTF8_BOM: char = '\u{feff}';

const PROPERTIES: &str = "properties";
const HINTS: &str = "hints";
const NAME: &str = "name";
const TYPE: &str = "type";
const DESCRIPTION: &str = "description";
const SOURCE_TYPE: &str = "sourceType";
const DEFAULT_VALUE: &str = "defaultValue";
const DEPRECATED: &str = "deprecated";
const DEPRECATION: &str = "deprecation";
const REASON: &str = "reason";
const LEVEL: &str = "level";
const REPLACEMENT: &str = "replacement";
const VALUES: &str = "values";
const VALUE: &str = "value";
const PROVIDERS: &str = "providers";
const PARAMETERS: &str = "parameters";

const MAP_VALUES_SUFFIX: &str = ".values";
const MAP_KEYS_SUFFIX: &str = ".keys";

/// Parsed type per distinct type text, `None` when unparseable
type TypeMemo = HashMap<String, Option<TypeRef>>;

/// Builds config keys from metadata documents of one library
///
/// # Example
///
/// ```rust
/// use cfgbind_metadata::MetadataCatalogBuilder;
///
/// let builder = MetadataCatalogBuilder::new("demo");
/// let (keys, diagnostics) = builder.parse(r#"{"properties":[{"name":"server.port"}]}"#);
/// assert_eq!(keys.len(), 1);
/// assert!(diagnostics.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct MetadataCatalogBuilder {
    library: String,
    kind: DocumentKind,
    type_model: Arc<dyn TypeModel>,
}

impl MetadataCatalogBuilder {
    /// Create builder for a library with no type knowledge
    #[must_use]
    pub fn new(library: impl Into<String>) -> Self {
        Self {
            library: library.into(),
            kind: DocumentKind::Generated,
            type_model: Arc::new(NoTypeModel),
        }
    }

    /// With document kind
    #[inline]
    #[must_use]
    pub fn with_kind(mut self, kind: DocumentKind) -> Self {
        self.kind = kind;
        self
    }

    /// With type model used for enum, bean and source type lookups
    #[inline]
    #[must_use]
    pub fn with_type_model(mut self, type_model: Arc<dyn TypeModel>) -> Self {
        self.type_model = type_model;
        self
    }

    /// Library name recorded in each key's declaration
    #[inline]
    #[must_use]
    pub fn library(&self) -> &str {
        &self.library
    }

    /// Parse a document
    ///
    /// Never fails: unreadable documents produce no keys and a diagnostic.
    #[must_use]
    pub fn parse(&self, document: &str) -> (Vec<ConfigKey>, Diagnostics) {
        // A fresh token is never cancelled
        self.parse_cancellable(document, &CancellationToken::new())
            .unwrap_or_default()
    }

    /// Parse a document, checking `cancel` between entries
    ///
    /// # Errors
    /// - `MetadataError::Cancelled` if the token is raised before the last entry
    pub fn parse_cancellable(
        &self,
        document: &str,
        cancel: &CancellationToken,
    ) -> MetadataResult<(Vec<ConfigKey>, Diagnostics)> {
        if cancel.is_cancelled() {
            return Err(MetadataError::Cancelled);
        }

        let mut diagnostics = Diagnostics::new();
        let Some(root) = self.read_root(document, &mut diagnostics) else {
            return Ok((Vec::new(), diagnostics));
        };

        let properties = match root.get(PROPERTIES) {
            None => return Ok((Vec::new(), diagnostics)),
            Some(Value::Array(properties)) => properties,
            Some(_) => {
                debug!(library = %self.library, "'properties' is not an array");
                diagnostics.push(Diagnostic::NotAnArray { member: PROPERTIES });
                return Ok((Vec::new(), diagnostics));
            }
        };

        let hints = hint_index(&root, &mut diagnostics);
        let mut types = TypeMemo::new();
        let mut keys = Vec::with_capacity(properties.len());

        for (index, entry) in properties.iter().enumerate() {
            if cancel.is_cancelled() {
                debug!(library = %self.library, index, "metadata parsing cancelled");
                return Err(MetadataError::Cancelled);
            }
            let Value::Object(entry) = entry else {
                debug!(library = %self.library, index, "skipping non-object property entry");
                diagnostics.push(Diagnostic::InvalidEntry {
                    member: PROPERTIES,
                    index,
                });
                continue;
            };
            if let Some(key) = self.build_key(entry, &hints, &mut types, &mut diagnostics) {
                keys.push(key);
            }
        }

        debug!(
            library = %self.library,
            keys = keys.len(),
            diagnostics = diagnostics.len(),
            "parsed metadata document"
        );
        Ok((keys, diagnostics))
    }

    fn read_root(&self, document: &str, diagnostics: &mut Diagnostics) -> Option<Map<String, Value>> {
        let text = strip_lenient_syntax(document.strip_prefix(UTF8_BOM).unwrap_or(document));
        let first = serde_json::Deserializer::from_str(&text)
            .into_iter::<Value>()
            .next();

        match first {
            Some(Ok(Value::Object(root))) => Some(root),
            Some(Ok(_)) => {
                info!(library = %self.library, "metadata document root is not an object");
                diagnostics.push(Diagnostic::NotAnObject);
                None
            }
            Some(Err(err)) => {
                info!(library = %self.library, error = %err, "error parsing metadata document");
                diagnostics.push(Diagnostic::MalformedDocument {
                    message: err.to_string(),
                });
                None
            }
            None => {
                info!(library = %self.library, "empty metadata document");
                diagnostics.push(Diagnostic::MalformedDocument {
                    message: "empty document".to_string(),
                });
                None
            }
        }
    }

    fn build_key(
        &self,
        entry: &Map<String, Value>,
        hints: &HashMap<String, ItemHint>,
        types: &mut TypeMemo,
        diagnostics: &mut Diagnostics,
    ) -> Option<ConfigKey> {
        let name = entry
            .get(NAME)
            .and_then(primitive_string)
            .filter(|name| !name.trim().is_empty())?;

        let declared_type = entry
            .get(TYPE)
            .and_then(primitive_string)
            .filter(|text| !text.trim().is_empty())
            .and_then(|text| declared_type(&name, &text, types, diagnostics));

        let access_type = AccessType::classify(declared_type.as_ref(), self.type_model.as_ref());
        let hint = |name: &str| hints.get(name).cloned().unwrap_or_default();
        let (value_hint, key_hint) = if access_type.is_map_group() {
            (
                hint(&format!("{name}{MAP_VALUES_SUFFIX}")),
                hint(&format!("{name}{MAP_KEYS_SUFFIX}")),
            )
        } else {
            (hint(&name), ItemHint::default())
        };

        let source_type = entry
            .get(SOURCE_TYPE)
            .and_then(primitive_string)
            .filter(|source| !source.is_empty());
        let declaration = Declaration::resolve(
            self.library.clone(),
            &name,
            source_type.as_deref(),
            self.kind == DocumentKind::Additional,
            self.type_model.as_ref(),
        );

        let mut builder = ConfigKey::builder(name)
            .deprecation(deprecation(entry))
            .value_hint(value_hint)
            .key_hint(key_hint)
            .declaration(declaration)
            .type_model(Arc::clone(&self.type_model));
        if let Some(declared_type) = declared_type {
            builder = builder.declared_type(declared_type);
        }
        if let Some(description) = entry.get(DESCRIPTION).and_then(primitive_string) {
            builder = builder.description(description);
        }
        if let Some(default_value) = entry.get(DEFAULT_VALUE).and_then(default_value) {
            builder = builder.default_value(default_value);
        }
        Some(builder.build())
    }
}

/// Drop comments and trailing commas outside string literals
fn strip_lenient_syntax(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    // Whitespace seen after a comma that may turn out to be trailing
    let mut pending: Option<String> = None;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '/' if chars.peek() == Some(&'/') => skip_line(&mut chars),
            '#' => skip_line(&mut chars),
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut last = '\0';
                for c in chars.by_ref() {
                    if last == '*' && c == '/' {
                        break;
                    }
                    last = c;
                }
            }
            c if c.is_whitespace() => match &mut pending {
                Some(gap) => gap.push(c),
                None => out.push(c),
            },
            ',' => {
                flush_comma(&mut out, &mut pending, true);
                pending = Some(String::new());
            }
            c => {
                flush_comma(&mut out, &mut pending, !matches!(c, ']' | '}'));
                out.push(c);
                if c == '"' {
                    copy_string(&mut chars, &mut out);
                }
            }
        }
    }
    flush_comma(&mut out, &mut pending, true);
    out
}

fn skip_line(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) {
    while chars.next_if(|c| *c != '\n').is_some() {}
}

/// Emit a held comma, unless it closes a container
fn flush_comma(out: &mut String, pending: &mut Option<String>, keep: bool) {
    if let Some(gap) = pending.take() {
        if keep {
            out.push(',');
        }
        out.push_str(&gap);
    }
}

/// Copy the rest of a string literal whose opening quote is already out
fn copy_string(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, out: &mut String) {
    while let Some(c) = chars.next() {
        out.push(c);
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            }
            '"' => break,
            _ => {}
        }
    }
}

fn declared_type(
    name: &str,
    text: &str,
    types: &mut TypeMemo,
    diagnostics: &mut Diagnostics,
) -> Option<TypeRef> {
    let text = resolve_type_alias(text);
    let parsed = match types.get(text) {
        Some(parsed) => parsed.clone(),
        None => {
            let parsed = TypeRef::parse(text).ok();
            types.insert(text.to_string(), parsed.clone());
            parsed
        }
    };
    if parsed.is_none() {
        debug!(key = name, type_text = text, "unparseable declared type");
        diagnostics.push(Diagnostic::UnparseableType {
            name: name.to_string(),
            type_text: text.to_string(),
        });
    }
    parsed
}

fn hint_index(root: &Map<String, Value>, diagnostics: &mut Diagnostics) -> HashMap<String, ItemHint> {
    let hints = match root.get(HINTS) {
        None => return HashMap::new(),
        Some(Value::Array(hints)) => hints,
        Some(_) => {
            diagnostics.push(Diagnostic::NotAnArray { member: HINTS });
            return HashMap::new();
        }
    };

    let mut index = HashMap::with_capacity(hints.len());
    for (position, entry) in hints.iter().enumerate() {
        let Value::Object(entry) = entry else {
            diagnostics.push(Diagnostic::InvalidEntry {
                member: HINTS,
                index: position,
            });
            continue;
        };
        if let Some(name) = entry.get(NAME).and_then(primitive_string) {
            index.insert(name, item_hint(entry));
        }
    }
    index
}

fn item_hint(entry: &Map<String, Value>) -> ItemHint {
    let values = objects(entry, VALUES)
        .filter_map(|value| {
            let text = value.get(VALUE).and_then(primitive_string)?;
            Some(ValueHint::new(
                text,
                value.get(DESCRIPTION).and_then(primitive_string),
            ))
        })
        .collect();

    let providers = objects(entry, PROVIDERS)
        .filter_map(|provider| {
            let name = provider.get(NAME).and_then(primitive_string)?;
            let parameters: IndexMap<String, String> = provider
                .get(PARAMETERS)
                .and_then(Value::as_object)
                .map(|parameters| {
                    parameters
                        .iter()
                        .filter_map(|(k, v)| primitive_string(v).map(|v| (k.clone(), v)))
                        .collect()
                })
                .unwrap_or_default();
            Some(ValueProvider::new(name, parameters))
        })
        .collect();

    ItemHint::new(values, providers)
}

/// Object elements of an array member, anything else ignored
fn objects<'a>(
    entry: &'a Map<String, Value>,
    member: &str,
) -> impl Iterator<Item = &'a Map<String, Value>> + 'a {
    entry
        .get(member)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

fn deprecation(entry: &Map<String, Value>) -> Deprecation {
    if let Some(Value::Object(deprecation)) = entry.get(DEPRECATION) {
        return Deprecation::Deprecated {
            reason: deprecation.get(REASON).and_then(primitive_string),
            level: deprecation
                .get(LEVEL)
                .and_then(primitive_string)
                .map(|level| DeprecationLevel::parse_lenient(&level))
                .unwrap_or_default(),
            replacement: deprecation.get(REPLACEMENT).and_then(primitive_string),
        };
    }
    match entry.get(DEPRECATED) {
        Some(Value::Bool(true)) => Deprecation::DeprecatedWithoutReason,
        Some(Value::String(flag)) if flag.eq_ignore_ascii_case("true") => {
            Deprecation::DeprecatedWithoutReason
        }
        _ => Deprecation::NotDeprecated,
    }
}

/// Render `defaultValue`: primitives as text, arrays of primitives joined
fn default_value(value: &Value) -> Option<String> {
    match value {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(primitive_string)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        other => primitive_string(other),
    }
}

fn primitive_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

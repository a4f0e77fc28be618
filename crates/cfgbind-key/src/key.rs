//! ConfigKey - immutable descriptor of a declared configuration key
//!
//! Keys are produced by the metadata catalog builder and shared read-only
//! between resolvers. Rebuilding a catalog creates new keys; nothing here
//! is mutated after [`ConfigKeyBuilder::build`].

use crate::relaxed::{dashed_to_camel_case, separated_to_camel_case};
use crate::types::{AccessType, NoTypeModel, TypeModel, TypeRef};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Declared configuration key
///
/// # Structure
/// - `name`: dotted key exactly as declared (`server.compression.enabled`)
/// - `declared_type`: parsed type, absent when unknown or unparseable
/// - `access_type`: derived from `declared_type` at build time
/// - `value_hint` / `key_hint`: completion hints (key hint only for maps)
/// - `declaration`: where the key was declared
#[derive(Clone)]
pub struct ConfigKey {
    name: String,
    description: Option<String>,
    declared_type: Option<TypeRef>,
    access_type: AccessType,
    default_value: Option<String>,
    deprecation: Deprecation,
    value_hint: ItemHint,
    key_hint: ItemHint,
    declaration: Declaration,
    type_model: Arc<dyn TypeModel>,
}

impl ConfigKey {
    /// Start building a key with the given name
    #[inline]
    #[must_use]
    pub fn builder(name: impl Into<String>) -> ConfigKeyBuilder {
        ConfigKeyBuilder::new(name)
    }

    /// Dotted key name as declared
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Free-text description
    #[inline]
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Declared type
    #[inline]
    #[must_use]
    pub fn declared_type(&self) -> Option<&TypeRef> {
        self.declared_type.as_ref()
    }

    /// Access type derived from the declared type
    #[inline]
    #[must_use]
    pub fn access_type(&self) -> AccessType {
        self.access_type
    }

    /// Rendered default value
    #[inline]
    #[must_use]
    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    /// Deprecation state
    #[inline]
    #[must_use]
    pub fn deprecation(&self) -> &Deprecation {
        &self.deprecation
    }

    /// Hints for values
    #[inline]
    #[must_use]
    pub fn value_hint(&self) -> &ItemHint {
        &self.value_hint
    }

    /// Hints for map keys
    #[inline]
    #[must_use]
    pub fn key_hint(&self) -> &ItemHint {
        &self.key_hint
    }

    /// Declaration provenance
    #[inline]
    #[must_use]
    pub fn declaration(&self) -> &Declaration {
        &self.declaration
    }

    /// Type model used for classification and bean properties
    #[inline]
    #[must_use]
    pub fn type_model(&self) -> &dyn TypeModel {
        self.type_model.as_ref()
    }

    /// Type of one value addressed through this key
    ///
    /// The element type for lists, the value type for maps, the declared
    /// type otherwise.
    #[must_use]
    pub fn effective_value_type(&self) -> Option<TypeRef> {
        self.declared_type
            .as_ref()
            .and_then(|ty| self.access_type.effective_value_type(ty))
    }

    /// Resolve a bean property of the effective value type
    ///
    /// Accepts the property name as written or in its separated form
    /// (`max-size` for `maxSize`). Returns the declared property name.
    #[must_use]
    pub fn resolve_property(&self, property: &str) -> Option<String> {
        if property.is_empty() {
            return None;
        }
        let value_type = self.effective_value_type()?;
        let properties = self.type_model.bean_properties(value_type.name())?;
        let camel = separated_to_camel_case(property, false);
        properties
            .iter()
            .find(|candidate| candidate.as_str() == property || **candidate == camel)
            .cloned()
    }
}

impl fmt::Debug for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigKey")
            .field("name", &self.name)
            .field("declared_type", &self.declared_type)
            .field("access_type", &self.access_type)
            .field("default_value", &self.default_value)
            .field("deprecation", &self.deprecation)
            .field("declaration", &self.declaration)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ConfigKey`]
#[derive(Clone)]
pub struct ConfigKeyBuilder {
    name: String,
    description: Option<String>,
    declared_type: Option<TypeRef>,
    default_value: Option<String>,
    deprecation: Deprecation,
    value_hint: ItemHint,
    key_hint: ItemHint,
    declaration: Option<Declaration>,
    type_model: Arc<dyn TypeModel>,
}

impl ConfigKeyBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            declared_type: None,
            default_value: None,
            deprecation: Deprecation::NotDeprecated,
            value_hint: ItemHint::default(),
            key_hint: ItemHint::default(),
            declaration: None,
            type_model: Arc::new(NoTypeModel),
        }
    }

    /// Set description
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set declared type
    #[must_use]
    pub fn declared_type(mut self, declared_type: TypeRef) -> Self {
        self.declared_type = Some(declared_type);
        self
    }

    /// Set rendered default value
    #[must_use]
    pub fn default_value(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    /// Set deprecation
    #[must_use]
    pub fn deprecation(mut self, deprecation: Deprecation) -> Self {
        self.deprecation = deprecation;
        self
    }

    /// Set value hint
    #[must_use]
    pub fn value_hint(mut self, hint: ItemHint) -> Self {
        self.value_hint = hint;
        self
    }

    /// Set key hint
    #[must_use]
    pub fn key_hint(mut self, hint: ItemHint) -> Self {
        self.key_hint = hint;
        self
    }

    /// Set declaration provenance
    #[must_use]
    pub fn declaration(mut self, declaration: Declaration) -> Self {
        self.declaration = Some(declaration);
        self
    }

    /// Set type model
    #[must_use]
    pub fn type_model(mut self, model: Arc<dyn TypeModel>) -> Self {
        self.type_model = model;
        self
    }

    /// Build the key, classifying its access type
    #[must_use]
    pub fn build(self) -> ConfigKey {
        let access_type = AccessType::classify(self.declared_type.as_ref(), self.type_model.as_ref());
        let declaration = self
            .declaration
            .unwrap_or_else(|| Declaration::unresolved(String::new(), None));
        ConfigKey {
            name: self.name,
            description: self.description,
            declared_type: self.declared_type,
            access_type,
            default_value: self.default_value,
            deprecation: self.deprecation,
            value_hint: self.value_hint,
            key_hint: self.key_hint,
            declaration,
            type_model: self.type_model,
        }
    }
}

/// Deprecation state of a key
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Deprecation {
    /// Not deprecated
    #[default]
    NotDeprecated,
    /// `deprecated: true` without further details
    DeprecatedWithoutReason,
    /// Structured deprecation
    Deprecated {
        /// Why the key is deprecated
        reason: Option<String>,
        /// Severity
        level: DeprecationLevel,
        /// Key to use instead
        replacement: Option<String>,
    },
}

impl Deprecation {
    /// Whether the key is deprecated in any form
    #[inline]
    #[must_use]
    pub fn is_deprecated(&self) -> bool {
        !matches!(self, Self::NotDeprecated)
    }

    /// Severity, `None` when not deprecated
    #[must_use]
    pub fn level(&self) -> Option<DeprecationLevel> {
        match self {
            Self::NotDeprecated => None,
            Self::DeprecatedWithoutReason => Some(DeprecationLevel::Warning),
            Self::Deprecated { level, .. } => Some(*level),
        }
    }
}

/// Deprecation severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeprecationLevel {
    /// Key still works
    #[default]
    Warning,
    /// Key no longer has any effect
    Error,
}

impl DeprecationLevel {
    /// Parse a metadata `level` value, falling back to `Warning`
    #[must_use]
    pub fn parse_lenient(text: &str) -> Self {
        if text.eq_ignore_ascii_case("error") {
            Self::Error
        } else {
            Self::Warning
        }
    }

    /// Lowercase name as written in metadata
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// Completion hint: literal values plus named providers
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemHint {
    values: Vec<ValueHint>,
    providers: Vec<ValueProvider>,
}

impl ItemHint {
    /// Create hint
    #[inline]
    #[must_use]
    pub fn new(values: Vec<ValueHint>, providers: Vec<ValueProvider>) -> Self {
        Self { values, providers }
    }

    /// Literal values in document order
    #[inline]
    #[must_use]
    pub fn values(&self) -> &[ValueHint] {
        &self.values
    }

    /// Value providers in document order
    #[inline]
    #[must_use]
    pub fn providers(&self) -> &[ValueProvider] {
        &self.providers
    }

    /// Provider by name
    #[must_use]
    pub fn provider(&self, name: &str) -> Option<&ValueProvider> {
        self.providers.iter().find(|p| p.name == name)
    }

    /// No values and no providers
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.providers.is_empty()
    }
}

/// Literal value suggestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueHint {
    value: String,
    description: Option<String>,
}

impl ValueHint {
    /// Create value hint
    #[inline]
    #[must_use]
    pub fn new(value: impl Into<String>, description: Option<String>) -> Self {
        Self {
            value: value.into(),
            description,
        }
    }

    /// Suggested value
    #[inline]
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Description of the value
    #[inline]
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Named value provider with its parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueProvider {
    name: String,
    parameters: IndexMap<String, String>,
}

impl ValueProvider {
    /// Create provider
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, parameters: IndexMap<String, String>) -> Self {
        Self {
            name: name.into(),
            parameters,
        }
    }

    /// Provider id (`class-reference`, `handle-as`, ...)
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameters in document order
    #[inline]
    #[must_use]
    pub fn parameters(&self) -> &IndexMap<String, String> {
        &self.parameters
    }

    /// Single parameter
    #[inline]
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }
}

/// How the declaration of a key was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationResolveResult {
    /// Source type is known; navigation lands on its property
    Property,
    /// No source type; navigation lands on the metadata entry
    Json,
    /// Source type given but not known to the type model
    JsonUnresolvedSourceType,
    /// Declared in hand-written additional metadata
    AdditionalJson,
}

/// Where a key was declared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    library: String,
    source_type: Option<String>,
    result: DeclarationResolveResult,
    navigation_property: Option<String>,
}

impl Declaration {
    /// Resolve provenance for a key
    ///
    /// # Arguments
    /// - `library`: library or module that shipped the metadata
    /// - `key_name`: declared key name
    /// - `source_type`: `sourceType` from metadata
    /// - `additional`: whether the metadata is hand-written
    /// - `model`: decides whether `source_type` is known
    #[must_use]
    pub fn resolve(
        library: impl Into<String>,
        key_name: &str,
        source_type: Option<&str>,
        additional: bool,
        model: &dyn TypeModel,
    ) -> Self {
        let library = library.into();
        match source_type {
            Some(source) if model.contains_type(source) => {
                let last = key_name.rsplit('.').next().unwrap_or(key_name);
                Self {
                    library,
                    source_type: Some(source.to_string()),
                    result: DeclarationResolveResult::Property,
                    navigation_property: Some(dashed_to_camel_case(last)),
                }
            }
            Some(source) => Self {
                library,
                source_type: Some(source.to_string()),
                result: DeclarationResolveResult::JsonUnresolvedSourceType,
                navigation_property: None,
            },
            None if additional => Self {
                library,
                source_type: None,
                result: DeclarationResolveResult::AdditionalJson,
                navigation_property: None,
            },
            None => Self::unresolved(library, None),
        }
    }

    fn unresolved(library: String, source_type: Option<String>) -> Self {
        Self {
            library,
            source_type,
            result: DeclarationResolveResult::Json,
            navigation_property: None,
        }
    }

    /// Library or module name
    #[inline]
    #[must_use]
    pub fn library(&self) -> &str {
        &self.library
    }

    /// Declared source type
    #[inline]
    #[must_use]
    pub fn source_type(&self) -> Option<&str> {
        self.source_type.as_deref()
    }

    /// Resolution outcome
    #[inline]
    #[must_use]
    pub fn result(&self) -> DeclarationResolveResult {
        self.result
    }

    /// Property on the source type that declares the key
    #[inline]
    #[must_use]
    pub fn navigation_property(&self) -> Option<&str> {
        self.navigation_property.as_deref()
    }
}

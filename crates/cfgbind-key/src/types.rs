//! Declared value types and access-type classification
//!
//! Metadata documents declare types as Java-style text such as
//! `java.util.Map<java.lang.String,java.util.List<java.lang.Integer>>`.
//! [`TypeRef`] is the parsed form and [`AccessType`] classifies how a key
//! with that type is addressed from a property file.

use std::collections::{HashMap, HashSet};
use std::fmt::{self, Display, Formatter};

/// Literal type that metadata uses for free-form string maps
pub const PROPERTIES_TYPE: &str = "java.util.Properties";

/// Type text that [`PROPERTIES_TYPE`] is rewritten to before classification
pub const STRING_MAP_TYPE: &str = "java.util.Map<java.lang.String,java.lang.String>";

const OBJECT_TYPE: &str = "java.lang.Object";

const INDEXED_TYPES: &[&str] = &[
    "java.lang.Iterable",
    "java.util.Collection",
    "java.util.List",
    "java.util.Set",
    "java.util.ArrayList",
    "java.util.LinkedList",
    "java.util.HashSet",
    "java.util.LinkedHashSet",
    "java.util.SortedSet",
    "java.util.NavigableSet",
    "java.util.TreeSet",
    "java.util.Queue",
    "java.util.Deque",
];

const MAP_TYPES: &[&str] = &[
    "java.util.Map",
    "java.util.HashMap",
    "java.util.LinkedHashMap",
    "java.util.TreeMap",
    "java.util.SortedMap",
    "java.util.NavigableMap",
    "java.util.EnumMap",
    "java.util.Properties",
    "java.util.concurrent.ConcurrentMap",
    "java.util.concurrent.ConcurrentHashMap",
];

/// Rewrite type aliases that need a generic form before classification
#[inline]
#[must_use]
pub fn resolve_type_alias(type_text: &str) -> &str {
    if type_text == PROPERTIES_TYPE {
        STRING_MAP_TYPE
    } else {
        type_text
    }
}

/// Parsed declared type
///
/// # Structure
/// - `name`: qualified raw name, `$` normalized to `.`
/// - `args`: generic type arguments
/// - `array_dims`: number of trailing `[]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    name: String,
    args: Vec<TypeRef>,
    array_dims: usize,
}

impl TypeRef {
    /// Create a plain (non-generic, non-array) type
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            array_dims: 0,
        }
    }

    /// Create a generic type
    #[inline]
    #[must_use]
    pub fn generic(name: impl Into<String>, args: Vec<TypeRef>) -> Self {
        Self {
            name: name.into(),
            args,
            array_dims: 0,
        }
    }

    /// Wrap this type in one more array dimension
    #[inline]
    #[must_use]
    pub fn array_of(mut self) -> Self {
        self.array_dims += 1;
        self
    }

    /// Parse type text
    ///
    /// # Errors
    /// Returns error for empty text, malformed generics or trailing input
    pub fn parse(text: &str) -> Result<Self, TypeParseError> {
        if text.trim().is_empty() {
            return Err(TypeParseError::Empty);
        }
        let mut parser = TypeParser { text, pos: 0 };
        let parsed = parser.parse_type()?;
        parser.skip_ws();
        match parser.peek() {
            None => Ok(parsed),
            Some(found) => Err(TypeParseError::UnexpectedChar {
                offset: parser.pos,
                found,
            }),
        }
    }

    /// Qualified raw name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Generic arguments
    #[inline]
    #[must_use]
    pub fn args(&self) -> &[TypeRef] {
        &self.args
    }

    /// Number of array dimensions
    #[inline]
    #[must_use]
    pub fn array_dims(&self) -> usize {
        self.array_dims
    }

    /// Whether this is an array type
    #[inline]
    #[must_use]
    pub fn is_array(&self) -> bool {
        self.array_dims > 0
    }

    /// Element type of an array or single-argument collection
    #[must_use]
    pub fn element_type(&self) -> Option<TypeRef> {
        if self.is_array() {
            return Some(Self {
                name: self.name.clone(),
                args: self.args.clone(),
                array_dims: self.array_dims - 1,
            });
        }
        self.args.first().cloned()
    }

    /// Key type of a map (first argument)
    #[inline]
    #[must_use]
    pub fn map_key_type(&self) -> Option<&TypeRef> {
        if self.is_array() {
            return None;
        }
        self.args.first()
    }

    /// Value type of a map (second argument)
    #[inline]
    #[must_use]
    pub fn map_value_type(&self) -> Option<&TypeRef> {
        if self.is_array() {
            return None;
        }
        self.args.get(1)
    }
}

impl Display for TypeRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.args.is_empty() {
            write!(f, "<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{arg}")?;
            }
            write!(f, ">")?;
        }
        for _ in 0..self.array_dims {
            write!(f, "[]")?;
        }
        Ok(())
    }
}

/// Errors from parsing type text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeParseError {
    /// Nothing to parse
    #[error("empty type text")]
    Empty,

    /// Character not allowed at this position
    #[error("unexpected character '{found}' at offset {offset}")]
    UnexpectedChar {
        /// Byte offset of the character
        offset: usize,
        /// The offending character
        found: char,
    },

    /// Text ended inside a generic argument list or array suffix
    #[error("unexpected end of type text")]
    UnexpectedEnd,

    /// Qualified name is malformed (`java..util`, trailing dot, leading digit)
    #[error("invalid type name: {0}")]
    InvalidName(String),
}

struct TypeParser<'a> {
    text: &'a str,
    pos: usize,
}

impl TypeParser<'_> {
    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        let rest = &self.text[self.pos..];
        let follows_ws = rest
            .strip_prefix(keyword)
            .and_then(|after| after.chars().next())
            .is_some_and(char::is_whitespace);
        if follows_ws {
            self.pos += keyword.len();
        }
        follows_ws
    }

    fn unexpected(&self) -> TypeParseError {
        match self.peek() {
            Some(found) => TypeParseError::UnexpectedChar {
                offset: self.pos,
                found,
            },
            None => TypeParseError::UnexpectedEnd,
        }
    }

    fn parse_type(&mut self) -> Result<TypeRef, TypeParseError> {
        self.skip_ws();
        if self.eat('?') {
            self.skip_ws();
            if self.eat_keyword("extends") {
                return self.parse_type();
            }
            if self.eat_keyword("super") {
                self.parse_type()?;
            }
            return Ok(TypeRef::new(OBJECT_TYPE));
        }

        let name = self.parse_name()?;
        let mut args = Vec::new();
        self.skip_ws();
        if self.eat('<') {
            loop {
                args.push(self.parse_type()?);
                self.skip_ws();
                if self.eat(',') {
                    continue;
                }
                if self.eat('>') {
                    break;
                }
                return Err(self.unexpected());
            }
        }

        let mut array_dims = 0;
        loop {
            self.skip_ws();
            if !self.eat('[') {
                break;
            }
            self.skip_ws();
            if !self.eat(']') {
                return Err(self.unexpected());
            }
            array_dims += 1;
        }

        Ok(TypeRef {
            name,
            args,
            array_dims,
        })
    }

    fn parse_name(&mut self) -> Result<String, TypeParseError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || c == '$' || c == '.' {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        let raw = &self.text[start..self.pos];
        if raw.is_empty() {
            return Err(self.unexpected());
        }
        let name = raw.replace('$', ".");
        let valid = name.split('.').all(|part| {
            part.chars()
                .next()
                .is_some_and(|first| !first.is_ascii_digit())
        });
        if valid {
            Ok(name)
        } else {
            Err(TypeParseError::InvalidName(raw.to_string()))
        }
    }
}

/// How a key's value space is addressed from a property file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AccessType {
    /// Scalar value: `server.port=8080`
    #[default]
    Normal,
    /// String-keyed map: `app.labels.env=prod`
    Map,
    /// Enum-keyed map: `logging.level.ROOT=info`
    EnumMap,
    /// List or array: `app.servers[0]=a`
    Indexed,
}

impl AccessType {
    /// Classify a declared type
    ///
    /// Unknown or absent types are [`AccessType::Normal`]. A map becomes
    /// [`AccessType::EnumMap`] when the type model reports its key type as
    /// an enumeration.
    #[must_use]
    pub fn classify(declared_type: Option<&TypeRef>, model: &dyn TypeModel) -> Self {
        let Some(ty) = declared_type else {
            return Self::Normal;
        };
        if ty.is_array() || INDEXED_TYPES.contains(&ty.name()) {
            return Self::Indexed;
        }
        if MAP_TYPES.contains(&ty.name()) {
            let enum_keyed = ty.name() == "java.util.EnumMap"
                || ty.map_key_type().is_some_and(|k| model.is_enum(k.name()));
            return if enum_keyed { Self::EnumMap } else { Self::Map };
        }
        Self::Normal
    }

    /// `Map` or `EnumMap`
    #[inline]
    #[must_use]
    pub const fn is_map_group(self) -> bool {
        matches!(self, Self::Map | Self::EnumMap)
    }

    /// Type of a single value addressed through this access type
    #[must_use]
    pub fn effective_value_type(self, declared: &TypeRef) -> Option<TypeRef> {
        match self {
            Self::Normal => Some(declared.clone()),
            Self::Indexed => declared.element_type(),
            Self::Map | Self::EnumMap => declared.map_value_type().cloned(),
        }
    }

    /// Lowercase name used in diagnostics and CLI output
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Map => "map",
            Self::EnumMap => "enum-map",
            Self::Indexed => "indexed",
        }
    }
}

impl Display for AccessType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Knowledge about declared types supplied by the host
///
/// The engine has no type system of its own. Enum detection refines map
/// classification, known types drive declaration provenance, and bean
/// properties let key paths name a property of a map value or list element.
pub trait TypeModel: Send + Sync + fmt::Debug {
    /// Whether `type_name` is an enumeration
    fn is_enum(&self, _type_name: &str) -> bool {
        false
    }

    /// Whether `type_name` resolves to a known type
    fn contains_type(&self, _type_name: &str) -> bool {
        false
    }

    /// Bindable properties of a bean type, `None` when not a known bean
    fn bean_properties(&self, _type_name: &str) -> Option<&[String]> {
        None
    }
}

/// Type model that knows nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTypeModel;

impl TypeModel for NoTypeModel {}

/// In-memory type model populated by the host
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    enums: HashSet<String>,
    beans: HashMap<String, Vec<String>>,
    known: HashSet<String>,
}

impl TypeRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an enumeration type
    #[must_use]
    pub fn with_enum(mut self, type_name: impl Into<String>) -> Self {
        self.enums.insert(type_name.into());
        self
    }

    /// Register a bean type and its bindable property names
    #[must_use]
    pub fn with_bean<I, S>(mut self, type_name: impl Into<String>, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.beans.insert(
            type_name.into(),
            properties.into_iter().map(Into::into).collect(),
        );
        self
    }

    /// Register a plain known type
    #[must_use]
    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.known.insert(type_name.into());
        self
    }
}

impl TypeModel for TypeRegistry {
    fn is_enum(&self, type_name: &str) -> bool {
        self.enums.contains(type_name)
    }

    fn contains_type(&self, type_name: &str) -> bool {
        self.known.contains(type_name)
            || self.enums.contains(type_name)
            || self.beans.contains_key(type_name)
    }

    fn bean_properties(&self, type_name: &str) -> Option<&[String]> {
        self.beans.get(type_name).map(Vec::as_slice)
    }
}

//! cfgbind Key Model
//!
//! Immutable descriptors for configuration keys declared in metadata
//! documents, plus the text-level tools used to match raw property keys
//! against them.
//!
//! # Core Concepts
//!
//! - [`ConfigKey`]: declared key with type, access type, default, deprecation and hints
//! - [`AccessType`]: scalar, indexed, map or enum-keyed map access
//! - [`TypeRef`]: parsed declared type (`java.util.Map<java.lang.String,java.lang.String>`)
//! - [`ConfigKeyParts`]: a raw key split into key portion, index and bean property
//! - [`IndexAccessScanner`]: single-pass scanner over `[index]` groups
//! - [`RelaxedNames`]: camelCase / kebab-case / UPPER_SNAKE variants of a name
//!
//! # Example
//!
//! ```rust
//! use cfgbind_key::{AccessType, ConfigKey, ConfigKeyParts, TypeRef};
//!
//! let key = ConfigKey::builder("app.servers")
//!     .declared_type(TypeRef::parse("java.util.List<java.lang.String>").unwrap())
//!     .build();
//! assert_eq!(key.access_type(), AccessType::Indexed);
//!
//! let parts = ConfigKeyParts::split(&key, "app.servers[2]", false).unwrap();
//! assert_eq!(parts.key_index(), Some("2"));
//! ```

#![warn(unreachable_pub)]

// Core modules
mod catalog;
mod index_access;
mod key;
mod parts;
mod path;
mod relaxed;
mod types;

pub mod text;

// Re-exports
pub use catalog::Catalog;
pub use index_access::{
    IndexAccessEvent, IndexAccessEvents, IndexAccessScanner, IndexAccessVisitor, TextRange,
};
pub use key::{
    ConfigKey, ConfigKeyBuilder, Declaration, DeclarationResolveResult, Deprecation,
    DeprecationLevel, ItemHint, ValueHint, ValueProvider,
};
pub use parts::ConfigKeyParts;
pub use path::SegmentBoundary;
pub use relaxed::{dashed_to_camel_case, separated_to_camel_case, RelaxedNames};
pub use types::{
    resolve_type_alias, AccessType, NoTypeModel, TypeModel, TypeParseError, TypeRef, TypeRegistry,
    PROPERTIES_TYPE, STRING_MAP_TYPE,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

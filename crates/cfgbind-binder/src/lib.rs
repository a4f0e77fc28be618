//! cfgbind Name Binding
//!
//! Decides whether a raw key from a property file denotes a declared
//! configuration key, under one of two naming conventions.
//!
//! # Overview
//!
//! - **Strict**: lower-cased, punctuation-insensitive, structure-preserving
//!   (`spring.datasource.url` ≡ `spring.data-source.URL`)
//! - **Relaxed**: camelCase / kebab-case / UPPER_SNAKE renderings of the
//!   last segment are equivalent (`app.displayName` ≡ `APP_DISPLAY_NAME`)
//! - [`KeyResolver`]: first-match resolution over a [`cfgbind_key::Catalog`]
//!
//! # Example
//!
//! ```rust
//! use cfgbind_binder::{ConfigKeyNameBinder, NameBinder};
//! use cfgbind_key::ConfigKey;
//!
//! let key = ConfigKey::builder("app.displayName").build();
//! assert!(NameBinder::Relaxed.binds_to(&key, "app.display-name"));
//! assert!(NameBinder::Relaxed.binds_to(&key, "APP_DISPLAY_NAME"));
//! ```

pub mod binder;
pub mod relaxed;
pub mod resolver;
pub mod strict;

// Re-exports
pub use binder::{ConfigKeyNameBinder, NameBinder, ParseBinderError};
pub use relaxed::RelaxedBinder;
pub use resolver::{KeyResolver, Resolution};
pub use strict::{canonicalize, StrictBinder};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

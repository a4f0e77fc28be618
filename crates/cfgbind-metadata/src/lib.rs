//! cfgbind Metadata
//!
//! The boundary between metadata documents on disk and the in-memory key
//! catalog.
//!
//! # Core Operations
//!
//! - **Parse**: [`MetadataCatalogBuilder`] turns one JSON document into keys
//! - **Cache**: [`CatalogCache`] keeps one catalog per document, stamped
//!   with the document's content hash
//! - **Load**: [`CatalogLoader`] reads documents, honours cancellation and
//!   concatenates catalogs
//!
//! # Architecture
//!
//! ```text
//! File System → CatalogLoader → ContentHash ─┬─ hit ──→ Arc<Catalog>
//!                                            └─ miss → MetadataCatalogBuilder → CatalogCache
//! ```
//!
//! # Example
//!
//! ```rust
//! use cfgbind_metadata::{CatalogLoader, DocumentSource, EngineConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), cfgbind_metadata::MetadataError> {
//! let loader = CatalogLoader::new(EngineConfig::default());
//! let source = DocumentSource::inline(
//!     "demo",
//!     r#"{"properties":[{"name":"app.labels","type":"java.util.Properties"}]}"#,
//! );
//! let catalog = loader.load_all(&[source], &CancellationToken::new()).await?;
//!
//! let resolution = loader.resolver().resolve(&catalog, "app.labels.env").unwrap();
//! assert_eq!(resolution.key_index(), Some("env"));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod cache;
pub mod config;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod hash;
pub mod loader;
pub mod parser;

// Re-exports for convenience
pub use cache::{CachedCatalog, CatalogCache};
pub use config::EngineConfig;
pub use diagnostics::{Diagnostic, Diagnostics};
pub use document::{DocumentId, DocumentKind, DocumentLocation, DocumentSource};
pub use error::{MetadataError, MetadataResult};
pub use hash::ContentHash;
pub use loader::{CatalogLoader, LoadedDocument};
pub use parser::MetadataCatalogBuilder;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

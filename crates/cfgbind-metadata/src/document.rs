//! Metadata document identity and location

use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// File name prefix of hand-written metadata documents
pub const ADDITIONAL_METADATA_PREFIX: &str = "additional-";

/// Stable identity of a metadata document, used as the cache key
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(Arc<str>);

impl DocumentId {
    /// Create id
    #[inline]
    #[must_use]
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    /// Id text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for DocumentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Origin of a metadata document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DocumentKind {
    /// Generated metadata shipped with a library or module
    #[default]
    Generated,
    /// Hand-written additional metadata
    Additional,
}

/// Where the document text comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentLocation {
    /// File on disk
    Path(PathBuf),
    /// Text already in memory
    Inline(Arc<str>),
}

/// A metadata document to load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSource {
    id: DocumentId,
    library: String,
    kind: DocumentKind,
    location: DocumentLocation,
}

impl DocumentSource {
    /// Document stored in a file
    ///
    /// The path doubles as id and library name. Files named
    /// `additional-*.json` are treated as hand-written metadata.
    #[must_use]
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let kind = match path.file_name().and_then(|name| name.to_str()) {
            Some(name) if name.starts_with(ADDITIONAL_METADATA_PREFIX) => DocumentKind::Additional,
            _ => DocumentKind::Generated,
        };
        let display = path.display().to_string();
        Self {
            id: DocumentId::new(&display),
            library: display,
            kind,
            location: DocumentLocation::Path(path.to_path_buf()),
        }
    }

    /// Document held in memory
    #[must_use]
    pub fn inline(id: impl AsRef<str>, text: impl Into<Arc<str>>) -> Self {
        let id = DocumentId::new(id);
        Self {
            library: id.to_string(),
            id,
            kind: DocumentKind::Generated,
            location: DocumentLocation::Inline(text.into()),
        }
    }

    /// With library or module name
    #[inline]
    #[must_use]
    pub fn with_library(mut self, library: impl Into<String>) -> Self {
        self.library = library.into();
        self
    }

    /// With document kind
    #[inline]
    #[must_use]
    pub fn with_kind(mut self, kind: DocumentKind) -> Self {
        self.kind = kind;
        self
    }

    /// Cache identity
    #[inline]
    #[must_use]
    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    /// Library or module name
    #[inline]
    #[must_use]
    pub fn library(&self) -> &str {
        &self.library
    }

    /// Document kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// Text location
    #[inline]
    #[must_use]
    pub fn location(&self) -> &DocumentLocation {
        &self.location
    }
}

//! Problems found while parsing a metadata document
//!
//! Nothing here aborts a catalog build. A malformed document yields no
//! keys and one diagnostic; a bad entry is skipped with a diagnostic.

use std::fmt::{self, Display, Formatter};

/// One parse problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Document is not valid JSON
    MalformedDocument {
        /// Parser message
        message: String,
    },
    /// Top-level value is not an object
    NotAnObject,
    /// `properties` or `hints` is present but not an array
    NotAnArray {
        /// Member name
        member: &'static str,
    },
    /// A `properties` or `hints` element is not an object
    InvalidEntry {
        /// Member name
        member: &'static str,
        /// Position in the array
        index: usize,
    },
    /// Declared type text could not be parsed; the key has no type
    UnparseableType {
        /// Key name
        name: String,
        /// Offending type text
        type_text: String,
    },
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedDocument { message } => write!(f, "malformed metadata document: {message}"),
            Self::NotAnObject => write!(f, "metadata document root is not an object"),
            Self::NotAnArray { member } => write!(f, "'{member}' is not an array"),
            Self::InvalidEntry { member, index } => {
                write!(f, "'{member}[{index}]' is not an object")
            }
            Self::UnparseableType { name, type_text } => {
                write!(f, "unparseable type '{type_text}' for key '{name}'")
            }
        }
    }
}

/// Diagnostics of one document, in discovery order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    /// Create empty list
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic
    #[inline]
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.0.push(diagnostic);
    }

    /// Iterator over diagnostics
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }

    /// Number of diagnostics
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the whole document was rejected
    #[must_use]
    pub fn is_document_rejected(&self) -> bool {
        self.0
            .iter()
            .any(|d| matches!(d, Diagnostic::MalformedDocument { .. } | Diagnostic::NotAnObject))
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

//! Index access scanning
//!
//! Walks a raw key once, left to right, and reports every `[index]` group.
//! Syntax problems are events, not errors; callers such as inspections
//! decide what to surface.

use crate::key::ConfigKey;
use crate::types::AccessType;
use std::iter::FusedIterator;
use std::ops::Range;

/// Byte range within the scanned text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextRange {
    /// Inclusive start offset
    pub start: usize,
    /// Exclusive end offset
    pub end: usize,
}

impl TextRange {
    /// Create range
    #[inline]
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length in bytes
    #[inline]
    #[must_use]
    pub const fn len(self) -> usize {
        self.end - self.start
    }

    /// Check if empty
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Text covered by this range
    #[inline]
    #[must_use]
    pub fn slice(self, text: &str) -> &str {
        &text[self.start..self.end]
    }
}

impl From<TextRange> for Range<usize> {
    fn from(range: TextRange) -> Self {
        range.start..range.end
    }
}

/// Event reported while scanning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexAccessEvent {
    /// `[` at this offset
    Bracket(usize),
    /// Text between `[` and the matching `]`
    IndexValue(TextRange),
    /// `[` at this offset is never closed
    MissingClosingBracket(usize),
    /// `[]` with the value expected at this offset
    MissingIndexValue(usize),
    /// Index of a list or array key is not a non-negative integer
    IndexValueNotInteger(TextRange),
}

impl IndexAccessEvent {
    /// Forward this event to the matching visitor callback
    pub fn dispatch<V: IndexAccessVisitor + ?Sized>(self, visitor: &mut V) {
        match self {
            Self::Bracket(at) => visitor.on_bracket(at),
            Self::IndexValue(range) => visitor.on_index_value(range),
            Self::MissingClosingBracket(at) => visitor.on_missing_closing_bracket(at),
            Self::MissingIndexValue(at) => visitor.on_missing_index_value(at),
            Self::IndexValueNotInteger(range) => visitor.on_index_value_not_integer(range),
        }
    }
}

/// Callback form of the scan events
///
/// Every method defaults to doing nothing.
pub trait IndexAccessVisitor {
    /// `[` found
    fn on_bracket(&mut self, _at: usize) {}

    /// Index text found
    fn on_index_value(&mut self, _range: TextRange) {}

    /// `[` never closed
    fn on_missing_closing_bracket(&mut self, _at: usize) {}

    /// `[]` found
    fn on_missing_index_value(&mut self, _at: usize) {}

    /// Non-integer index on a list or array key
    fn on_index_value_not_integer(&mut self, _range: TextRange) {}
}

/// Scanner over the bracket groups of a raw key
///
/// # Example
/// ```rust
/// use cfgbind_key::{ConfigKey, IndexAccessEvent, IndexAccessScanner, TypeRef};
///
/// let key = ConfigKey::builder("app.matrix")
///     .declared_type(TypeRef::parse("java.lang.Integer[][]").unwrap())
///     .build();
/// let scanner = IndexAccessScanner::new("app.matrix[1][x]", &key);
/// let events: Vec<_> = scanner.events().collect();
/// assert_eq!(events.len(), 5);
/// assert!(matches!(events[4], IndexAccessEvent::IndexValueNotInteger(_)));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct IndexAccessScanner<'a> {
    text: &'a str,
    integer_indices: bool,
}

impl<'a> IndexAccessScanner<'a> {
    /// Create scanner for `text` resolved against `key`
    ///
    /// Integer validation applies only to list and array keys.
    #[must_use]
    pub fn new(text: &'a str, key: &ConfigKey) -> Self {
        Self {
            text,
            integer_indices: key.access_type() == AccessType::Indexed,
        }
    }

    /// Scanned text
    #[inline]
    #[must_use]
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Fresh event iterator; each call restarts from the beginning
    #[inline]
    #[must_use]
    pub fn events(&self) -> IndexAccessEvents<'a> {
        IndexAccessEvents {
            text: self.text,
            integer_indices: self.integer_indices,
            state: ScanState::Seek(0),
        }
    }

    /// Feed every event to `visitor`
    pub fn visit<V: IndexAccessVisitor + ?Sized>(&self, visitor: &mut V) {
        for event in self.events() {
            event.dispatch(visitor);
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum ScanState {
    Seek(usize),
    AfterBracket(usize),
    AfterValue(TextRange),
    Done,
}

/// Lazy event iterator returned by [`IndexAccessScanner::events`]
#[derive(Debug, Clone)]
pub struct IndexAccessEvents<'a> {
    text: &'a str,
    integer_indices: bool,
    state: ScanState,
}

impl Iterator for IndexAccessEvents<'_> {
    type Item = IndexAccessEvent;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.state {
                ScanState::Seek(from) => {
                    let Some(offset) = self.text[from..].find('[') else {
                        self.state = ScanState::Done;
                        return None;
                    };
                    let open = from + offset;
                    self.state = ScanState::AfterBracket(open);
                    return Some(IndexAccessEvent::Bracket(open));
                }
                ScanState::AfterBracket(open) => {
                    let start = open + 1;
                    return match self.text[start..].find(']') {
                        None => {
                            self.state = ScanState::Done;
                            Some(IndexAccessEvent::MissingClosingBracket(open))
                        }
                        Some(0) => {
                            self.state = ScanState::Seek(start + 1);
                            Some(IndexAccessEvent::MissingIndexValue(start))
                        }
                        Some(len) => {
                            let range = TextRange::new(start, start + len);
                            self.state = ScanState::AfterValue(range);
                            Some(IndexAccessEvent::IndexValue(range))
                        }
                    };
                }
                ScanState::AfterValue(range) => {
                    self.state = ScanState::Seek(range.end + 1);
                    if self.integer_indices && !is_integer(range.slice(self.text)) {
                        return Some(IndexAccessEvent::IndexValueNotInteger(range));
                    }
                }
                ScanState::Done => return None,
            }
        }
    }
}

impl FusedIterator for IndexAccessEvents<'_> {}

fn is_integer(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

//! Dotted key segments
//!
//! Dots inside `[...]` groups do not separate segments, so `app.map[a.b].c`
//! has the three segments `app`, `map[a.b]` and `c`.

/// Where the text of a key ends after a given number of segments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentBoundary {
    /// The text ends exactly after the segments
    End,
    /// A `.` separator follows at this byte offset
    Dot(usize),
    /// A `[` follows at this byte offset
    Bracket(usize),
}

impl SegmentBoundary {
    /// Byte length of the text covered by the segments
    #[inline]
    #[must_use]
    pub fn portion_len(self, text: &str) -> usize {
        match self {
            Self::End => text.len(),
            Self::Dot(at) | Self::Bracket(at) => at,
        }
    }
}

/// Count segments of dotted text
#[must_use]
pub(crate) fn segment_count(text: &str) -> usize {
    let mut depth = 0usize;
    let mut count = 1usize;
    for c in text.chars() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            '.' if depth == 0 => count += 1,
            _ => {}
        }
    }
    count
}

/// Locate the end of the first `segments` segments of `text`
///
/// Returns `None` when `text` has fewer segments. A `[` that opens inside
/// the last counted segment ends it, so `app.labels[x]` has a bracket
/// boundary after two segments.
#[must_use]
pub(crate) fn boundary_after(text: &str, segments: usize) -> Option<SegmentBoundary> {
    if segments == 0 {
        return None;
    }
    let mut depth = 0usize;
    let mut current = 1usize;
    for (i, c) in text.char_indices() {
        match c {
            '[' => {
                if depth == 0 && current == segments {
                    return Some(SegmentBoundary::Bracket(i));
                }
                depth += 1;
            }
            ']' => depth = depth.saturating_sub(1),
            '.' if depth == 0 => {
                if current == segments {
                    return Some(SegmentBoundary::Dot(i));
                }
                current += 1;
            }
            _ => {}
        }
    }
    (current == segments).then_some(SegmentBoundary::End)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_count_ignores_bracket_dots() {
        assert_eq!(segment_count("app"), 1);
        assert_eq!(segment_count("app.labels"), 2);
        assert_eq!(segment_count("app.labels[a.b]"), 2);
        assert_eq!(segment_count("app.map[a.b].c"), 3);
    }

    #[test]
    fn boundary_dot() {
        assert_eq!(boundary_after("app.labels.env", 2), Some(SegmentBoundary::Dot(10)));
    }

    #[test]
    fn boundary_bracket() {
        assert_eq!(
            boundary_after("app.labels[env]", 2),
            Some(SegmentBoundary::Bracket(10))
        );
    }

    #[test]
    fn boundary_end_and_short() {
        assert_eq!(boundary_after("app.labels", 2), Some(SegmentBoundary::End));
        assert_eq!(boundary_after("app", 2), None);
        assert_eq!(boundary_after("app", 0), None);
    }

    #[test]
    fn portion_len() {
        let text = "app.labels.env";
        let boundary = boundary_after(text, 2).unwrap();
        assert_eq!(&text[..boundary.portion_len(text)], "app.labels");
        assert_eq!(SegmentBoundary::End.portion_len(text), text.len());
    }
}

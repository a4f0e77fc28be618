//! Character-level comparisons shared by the name binders

/// Compare two characters ignoring case
#[inline]
#[must_use]
pub fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Compare two strings ignoring case, character by character
#[must_use]
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    let mut left = a.chars();
    let mut right = b.chars();
    loop {
        match (left.next(), right.next()) {
            (None, None) => return true,
            (Some(x), Some(y)) if chars_eq_ignore_case(x, y) => {}
            _ => return false,
        }
    }
}

/// First characters of both strings are equal ignoring case
///
/// False when either string is empty.
#[inline]
#[must_use]
pub fn first_char_matches(name: &str, text: &str) -> bool {
    match (name.chars().next(), text.chars().next()) {
        (Some(a), Some(b)) => chars_eq_ignore_case(a, b),
        _ => false,
    }
}

/// Last characters of both strings are equal ignoring case
///
/// False when either string is empty.
#[inline]
#[must_use]
pub fn last_char_matches(name: &str, text: &str) -> bool {
    match (name.chars().next_back(), text.chars().next_back()) {
        (Some(a), Some(b)) => chars_eq_ignore_case(a, b),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eq_ignore_case_basic() {
        assert!(eq_ignore_case("Server.Port", "server.port"));
        assert!(!eq_ignore_case("server.port", "server.ports"));
        assert!(eq_ignore_case("", ""));
    }

    #[test]
    fn first_and_last_char() {
        assert!(first_char_matches("app.name", "APP_NAME"));
        assert!(!first_char_matches("app.name", "bpp"));
        assert!(!first_char_matches("app", ""));
        assert!(last_char_matches("app.name", "APP_NAME"));
        assert!(!last_char_matches("app.name", "app.nam"));
    }
}

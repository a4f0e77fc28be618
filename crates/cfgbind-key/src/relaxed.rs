//! Relaxed name variants
//!
//! A logical name such as `app.displayName` may be written in a property
//! file as `app.display-name`, `app.display_name` or `APP_DISPLAY_NAME`.
//! [`RelaxedNames`] enumerates those renderings by combining a case
//! variation with a separator manipulation, applied for two rounds so that
//! composite forms (camelCase split into words, then dots turned into
//! underscores) are reachable.

use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static CAMEL_CASE_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new("([^A-Z-])([A-Z])").expect("camel case pattern is valid"));

const SEPARATORS: [char; 3] = ['_', '-', '.'];

/// Number of manipulation rounds applied to a name
const ROUNDS: usize = 2;

#[derive(Debug, Clone, Copy)]
enum Variation {
    None,
    Lowercase,
    Uppercase,
}

impl Variation {
    const ALL: [Self; 3] = [Self::None, Self::Lowercase, Self::Uppercase];

    fn apply(self, value: String) -> String {
        match self {
            Self::None => value,
            Self::Lowercase => value.to_lowercase(),
            Self::Uppercase => value.to_uppercase(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Manipulation {
    None,
    HyphenToUnderscore,
    UnderscoreToPeriod,
    PeriodToUnderscore,
    CamelCaseToUnderscore,
    CamelCaseToHyphen,
    SeparatedToCamelCase,
    CaseInsensitiveSeparatedToCamelCase,
}

impl Manipulation {
    const ALL: [Self; 8] = [
        Self::None,
        Self::HyphenToUnderscore,
        Self::UnderscoreToPeriod,
        Self::PeriodToUnderscore,
        Self::CamelCaseToUnderscore,
        Self::CamelCaseToHyphen,
        Self::SeparatedToCamelCase,
        Self::CaseInsensitiveSeparatedToCamelCase,
    ];

    fn apply(self, value: &str) -> String {
        match self {
            Self::None => value.to_string(),
            Self::HyphenToUnderscore => value.replace('-', "_"),
            Self::UnderscoreToPeriod => value.replace('_', "."),
            Self::PeriodToUnderscore => value.replace('.', "_"),
            Self::CamelCaseToUnderscore => camel_case_to_separated(value, '_'),
            Self::CamelCaseToHyphen => camel_case_to_separated(value, '-'),
            Self::SeparatedToCamelCase => separated_to_camel_case(value, false),
            Self::CaseInsensitiveSeparatedToCamelCase => separated_to_camel_case(value, true),
        }
    }
}

fn camel_case_to_separated(value: &str, separator: char) -> String {
    CAMEL_CASE_BOUNDARY
        .replace_all(value, |caps: &Captures<'_>| {
            let mut out = String::with_capacity(caps[0].len() + 1);
            out.push_str(&caps[1]);
            out.push(separator);
            out.push_str(&caps[2].to_lowercase());
            out
        })
        .into_owned()
}

/// Join `_`, `-` or `.` separated words into camelCase
///
/// Words after the first non-empty one are capitalized. With
/// `case_insensitive`, every word is lowercased first. A trailing
/// separator is kept.
///
/// ```rust
/// use cfgbind_key::separated_to_camel_case;
///
/// assert_eq!(separated_to_camel_case("display-name", false), "displayName");
/// assert_eq!(separated_to_camel_case("DISPLAY_NAME", true), "displayName");
/// ```
#[must_use]
pub fn separated_to_camel_case(value: &str, case_insensitive: bool) -> String {
    if value.is_empty() {
        return String::new();
    }
    let mut fields: Vec<&str> = value.split(SEPARATORS).collect();
    while fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
    }

    let mut out = String::with_capacity(value.len());
    for field in fields {
        let field = if case_insensitive {
            field.to_lowercase()
        } else {
            field.to_string()
        };
        if out.is_empty() {
            out.push_str(&field);
        } else {
            out.push_str(&capitalize(&field));
        }
    }
    if let Some(last) = value.chars().next_back().filter(|c| SEPARATORS.contains(c)) {
        out.push(last);
    }
    out
}

/// Convert a dashed name to camelCase: `display-name` → `displayName`
#[must_use]
pub fn dashed_to_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for c in name.chars() {
        if c == '-' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn capitalize(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// All relaxed renderings of a name
///
/// Includes the name itself. Variants are kept in generation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelaxedNames {
    name: String,
    values: IndexSet<String>,
}

impl RelaxedNames {
    /// Generate variants of `name`
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let mut values = IndexSet::new();
        values.insert(name.clone());

        let mut frontier = vec![name.clone()];
        for _ in 0..ROUNDS {
            let mut next = Vec::new();
            for source in &frontier {
                for manipulation in Manipulation::ALL {
                    let manipulated = manipulation.apply(source);
                    for variation in Variation::ALL {
                        let candidate = variation.apply(manipulated.clone());
                        if values.insert(candidate.clone()) {
                            next.push(candidate);
                        }
                    }
                }
            }
            frontier = next;
        }
        Self { name, values }
    }

    /// Variants for a dotted key, with its last segment normalized to camelCase
    #[must_use]
    pub fn for_key(key_name: &str) -> Self {
        match key_name.rfind('.') {
            Some(dot) => {
                let (prefix, last) = key_name.split_at(dot + 1);
                Self::new(format!("{prefix}{}", dashed_to_camel_case(last)))
            }
            None => Self::new(key_name),
        }
    }

    /// Name the variants were generated from
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Iterator over variants
    #[inline]
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }

    /// Whether `text` is one of the variants (exact comparison)
    #[inline]
    #[must_use]
    pub fn contains(&self, text: &str) -> bool {
        self.values.contains(text)
    }

    /// Number of variants
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false; the name itself is a variant
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

//! Free-text display name → structured name parts.

use crate::common::{Locale, LocalizedName};

/// Last name used when a display name has a single token.
pub const UNKNOWN_LAST_NAME: &str = "Unknown";

/// Name parts extracted from a display name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
}

impl ParsedName {
    pub fn into_localized(self, locale: Locale) -> LocalizedName {
        LocalizedName {
            first_name: self.first_name,
            middle_name: self.middle_name,
            last_name: self.last_name,
            locale,
        }
    }
}

/// Split a display name on whitespace.
///
/// - one token: `{first: token, last: "Unknown"}`
/// - two tokens: `{first, last}`
/// - three or more: first and last tokens, the rest joined as the middle name
///
/// Returns `None` when the input has no tokens at all.
pub fn parse_display_name(name: &str) -> Option<ParsedName> {
    let tokens: Vec<&str> = name.split_whitespace().collect();

    match tokens.as_slice() {
        [] => None,
        [only] => Some(ParsedName {
            first_name: only.to_string(),
            middle_name: None,
            last_name: UNKNOWN_LAST_NAME.to_string(),
        }),
        [first, last] => Some(ParsedName {
            first_name: first.to_string(),
            middle_name: None,
            last_name: last.to_string(),
        }),
        [first, middle @ .., last] => Some(ParsedName {
            first_name: first.to_string(),
            middle_name: Some(middle.join(" ")),
            last_name: last.to_string(),
        }),
    }
}

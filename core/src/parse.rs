//! Parsers for the compound string fields the API packs into breed records.
//!
//! Ranges arrive as `"12 - 15"` (life span, weight) and lists as
//! `"Egypt, Ethiopia"` (alternative names, country codes, temperament).

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

static INTERVAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+) *- *(\d+)$").expect("interval pattern is valid"));

const LIST_SEPARATOR: &str = ", ";

/// An inclusive `min - max` pair, e.g. a life span in years or a weight in kg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub min: u32,
    pub max: u32,
}

/// Parse `"<int> - <int>"` into an [`Interval`]. Spaces around the dash are
/// optional; any other content fails the whole string.
pub fn parse_interval(text: &str) -> Result<Interval, ApiError> {
    let format_error = || ApiError::Format {
        value: text.to_string(),
        expected: "a range like \"9 - 15\"",
    };

    let caps = INTERVAL_RE.captures(text).ok_or_else(format_error)?;
    let min = caps[1].parse().map_err(|_| format_error())?;
    let max = caps[2].parse().map_err(|_| format_error())?;
    Ok(Interval { min, max })
}

/// Split a `", "`-separated string into its tokens, in order.
///
/// Tokens are kept verbatim. An empty string yields an empty list.
pub fn parse_list(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split(LIST_SEPARATOR).map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_with_spaces() {
        assert_eq!(parse_interval("9 - 15").unwrap(), Interval { min: 9, max: 15 });
    }

    #[test]
    fn interval_without_spaces() {
        assert_eq!(parse_interval("9-15").unwrap(), Interval { min: 9, max: 15 });
    }

    #[test]
    fn interval_rejects_words() {
        let err = parse_interval("nine-fifteen").unwrap_err();
        assert!(matches!(err, ApiError::Format { .. }));
    }

    #[test]
    fn interval_rejects_trailing_content() {
        assert!(parse_interval("9 - 15 years").is_err());
        assert!(parse_interval(" 9 - 15").is_err());
        assert!(parse_interval("9 - ").is_err());
    }

    #[test]
    fn interval_rejects_overflow() {
        let err = parse_interval("1 - 99999999999").unwrap_err();
        assert!(matches!(err, ApiError::Format { .. }));
    }

    #[test]
    fn list_keeps_order() {
        assert_eq!(
            parse_list("Friendly, Gentle, Intelligent"),
            vec!["Friendly", "Gentle", "Intelligent"]
        );
    }

    #[test]
    fn list_single_token() {
        assert_eq!(parse_list("EG"), vec!["EG"]);
    }

    #[test]
    fn list_keeps_tokens_verbatim() {
        assert_eq!(parse_list("a,b, c"), vec!["a,b", "c"]);
    }

    #[test]
    fn empty_list_has_no_elements() {
        assert!(parse_list("").is_empty());
    }
}

//! Utterance parsing.
//!
//! Turns speech or typed text such as `"Betadine, 5"` into a candidate medicine name and an
//! optional quantity. A missing quantity is a normal outcome, not an error.

use regex::Regex;
use std::sync::LazyLock;

/// Leading words, whitespace, then a number with an optional decimal part.
static NAME_THEN_QUANTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)\s+([0-9]+(?:\.[0-9]+)?)$").expect("static pattern"));

/// A parsed but not yet confirmed (name, quantity) pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedCandidate {
    /// Lowercased, comma-free and trimmed.
    pub name: String,
    /// Quantity text exactly as spoken (`"2.5"` stays `"2.5"`).
    pub quantity: Option<String>,
}

/// Parse an utterance. Never fails; an empty name means nothing usable was said.
pub fn parse(text: &str) -> ParsedCandidate {
    let cleaned = text.to_lowercase().replace(',', "");

    match NAME_THEN_QUANTITY.captures(&cleaned) {
        Some(caps) => ParsedCandidate {
            name: caps[1].trim().to_owned(),
            quantity: Some(caps[2].to_owned()),
        },
        None => ParsedCandidate {
            name: cleaned.trim().to_owned(),
            quantity: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, quantity: Option<&str>) -> ParsedCandidate {
        ParsedCandidate {
            name: name.into(),
            quantity: quantity.map(Into::into),
        }
    }

    #[test]
    fn strips_commas_and_lowercases() {
        assert_eq!(parse("Betadine, 5"), candidate("betadine", Some("5")));
    }

    #[test]
    fn name_without_quantity() {
        assert_eq!(parse("lidocaine"), candidate("lidocaine", None));
        assert_eq!(parse("  Lidocaine, Plain "), candidate("lidocaine plain", None));
    }

    #[test]
    fn whitespace_only_is_empty_name() {
        assert_eq!(parse("   "), candidate("", None));
        assert_eq!(parse(""), candidate("", None));
    }

    #[test]
    fn keeps_decimal_quantity_as_text() {
        assert_eq!(
            parse("sodium chloride 2.50"),
            candidate("sodium chloride", Some("2.50"))
        );
    }

    #[test]
    fn multi_word_names_take_the_last_number() {
        assert_eq!(
            parse("vitamin b12 injection 3"),
            candidate("vitamin b12 injection", Some("3"))
        );
    }

    #[test]
    fn trailing_text_after_number_does_not_match() {
        assert_eq!(parse("betadine 5 ml"), candidate("betadine 5 ml", None));
        assert_eq!(parse("5"), candidate("5", None));
    }

    #[test]
    fn comma_inside_number_is_removed() {
        assert_eq!(parse("saline 1,000"), candidate("saline", Some("1000")));
    }
}

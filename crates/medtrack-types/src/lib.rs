//! Validated primitives shared by the Medicine Tracker crates.
//!
//! These wrappers check user input once at the boundary (the usage draft, the restock form)
//! so that the rest of the code can rely on the invariant without re-checking.

/// Errors that can occur when validating free text.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
}

/// Errors that can occur when validating a restock quantity.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QuantityError {
    /// No quantity was supplied
    #[error("Quantity is required")]
    Missing,
    /// The quantity was not a whole number
    #[error("Quantity must be a whole number of millilitres, got {0:?}")]
    NotANumber(String),
    /// Zero is not a restock
    #[error("Quantity must be at least 1")]
    NotPositive,
}

/// A string type that guarantees non-empty content.
///
/// The input is trimmed of leading and trailing whitespace during construction, so the
/// stored value never starts or ends with whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText`, or `TextError::Empty` if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// A restock amount in millilitres.
///
/// The backend stores restocks as a negative usage entry and parses the form field as an
/// integer, so only whole, strictly positive amounts are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
#[serde(transparent)]
pub struct RestockQuantity(u32);

impl RestockQuantity {
    pub fn new(millilitres: u32) -> Result<Self, QuantityError> {
        if millilitres == 0 {
            return Err(QuantityError::NotPositive);
        }
        Ok(Self(millilitres))
    }

    /// Parses a form value such as `"25"`.
    pub fn parse(input: &str) -> Result<Self, QuantityError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(QuantityError::Missing);
        }
        let value = trimmed
            .parse::<u32>()
            .map_err(|_| QuantityError::NotANumber(trimmed.to_owned()))?;
        Self::new(value)
    }

    pub fn millilitres(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for RestockQuantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_text_trims_input() {
        let text = NonEmptyText::new("  betadine 5 \n").expect("valid text");
        assert_eq!(text.as_str(), "betadine 5");
    }

    #[test]
    fn non_empty_text_rejects_whitespace() {
        assert_eq!(NonEmptyText::new("   "), Err(TextError::Empty));
        assert_eq!(NonEmptyText::new(""), Err(TextError::Empty));
    }

    #[test]
    fn non_empty_text_deserialize_validates() {
        let ok: NonEmptyText = serde_json::from_str("\"lidocaine\"").expect("deserialize");
        assert_eq!(ok.to_string(), "lidocaine");
        assert!(serde_json::from_str::<NonEmptyText>("\"  \"").is_err());
    }

    #[test]
    fn restock_quantity_parses_whole_numbers() {
        let q = RestockQuantity::parse(" 25 ").expect("parse");
        assert_eq!(q.millilitres(), 25);
        assert_eq!(q.to_string(), "25");
    }

    #[test]
    fn restock_quantity_rejects_bad_input() {
        assert_eq!(RestockQuantity::parse(""), Err(QuantityError::Missing));
        assert_eq!(RestockQuantity::parse("0"), Err(QuantityError::NotPositive));
        assert_eq!(
            RestockQuantity::parse("2.5"),
            Err(QuantityError::NotANumber("2.5".into()))
        );
        assert_eq!(
            RestockQuantity::parse("-3"),
            Err(QuantityError::NotANumber("-3".into()))
        );
    }
}

//! Medicine item wire models.
//!
//! Covers the fuzzy suggestion endpoint (`GET /api/items/suggest`), the list of restockable
//! medicines (`GET /restock_medicine`) and the restock form (`POST /restock_medicine`).

use crate::{decode, WireError};
use medtrack_types::{NonEmptyText, RestockQuantity};
use serde::{Deserialize, Serialize};

/// A known medicine offered as a correction for a misheard name.
///
/// The backend assigns `id` per response (it is the match rank), so it is only unique
/// within one suggestion list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionItem {
    pub id: i64,
    pub name: String,
}

/// Suggestion list operations.
pub struct Suggestions;

impl Suggestions {
    /// Parse a suggestion response: a bare JSON array, order preserved.
    pub fn parse(json_text: &str) -> Result<Vec<SuggestionItem>, WireError> {
        decode(json_text, "suggestions")
    }
}

/// Restockable medicine list operations.
pub struct MedicineList;

impl MedicineList {
    /// Parse a `GET /restock_medicine` body. A missing `medicines` key yields an empty list.
    pub fn parse(json_text: &str) -> Result<Vec<String>, WireError> {
        let wire: MedicineListWire = decode(json_text, "medicine list")?;
        Ok(wire.medicines)
    }
}

#[derive(Debug, Deserialize)]
struct MedicineListWire {
    #[serde(default)]
    medicines: Vec<String>,
}

/// Form body of `POST /restock_medicine`, sent as `application/x-www-form-urlencoded`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RestockForm {
    pub medicine: NonEmptyText,
    pub quantity: RestockQuantity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggestions_keep_service_order() {
        let input = r#"[{"id": 0, "name": "lidocaine"}, {"id": 1, "name": "lignocaine"}]"#;
        let items = Suggestions::parse(input).expect("parse");
        assert_eq!(
            items,
            vec![
                SuggestionItem {
                    id: 0,
                    name: "lidocaine".into()
                },
                SuggestionItem {
                    id: 1,
                    name: "lignocaine".into()
                },
            ]
        );
    }

    #[test]
    fn empty_suggestion_array() {
        assert!(Suggestions::parse("[]").expect("parse").is_empty());
    }

    #[test]
    fn suggestions_reject_object_body() {
        assert!(Suggestions::parse(r#"{"error": "nope"}"#).is_err());
    }

    #[test]
    fn parses_medicine_list() {
        let meds = MedicineList::parse(r#"{"medicines": ["betadine", "saline"]}"#).expect("parse");
        assert_eq!(meds, ["betadine", "saline"]);
        assert!(MedicineList::parse("{}").expect("parse").is_empty());
    }

    #[test]
    fn restock_form_serialises_flat_fields() {
        let form = RestockForm {
            medicine: NonEmptyText::new("betadine").expect("text"),
            quantity: RestockQuantity::new(25).expect("quantity"),
        };
        let json = serde_json::to_value(&form).expect("serialise");
        assert_eq!(json, serde_json::json!({"medicine": "betadine", "quantity": 25}));
    }
}

//! Purchase-priority wire models (`GET /buy_list`).
//!
//! Notes:
//! - The backend already filters out well-stocked medicines and sorts by colour then by
//!   remaining quantity; that order is preserved here.
//! - Colours outside the known palette are kept rather than rejected.

use crate::{decode, WireError};
use serde::Deserialize;

// ============================================================================
// Public domain-level types
// ============================================================================

/// Backend colour code for a stock level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Colour {
    Red,
    Orange,
    Yellow,
    Green,
    /// Any other string sent by the backend.
    Other(String),
}

impl Colour {
    pub fn from_wire(s: &str) -> Self {
        match s {
            "red" => Colour::Red,
            "orange" => Colour::Orange,
            "yellow" => Colour::Yellow,
            "green" => Colour::Green,
            other => Colour::Other(other.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Colour::Red => "red",
            Colour::Orange => "orange",
            Colour::Yellow => "yellow",
            Colour::Green => "green",
            Colour::Other(s) => s,
        }
    }
}

/// One medicine that should be bought.
#[derive(Clone, Debug, PartialEq)]
pub struct BuyListItem {
    pub medicine: String,
    pub remaining: f64,
    pub colour: Colour,
}

// ============================================================================
// Public BuyList operations
// ============================================================================

/// Buy list operations.
pub struct BuyList;

impl BuyList {
    /// Parse a `/buy_list` response body. A missing `buy_list` key yields an empty list.
    pub fn parse(json_text: &str) -> Result<Vec<BuyListItem>, WireError> {
        let wire: BuyListWire = decode(json_text, "buy list")?;
        Ok(wire
            .buy_list
            .into_iter()
            .map(|item| BuyListItem {
                medicine: item.medicine,
                remaining: item.remaining,
                colour: Colour::from_wire(&item.color),
            })
            .collect())
    }
}

// ============================================================================
// Wire model
// ============================================================================

#[derive(Debug, Deserialize)]
struct BuyListWire {
    #[serde(default)]
    buy_list: Vec<BuyListItemWire>,
}

#[derive(Debug, Deserialize)]
struct BuyListItemWire {
    medicine: String,
    remaining: f64,
    color: String,
}

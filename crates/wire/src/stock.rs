//! Stock summary wire models and translation helpers (`GET /restock`).
//!
//! The backend reports, per medicine, the remaining millilitres and a projected depletion
//! date. The depletion field is either an ISO date or one of three sentinel strings, which
//! must survive a parse/render cycle byte-for-byte.

use crate::{decode, WireError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sentinel: no positive usage has ever been logged for the medicine.
pub const NO_USAGE_DATA: &str = "N/A - No usage data";

/// Sentinel: usage exists but the daily average is not positive.
pub const NO_AVERAGE_USAGE: &str = "N/A - No average usage or sufficient stock";

/// Sentinel: the remaining quantity is already below zero.
pub const ALREADY_DEPLETED: &str = "Already Depleted";

// ============================================================================
// Public domain-level types
// ============================================================================

/// One row of the stock summary.
#[derive(Clone, Debug, PartialEq)]
pub struct StockRecord {
    /// Medicine name, unique within a summary.
    pub medicine: String,

    /// Remaining quantity in millilitres. May be negative when over-consumed.
    pub remaining: f64,

    /// Projected depletion, absent when the backend omitted the field.
    pub depletion: Option<DepletionDate>,
}

/// Backend depletion projection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DepletionDate {
    /// [`NO_USAGE_DATA`]
    NoUsageData,
    /// [`NO_AVERAGE_USAGE`]
    NoAverageUsage,
    /// [`ALREADY_DEPLETED`]
    AlreadyDepleted,
    /// Any other value, normally a `YYYY-MM-DD` date. Kept verbatim.
    Projected(String),
}

impl DepletionDate {
    /// Parse from the wire string. Never fails; unknown text is kept as `Projected`.
    pub fn from_wire(s: &str) -> Self {
        match s {
            NO_USAGE_DATA => DepletionDate::NoUsageData,
            NO_AVERAGE_USAGE => DepletionDate::NoAverageUsage,
            ALREADY_DEPLETED => DepletionDate::AlreadyDepleted,
            other => DepletionDate::Projected(other.to_owned()),
        }
    }

    /// The exact string the backend sent.
    pub fn as_str(&self) -> &str {
        match self {
            DepletionDate::NoUsageData => NO_USAGE_DATA,
            DepletionDate::NoAverageUsage => NO_AVERAGE_USAGE,
            DepletionDate::AlreadyDepleted => ALREADY_DEPLETED,
            DepletionDate::Projected(s) => s,
        }
    }

    /// Whether the dashboard shows this value at all. The two "N/A" sentinels are hidden.
    pub fn is_displayed(&self) -> bool {
        !matches!(
            self,
            DepletionDate::NoUsageData | DepletionDate::NoAverageUsage
        )
    }
}

impl std::fmt::Display for DepletionDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Public StockSummary operations
// ============================================================================

/// Stock summary operations.
///
/// Zero-sized namespace for parsing and rendering `/restock` bodies.
pub struct StockSummary;

impl StockSummary {
    /// Parse a `/restock` response body.
    ///
    /// A missing `summary` key yields an empty list. Records come back ordered by medicine
    /// name.
    ///
    /// # Errors
    ///
    /// Returns [`WireError`] if the body is not JSON or a field has an unexpected type.
    pub fn parse(json_text: &str) -> Result<Vec<StockRecord>, WireError> {
        let wire: RestockWire = decode(json_text, "stock summary")?;
        Ok(wire_to_domain(wire))
    }

    /// Render stock records back into the `/restock` body shape.
    pub fn render(records: &[StockRecord]) -> Result<String, WireError> {
        let wire = domain_to_wire(records);
        Ok(serde_json::to_string(&wire)?)
    }
}

// ============================================================================
// Wire model
// ============================================================================

#[derive(Debug, Default, Serialize, Deserialize)]
struct RestockWire {
    #[serde(default)]
    summary: BTreeMap<String, StockEntryWire>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StockEntryWire {
    remaining: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    depletion_date: Option<String>,
}

// ============================================================================
// Translation helpers
// ============================================================================

fn wire_to_domain(wire: RestockWire) -> Vec<StockRecord> {
    wire.summary
        .into_iter()
        .map(|(medicine, entry)| StockRecord {
            medicine,
            remaining: entry.remaining,
            depletion: entry.depletion_date.as_deref().map(DepletionDate::from_wire),
        })
        .collect()
}

fn domain_to_wire(records: &[StockRecord]) -> RestockWire {
    let summary = records
        .iter()
        .map(|record| {
            (
                record.medicine.clone(),
                StockEntryWire {
                    remaining: record.remaining,
                    depletion_date: record.depletion.as_ref().map(|d| d.as_str().to_owned()),
                },
            )
        })
        .collect();
    RestockWire { summary }
}

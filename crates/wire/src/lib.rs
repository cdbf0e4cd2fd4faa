//! Wire models for the inventory backend's HTTP contract.
//!
//! This crate provides **wire models** and **translation helpers** for every JSON body the
//! dashboard exchanges with the backend:
//! - `/restock` stock summary, `/forecast` alerts, `/buy_list`, `/usage_log`
//! - `/api/items/suggest` fuzzy matches and the `/restock_medicine` medicine list
//! - request bodies for `/log_usage` and `/restock_medicine`
//!
//! Each module keeps the raw wire struct private and exposes a domain-level type plus a
//! zero-sized facade with a `parse` associated function. Decoding goes through
//! `serde_path_to_error` so that a schema mismatch names the offending field.
//!
//! The crate has no HTTP concerns: transport lives in `medtrack-api-client`.

pub mod buy_list;
pub mod forecast;
pub mod items;
pub mod stock;
pub mod usage;

// Re-export facades
pub use buy_list::BuyList;
pub use forecast::ForecastAlerts;
pub use items::{MedicineList, Suggestions};
pub use stock::StockSummary;
pub use usage::{LogUsageReply, UsageLog};

// Re-export public domain-level types
pub use buy_list::{BuyListItem, Colour};
pub use forecast::ForecastAlert;
pub use items::{RestockForm, SuggestionItem};
pub use stock::{DepletionDate, StockRecord};
pub use usage::{LogUsageRequest, UsageDirection, UsageEntry};

/// Errors returned by the wire crate.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("translation error: {0}")]
    Translation(String),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

/// Type alias for Results that can fail with a [`WireError`].
pub type WireResult<T> = Result<T, WireError>;

/// Decode a JSON body into a wire struct, reporting the failing path on mismatch.
///
/// `what` names the payload in the error message (for example `"stock summary"`).
pub(crate) fn decode<T>(json_text: &str, what: &str) -> WireResult<T>
where
    T: serde::de::DeserializeOwned,
{
    let mut deserializer = serde_json::Deserializer::from_str(json_text);

    match serde_path_to_error::deserialize::<_, T>(&mut deserializer) {
        Ok(parsed) => Ok(parsed),
        Err(err) => {
            let path = err.path().to_string();
            let source = err.into_inner();
            let path = if path.is_empty() || path == "." {
                "<root>"
            } else {
                path.as_str()
            };
            Err(WireError::Translation(format!(
                "{what} schema mismatch at {path}: {source}"
            )))
        }
    }
}

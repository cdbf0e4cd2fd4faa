//! Usage history and usage logging wire models.
//!
//! Covers `GET /usage_log` (history) and `POST /log_usage` (request and reply).
//!
//! Sign convention: a positive quantity is consumption, a negative one is a restock
//! credit. Timestamps are naive ISO-8601 strings as produced by the backend; an RFC 3339
//! value with an offset is also accepted and kept at its wall-clock time.

use crate::{decode, WireError};
use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ============================================================================
// Public domain-level types
// ============================================================================

/// Whether an entry consumed or replenished stock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UsageDirection {
    Used,
    Restocked,
}

impl UsageDirection {
    pub fn label(self) -> &'static str {
        match self {
            UsageDirection::Used => "Used",
            UsageDirection::Restocked => "Restocked",
        }
    }
}

/// One row of the usage history.
#[derive(Clone, Debug, PartialEq)]
pub struct UsageEntry {
    pub id: String,
    pub medicine: String,
    /// Signed quantity in millilitres.
    pub quantity: f64,
    pub timestamp: NaiveDateTime,
}

impl UsageEntry {
    /// Only strictly positive quantities count as usage; zero is shown as a restock.
    pub fn direction(&self) -> UsageDirection {
        if self.quantity > 0.0 {
            UsageDirection::Used
        } else {
            UsageDirection::Restocked
        }
    }

    /// Unsigned amount in millilitres.
    pub fn amount_ml(&self) -> f64 {
        self.quantity.abs()
    }
}

/// Body of `POST /log_usage`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LogUsageRequest {
    /// Free text in the form `"<name> <quantity>"`.
    pub text: String,
}

/// Reply of `POST /log_usage`. The backend sends this shape for both 2xx and 4xx/5xx.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LogUsageReply {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

impl LogUsageReply {
    pub fn parse(json_text: &str) -> Result<LogUsageReply, WireError> {
        decode(json_text, "log usage reply")
    }
}

// ============================================================================
// Public UsageLog operations
// ============================================================================

/// Usage history operations.
pub struct UsageLog;

impl UsageLog {
    /// Parse a `/usage_log` response body, newest first as sent by the backend.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::InvalidTimestamp`] if any entry carries an unparseable timestamp.
    pub fn parse(json_text: &str) -> Result<Vec<UsageEntry>, WireError> {
        let wire: UsageLogWire = decode(json_text, "usage log")?;
        wire.logs.into_iter().map(wire_to_domain).collect()
    }
}

/// Parse a backend timestamp.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, WireError> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive);
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_local())
        .map_err(|_| WireError::InvalidTimestamp(raw.to_owned()))
}

// ============================================================================
// Wire model
// ============================================================================

#[derive(Debug, Deserialize)]
struct UsageLogWire {
    #[serde(default)]
    logs: Vec<UsageEntryWire>,
}

#[derive(Debug, Deserialize)]
struct UsageEntryWire {
    #[serde(rename = "_id")]
    id: String,
    medicine: String,
    quantity: f64,
    timestamp: String,
}

fn wire_to_domain(wire: UsageEntryWire) -> Result<UsageEntry, WireError> {
    Ok(UsageEntry {
        timestamp: parse_timestamp(&wire.timestamp)?,
        id: wire.id,
        medicine: wire.medicine,
        quantity: wire.quantity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn parses_history_and_directions() {
        let input = r#"{"logs": [
            {"_id": "65f0a1", "medicine": "betadine", "quantity": 5.0,
             "timestamp": "2024-03-12T14:05:09.123456"},
            {"_id": "65f0a0", "medicine": "betadine", "quantity": -20,
             "timestamp": "2024-03-11T08:00:00"}
        ]}"#;

        let entries = UsageLog::parse(input).expect("parse");
        assert_eq!(entries.len(), 2);

        assert_eq!(entries[0].id, "65f0a1");
        assert_eq!(entries[0].direction(), UsageDirection::Used);
        assert_eq!(entries[0].timestamp.hour(), 14);

        assert_eq!(entries[1].direction(), UsageDirection::Restocked);
        assert_eq!(entries[1].amount_ml(), 20.0);
        assert_eq!(
            entries[1].timestamp.date(),
            NaiveDate::from_ymd_opt(2024, 3, 11).expect("date")
        );
    }

    #[test]
    fn zero_quantity_counts_as_restock() {
        let entry = UsageEntry {
            id: "a".into(),
            medicine: "x".into(),
            quantity: 0.0,
            timestamp: parse_timestamp("2024-01-01T00:00:00").expect("ts"),
        };
        assert_eq!(entry.direction(), UsageDirection::Restocked);
    }

    #[test]
    fn accepts_rfc3339_timestamps() {
        let ts = parse_timestamp("2024-03-12T14:05:09+02:00").expect("rfc3339");
        assert_eq!(ts.hour(), 14);
    }

    #[test]
    fn rejects_bad_timestamp() {
        let input = r#"{"logs":[{"_id":"a","medicine":"x","quantity":1,"timestamp":"yesterday"}]}"#;
        let err = UsageLog::parse(input).expect_err("bad timestamp");
        assert!(matches!(err, WireError::InvalidTimestamp(raw) if raw == "yesterday"));
    }

    #[test]
    fn parses_log_usage_reply_without_message() {
        let reply = LogUsageReply::parse(r#"{"success": true}"#).expect("parse");
        assert!(reply.success);
        assert_eq!(reply.message, None);

        let reply = LogUsageReply::parse(
            r#"{"success": false, "message": "Usage text cannot be empty."}"#,
        )
        .expect("parse");
        assert!(!reply.success);
        assert_eq!(reply.message.as_deref(), Some("Usage text cannot be empty."));
    }
}

//! Forecast alert wire models (`GET /forecast`).
//!
//! The backend returns one free-text sentence per medicine, for example
//! `"needed in 3 days"` or `"sufficient for now"`. Interpretation of those sentences is a
//! client concern and lives in `medtrack-core`.

use crate::{decode, WireError};
use serde::Deserialize;
use std::collections::BTreeMap;

/// One forecast sentence for one medicine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForecastAlert {
    pub medicine: String,
    pub text: String,
}

/// Forecast alert operations.
pub struct ForecastAlerts;

impl ForecastAlerts {
    /// Parse a `/forecast` response body. A missing `stock_alerts` key yields an empty list.
    pub fn parse(json_text: &str) -> Result<Vec<ForecastAlert>, WireError> {
        let wire: ForecastWire = decode(json_text, "forecast")?;
        Ok(wire
            .stock_alerts
            .into_iter()
            .map(|(medicine, text)| ForecastAlert { medicine, text })
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct ForecastWire {
    #[serde(default)]
    stock_alerts: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_alerts_in_name_order() {
        let input = r#"{"stock_alerts": {
            "saline": "sufficient for now",
            "betadine": "needed in 3 days"
        }}"#;

        let alerts = ForecastAlerts::parse(input).expect("parse");
        assert_eq!(
            alerts,
            vec![
                ForecastAlert {
                    medicine: "betadine".into(),
                    text: "needed in 3 days".into()
                },
                ForecastAlert {
                    medicine: "saline".into(),
                    text: "sufficient for now".into()
                },
            ]
        );
    }

    #[test]
    fn missing_alerts_is_empty() {
        assert!(ForecastAlerts::parse("{}").expect("parse").is_empty());
    }

    #[test]
    fn rejects_non_string_alert() {
        let err = ForecastAlerts::parse(r#"{"stock_alerts":{"x":7}}"#).expect_err("reject");
        assert!(matches!(err, WireError::Translation(msg) if msg.contains("stock_alerts.x")));
    }
}

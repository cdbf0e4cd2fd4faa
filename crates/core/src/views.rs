//! Display rows for the dashboard pages.
//!
//! Each row is built from a wire record plus the classifier output and renders itself as one
//! line of terminal text.

use crate::forecast::{assess, ForecastAssessment};
use crate::stock::{classify, purchase_priority, SeverityTier, StockThresholds};
use medtrack_wire::{
    BuyListItem, Colour, DepletionDate, ForecastAlert, StockRecord, UsageDirection, UsageEntry,
};
use std::fmt;

/// `MMM d, yyyy 'at' h:mm a`
pub const HISTORY_TIMESTAMP_FORMAT: &str = "%b %-d, %Y at %-I:%M %p";

/// One medicine on the stock status page.
#[derive(Clone, Debug, PartialEq)]
pub struct StockCard {
    pub medicine: String,
    pub remaining: f64,
    pub tier: SeverityTier,
    pub depletion: Option<DepletionDate>,
}

impl StockCard {
    pub fn from_record(record: &StockRecord, thresholds: &StockThresholds) -> Self {
        Self {
            medicine: record.medicine.clone(),
            remaining: record.remaining,
            tier: classify(record.remaining, thresholds),
            depletion: record.depletion.clone(),
        }
    }

    /// Depletion line, hidden for the "N/A" sentinels.
    pub fn depletion_text(&self) -> Option<String> {
        match self.depletion.as_ref()? {
            d if !d.is_displayed() => None,
            DepletionDate::AlreadyDepleted => Some("Already Depleted".into()),
            d => Some(format!("Depletes on {d}")),
        }
    }
}

impl fmt::Display for StockCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<28} {:>8}ml  [{}]",
            self.medicine,
            self.remaining,
            self.tier.badge_text()
        )?;
        if let Some(depletion) = self.depletion_text() {
            write!(f, "  {depletion}")?;
        }
        Ok(())
    }
}

/// One entry of the purchase list.
#[derive(Clone, Debug, PartialEq)]
pub struct BuyListRow {
    pub medicine: String,
    pub remaining: f64,
    pub colour: Colour,
}

impl BuyListRow {
    pub fn priority(&self) -> &'static str {
        purchase_priority(&self.colour)
    }

    pub fn tier(&self) -> Option<SeverityTier> {
        SeverityTier::from_colour(&self.colour)
    }
}

impl From<BuyListItem> for BuyListRow {
    fn from(item: BuyListItem) -> Self {
        Self {
            medicine: item.medicine,
            remaining: item.remaining,
            colour: item.colour,
        }
    }
}

impl fmt::Display for BuyListRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<28} Only {}ml remaining  [{} Priority]",
            self.medicine,
            self.remaining,
            self.priority()
        )
    }
}

/// One line of usage history.
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryRow {
    pub entry: UsageEntry,
}

impl HistoryRow {
    pub fn direction(&self) -> UsageDirection {
        self.entry.direction()
    }

    pub fn when(&self) -> String {
        self.entry.timestamp.format(HISTORY_TIMESTAMP_FORMAT).to_string()
    }
}

impl fmt::Display for HistoryRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<26} {:<28} {:<9} {}ml",
            self.when(),
            self.entry.medicine,
            self.direction().label(),
            self.entry.amount_ml()
        )
    }
}

/// One forecast sentence with its reading.
#[derive(Clone, Debug, PartialEq)]
pub struct ForecastRow {
    pub medicine: String,
    pub text: String,
    pub assessment: ForecastAssessment,
}

impl From<ForecastAlert> for ForecastRow {
    fn from(alert: ForecastAlert) -> Self {
        Self {
            assessment: assess(&alert.text),
            medicine: alert.medicine,
            text: alert.text,
        }
    }
}

impl fmt::Display for ForecastRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<28} {:<44} [{}]",
            self.medicine,
            self.text,
            self.assessment.label()
        )
    }
}

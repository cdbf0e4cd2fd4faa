//! Stock level classification.
//!
//! Two explicitly separate outputs are derived from a remaining quantity:
//! - [`SeverityTier`]: the four-level tier used for badges and colours
//! - [`StockBucket`]: the three-level aggregation used by the dashboard counters, where the
//!   low and warning tiers are counted together

use crate::constants::{DEFAULT_ORANGE_THRESHOLD, DEFAULT_RED_THRESHOLD, DEFAULT_YELLOW_THRESHOLD};
use crate::{IntakeError, IntakeResult};
use medtrack_wire::{Colour, StockRecord};

/// Restocking urgency, ordered so that `Critical` is the greatest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SeverityTier {
    Good,
    Warning,
    Low,
    Critical,
}

impl SeverityTier {
    /// Badge text on a stock card.
    pub fn badge_text(self) -> &'static str {
        match self {
            SeverityTier::Critical => "Critical",
            SeverityTier::Low => "Low",
            SeverityTier::Warning => "Warning",
            SeverityTier::Good => "Good",
        }
    }

    pub fn colour(self) -> Colour {
        match self {
            SeverityTier::Critical => Colour::Red,
            SeverityTier::Low => Colour::Orange,
            SeverityTier::Warning => Colour::Yellow,
            SeverityTier::Good => Colour::Green,
        }
    }

    /// Tier for a backend colour code, `None` for colours outside the palette.
    pub fn from_colour(colour: &Colour) -> Option<SeverityTier> {
        match colour {
            Colour::Red => Some(SeverityTier::Critical),
            Colour::Orange => Some(SeverityTier::Low),
            Colour::Yellow => Some(SeverityTier::Warning),
            Colour::Green => Some(SeverityTier::Good),
            Colour::Other(_) => None,
        }
    }

    pub fn bucket(self) -> StockBucket {
        match self {
            SeverityTier::Critical => StockBucket::Critical,
            SeverityTier::Low | SeverityTier::Warning => StockBucket::Low,
            SeverityTier::Good => StockBucket::Good,
        }
    }
}

/// Dashboard counter bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StockBucket {
    Critical,
    Low,
    Good,
}

/// Upper bounds (inclusive) for the red, orange and yellow tiers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StockThresholds {
    red: f64,
    orange: f64,
    yellow: f64,
}

impl StockThresholds {
    /// Thresholds must be finite and non-decreasing (`red <= orange <= yellow`).
    pub fn new(red: f64, orange: f64, yellow: f64) -> IntakeResult<Self> {
        if !(red.is_finite() && orange.is_finite() && yellow.is_finite()) {
            return Err(IntakeError::InvalidInput(
                "stock thresholds must be finite numbers".into(),
            ));
        }
        if red > orange || orange > yellow {
            return Err(IntakeError::InvalidInput(format!(
                "stock thresholds must satisfy red <= orange <= yellow (got {red}, {orange}, {yellow})"
            )));
        }
        Ok(Self {
            red,
            orange,
            yellow,
        })
    }

    pub fn red(&self) -> f64 {
        self.red
    }

    pub fn orange(&self) -> f64 {
        self.orange
    }

    pub fn yellow(&self) -> f64 {
        self.yellow
    }
}

impl Default for StockThresholds {
    fn default() -> Self {
        Self {
            red: DEFAULT_RED_THRESHOLD,
            orange: DEFAULT_ORANGE_THRESHOLD,
            yellow: DEFAULT_YELLOW_THRESHOLD,
        }
    }
}

/// Classify a remaining quantity. First match wins, checked from red to yellow.
pub fn classify(remaining: f64, thresholds: &StockThresholds) -> SeverityTier {
    if remaining <= thresholds.red {
        SeverityTier::Critical
    } else if remaining <= thresholds.orange {
        SeverityTier::Low
    } else if remaining <= thresholds.yellow {
        SeverityTier::Warning
    } else {
        SeverityTier::Good
    }
}

/// Purchase priority wording for a buy-list colour. Unknown colours read as "Low".
pub fn purchase_priority(colour: &Colour) -> &'static str {
    match colour {
        Colour::Red => "Critical",
        Colour::Orange => "High",
        Colour::Yellow => "Medium",
        Colour::Green | Colour::Other(_) => "Low",
    }
}

/// Counters shown at the top of the dashboard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_medicines: usize,
    pub critical_stock: usize,
    pub low_stock: usize,
    pub good_stock: usize,
}

impl DashboardStats {
    pub fn from_records(records: &[StockRecord], thresholds: &StockThresholds) -> Self {
        records.iter().fold(
            DashboardStats {
                total_medicines: records.len(),
                ..Default::default()
            },
            |mut stats, record| {
                match classify(record.remaining, thresholds).bucket() {
                    StockBucket::Critical => stats.critical_stock += 1,
                    StockBucket::Low => stats.low_stock += 1,
                    StockBucket::Good => stats.good_stock += 1,
                }
                stats
            },
        )
    }
}

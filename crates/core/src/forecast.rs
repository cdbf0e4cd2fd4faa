//! Forecast sentence interpretation.
//!
//! The backend describes each medicine's outlook as a sentence ("needed in 3 days",
//! "sufficient for now", "already depleted", or an error message). This module turns that
//! sentence into a typed [`ForecastAssessment`] using an ordered rule table: the first rule
//! whose predicate holds decides the outcome, and text no rule recognises falls through to a
//! neutral assessment. Interpretation never fails.
//!
//! The phrase set pinned by the tests below is the backend's current vocabulary.

use crate::constants::URGENT_FORECAST_DAYS;
use crate::stock::SeverityTier;
use regex::Regex;
use std::sync::LazyLock;

static FIRST_INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("static pattern"));

/// Display tier of a forecast.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ForecastTier {
    Severity(SeverityTier),
    /// Depletion is projected but not imminent. Informational, not a warning.
    Monitor,
    /// The sentence did not match any known shape.
    Neutral,
}

/// Why a forecast received its tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ForecastReason {
    AlreadyDepleted,
    DepletesToday,
    DepletesSoon,
    DepletesLater,
    Sufficient,
    Unrecognised,
}

impl ForecastReason {
    pub fn tier(self) -> ForecastTier {
        match self {
            ForecastReason::AlreadyDepleted | ForecastReason::DepletesToday => {
                ForecastTier::Severity(SeverityTier::Critical)
            }
            ForecastReason::DepletesSoon => ForecastTier::Severity(SeverityTier::Warning),
            ForecastReason::DepletesLater => ForecastTier::Monitor,
            ForecastReason::Sufficient => ForecastTier::Severity(SeverityTier::Good),
            ForecastReason::Unrecognised => ForecastTier::Neutral,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ForecastReason::AlreadyDepleted => "Depleted",
            ForecastReason::DepletesToday => "Critical",
            ForecastReason::DepletesSoon => "Urgent",
            ForecastReason::DepletesLater => "Monitor",
            ForecastReason::Sufficient => "Good",
            ForecastReason::Unrecognised => "Analysis",
        }
    }

    fn carries_days(self) -> bool {
        matches!(
            self,
            ForecastReason::DepletesToday
                | ForecastReason::DepletesSoon
                | ForecastReason::DepletesLater
        )
    }
}

/// Typed reading of one forecast sentence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ForecastAssessment {
    pub tier: ForecastTier,
    /// Days until depletion, when the sentence states one.
    pub days_remaining: Option<u32>,
    pub reason: ForecastReason,
}

impl ForecastAssessment {
    pub fn label(&self) -> &'static str {
        self.reason.label()
    }
}

/// Tier plus short badge label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ForecastReading {
    pub tier: ForecastTier,
    pub label: &'static str,
}

struct ForecastRule {
    reason: ForecastReason,
    matches: fn(&str, u32) -> bool,
}

fn projects_depletion(text: &str) -> bool {
    text.contains("needed in") && !text.contains("sufficient")
}

fn already_depleted(text: &str, _days: u32) -> bool {
    text.contains("already depleted")
}

fn depletes_today(text: &str, _days: u32) -> bool {
    text.contains("needed in 0 days")
}

fn depletes_soon(text: &str, days: u32) -> bool {
    projects_depletion(text) && days <= URGENT_FORECAST_DAYS
}

fn depletes_later(text: &str, _days: u32) -> bool {
    projects_depletion(text)
}

fn sufficient(text: &str, _days: u32) -> bool {
    text.contains("sufficient")
}

/// Evaluated top-down; order is precedence.
const RULES: &[ForecastRule] = &[
    ForecastRule {
        reason: ForecastReason::AlreadyDepleted,
        matches: already_depleted,
    },
    ForecastRule {
        reason: ForecastReason::DepletesToday,
        matches: depletes_today,
    },
    ForecastRule {
        reason: ForecastReason::DepletesSoon,
        matches: depletes_soon,
    },
    ForecastRule {
        reason: ForecastReason::DepletesLater,
        matches: depletes_later,
    },
    ForecastRule {
        reason: ForecastReason::Sufficient,
        matches: sufficient,
    },
];

/// First run of ASCII digits in `text`, or 0 when there is none.
///
/// Values too large for `u32` saturate, which keeps them on the non-urgent side.
pub fn first_integer(text: &str) -> u32 {
    FIRST_INTEGER
        .find(text)
        .map(|m| m.as_str().parse::<u32>().unwrap_or(u32::MAX))
        .unwrap_or(0)
}

/// Assess a forecast sentence.
pub fn assess(text: &str) -> ForecastAssessment {
    let days = first_integer(text);
    let reason = RULES
        .iter()
        .find(|rule| (rule.matches)(text, days))
        .map(|rule| rule.reason)
        .unwrap_or(ForecastReason::Unrecognised);

    ForecastAssessment {
        tier: reason.tier(),
        days_remaining: reason.carries_days().then_some(days),
        reason,
    }
}

/// Tier and label for a forecast sentence.
pub fn interpret(text: &str) -> ForecastReading {
    let assessment = assess(text);
    ForecastReading {
        tier: assessment.tier,
        label: assessment.label(),
    }
}

//! # Medicine Tracker Core
//!
//! Client-side logic for the Medicine Tracker:
//! - Parsing spoken or typed usage lines into a name and quantity
//! - Fuzzy-suggestion lookup with an explicit "did you mean" choice
//! - Stock severity classification and forecast interpretation
//! - The usage intake state machine and the read-side dashboard operations
//!
//! **No transport concerns**: the HTTP client lives in `api-client` and is plugged in through
//! [`InventoryApi`]. Binaries (`cli`, the interactive console) own logging setup and stdin.

pub mod api;
pub mod config;
pub mod constants;
pub mod dashboard;
pub mod error;
pub mod forecast;
pub mod intake;
pub mod notice;
pub mod speech;
pub mod stock;
pub mod suggestions;
pub mod transcript;
pub mod views;

#[cfg(test)]
mod testing;

pub use api::{ApiError, ApiResult, InventoryApi};
pub use config::{CoreConfig, SpeechInput, SuggestionFailurePolicy};
pub use dashboard::Dashboard;
pub use error::{IntakeError, IntakeResult};
pub use forecast::{
    assess, interpret, ForecastAssessment, ForecastReading, ForecastReason, ForecastTier,
};
pub use intake::{IntakeController, IntakeState, SubmitOutcome, SuggestionOutcome};
pub use notice::{Notice, NoticeLevel};
pub use speech::{RecognitionError, SpeechRecogniser, UnavailableRecogniser};
pub use stock::{classify, DashboardStats, SeverityTier, StockBucket, StockThresholds};
pub use suggestions::{Choice, Disambiguation, SuggestionResolver};
pub use transcript::ParsedCandidate;

// Wire types that appear in this crate's public signatures.
pub use medtrack_wire::{LogUsageReply, LogUsageRequest, SuggestionItem};

//! Constants used throughout the Medicine Tracker core crate.
//!
//! Defaults, environment variable names and the user-facing notice texts live here so that
//! the binaries and tests agree on them.

/// Backend base URL used when none is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

/// Remaining quantity at or below which stock is critical (red).
pub const DEFAULT_RED_THRESHOLD: f64 = 29.0;

/// Remaining quantity at or below which stock is low (orange).
pub const DEFAULT_ORANGE_THRESHOLD: f64 = 30.0;

/// Remaining quantity at or below which stock needs watching (yellow).
pub const DEFAULT_YELLOW_THRESHOLD: f64 = 40.0;

/// Forecasts depleting within this many days are urgent.
pub const URGENT_FORECAST_DAYS: u32 = 7;

/// Per-request timeout for backend calls.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

pub const ENV_API_BASE_URL: &str = "MEDTRACK_API_BASE_URL";
/// Accepted for compatibility with the web dashboard's `.env` files.
pub const ENV_LEGACY_API_BASE_URL: &str = "VITE_API_BASE_URL";
pub const ENV_RED_THRESHOLD: &str = "MEDTRACK_RED_THRESHOLD";
pub const ENV_ORANGE_THRESHOLD: &str = "MEDTRACK_ORANGE_THRESHOLD";
pub const ENV_YELLOW_THRESHOLD: &str = "MEDTRACK_YELLOW_THRESHOLD";
pub const ENV_SPEECH_INPUT: &str = "MEDTRACK_SPEECH_INPUT";
pub const ENV_SUGGESTION_FAILURE: &str = "MEDTRACK_SUGGESTION_FAILURE";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "MEDTRACK_HTTP_TIMEOUT_SECS";

/// Prompt shown when speech capture starts.
pub const SPEAK_PROMPT: &str = "Please speak the medicine name and quantity (e.g., 'betadine 5').";

/// Shown when a usage submission is attempted with an empty draft.
pub const EMPTY_USAGE_MESSAGE: &str = "Please enter usage information";

/// Shown when the backend rejects a usage line without giving a reason.
pub const USAGE_FORMAT_HINT: &str =
    "Failed to log usage. Check format: 'medicine_name quantity'";

/// Shown when the restock form is incomplete.
pub const RESTOCK_INCOMPLETE_MESSAGE: &str = "Please select a medicine and enter quantity";

/// Shown when a submission is attempted while a suggestion list is open.
pub const CHOOSE_FIRST_MESSAGE: &str = "Choose a suggestion or dismiss the list first";

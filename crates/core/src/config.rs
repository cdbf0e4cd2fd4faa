//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the controller and
//! dashboard. Environment access goes through a lookup closure so that request handling and
//! tests never read process-wide state.

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_HTTP_TIMEOUT_SECS, ENV_API_BASE_URL, ENV_HTTP_TIMEOUT_SECS,
    ENV_LEGACY_API_BASE_URL, ENV_ORANGE_THRESHOLD, ENV_RED_THRESHOLD, ENV_SPEECH_INPUT,
    ENV_SUGGESTION_FAILURE, ENV_YELLOW_THRESHOLD,
};
use crate::stock::StockThresholds;
use crate::{IntakeError, IntakeResult};
use std::time::Duration;

/// Where speech transcripts come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpeechInput {
    /// No speech capability; starting capture reports it once.
    Disabled,
    /// Transcripts arrive as lines on the console (for example piped from an external
    /// speech-to-text engine).
    Console,
}

impl std::str::FromStr for SpeechInput {
    type Err = IntakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "off" | "disabled" => Ok(SpeechInput::Disabled),
            "stdin" | "console" => Ok(SpeechInput::Console),
            other => Err(IntakeError::InvalidInput(format!(
                "{ENV_SPEECH_INPUT} must be one of none, stdin (got {other:?})"
            ))),
        }
    }
}

/// What the user sees when the suggestion service cannot be reached.
///
/// Either way the raw transcript becomes the draft.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SuggestionFailurePolicy {
    /// Log the failure only.
    #[default]
    LogOnly,
    /// Also raise an error notice.
    Notify,
}

impl std::str::FromStr for SuggestionFailurePolicy {
    type Err = IntakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "log" | "log-only" => Ok(SuggestionFailurePolicy::LogOnly),
            "notify" => Ok(SuggestionFailurePolicy::Notify),
            other => Err(IntakeError::InvalidInput(format!(
                "{ENV_SUGGESTION_FAILURE} must be one of log, notify (got {other:?})"
            ))),
        }
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    api_base_url: String,
    thresholds: StockThresholds,
    speech_input: SpeechInput,
    suggestion_failure: SuggestionFailurePolicy,
    http_timeout: Duration,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// The base URL must be an `http://` or `https://` URL; a trailing slash is dropped.
    pub fn new(
        api_base_url: impl Into<String>,
        thresholds: StockThresholds,
        speech_input: SpeechInput,
        suggestion_failure: SuggestionFailurePolicy,
        http_timeout: Duration,
    ) -> IntakeResult<Self> {
        let api_base_url = api_base_url.into().trim().trim_end_matches('/').to_owned();
        if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
            return Err(IntakeError::InvalidInput(format!(
                "API base URL must start with http:// or https:// (got {api_base_url:?})"
            )));
        }
        if http_timeout.is_zero() {
            return Err(IntakeError::InvalidInput(
                "HTTP timeout must be greater than zero".into(),
            ));
        }

        Ok(Self {
            api_base_url,
            thresholds,
            speech_input,
            suggestion_failure,
            http_timeout,
        })
    }

    /// Resolve configuration from a key lookup, normally `|k| std::env::var(k).ok()`.
    ///
    /// Unset or blank values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> IntakeResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };

        let api_base_url = value(ENV_API_BASE_URL)
            .or_else(|| value(ENV_LEGACY_API_BASE_URL))
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.into());

        let defaults = StockThresholds::default();
        let thresholds = StockThresholds::new(
            parse_number(ENV_RED_THRESHOLD, value(ENV_RED_THRESHOLD))?.unwrap_or(defaults.red()),
            parse_number(ENV_ORANGE_THRESHOLD, value(ENV_ORANGE_THRESHOLD))?
                .unwrap_or(defaults.orange()),
            parse_number(ENV_YELLOW_THRESHOLD, value(ENV_YELLOW_THRESHOLD))?
                .unwrap_or(defaults.yellow()),
        )?;

        let speech_input = value(ENV_SPEECH_INPUT)
            .map(|v| v.parse())
            .transpose()?
            .unwrap_or(SpeechInput::Console);

        let suggestion_failure = value(ENV_SUGGESTION_FAILURE)
            .map(|v| v.parse())
            .transpose()?
            .unwrap_or_default();

        let timeout_secs = match value(ENV_HTTP_TIMEOUT_SECS) {
            Some(v) => v.parse::<u64>().map_err(|_| {
                IntakeError::InvalidInput(format!(
                    "{ENV_HTTP_TIMEOUT_SECS} must be a whole number of seconds (got {v:?})"
                ))
            })?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Self::new(
            api_base_url,
            thresholds,
            speech_input,
            suggestion_failure,
            Duration::from_secs(timeout_secs),
        )
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn thresholds(&self) -> StockThresholds {
        self.thresholds
    }

    pub fn speech_input(&self) -> SpeechInput {
        self.speech_input
    }

    pub fn suggestion_failure(&self) -> SuggestionFailurePolicy {
        self.suggestion_failure
    }

    pub fn http_timeout(&self) -> Duration {
        self.http_timeout
    }
}

fn parse_number(key: &str, value: Option<String>) -> IntakeResult<Option<f64>> {
    value
        .map(|v| {
            v.parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or_else(|| IntakeError::InvalidInput(format!("{key} must be a number (got {v:?})")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = CoreConfig::from_lookup(lookup(&[])).expect("defaults");
        assert_eq!(cfg.api_base_url(), DEFAULT_API_BASE_URL);
        assert_eq!(cfg.thresholds(), StockThresholds::default());
        assert_eq!(cfg.speech_input(), SpeechInput::Console);
        assert_eq!(cfg.suggestion_failure(), SuggestionFailurePolicy::LogOnly);
        assert_eq!(cfg.http_timeout(), Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS));
    }

    #[test]
    fn reads_overrides() {
        let cfg = CoreConfig::from_lookup(lookup(&[
            (ENV_API_BASE_URL, "http://inventory.local:8080/"),
            (ENV_RED_THRESHOLD, "10"),
            (ENV_ORANGE_THRESHOLD, "20"),
            (ENV_YELLOW_THRESHOLD, "35.5"),
            (ENV_SPEECH_INPUT, "none"),
            (ENV_SUGGESTION_FAILURE, "notify"),
            (ENV_HTTP_TIMEOUT_SECS, "3"),
        ]))
        .expect("overrides");

        assert_eq!(cfg.api_base_url(), "http://inventory.local:8080");
        assert_eq!(cfg.thresholds().red(), 10.0);
        assert_eq!(cfg.thresholds().yellow(), 35.5);
        assert_eq!(cfg.speech_input(), SpeechInput::Disabled);
        assert_eq!(cfg.suggestion_failure(), SuggestionFailurePolicy::Notify);
        assert_eq!(cfg.http_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn falls_back_to_legacy_base_url_name() {
        let cfg = CoreConfig::from_lookup(lookup(&[(ENV_LEGACY_API_BASE_URL, "https://x.test")]))
            .expect("legacy");
        assert_eq!(cfg.api_base_url(), "https://x.test");
    }

    #[test]
    fn blank_values_use_defaults() {
        let cfg = CoreConfig::from_lookup(lookup(&[(ENV_RED_THRESHOLD, "  ")])).expect("blank");
        assert_eq!(cfg.thresholds().red(), 29.0);
    }

    #[test]
    fn rejects_bad_values() {
        for (key, bad) in [
            (ENV_API_BASE_URL, "localhost:5000"),
            (ENV_RED_THRESHOLD, "many"),
            (ENV_SPEECH_INPUT, "microphone"),
            (ENV_SUGGESTION_FAILURE, "shout"),
            (ENV_HTTP_TIMEOUT_SECS, "0"),
        ] {
            let err = CoreConfig::from_lookup(lookup(&[(key, bad)]))
                .expect_err("should reject bad value");
            assert!(matches!(err, IntakeError::InvalidInput(_)), "{key}: {err:?}");
        }
    }

    #[test]
    fn rejects_decreasing_thresholds() {
        let err = CoreConfig::from_lookup(lookup(&[(ENV_RED_THRESHOLD, "50")]))
            .expect_err("red above orange");
        assert!(matches!(err, IntakeError::InvalidInput(_)));
    }
}

//! Usage intake controller.
//!
//! Drives one usage entry from speech (or typed text) to submission:
//!
//! ```text
//! Idle -> Listening -> Parsed -> AwaitingDisambiguation -> ReadyToSubmit -> Submitting -> Idle
//!                            \-> ReadyToSubmit (no matches / fetch failed)        \-> Error
//! ```
//!
//! The controller owns the draft text and the single disambiguation session; views borrow
//! it. Every listening session bumps a generation counter. Suggestion replies carry the
//! generation they were requested under and are discarded if a newer session has started,
//! so a slow reply for an old utterance can never open a dialog over a new one.
//!
//! The step methods (`begin_listening`, `accept_utterance`, `apply_suggestions`, `choose`,
//! `begin_submit`, `finish_submit`) are synchronous so that an event loop can interleave
//! them with in-flight requests. [`IntakeController::listen`] and
//! [`IntakeController::submit`] chain them for the common sequential case.

use crate::api::{ApiResult, InventoryApi};
use crate::config::{CoreConfig, SuggestionFailurePolicy};
use crate::constants::{
    CHOOSE_FIRST_MESSAGE, EMPTY_USAGE_MESSAGE, SPEAK_PROMPT, USAGE_FORMAT_HINT,
};
use crate::dashboard::Dashboard;
use crate::notice::Notice;
use crate::speech::{RecognitionError, SpeechRecogniser};
use crate::stock::{DashboardStats, StockThresholds};
use crate::suggestions::{Disambiguation, SuggestionFetchFailed, SuggestionResolver};
use crate::transcript::{parse, ParsedCandidate};
use crate::{IntakeError, IntakeResult};
use medtrack_types::NonEmptyText;
use medtrack_wire::{LogUsageReply, LogUsageRequest, SuggestionItem};

/// Where the controller is in the intake flow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IntakeState {
    Idle,
    Listening,
    /// Utterance parsed; suggestion lookup outstanding.
    Parsed,
    AwaitingDisambiguation,
    ReadyToSubmit,
    Submitting,
    /// Last action failed. Behaves like `Idle` for the next action.
    Error(String),
}

/// Proof of a listening session, tagged with its generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListenTicket {
    generation: u64,
}

/// Suggestion lookup to perform for a parsed utterance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SuggestionRequest {
    generation: u64,
    pub candidate: ParsedCandidate,
    /// The utterance as captured, used verbatim when no suggestion applies.
    pub transcript: String,
}

/// What a suggestion reply did to the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SuggestionOutcome {
    /// A dialog is open; the user must choose.
    Disambiguate,
    /// No close matches; the transcript is the draft.
    NoMatches,
    /// Lookup failed; the transcript is the draft.
    FetchFailed,
    /// The reply belonged to a superseded session and was ignored.
    Discarded,
}

/// Result of a successful submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmitOutcome {
    /// Backend confirmation, e.g. "Logged 5.0ml for betadine".
    pub message: String,
    /// Refreshed counters, `None` if the refresh failed.
    pub stats: Option<DashboardStats>,
}

pub struct IntakeController {
    state: IntakeState,
    draft: String,
    disambiguation: Option<Disambiguation>,
    generation: u64,
    /// Draft text as it was when the pending submission was sent.
    in_flight: Option<String>,
    speech_disabled: bool,
    failure_policy: SuggestionFailurePolicy,
    thresholds: StockThresholds,
    notices: Vec<Notice>,
}

impl IntakeController {
    pub fn new(thresholds: StockThresholds, failure_policy: SuggestionFailurePolicy) -> Self {
        Self {
            state: IntakeState::Idle,
            draft: String::new(),
            disambiguation: None,
            generation: 0,
            in_flight: None,
            speech_disabled: false,
            failure_policy,
            thresholds,
            notices: Vec::new(),
        }
    }

    pub fn from_config(cfg: &CoreConfig) -> Self {
        Self::new(cfg.thresholds(), cfg.suggestion_failure())
    }

    pub fn state(&self) -> &IntakeState {
        &self.state
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// The open "did you mean" session, if any.
    pub fn disambiguation(&self) -> Option<&Disambiguation> {
        self.disambiguation.as_ref()
    }

    /// Drain notices raised since the last call, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    fn is_busy(&self) -> Option<&'static str> {
        match self.state {
            IntakeState::Listening => Some("speech capture"),
            IntakeState::Submitting => Some("submission"),
            _ => None,
        }
    }

    /// Replace the draft with typed text. Does not touch an in-flight capture or submission;
    /// an edit made while submitting survives the submission's success.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
        match self.state {
            IntakeState::Listening
            | IntakeState::Parsed
            | IntakeState::AwaitingDisambiguation
            | IntakeState::Submitting => {}
            _ if self.draft.trim().is_empty() => self.state = IntakeState::Idle,
            _ => self.state = IntakeState::ReadyToSubmit,
        }
    }

    // ------------------------------------------------------------------------
    // Speech capture
    // ------------------------------------------------------------------------

    /// Start a listening session.
    ///
    /// Starting a session invalidates any suggestion lookup still in flight and discards an
    /// unresolved dialog.
    ///
    /// # Errors
    ///
    /// `CapabilityUnavailable` when the host has no speech input. The first such failure
    /// raises a notice and disables speech for the rest of the session. `Busy` while a
    /// capture or submission is running.
    pub fn begin_listening(&mut self, speech_available: bool) -> IntakeResult<ListenTicket> {
        if self.speech_disabled {
            return Err(IntakeError::CapabilityUnavailable);
        }
        if !speech_available {
            self.speech_disabled = true;
            tracing::warn!("speech input unavailable; disabling for this session");
            self.notify(Notice::error(
                "Speech Not Supported",
                "Speech recognition is not supported on this host.",
            ));
            return Err(IntakeError::CapabilityUnavailable);
        }
        if let Some(what) = self.is_busy() {
            return Err(IntakeError::Busy(what));
        }

        self.generation += 1;
        if self.disambiguation.take().is_some() {
            tracing::debug!("discarding unresolved suggestion dialog");
        }
        self.state = IntakeState::Listening;
        self.notify(Notice::info("Listening...", SPEAK_PROMPT));

        Ok(ListenTicket {
            generation: self.generation,
        })
    }

    fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Record a speech engine error for the session `ticket`.
    ///
    /// Returns the error to propagate.
    pub fn recognition_failed(
        &mut self,
        ticket: ListenTicket,
        error: RecognitionError,
    ) -> IntakeError {
        if !self.is_current(ticket.generation) {
            return IntakeError::Superseded;
        }
        tracing::error!("speech recognition error: {error}");
        self.notify(Notice::error(
            "Speech Recognition Error",
            format!("Error: {error}. Please try again."),
        ));
        self.state = IntakeState::Error(format!("speech recognition error: {error}"));
        IntakeError::Recognition(error)
    }

    /// Parse a completed utterance and return the suggestion lookup to perform.
    ///
    /// # Errors
    ///
    /// `Superseded` if a newer session started since `ticket` was issued. `Validation` if the
    /// utterance holds no usable name; the transcript is kept as the draft for correction.
    pub fn accept_utterance(
        &mut self,
        ticket: ListenTicket,
        transcript: &str,
    ) -> IntakeResult<SuggestionRequest> {
        if !self.is_current(ticket.generation) || self.state != IntakeState::Listening {
            return Err(IntakeError::Superseded);
        }

        let candidate = parse(transcript);
        if candidate.name.is_empty() {
            let message = format!("Could not parse clearly. Please check: \"{transcript}\"");
            self.draft = transcript.to_owned();
            self.notify(Notice::error("Text Captured", message.clone()));
            self.state = IntakeState::Error(message.clone());
            return Err(IntakeError::Validation(message));
        }

        tracing::debug!(name = %candidate.name, quantity = ?candidate.quantity, "parsed utterance");
        self.state = IntakeState::Parsed;
        Ok(SuggestionRequest {
            generation: self.generation,
            candidate,
            transcript: transcript.to_owned(),
        })
    }

    /// Apply the outcome of a suggestion lookup.
    pub fn apply_suggestions(
        &mut self,
        request: &SuggestionRequest,
        reply: Result<Vec<SuggestionItem>, SuggestionFetchFailed>,
    ) -> SuggestionOutcome {
        if !self.is_current(request.generation) || self.state != IntakeState::Parsed {
            tracing::debug!(
                stale = request.generation,
                current = self.generation,
                "discarding suggestion reply"
            );
            return SuggestionOutcome::Discarded;
        }

        match reply {
            Ok(items) => match Disambiguation::open(items, &request.candidate) {
                Some(session) => {
                    self.disambiguation = Some(session);
                    self.state = IntakeState::AwaitingDisambiguation;
                    SuggestionOutcome::Disambiguate
                }
                None => {
                    self.use_transcript(request);
                    self.notify(Notice::info(
                        "Text Captured",
                        format!(
                            "No close matches found for \"{}\". Please verify.",
                            request.candidate.name
                        ),
                    ));
                    SuggestionOutcome::NoMatches
                }
            },
            Err(err) => {
                tracing::warn!("{err}; using raw transcript");
                self.use_transcript(request);
                if self.failure_policy == SuggestionFailurePolicy::Notify {
                    self.notify(Notice::error(
                        "Error",
                        "Could not fetch suggestions. Populating with raw text.",
                    ));
                }
                SuggestionOutcome::FetchFailed
            }
        }
    }

    fn use_transcript(&mut self, request: &SuggestionRequest) {
        self.draft = request.transcript.trim().to_owned();
        self.state = IntakeState::ReadyToSubmit;
    }

    /// Pick entry `index` of the open dialog's choices (the last one keeps the original).
    ///
    /// Returns the new draft.
    pub fn choose(&mut self, index: usize) -> IntakeResult<&str> {
        let session = self
            .disambiguation
            .as_ref()
            .ok_or_else(|| IntakeError::Validation("No suggestions are open".into()))?;
        let text = session.compose(index).ok_or_else(|| {
            IntakeError::Validation(format!(
                "Choice {} is out of range (1-{})",
                index + 1,
                session.choice_count()
            ))
        })?;

        self.disambiguation = None;
        self.draft = text;
        self.state = IntakeState::ReadyToSubmit;
        self.notify(Notice::info(
            "Text Corrected",
            format!("Input updated to: \"{}\"", self.draft),
        ));
        Ok(&self.draft)
    }

    /// Close the dialog without choosing. The draft is left as it was.
    pub fn dismiss(&mut self) {
        if self.disambiguation.take().is_some() {
            self.state = if self.draft.trim().is_empty() {
                IntakeState::Idle
            } else {
                IntakeState::ReadyToSubmit
            };
        }
    }

    /// Capture one utterance and resolve its name.
    ///
    /// Speech and suggestion failures are converted to notices; the returned error says why
    /// the flow stopped.
    pub async fn listen<R, A>(&mut self, recogniser: &R, api: &A) -> IntakeResult<SuggestionOutcome>
    where
        R: SpeechRecogniser + ?Sized,
        A: InventoryApi + ?Sized,
    {
        let ticket = self.begin_listening(recogniser.is_available())?;

        let transcript = match recogniser.recognise().await {
            Ok(transcript) => transcript,
            Err(err) => return Err(self.recognition_failed(ticket, err)),
        };

        let request = self.accept_utterance(ticket, &transcript)?;
        let reply = SuggestionResolver::new(api)
            .resolve(&request.candidate.name)
            .await;
        Ok(self.apply_suggestions(&request, reply))
    }

    // ------------------------------------------------------------------------
    // Submission
    // ------------------------------------------------------------------------

    /// Validate the draft and enter `Submitting`.
    ///
    /// # Errors
    ///
    /// `Validation` for an empty draft or while a suggestion list is open, `Busy` during a
    /// capture, a pending suggestion lookup or another submission. The state is unchanged.
    pub fn begin_submit(&mut self) -> IntakeResult<LogUsageRequest> {
        if let Some(what) = self.is_busy() {
            return Err(IntakeError::Busy(what));
        }
        match self.state {
            IntakeState::Parsed => return Err(IntakeError::Busy("suggestion lookup")),
            IntakeState::AwaitingDisambiguation => {
                self.notify(Notice::error("Error", CHOOSE_FIRST_MESSAGE));
                return Err(IntakeError::Validation(CHOOSE_FIRST_MESSAGE.into()));
            }
            _ => {}
        }
        let text = match NonEmptyText::new(&self.draft) {
            Ok(text) => text,
            Err(_) => {
                self.notify(Notice::error("Error", EMPTY_USAGE_MESSAGE));
                return Err(IntakeError::Validation(EMPTY_USAGE_MESSAGE.into()));
            }
        };

        self.state = IntakeState::Submitting;
        self.in_flight = Some(self.draft.clone());
        Ok(LogUsageRequest {
            text: text.into_inner(),
        })
    }

    /// Apply the backend's answer to a submission.
    ///
    /// On success the draft is cleared unless it was edited meanwhile. On any failure the
    /// draft is kept for a retry.
    pub fn finish_submit(&mut self, reply: ApiResult<LogUsageReply>) -> IntakeResult<String> {
        let sent = self.in_flight.take();
        match reply {
            Ok(LogUsageReply {
                success: true,
                message,
            }) => {
                tracing::info!(text = ?sent, "usage logged");
                if sent.as_deref() == Some(self.draft.as_str()) {
                    self.draft.clear();
                    self.state = IntakeState::Idle;
                } else if self.draft.trim().is_empty() {
                    self.state = IntakeState::Idle;
                } else {
                    self.state = IntakeState::ReadyToSubmit;
                }
                self.notify(Notice::success("Success", "Usage logged successfully"));
                Ok(message.unwrap_or_else(|| "Usage logged successfully".into()))
            }
            Ok(LogUsageReply { message, .. }) => {
                let message = message.unwrap_or_else(|| USAGE_FORMAT_HINT.into());
                tracing::warn!(text = %self.draft, "usage rejected: {message}");
                self.notify(Notice::error("Error", message.clone()));
                self.state = IntakeState::Error(message.clone());
                Err(IntakeError::SubmissionRejected(message))
            }
            Err(err) => {
                tracing::error!("error logging usage: {err}");
                self.notify(Notice::error(
                    "Error",
                    "Failed to connect to server or log usage.",
                ));
                self.state = IntakeState::Error(err.to_string());
                Err(IntakeError::Transport(err))
            }
        }
    }

    /// Submit the draft, then refresh the dashboard counters.
    pub async fn submit<A>(&mut self, api: &A) -> IntakeResult<SubmitOutcome>
    where
        A: InventoryApi + ?Sized,
    {
        let request = self.begin_submit()?;
        let reply = api.log_usage(&request).await;
        let message = self.finish_submit(reply)?;

        let stats = match Dashboard::new(api, self.thresholds).stats().await {
            Ok(stats) => Some(stats),
            Err(err) => {
                self.notify(Notice::from_error("fetch stats", &err));
                None
            }
        };

        Ok(SubmitOutcome { message, stats })
    }
}

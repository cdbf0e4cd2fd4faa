use crate::api::ApiError;
use crate::speech::RecognitionError;

/// Errors raised by the intake and dashboard operations.
///
/// None of these are fatal to the process: each one maps to a user-facing
/// [`Notice`](crate::notice::Notice) and leaves the controller in a terminal state.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    /// Configuration value rejected at startup.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// User input that blocks an action (empty draft, missing selection).
    #[error("{0}")]
    Validation(String),

    /// No speech input on this host. Reported once, then the feature stays off.
    #[error("speech recognition is not supported on this host")]
    CapabilityUnavailable,

    #[error("speech recognition error: {0}")]
    Recognition(#[from] RecognitionError),

    /// Network or HTTP failure talking to the backend.
    #[error("backend request failed: {0}")]
    Transport(#[from] ApiError),

    /// The backend answered `success: false`.
    #[error("{0}")]
    SubmissionRejected(String),

    /// A capture or submission is already running.
    #[error("another {0} is already in progress")]
    Busy(&'static str),

    /// The utterance belongs to a listening session that a newer one replaced.
    #[error("utterance belongs to a superseded listening session")]
    Superseded,
}

pub type IntakeResult<T> = std::result::Result<T, IntakeError>;

use async_trait::async_trait;

/// Failure reported by a speech engine during a capture.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecognitionError {
    /// The capture ended without any transcript.
    #[error("no-speech")]
    NoSpeech,
    /// Engine-specific failure code or message.
    #[error("{0}")]
    Engine(String),
}

/// Speech-to-text source for the intake controller.
///
/// One call to [`recognise`](SpeechRecogniser::recognise) is one capture session: it
/// completes with a single final transcript or an error.
#[async_trait]
pub trait SpeechRecogniser: Send + Sync {
    /// Whether the host offers speech input at all.
    fn is_available(&self) -> bool;

    /// Capture one utterance.
    async fn recognise(&self) -> Result<String, RecognitionError>;
}

/// [`SpeechRecogniser`] for hosts without speech input.
pub struct UnavailableRecogniser;

#[async_trait]
impl SpeechRecogniser for UnavailableRecogniser {
    fn is_available(&self) -> bool {
        false
    }

    async fn recognise(&self) -> Result<String, RecognitionError> {
        Err(RecognitionError::Engine("not-supported".into()))
    }
}

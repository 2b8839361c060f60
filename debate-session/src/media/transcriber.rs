use crate::error::TranscriptionError;

/// Speech-to-text engine run/stop control. Recognized sentences are fed back
/// through [`crate::CallHandle::submit_utterance`].
pub trait Transcriber: Send + Sync {
    fn start(&self) -> Result<(), TranscriptionError>;

    fn stop(&self);
}

/// Used when no speech engine is available.
pub struct NoopTranscriber;

impl Transcriber for NoopTranscriber {
    fn start(&self) -> Result<(), TranscriptionError> {
        Err(TranscriptionError::Unavailable(
            "no speech recognition engine".into(),
        ))
    }

    fn stop(&self) {}
}

use debate_core::RoomCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document not found: {0}")]
    NotFound(String),
    #[error("store write failed: {0}")]
    WriteFailed(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("webrtc: {0}")]
    Rtc(#[from] webrtc::Error),
    #[error("malformed candidate: {0}")]
    InvalidCandidate(#[from] serde_json::Error),
    #[error("remote description is not set")]
    NoRemoteDescription,
    #[error("connection is closed")]
    Closed,
    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("media access denied: {0}")]
    AccessDenied(String),
    #[error("media setup failed: {0}")]
    Setup(String),
}

#[derive(Debug, Error)]
pub enum TranscriptionError {
    #[error("transcription unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum FactCheckError {
    #[error("fact-check request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("fact-check service returned {status}: {message}")]
    Status { status: u16, message: String },
}

/// The room field a side writes exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalField {
    Offer,
    Answer,
}

#[derive(Debug, Error)]
pub enum NegotiationError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("{0:?} was already written in this negotiation")]
    AlreadyWritten(SignalField),
    #[error("room has no offer")]
    OfferMissing,
    #[error("room record disappeared")]
    RoomMissing,
}

/// Errors that end a call attempt and are shown to the user.
#[derive(Debug, Error)]
pub enum CallError {
    #[error("camera/microphone access denied: {0}")]
    MediaAccessDenied(String),
    #[error("camera/microphone unavailable: {0}")]
    MediaUnavailable(String),
    #[error("room {0} not found")]
    RoomNotFound(RoomCode),
    #[error("room {0} has no offer")]
    OfferMissing(RoomCode),
    #[error("negotiation failed: {0}")]
    NegotiationFailed(NegotiationError),
    #[error("room store unavailable: {0}")]
    StoreUnavailable(StoreError),
    #[error("call has ended")]
    Ended,
}

impl CallError {
    /// Maps a negotiation failure of `code` onto what the user is told.
    pub fn negotiation(code: &RoomCode, e: NegotiationError) -> Self {
        match e {
            NegotiationError::OfferMissing => CallError::OfferMissing(code.clone()),
            NegotiationError::RoomMissing => CallError::RoomNotFound(code.clone()),
            e => CallError::NegotiationFailed(e),
        }
    }
}

impl From<MediaError> for CallError {
    fn from(e: MediaError) -> Self {
        match e {
            MediaError::AccessDenied(reason) => CallError::MediaAccessDenied(reason),
            MediaError::Setup(reason) => CallError::MediaUnavailable(reason),
        }
    }
}

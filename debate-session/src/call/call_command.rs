use crate::error::CallError;
use debate_core::TranscriptMessage;
use tokio::sync::oneshot;

pub type PublishReply = oneshot::Sender<Result<Option<TranscriptMessage>, CallError>>;

/// Requests sent from a [`crate::CallHandle`] to the running call.
#[derive(Debug)]
pub enum CallCommand {
    ToggleMic { reply: oneshot::Sender<bool> },

    ToggleCamera { reply: oneshot::Sender<bool> },

    /// A sentence recognized by the transcriber.
    Utterance { text: String, reply: PublishReply },

    Chat { text: String, reply: PublishReply },

    HangUp {
        delete_room_data: bool,
        reply: oneshot::Sender<()>,
    },
}

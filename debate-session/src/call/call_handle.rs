use crate::call::{CallCommand, CallStatus};
use crate::error::CallError;
use debate_core::{ConnectionPhase, Role, RoomInfo, TranscriptMessage};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot, watch};

/// Cloneable control surface of a running [`crate::DebateCall`].
#[derive(Clone)]
pub struct CallHandle {
    room: RoomInfo,
    role: Role,
    command_tx: mpsc::Sender<CallCommand>,
    status_rx: watch::Receiver<CallStatus>,
    messages_tx: broadcast::Sender<TranscriptMessage>,
}

impl CallHandle {
    pub(crate) fn new(
        room: RoomInfo,
        role: Role,
        command_tx: mpsc::Sender<CallCommand>,
        status_rx: watch::Receiver<CallStatus>,
        messages_tx: broadcast::Sender<TranscriptMessage>,
    ) -> Self {
        Self {
            room,
            role,
            command_tx,
            status_rx,
            messages_tx,
        }
    }

    pub fn room(&self) -> &RoomInfo {
        &self.room
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn status(&self) -> CallStatus {
        self.status_rx.borrow().clone()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<CallStatus> {
        self.status_rx.clone()
    }

    /// Messages of both sides as they land in the room, from now on.
    pub fn subscribe_messages(&self) -> broadcast::Receiver<TranscriptMessage> {
        self.messages_tx.subscribe()
    }

    pub async fn toggle_mic(&self) -> Result<bool, CallError> {
        self.request(|reply| CallCommand::ToggleMic { reply }).await
    }

    pub async fn toggle_camera(&self) -> Result<bool, CallError> {
        self.request(|reply| CallCommand::ToggleCamera { reply }).await
    }

    /// Fact-checks and stores a recognized sentence. `Ok(None)` for blank text.
    pub async fn submit_utterance(
        &self,
        text: impl Into<String>,
    ) -> Result<Option<TranscriptMessage>, CallError> {
        let text = text.into();
        self.request(|reply| CallCommand::Utterance { text, reply }).await?
    }

    pub async fn send_chat(
        &self,
        text: impl Into<String>,
    ) -> Result<Option<TranscriptMessage>, CallError> {
        let text = text.into();
        self.request(|reply| CallCommand::Chat { text, reply }).await?
    }

    /// Ends the call. Hanging up a call that already ended is not an error.
    pub async fn hang_up(&self, delete_room_data: bool) -> Result<(), CallError> {
        match self
            .request(|reply| CallCommand::HangUp {
                delete_room_data,
                reply,
            })
            .await
        {
            Ok(()) | Err(CallError::Ended) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Waits until the connection reports `phase`. Returns `false` on timeout
    /// or when the call ends first.
    pub async fn wait_for_phase(&self, phase: ConnectionPhase, timeout: Duration) -> bool {
        let mut rx = self.status_rx.clone();
        let reached = tokio::time::timeout(
            timeout,
            rx.wait_for(|s| s.phase == phase || s.ended.is_some()),
        )
        .await;
        match reached {
            Ok(Ok(status)) => status.phase == phase,
            _ => false,
        }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> CallCommand,
    ) -> Result<T, CallError> {
        let (reply, rx) = oneshot::channel();
        self.command_tx
            .send(build(reply))
            .await
            .map_err(|_| CallError::Ended)?;
        rx.await.map_err(|_| CallError::Ended)
    }
}

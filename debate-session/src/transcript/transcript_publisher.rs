use crate::error::StoreError;
use crate::negotiation::SignalEvent;
use crate::store::{ChangeKind, RoomStore, Subscription};
use crate::transcript::FactChecker;
use debate_core::utils::now_millis;
use debate_core::{Collection, FactCheckRequest, MessageKind, RoomCode, TranscriptMessage};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Writes transcript lines into the room's `messages` collection, fact-checking
/// spoken ones first.
#[derive(Clone)]
pub struct TranscriptPublisher {
    store: Arc<dyn RoomStore>,
    checker: Arc<dyn FactChecker>,
    room: RoomCode,
    topic: String,
    speaker: String,
}

impl TranscriptPublisher {
    pub fn new(
        store: Arc<dyn RoomStore>,
        checker: Arc<dyn FactChecker>,
        room: RoomCode,
        topic: impl Into<String>,
        speaker: impl Into<String>,
    ) -> Self {
        Self {
            store,
            checker,
            room,
            topic: topic.into(),
            speaker: speaker.into(),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn speaker(&self) -> &str {
        &self.speaker
    }

    /// Checks and stores one recognized sentence. A failed check still stores
    /// the line, with neither verdict nor reason. Blank input is ignored.
    pub async fn publish_utterance(
        &self,
        text: &str,
    ) -> Result<Option<TranscriptMessage>, StoreError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let request = FactCheckRequest {
            utterance: text.to_owned(),
            topic: self.topic.clone(),
        };
        let (verdict, reason) = match self.checker.check(&request).await {
            Ok(v) => (v.verdict, Some(v.reason)),
            Err(e) => {
                warn!("Fact-check unavailable: {}", e);
                (None, None)
            }
        };

        let message = TranscriptMessage {
            kind: MessageKind::Stt,
            speaker: self.speaker.clone(),
            text: text.to_owned(),
            verdict,
            reason,
            timestamp: now_millis(),
        };
        self.store_message(&message).await?;
        Ok(Some(message))
    }

    pub async fn publish_chat(&self, text: &str) -> Result<Option<TranscriptMessage>, StoreError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        let message = TranscriptMessage {
            kind: MessageKind::Chat,
            speaker: self.speaker.clone(),
            text: text.to_owned(),
            verdict: None,
            reason: None,
            timestamp: now_millis(),
        };
        self.store_message(&message).await?;
        Ok(Some(message))
    }

    /// Forwards every message of the room, both sides, as
    /// [`SignalEvent::Message`].
    pub fn watch(&self, signal_tx: mpsc::UnboundedSender<SignalEvent>) -> Subscription {
        self.store.watch_collection(
            &self.room,
            Collection::Messages,
            Box::new(move |change| {
                if change.kind != ChangeKind::Added {
                    return;
                }
                match serde_json::from_value::<TranscriptMessage>(change.data) {
                    Ok(message) => {
                        let _ = signal_tx.send(SignalEvent::Message(message));
                    }
                    Err(e) => warn!("Skipping malformed message {}: {}", change.id, e),
                }
            }),
        )
    }

    async fn store_message(&self, message: &TranscriptMessage) -> Result<(), StoreError> {
        let data = serde_json::to_value(message)
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        let id = self
            .store
            .append(&self.room, Collection::Messages, data)
            .await?;
        debug!("Message {} stored in room {}", id, self.room);
        if message.kind == MessageKind::Stt {
            info!(
                "Utterance by {} stored with verdict {:?}",
                message.speaker, message.verdict
            );
        }
        Ok(())
    }
}

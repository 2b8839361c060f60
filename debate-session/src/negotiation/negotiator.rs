use crate::config::SessionConfig;
use crate::error::NegotiationError;
use crate::media::LocalTrack;
use crate::negotiation::{CandidateRelay, NegotiationState, SignalEvent};
use crate::store::{RoomStore, Subscription};
use crate::transport::PeerTransport;
use debate_core::{
    Candidate, ConnectionPhase, Role, RoomCode, RoomInfo, RoomPatch, RoomRecord,
    SessionDescription,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Drives one peer connection through the offer/answer exchange for one role.
pub struct SessionNegotiator {
    room: RoomCode,
    transport: Arc<dyn PeerTransport>,
    store: Arc<dyn RoomStore>,
    state: NegotiationState,
    relay: CandidateRelay,
}

impl SessionNegotiator {
    pub fn new(
        role: Role,
        room: RoomCode,
        transport: Arc<dyn PeerTransport>,
        store: Arc<dyn RoomStore>,
        config: &SessionConfig,
    ) -> Self {
        Self {
            relay: CandidateRelay::new(store.clone(), room.clone(), role),
            state: NegotiationState::new(role, config.max_pending_candidates),
            room,
            transport,
            store,
        }
    }

    pub fn role(&self) -> Role {
        self.state.role()
    }

    pub fn room(&self) -> &RoomCode {
        &self.room
    }

    pub fn state(&self) -> &NegotiationState {
        &self.state
    }

    pub fn relay(&self) -> &CandidateRelay {
        &self.relay
    }

    pub fn transport(&self) -> &Arc<dyn PeerTransport> {
        &self.transport
    }

    pub async fn attach_tracks(&self, tracks: &[LocalTrack]) -> Result<(), NegotiationError> {
        self.transport.add_local_tracks(tracks).await?;
        Ok(())
    }

    /// Creates the offer, sets it locally and publishes it onto the room
    /// record with create-or-replace.
    pub async fn start_initiator(&mut self, room: &RoomInfo) -> Result<(), NegotiationError> {
        self.state.ensure_writable()?;

        info!("Creating offer for room {}", self.room);
        let offer = self.transport.create_offer().await?;
        self.transport.set_local_description(offer.clone()).await?;
        self.state.mark_local_description();

        let record = RoomRecord {
            name: room.name.clone(),
            offer: Some(offer),
            answer: None,
            created_at: room.created_at,
        };
        self.store.set_room(&self.room, record).await?;
        self.state.mark_description_written();
        info!("Offer published to room {}", self.room);

        self.relay.flush_local(&mut self.state).await;
        Ok(())
    }

    /// Reads the offer once, answers it and merges the answer into the record.
    pub async fn start_joiner(&mut self) -> Result<(), NegotiationError> {
        self.state.ensure_writable()?;

        let record = self
            .store
            .get_room(&self.room)
            .await?
            .ok_or(NegotiationError::RoomMissing)?;
        let offer = record.offer.ok_or(NegotiationError::OfferMissing)?;

        self.apply_remote_description(offer).await?;

        info!("Creating answer for room {}", self.room);
        let answer = self.transport.create_answer().await?;
        self.transport.set_local_description(answer.clone()).await?;
        self.state.mark_local_description();

        self.store
            .merge_room(&self.room, RoomPatch::answer(answer))
            .await?;
        self.state.mark_description_written();
        info!("Answer published to room {}", self.room);

        self.relay.flush_local(&mut self.state).await;
        Ok(())
    }

    /// Sets the remote description and flushes queued remote candidates.
    /// Returns `Ok(false)` without touching the connection if one is already set.
    pub async fn apply_remote_description(
        &mut self,
        desc: SessionDescription,
    ) -> Result<bool, NegotiationError> {
        if self.state.has_remote_description() {
            debug!("Remote description already set, ignoring {:?}", desc.kind);
            return Ok(false);
        }
        self.transport.set_remote_description(desc).await?;
        self.state.mark_remote_description();
        info!("Remote description set for room {}", self.room);

        self.relay
            .flush_remote(&mut self.state, self.transport.as_ref())
            .await;
        Ok(true)
    }

    /// Subscribes the initiator to the room record.
    pub fn watch_room(&self, signal_tx: mpsc::UnboundedSender<SignalEvent>) -> Subscription {
        self.store.watch_room(
            &self.room,
            Box::new(move |change| {
                let _ = signal_tx.send(SignalEvent::RoomChanged(change.record));
            }),
        )
    }

    /// Picks the answer out of a room update. Only the first answer seen is
    /// applied; later notifications are ignored.
    pub async fn on_room_change(
        &mut self,
        record: Option<RoomRecord>,
    ) -> Result<bool, NegotiationError> {
        if self.role() != Role::Initiator || self.state.has_remote_description() {
            return Ok(false);
        }
        let Some(answer) = record.and_then(|r| r.answer) else {
            return Ok(false);
        };
        info!("Answer received for room {}", self.room);
        self.apply_remote_description(answer).await
    }

    pub async fn local_candidate(&mut self, candidate: Option<Candidate>) {
        self.relay.publish_local(&mut self.state, candidate).await;
    }

    pub async fn remote_candidate(&mut self, candidate: Candidate) {
        self.relay
            .accept_remote(&mut self.state, self.transport.as_ref(), candidate)
            .await;
    }

    /// Records a phase reported by the transport. Returns `false` for repeats.
    pub fn set_phase(&mut self, phase: ConnectionPhase) -> bool {
        self.state.set_phase(phase)
    }
}

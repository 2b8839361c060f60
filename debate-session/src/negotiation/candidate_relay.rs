use crate::negotiation::{NegotiationState, SignalEvent};
use crate::store::{ChangeKind, RoomStore, Subscription};
use crate::transport::PeerTransport;
use debate_core::{Candidate, Collection, Role, RoomCode};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Moves candidates between the connection and the room's candidate
/// collections. The initiator writes `callerCandidates` and reads
/// `calleeCandidates`; the joiner does the opposite.
pub struct CandidateRelay {
    store: Arc<dyn RoomStore>,
    room: RoomCode,
    outbound: Collection,
    inbound: Collection,
}

impl CandidateRelay {
    pub fn new(store: Arc<dyn RoomStore>, room: RoomCode, role: Role) -> Self {
        Self {
            store,
            room,
            outbound: role.outbound(),
            inbound: role.inbound(),
        }
    }

    pub fn outbound(&self) -> Collection {
        self.outbound
    }

    pub fn inbound(&self) -> Collection {
        self.inbound
    }

    /// Subscribes to the peer's direction; every added candidate is queued as
    /// [`SignalEvent::RemoteCandidate`].
    pub fn watch_remote(&self, signal_tx: mpsc::UnboundedSender<SignalEvent>) -> Subscription {
        debug!("Watching {} of room {}", self.inbound.as_str(), self.room);
        self.store.watch_collection(
            &self.room,
            self.inbound,
            Box::new(move |change| {
                if change.kind != ChangeKind::Added {
                    return;
                }
                let _ = signal_tx.send(SignalEvent::RemoteCandidate(Candidate(change.data)));
            }),
        )
    }

    /// Handles a locally discovered candidate. Held back until this side's
    /// description is in the room record.
    pub async fn publish_local(&self, state: &mut NegotiationState, candidate: Option<Candidate>) {
        let Some(candidate) = candidate else {
            debug!("Local candidate gathering complete");
            return;
        };
        if !state.description_written() {
            if !state.pending_local.push(candidate) {
                warn!("Local candidate queue full, candidate dropped");
            }
            return;
        }
        self.append(candidate).await;
    }

    pub async fn flush_local(&self, state: &mut NegotiationState) {
        let pending = state.pending_local.drain();
        if pending.is_empty() {
            return;
        }
        debug!("Publishing {} queued local candidates", pending.len());
        for candidate in pending {
            self.append(candidate).await;
        }
    }

    /// Applies a remote candidate now, or queues it until the remote
    /// description is set.
    pub async fn accept_remote(
        &self,
        state: &mut NegotiationState,
        transport: &dyn PeerTransport,
        candidate: Candidate,
    ) {
        if state.has_remote_description() {
            Self::apply(transport, candidate).await;
            return;
        }
        debug!("Remote description not set yet, queueing remote candidate");
        if !state.pending_remote.push(candidate) {
            warn!("Remote candidate queue full, candidate dropped");
        }
    }

    pub async fn flush_remote(&self, state: &mut NegotiationState, transport: &dyn PeerTransport) {
        let pending = state.pending_remote.drain();
        if pending.is_empty() {
            return;
        }
        debug!("Applying {} queued remote candidates", pending.len());
        for candidate in pending {
            Self::apply(transport, candidate).await;
        }
    }

    async fn append(&self, candidate: Candidate) {
        if let Err(e) = self
            .store
            .append(&self.room, self.outbound, candidate.0)
            .await
        {
            warn!(
                "Failed to store local candidate in {}: {}",
                self.outbound.as_str(),
                e
            );
        }
    }

    /// Failures are expected while the connection is torn down, so they are
    /// only logged.
    async fn apply(transport: &dyn PeerTransport, candidate: Candidate) {
        match transport.add_ice_candidate(candidate).await {
            Ok(()) => debug!("Remote candidate applied"),
            Err(e) => warn!("Failed to apply remote candidate: {}", e),
        }
    }
}

use crate::error::TransportError;
use crate::media::LocalTrack;
use crate::transport::TransportEvent;
use async_trait::async_trait;
use debate_core::{Candidate, SessionDescription};
use std::sync::Arc;
use tokio::sync::mpsc;

/// One peer connection, seen through the operations negotiation needs.
#[async_trait]
pub trait PeerTransport: Send + Sync {
    async fn add_local_tracks(&self, tracks: &[LocalTrack]) -> Result<(), TransportError>;

    async fn create_offer(&self) -> Result<SessionDescription, TransportError>;

    async fn create_answer(&self) -> Result<SessionDescription, TransportError>;

    async fn set_local_description(&self, desc: SessionDescription) -> Result<(), TransportError>;

    async fn set_remote_description(&self, desc: SessionDescription)
    -> Result<(), TransportError>;

    async fn add_ice_candidate(&self, candidate: Candidate) -> Result<(), TransportError>;

    async fn close(&self) -> Result<(), TransportError>;
}

/// Creates transports wired to a call's event channel.
#[async_trait]
pub trait TransportFactory: Send + Sync {
    async fn connect(
        &self,
        event_tx: mpsc::Sender<TransportEvent>,
    ) -> Result<Arc<dyn PeerTransport>, TransportError>;
}

use async_trait::async_trait;
use debate_core::{Candidate, ConnectionPhase, SessionDescription};
use debate_session::{LocalTrack, PeerTransport, TransportError, TransportEvent, TransportFactory};
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::{Mutex, mpsc};

#[derive(Default)]
struct TransportLog {
    tracks: usize,
    local_descriptions: Vec<SessionDescription>,
    remote_descriptions: Vec<SessionDescription>,
    applied_candidates: Vec<Value>,
    closed: bool,
}

/// Which transport operations a MockTransport refuses.
#[derive(Debug, Clone, Copy, Default)]
pub struct Faults {
    pub local_description: bool,
    pub remote_description: bool,
}

/// In-memory PeerTransport that records every call.
#[derive(Clone)]
pub struct MockTransport {
    id: usize,
    event_tx: mpsc::Sender<TransportEvent>,
    log: Arc<Mutex<TransportLog>>,
    faults: Faults,
    reject_candidates: Arc<AtomicBool>,
}

impl MockTransport {
    pub fn new(event_tx: mpsc::Sender<TransportEvent>) -> Self {
        static NEXT_ID: AtomicUsize = AtomicUsize::new(1);
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::SeqCst),
            event_tx,
            log: Arc::new(Mutex::new(TransportLog::default())),
            faults: Faults::default(),
            reject_candidates: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_faults(event_tx: mpsc::Sender<TransportEvent>, faults: Faults) -> Self {
        Self {
            faults,
            ..Self::new(event_tx)
        }
    }

    /// While set, `add_ice_candidate` fails even after the remote description.
    pub fn reject_candidates(&self, reject: bool) {
        self.reject_candidates.store(reject, Ordering::SeqCst);
    }

    /// Simulate a locally gathered candidate.
    pub async fn emit_candidate(&self, candidate: Value) {
        let _ = self
            .event_tx
            .send(TransportEvent::CandidateGenerated(Some(Candidate(candidate))))
            .await;
    }

    pub async fn emit_phase(&self, phase: ConnectionPhase) {
        let _ = self.event_tx.send(TransportEvent::PhaseChanged(phase)).await;
    }

    pub async fn track_count(&self) -> usize {
        self.log.lock().await.tracks
    }

    pub async fn remote_descriptions(&self) -> Vec<SessionDescription> {
        self.log.lock().await.remote_descriptions.clone()
    }

    pub async fn local_descriptions(&self) -> Vec<SessionDescription> {
        self.log.lock().await.local_descriptions.clone()
    }

    pub async fn applied_candidates(&self) -> Vec<Value> {
        self.log.lock().await.applied_candidates.clone()
    }

    pub async fn is_closed(&self) -> bool {
        self.log.lock().await.closed
    }
}

#[async_trait]
impl PeerTransport for MockTransport {
    async fn add_local_tracks(&self, tracks: &[LocalTrack]) -> Result<(), TransportError> {
        self.log.lock().await.tracks += tracks.len();
        Ok(())
    }

    async fn create_offer(&self) -> Result<SessionDescription, TransportError> {
        Ok(SessionDescription::offer(format!("v=0 mock-offer-{}", self.id)))
    }

    async fn create_answer(&self) -> Result<SessionDescription, TransportError> {
        if self.log.lock().await.remote_descriptions.is_empty() {
            return Err(TransportError::NoRemoteDescription);
        }
        Ok(SessionDescription::answer(format!("v=0 mock-answer-{}", self.id)))
    }

    async fn set_local_description(&self, desc: SessionDescription) -> Result<(), TransportError> {
        if self.faults.local_description {
            return Err(TransportError::Other("local description rejected".into()));
        }
        self.log.lock().await.local_descriptions.push(desc);
        Ok(())
    }

    async fn set_remote_description(
        &self,
        desc: SessionDescription,
    ) -> Result<(), TransportError> {
        if self.faults.remote_description {
            return Err(TransportError::Other("remote description rejected".into()));
        }
        self.log.lock().await.remote_descriptions.push(desc);
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: Candidate) -> Result<(), TransportError> {
        let mut log = self.log.lock().await;
        if log.closed {
            return Err(TransportError::Closed);
        }
        if log.remote_descriptions.is_empty() {
            return Err(TransportError::NoRemoteDescription);
        }
        if self.reject_candidates.load(Ordering::SeqCst) {
            return Err(TransportError::Other("candidate rejected".into()));
        }
        log.applied_candidates.push(candidate.0);
        Ok(())
    }

    async fn close(&self) -> Result<(), TransportError> {
        self.log.lock().await.closed = true;
        Ok(())
    }
}

/// Hands out MockTransports and keeps them for inspection.
#[derive(Clone, Default)]
pub struct MockTransportFactory {
    transports: Arc<Mutex<Vec<MockTransport>>>,
    faults: Faults,
}

impl MockTransportFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every transport fails `set_local_description`.
    pub fn failing() -> Self {
        Self::with_faults(Faults {
            local_description: true,
            ..Faults::default()
        })
    }

    pub fn with_faults(faults: Faults) -> Self {
        Self {
            faults,
            ..Self::default()
        }
    }

    pub async fn created(&self) -> usize {
        self.transports.lock().await.len()
    }

    /// The most recently created transport.
    pub async fn last(&self) -> Option<MockTransport> {
        self.transports.lock().await.last().cloned()
    }
}

#[async_trait]
impl TransportFactory for MockTransportFactory {
    async fn connect(
        &self,
        event_tx: mpsc::Sender<TransportEvent>,
    ) -> Result<Arc<dyn PeerTransport>, TransportError> {
        let transport = MockTransport::with_faults(event_tx, self.faults);
        self.transports.lock().await.push(transport.clone());
        Ok(Arc::new(transport))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_rejects_candidate_before_remote_description() {
        let (tx, _rx) = mpsc::channel(8);
        let transport = MockTransport::new(tx);

        let early = transport.add_ice_candidate(Candidate(json!({"c": 1}))).await;
        assert!(matches!(early, Err(TransportError::NoRemoteDescription)));

        transport
            .set_remote_description(SessionDescription::offer("v=0"))
            .await
            .unwrap();
        transport
            .add_ice_candidate(Candidate(json!({"c": 1})))
            .await
            .unwrap();
        assert_eq!(transport.applied_candidates().await, vec![json!({"c": 1})]);
    }
}

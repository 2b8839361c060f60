use crate::config::SessionConfig;
use crate::error::TransportError;
use crate::media::LocalTrack;
use crate::transport::{PeerTransport, TransportEvent, TransportFactory};
use async_trait::async_trait;
use debate_core::{Candidate, ConnectionPhase, SdpKind, SessionDescription, TrackKind};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::rtp_codec::RTPCodecType;
use webrtc::track::track_local::TrackLocal;

/// [`PeerTransport`] backed by a webrtc-rs `RTCPeerConnection`.
pub struct WebRtcTransport {
    peer_connection: Arc<RTCPeerConnection>,
}

impl WebRtcTransport {
    pub async fn new(
        config: &SessionConfig,
        event_tx: mpsc::Sender<TransportEvent>,
    ) -> Result<Self, TransportError> {
        let mut m = MediaEngine::default();
        m.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut m)?;

        let api = APIBuilder::new()
            .with_media_engine(m)
            .with_interceptor_registry(registry)
            .build();

        let rtc_config = RTCConfiguration {
            ice_servers: config
                .ice_servers
                .iter()
                .map(|server| RTCIceServer {
                    urls: server.urls.clone(),
                    username: server.username.clone().unwrap_or_default(),
                    credential: server.credential.clone().unwrap_or_default(),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        };

        let peer_connection = Arc::new(api.new_peer_connection(rtc_config).await?);

        let state_tx = event_tx.clone();
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let tx = state_tx.clone();

                Box::pin(async move {
                    info!("Peer connection state changed: {:?}", s);
                    let Some(phase) = phase_of(s) else { return };
                    let _ = tx.send(TransportEvent::PhaseChanged(phase)).await;
                })
            },
        ));

        let ice_tx = event_tx.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let tx = ice_tx.clone();

            Box::pin(async move {
                let Some(candidate) = c else {
                    let _ = tx.send(TransportEvent::CandidateGenerated(None)).await;
                    return;
                };
                let Some(candidate) = candidate_blob(&candidate) else {
                    return;
                };
                let _ = tx
                    .send(TransportEvent::CandidateGenerated(Some(candidate)))
                    .await;
            })
        }));

        let track_tx = event_tx;
        peer_connection.on_track(Box::new(move |track, _receiver, _transceiver| {
            let tx = track_tx.clone();

            Box::pin(async move {
                let kind = match track.kind() {
                    RTPCodecType::Audio => TrackKind::Audio,
                    RTPCodecType::Video => TrackKind::Video,
                    _ => return,
                };
                debug!("Remote {:?} track received: {}", kind, track.id());
                let _ = tx.send(TransportEvent::RemoteTrack(kind)).await;
            })
        }));

        Ok(Self { peer_connection })
    }
}

#[async_trait]
impl PeerTransport for WebRtcTransport {
    async fn add_local_tracks(&self, tracks: &[LocalTrack]) -> Result<(), TransportError> {
        for track in tracks {
            let Some(rtc) = track.rtc() else { continue };
            let sender = self
                .peer_connection
                .add_track(rtc as Arc<dyn TrackLocal + Send + Sync>)
                .await?;
            debug!("Added local {:?} track {}", track.kind(), track.id());

            // RTCP has to be read for interceptors (NACK, reports) to run.
            tokio::spawn(async move {
                let mut buf = vec![0u8; 1500];
                while sender.read(&mut buf).await.is_ok() {}
            });
        }
        Ok(())
    }

    async fn create_offer(&self) -> Result<SessionDescription, TransportError> {
        let offer = self.peer_connection.create_offer(None).await?;
        Ok(SessionDescription::offer(offer.sdp))
    }

    async fn create_answer(&self) -> Result<SessionDescription, TransportError> {
        let answer = self.peer_connection.create_answer(None).await?;
        Ok(SessionDescription::answer(answer.sdp))
    }

    async fn set_local_description(&self, desc: SessionDescription) -> Result<(), TransportError> {
        self.peer_connection
            .set_local_description(to_rtc(desc)?)
            .await?;
        Ok(())
    }

    async fn set_remote_description(
        &self,
        desc: SessionDescription,
    ) -> Result<(), TransportError> {
        self.peer_connection
            .set_remote_description(to_rtc(desc)?)
            .await?;
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: Candidate) -> Result<(), TransportError> {
        let init: RTCIceCandidateInit = serde_json::from_value(candidate.0)?;
        self.peer_connection.add_ice_candidate(init).await?;
        Ok(())
    }

    async fn close(&self) -> Result<(), TransportError> {
        self.peer_connection.close().await?;
        Ok(())
    }
}

/// Builds a fresh [`WebRtcTransport`] per call.
#[derive(Clone, Default)]
pub struct WebRtcTransportFactory {
    config: SessionConfig,
}

impl WebRtcTransportFactory {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl TransportFactory for WebRtcTransportFactory {
    async fn connect(
        &self,
        event_tx: mpsc::Sender<TransportEvent>,
    ) -> Result<Arc<dyn PeerTransport>, TransportError> {
        let transport = WebRtcTransport::new(&self.config, event_tx).await?;
        Ok(Arc::new(transport))
    }
}

fn to_rtc(desc: SessionDescription) -> Result<RTCSessionDescription, TransportError> {
    let rtc = match desc.kind {
        SdpKind::Offer => RTCSessionDescription::offer(desc.sdp)?,
        SdpKind::Answer => RTCSessionDescription::answer(desc.sdp)?,
    };
    Ok(rtc)
}

/// Browser-shaped `{candidate, sdpMid, sdpMLineIndex, usernameFragment}`
/// blob. `None`, with a warning, when the candidate cannot be encoded.
fn candidate_blob(candidate: &RTCIceCandidate) -> Option<Candidate> {
    let init = match candidate.to_json() {
        Ok(init) => init,
        Err(e) => {
            warn!("Dropping local candidate that cannot be serialized: {}", e);
            return None;
        }
    };
    match serde_json::to_value(&init) {
        Ok(value) => Some(Candidate(value)),
        Err(e) => {
            warn!("Dropping local candidate that cannot be encoded: {}", e);
            None
        }
    }
}

fn phase_of(state: RTCPeerConnectionState) -> Option<ConnectionPhase> {
    match state {
        RTCPeerConnectionState::New => Some(ConnectionPhase::New),
        RTCPeerConnectionState::Connecting => Some(ConnectionPhase::Connecting),
        RTCPeerConnectionState::Connected => Some(ConnectionPhase::Connected),
        RTCPeerConnectionState::Disconnected => Some(ConnectionPhase::Disconnected),
        RTCPeerConnectionState::Failed => Some(ConnectionPhase::Failed),
        RTCPeerConnectionState::Closed => Some(ConnectionPhase::Closed),
        _ => None,
    }
}

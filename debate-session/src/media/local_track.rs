use crate::error::TransportError;
use debate_core::TrackKind;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use webrtc::media::Sample;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;

/// A local capture track and its `enabled` flag.
///
/// A disabled track stays attached to the connection but its samples are
/// dropped, so the peer receives silence/black instead of a renegotiation.
#[derive(Clone)]
pub struct LocalTrack {
    kind: TrackKind,
    id: String,
    enabled: Arc<AtomicBool>,
    live: Arc<AtomicBool>,
    rtc: Option<Arc<TrackLocalStaticSample>>,
}

impl LocalTrack {
    pub fn new(kind: TrackKind, id: impl Into<String>, enabled: bool) -> Self {
        Self {
            kind,
            id: id.into(),
            enabled: Arc::new(AtomicBool::new(enabled)),
            live: Arc::new(AtomicBool::new(true)),
            rtc: None,
        }
    }

    pub fn with_rtc(mut self, rtc: Arc<TrackLocalStaticSample>) -> Self {
        self.rtc = Some(rtc);
        self
    }

    pub fn kind(&self) -> TrackKind {
        self.kind
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn rtc(&self) -> Option<Arc<TrackLocalStaticSample>> {
        self.rtc.clone()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    /// Ends the track for good.
    pub fn stop(&self) {
        self.live.store(false, Ordering::SeqCst);
        self.enabled.store(false, Ordering::SeqCst);
    }

    /// Pushes one captured sample. Returns `Ok(false)` when the sample was
    /// dropped because the track is disabled or stopped.
    pub async fn write_sample(&self, sample: &Sample) -> Result<bool, TransportError> {
        if !self.is_live() || !self.is_enabled() {
            return Ok(false);
        }
        let Some(rtc) = &self.rtc else {
            return Ok(false);
        };
        rtc.write_sample(sample).await?;
        Ok(true)
    }
}

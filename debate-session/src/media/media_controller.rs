use crate::media::{LocalTrack, Transcriber};
use debate_core::{ConnectionPhase, TrackKind};
use std::sync::Arc;
use tracing::{info, warn};

/// Keeps mic/camera flags in sync with the local tracks and couples the mic to
/// the transcription lifecycle.
pub struct LocalMediaController {
    tracks: Vec<LocalTrack>,
    mic_enabled: bool,
    camera_enabled: bool,
    transcribing: bool,
    transcriber: Arc<dyn Transcriber>,
}

impl LocalMediaController {
    /// Takes freshly acquired tracks. The mic starts muted whatever the device
    /// reported; the camera keeps what was granted.
    pub fn new(tracks: Vec<LocalTrack>, transcriber: Arc<dyn Transcriber>) -> Self {
        for track in tracks.iter().filter(|t| t.kind() == TrackKind::Audio) {
            track.set_enabled(false);
        }
        let camera_enabled = tracks
            .iter()
            .any(|t| t.kind() == TrackKind::Video && t.is_enabled());
        info!("Local media ready: mic muted, camera enabled: {}", camera_enabled);

        Self {
            tracks,
            mic_enabled: false,
            camera_enabled,
            transcribing: false,
            transcriber,
        }
    }

    pub fn tracks(&self) -> &[LocalTrack] {
        &self.tracks
    }

    pub fn mic_enabled(&self) -> bool {
        self.mic_enabled
    }

    pub fn camera_enabled(&self) -> bool {
        self.camera_enabled
    }

    pub fn is_transcribing(&self) -> bool {
        self.transcribing
    }

    pub fn toggle_mic(&mut self, phase: ConnectionPhase) -> bool {
        let Some(enabled) = self.flip(TrackKind::Audio) else {
            warn!("toggle_mic called without an audio track");
            return self.mic_enabled;
        };
        self.mic_enabled = enabled;
        info!("Mic toggled: {}", enabled);

        if !enabled {
            self.stop_transcription();
        } else if phase == ConnectionPhase::Connected {
            self.start_transcription();
        }
        enabled
    }

    pub fn toggle_camera(&mut self) -> bool {
        let Some(enabled) = self.flip(TrackKind::Video) else {
            warn!("toggle_camera called without a video track");
            return self.camera_enabled;
        };
        self.camera_enabled = enabled;
        info!("Camera toggled: {}", enabled);
        enabled
    }

    /// Reacts to a connection phase change.
    pub fn on_phase(&mut self, phase: ConnectionPhase) {
        if phase == ConnectionPhase::Connected && self.mic_enabled {
            self.start_transcription();
        } else if phase.is_interrupted() {
            self.stop_transcription();
        }
    }

    /// Stops transcription and ends every local track.
    pub fn release(&mut self) {
        self.stop_transcription();
        for track in &self.tracks {
            track.stop();
        }
        self.mic_enabled = false;
    }

    /// Sets every track of `kind` to the same flipped value and reports the
    /// flag read back from the tracks.
    fn flip(&self, kind: TrackKind) -> Option<bool> {
        let tracks: Vec<&LocalTrack> = self.tracks.iter().filter(|t| t.kind() == kind).collect();
        if tracks.is_empty() {
            return None;
        }
        let target = !tracks.iter().all(|t| t.is_enabled());
        for track in &tracks {
            track.set_enabled(target);
        }
        Some(tracks.iter().all(|t| t.is_enabled()))
    }

    fn start_transcription(&mut self) {
        if self.transcribing {
            return;
        }
        match self.transcriber.start() {
            Ok(()) => {
                info!("Transcription started");
                self.transcribing = true;
            }
            Err(e) => warn!("Failed to start transcription: {}", e),
        }
    }

    fn stop_transcription(&mut self) {
        self.transcriber.stop();
        if self.transcribing {
            info!("Transcription stopped");
        }
        self.transcribing = false;
    }
}

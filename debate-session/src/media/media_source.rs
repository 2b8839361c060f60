use crate::error::MediaError;
use crate::media::LocalTrack;
use async_trait::async_trait;
use debate_core::TrackKind;
use std::sync::Arc;
use webrtc::api::media_engine::{MIME_TYPE_OPUS, MIME_TYPE_VP8};
use webrtc::rtp_transceiver::rtp_codec::RTCRtpCodecCapability;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;

/// Grants local camera/microphone tracks.
#[async_trait]
pub trait MediaSource: Send + Sync {
    async fn acquire(&self) -> Result<Vec<LocalTrack>, MediaError>;
}

/// Hands out one opus and one VP8 sample track. Whatever captures the devices
/// writes into them with [`LocalTrack::write_sample`].
#[derive(Debug, Clone)]
pub struct SampleMediaSource {
    pub stream_id: String,
    pub camera_granted: bool,
}

impl Default for SampleMediaSource {
    fn default() -> Self {
        Self {
            stream_id: "debate-local".to_owned(),
            camera_granted: true,
        }
    }
}

#[async_trait]
impl MediaSource for SampleMediaSource {
    async fn acquire(&self) -> Result<Vec<LocalTrack>, MediaError> {
        let audio = Arc::new(TrackLocalStaticSample::new(
            RTCRtpCodecCapability {
                mime_type: MIME_TYPE_OPUS.to_owned(),
                ..Default::default()
            },
            "audio".to_owned(),
            self.stream_id.clone(),
        ));
        let video = Arc::new(TrackLocalStaticSample::new(
            RTCRtpCodecCapability {
                mime_type: MIME_TYPE_VP8.to_owned(),
                ..Default::default()
            },
            "video".to_owned(),
            self.stream_id.clone(),
        ));

        Ok(vec![
            LocalTrack::new(TrackKind::Audio, "audio", true).with_rtc(audio),
            LocalTrack::new(TrackKind::Video, "video", self.camera_granted).with_rtc(video),
        ])
    }
}

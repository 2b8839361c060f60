use crate::config::SessionConfig;
use crate::error::FactCheckError;
use crate::media::{MediaSource, NoopTranscriber, SampleMediaSource, Transcriber};
use crate::room::RoomLifecycle;
use crate::store::RoomStore;
use crate::transcript::{FactChecker, HttpFactChecker};
use crate::transport::{TransportFactory, WebRtcTransportFactory};
use std::sync::Arc;

/// Everything a call needs from the outside world.
#[derive(Clone)]
pub struct CallContext {
    pub store: Arc<dyn RoomStore>,
    pub transports: Arc<dyn TransportFactory>,
    pub media: Arc<dyn MediaSource>,
    pub transcriber: Arc<dyn Transcriber>,
    pub fact_checker: Arc<dyn FactChecker>,
    pub config: SessionConfig,
}

impl CallContext {
    /// webrtc-rs transports, sample tracks and the HTTP fact checker at
    /// `config.fact_check_url`.
    pub fn new(store: Arc<dyn RoomStore>, config: SessionConfig) -> Result<Self, FactCheckError> {
        let fact_checker = HttpFactChecker::new(config.fact_check_url.clone())?;
        Ok(Self {
            store,
            transports: Arc::new(WebRtcTransportFactory::new(config.clone())),
            media: Arc::new(SampleMediaSource::default()),
            transcriber: Arc::new(NoopTranscriber),
            fact_checker: Arc::new(fact_checker),
            config,
        })
    }

    pub fn lifecycle(&self) -> RoomLifecycle {
        RoomLifecycle::new(self.store.clone(), self.config.clone())
    }
}

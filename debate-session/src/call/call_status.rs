use debate_core::ConnectionPhase;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallEnd {
    HungUp,
    NegotiationFailed(String),
    /// Every handle was dropped without hanging up.
    HandleDropped,
}

/// Snapshot of a call, published after every change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallStatus {
    pub phase: ConnectionPhase,
    pub mic_enabled: bool,
    pub camera_enabled: bool,
    pub transcribing: bool,
    pub ended: Option<CallEnd>,
}

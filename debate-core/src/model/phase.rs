use std::fmt;

/// Connection phase as reported by the transport. Observed, never driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionPhase {
    #[default]
    New,
    Connecting,
    Connected,
    Disconnected,
    Failed,
    Closed,
}

impl ConnectionPhase {
    /// Phases that stop transcription and candidate listeners.
    pub fn is_interrupted(self) -> bool {
        matches!(
            self,
            ConnectionPhase::Disconnected | ConnectionPhase::Failed | ConnectionPhase::Closed
        )
    }
}

impl fmt::Display for ConnectionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectionPhase::New => "new",
            ConnectionPhase::Connecting => "connecting",
            ConnectionPhase::Connected => "connected",
            ConnectionPhase::Disconnected => "disconnected",
            ConnectionPhase::Failed => "failed",
            ConnectionPhase::Closed => "closed",
        };
        f.write_str(s)
    }
}

use debate_core::{Candidate, ConnectionPhase, TrackKind};

/// Events a transport emits for the call loop.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// A local candidate was discovered. `None` marks the end of gathering.
    CandidateGenerated(Option<Candidate>),

    PhaseChanged(ConnectionPhase),

    /// The peer started sending a track.
    RemoteTrack(TrackKind),
}

use debate_core::{Candidate, RoomRecord, TranscriptMessage};

/// Store notifications, queued for the call loop.
#[derive(Debug, Clone)]
pub enum SignalEvent {
    /// The room record changed. `None` once it was deleted.
    RoomChanged(Option<RoomRecord>),

    /// The peer appended a candidate to its direction.
    RemoteCandidate(Candidate),

    /// A transcript or chat line landed in the room, from either side.
    Message(TranscriptMessage),
}

mod media;
mod phase;
mod room;
mod signaling;
mod transcript;

pub use media::TrackKind;
pub use phase::ConnectionPhase;
pub use room::{ROOM_CODE_ALPHABET, RoomCode, RoomInfo, RoomPatch, RoomRecord};
pub use signaling::{Candidate, Collection, IceServerConfig, Role, SdpKind, SessionDescription};
pub use transcript::{FactCheckRequest, FactCheckVerdict, MessageKind, TranscriptMessage};

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    pub username: Option<String>,
    pub credential: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SdpKind {
    Offer,
    Answer,
}

/// `{type, sdp}` pair carried verbatim in the room's `offer`/`answer` fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescription {
    #[serde(rename = "type")]
    pub kind: SdpKind,
    pub sdp: String,
}

impl SessionDescription {
    pub fn offer(sdp: impl Into<String>) -> Self {
        Self {
            kind: SdpKind::Offer,
            sdp: sdp.into(),
        }
    }

    pub fn answer(sdp: impl Into<String>) -> Self {
        Self {
            kind: SdpKind::Answer,
            sdp: sdp.into(),
        }
    }
}

/// A connectivity candidate as produced by the peer connection. The contents
/// are never inspected; the blob goes into the store and back out untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Candidate(pub Value);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Initiator,
    Joiner,
}

impl Role {
    /// Collection this role appends its own candidates to.
    pub fn outbound(self) -> Collection {
        match self {
            Role::Initiator => Collection::InitiatorCandidates,
            Role::Joiner => Collection::JoinerCandidates,
        }
    }

    /// Collection holding the peer's candidates.
    pub fn inbound(self) -> Collection {
        match self {
            Role::Initiator => Collection::JoinerCandidates,
            Role::Joiner => Collection::InitiatorCandidates,
        }
    }
}

/// Subcollections hanging off a room record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    InitiatorCandidates,
    JoinerCandidates,
    Messages,
}

impl Collection {
    pub const ALL: [Collection; 3] = [
        Collection::InitiatorCandidates,
        Collection::JoinerCandidates,
        Collection::Messages,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Collection::InitiatorCandidates => "callerCandidates",
            Collection::JoinerCandidates => "calleeCandidates",
            Collection::Messages => "messages",
        }
    }
}

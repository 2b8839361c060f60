use crate::model::signaling::SessionDescription;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Characters used for room codes. `0/O`, `1/I` are left out so a code read
/// aloud or off a screen cannot be mistyped.
pub const ROOM_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    pub fn generate(len: usize) -> Self {
        let mut rng = rand::thread_rng();
        let code = (0..len)
            .map(|_| ROOM_CODE_ALPHABET[rng.gen_range(0..ROOM_CODE_ALPHABET.len())] as char)
            .collect();
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the code has `len` characters, all from [`ROOM_CODE_ALPHABET`].
    pub fn is_well_formed(&self, len: usize) -> bool {
        self.0.len() == len && self.0.bytes().all(|b| ROOM_CODE_ALPHABET.contains(&b))
    }
}

impl From<&str> for RoomCode {
    fn from(s: &str) -> Self {
        Self(s.trim().to_ascii_uppercase())
    }
}

impl From<String> for RoomCode {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The shared room document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offer: Option<SessionDescription>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<SessionDescription>,
    #[serde(default)]
    pub created_at: u64,
}

impl RoomRecord {
    pub fn new(name: impl Into<String>, created_at: u64) -> Self {
        Self {
            name: name.into(),
            offer: None,
            answer: None,
            created_at,
        }
    }
}

/// Field-merge update. Fields left as `None` are not touched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomPatch {
    pub name: Option<String>,
    pub answer: Option<SessionDescription>,
}

impl RoomPatch {
    pub fn answer(answer: SessionDescription) -> Self {
        Self {
            name: None,
            answer: Some(answer),
        }
    }

    pub fn apply(self, record: &mut RoomRecord) {
        if let Some(name) = self.name {
            record.name = name;
        }
        if let Some(answer) = self.answer {
            record.answer = Some(answer);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoomInfo {
    pub code: RoomCode,
    pub name: String,
    pub created_at: u64,
}

impl RoomInfo {
    /// `name` is kept as stored, blank included, since it doubles as the
    /// fact-check topic.
    pub fn from_record(code: RoomCode, record: &RoomRecord) -> Self {
        Self {
            code,
            name: record.name.trim().to_owned(),
            created_at: record.created_at,
        }
    }

    /// Name to show in a UI. Falls back to the code for unnamed rooms.
    pub fn display_name(&self) -> String {
        if self.name.is_empty() {
            format!("Room {}", self.code)
        } else {
            self.name.clone()
        }
    }
}

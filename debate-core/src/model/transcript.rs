use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Speech-to-text utterance, fact-checked.
    Stt,
    /// Typed chat line, never fact-checked.
    Chat,
}

/// One entry of a room's `messages` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptMessage {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub speaker: String,
    pub text: String,
    pub verdict: Option<bool>,
    pub reason: Option<String>,
    pub timestamp: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactCheckRequest {
    #[serde(alias = "transcript")]
    pub utterance: String,
    #[serde(default, alias = "roomName")]
    pub topic: String,
}

/// Normalized fact-check answer. `verdict == None` means undeterminable and
/// must be shown differently from `Some(false)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactCheckVerdict {
    #[serde(alias = "isFact")]
    pub verdict: Option<bool>,
    pub reason: String,
}

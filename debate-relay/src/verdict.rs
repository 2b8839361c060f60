use crate::error::RelayError;
use crate::gemini::GenerateResponse;
use debate_core::FactCheckVerdict;
use serde_json::Value;
use tracing::{info, warn};

pub const UNSAFE_REASON: &str = "Content deemed unsafe by AI.";
pub const FORMAT_ERROR_REASON: &str = "Fact-check response format error.";
pub const EMPTY_REASON: &str = "No reason provided.";

pub fn build_prompt(topic: &str, utterance: &str) -> String {
    format!(
        r#"You are a precise fact-checking assistant for a live debate.
Debate Topic: "{topic}"
Statement: "{utterance}"

Analyze if the core assertion in the statement is presented as a verifiable fact and assess its likely accuracy based on general knowledge, or state if it's clearly an opinion/speculation.

Respond ONLY with a JSON object with two keys:
1. "is_fact": boolean (true ONLY if it's a verifiable factual claim likely to be accurate; false if it's opinion, speculation, subjective, inaccurate, or unverifiable).
2. "reason": string (brief justification, e.g., "Verifiable statistic.", "Common knowledge.", "Opinion statement.", "Claim is inaccurate [brief reason].", "Requires specific context to verify.", "Subjective claim.").

JSON:"#
    )
}

/// Turns the model output into the two-field verdict.
///
/// A safety block and a well-formed JSON with the wrong field types both yield
/// `verdict: None`; a missing body or unparseable JSON is an upstream error.
pub fn normalize(response: &GenerateResponse) -> Result<FactCheckVerdict, RelayError> {
    let Some(text) = response.first_text() else {
        if response.first_finish_reason() == Some("SAFETY") {
            info!("Content blocked by safety filter");
            return Ok(FactCheckVerdict {
                verdict: None,
                reason: UNSAFE_REASON.to_owned(),
            });
        }
        warn!("Unexpected Gemini response structure: {:?}", response);
        return Err(RelayError::Upstream(
            "Invalid Gemini response structure received.".into(),
        ));
    };

    let parsed: Value = serde_json::from_str(text).map_err(|e| {
        warn!("Unparseable fact-check JSON {:?}: {}", text, e);
        RelayError::Upstream("Could not parse fact-check result JSON from Gemini.".into())
    })?;

    let (Some(is_fact), Some(reason)) = (
        parsed.get("is_fact").and_then(Value::as_bool),
        parsed.get("reason").and_then(Value::as_str),
    ) else {
        warn!("Fact-check JSON has unexpected format: {}", parsed);
        return Ok(FactCheckVerdict {
            verdict: None,
            reason: FORMAT_ERROR_REASON.to_owned(),
        });
    };

    let reason = match reason.trim() {
        "" => EMPTY_REASON.to_owned(),
        r => r.to_owned(),
    };
    Ok(FactCheckVerdict {
        verdict: Some(is_fact),
        reason,
    })
}

use async_trait::async_trait;
use debate_relay::{GenerateResponse, LanguageModel, RelayError};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Answers every prompt with a canned `generateContent` body and records prompts.
#[derive(Clone)]
pub struct StubModel {
    response: Value,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl StubModel {
    pub fn raw(response: Value) -> Self {
        Self {
            response,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// The model's text part is `text`.
    pub fn answering(text: &str) -> Self {
        Self::raw(json!({
            "candidates": [{ "content": { "parts": [{ "text": text }] }, "finishReason": "STOP" }]
        }))
    }

    pub async fn prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }
}

#[async_trait]
impl LanguageModel for StubModel {
    async fn generate(&self, prompt: &str) -> Result<GenerateResponse, RelayError> {
        self.prompts.lock().await.push(prompt.to_owned());
        serde_json::from_value(self.response.clone())
            .map_err(|e| RelayError::Upstream(e.to_string()))
    }
}

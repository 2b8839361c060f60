use crate::error::FactCheckError;
use async_trait::async_trait;
use debate_core::{FactCheckRequest, FactCheckVerdict};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Judges one utterance in the context of a debate topic.
#[async_trait]
pub trait FactChecker: Send + Sync {
    async fn check(&self, request: &FactCheckRequest) -> Result<FactCheckVerdict, FactCheckError>;
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Posts to the fact-check relay over HTTP.
#[derive(Clone)]
pub struct HttpFactChecker {
    client: reqwest::Client,
    url: String,
}

impl HttpFactChecker {
    pub fn new(url: impl Into<String>) -> Result<Self, FactCheckError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self::with_client(client, url))
    }

    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl FactChecker for HttpFactChecker {
    async fn check(&self, request: &FactCheckRequest) -> Result<FactCheckVerdict, FactCheckError> {
        debug!("Fact-checking utterance for topic {}", request.topic);
        let response = self.client.post(&self.url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or(body);
            return Err(FactCheckError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<FactCheckVerdict>().await?)
    }
}

use async_trait::async_trait;
use debate_core::{FactCheckRequest, FactCheckVerdict};
use debate_session::{FactCheckError, FactChecker};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Returns a fixed verdict, or fails every call, and records the requests.
#[derive(Clone)]
pub struct StubFactChecker {
    verdict: Option<FactCheckVerdict>,
    delay: Option<Duration>,
    requests: Arc<Mutex<Vec<FactCheckRequest>>>,
}

impl StubFactChecker {
    pub fn answering(verdict: Option<bool>, reason: &str) -> Self {
        Self {
            verdict: Some(FactCheckVerdict {
                verdict,
                reason: reason.to_owned(),
            }),
            delay: None,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every check fails as if the relay were unreachable.
    pub fn unreachable() -> Self {
        Self {
            verdict: None,
            delay: None,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answers only after `delay`, like a slow upstream model.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub async fn requests(&self) -> Vec<FactCheckRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl FactChecker for StubFactChecker {
    async fn check(&self, request: &FactCheckRequest) -> Result<FactCheckVerdict, FactCheckError> {
        self.requests.lock().await.push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.verdict.clone().ok_or(FactCheckError::Status {
            status: 503,
            message: "connection refused".into(),
        })
    }
}

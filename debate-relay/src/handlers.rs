use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::gemini::{GeminiClient, LanguageModel};
use crate::verdict::{build_prompt, normalize};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use debate_core::utils::DEFAULT_TOPIC;
use debate_core::{FactCheckRequest, FactCheckVerdict};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

pub const LIVENESS_TEXT: &str = "Fact-Checking Backend is Running!";

#[derive(Clone)]
pub struct AppState {
    /// `None` when the relay was started without an API key.
    model: Option<Arc<dyn LanguageModel>>,
}

impl AppState {
    pub fn new(model: Option<Arc<dyn LanguageModel>>) -> Self {
        Self { model }
    }

    pub fn from_config(config: &RelayConfig) -> Result<Self, RelayError> {
        let model = GeminiClient::from_config(config)?;
        match &model {
            Some(client) => info!("Fact-checking with model {}", client.model()),
            None => warn!("GEMINI_API_KEY is not set; fact-check requests will fail"),
        }
        Ok(Self::new(
            model.map(|client| Arc::new(client) as Arc<dyn LanguageModel>),
        ))
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(liveness))
        .route("/api/fact-check", post(fact_check))
        .layer(cors)
        .with_state(state)
}

async fn liveness() -> &'static str {
    LIVENESS_TEXT
}

async fn fact_check(
    State(state): State<AppState>,
    body: Result<Json<FactCheckRequest>, JsonRejection>,
) -> Result<Json<FactCheckVerdict>, RelayError> {
    let Some(model) = state.model else {
        error!("Fact-check requested but no API key is configured");
        return Err(RelayError::MissingApiKey);
    };

    let Json(request) = body.map_err(|e| {
        warn!("Rejected fact-check body: {}", e);
        RelayError::InvalidUtterance
    })?;
    let utterance = request.utterance.trim();
    if utterance.is_empty() {
        return Err(RelayError::InvalidUtterance);
    }
    let topic = match request.topic.trim() {
        "" => DEFAULT_TOPIC,
        t => t,
    };

    info!(
        "Fact-checking for topic {:?}: {:?}",
        topic,
        utterance.chars().take(50).collect::<String>()
    );
    let response = model
        .generate(&build_prompt(topic, utterance))
        .await
        .inspect_err(|e| error!("Fact-checking failed: {}", e))?;

    let verdict = normalize(&response)?;
    info!("Fact-check result: {:?}", verdict);
    Ok(Json(verdict))
}

use debate_relay::{AppState, LIVENESS_TEXT, LanguageModel, router};
use reqwest::StatusCode;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::integration::init_tracing;
use crate::utils::{StubModel, spawn_app};

async fn relay_with(model: Option<StubModel>) -> String {
    let state = AppState::new(model.map(|m| Arc::new(m) as Arc<dyn LanguageModel>));
    let addr = spawn_app(router(state)).await;
    format!("http://{}", addr)
}

async fn post_check(base: &str, body: Value) -> (StatusCode, Value) {
    let response = reqwest::Client::new()
        .post(format!("{}/api/fact-check", base))
        .json(&body)
        .send()
        .await
        .expect("request failed");
    let status = response.status();
    (status, response.json().await.expect("body is not JSON"))
}

#[tokio::test]
async fn test_liveness() {
    init_tracing();
    let base = relay_with(None).await;

    let body = reqwest::get(&base).await.unwrap().text().await.unwrap();
    assert_eq!(body, LIVENESS_TEXT);
}

#[tokio::test]
async fn test_climate_policy_verdict() {
    init_tracing();
    let model = StubModel::answering(
        r#"{"is_fact": true, "reason": "Supported by recent energy statistics."}"#,
    );
    let base = relay_with(Some(model.clone())).await;

    let (status, body) = post_check(
        &base,
        json!({ "utterance": "Coal use is declining", "topic": "Climate Policy" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "verdict": true, "reason": "Supported by recent energy statistics." })
    );

    let prompts = model.prompts().await;
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Climate Policy"));
    assert!(prompts[0].contains("Coal use is declining"));
}

#[tokio::test]
async fn test_legacy_field_names_and_default_topic() {
    init_tracing();
    let model = StubModel::answering(r#"{"is_fact": false, "reason": "Opinion statement."}"#);
    let base = relay_with(Some(model.clone())).await;

    let (status, body) = post_check(&base, json!({ "transcript": "Cats are better" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["verdict"], json!(false));
    assert!(model.prompts().await[0].contains(r#"Debate Topic: "General Discussion""#));
}

#[tokio::test]
async fn test_empty_utterance_is_rejected() {
    init_tracing();
    let model = StubModel::answering("{}");
    let base = relay_with(Some(model.clone())).await;

    let (status, body) = post_check(&base, json!({ "utterance": "   " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = post_check(&base, json!({ "topic": "No statement" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(model.prompts().await.is_empty());
}

#[tokio::test]
async fn test_missing_api_key() {
    init_tracing();
    let base = relay_with(None).await;

    let (status, body) = post_check(&base, json!({ "utterance": "Water is wet" })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], json!("Fact-checking service error (config)."));
}

#[tokio::test]
async fn test_safety_block_yields_null_verdict() {
    init_tracing();
    let model = StubModel::raw(json!({ "candidates": [{ "finishReason": "SAFETY" }] }));
    let base = relay_with(Some(model)).await;

    let (status, body) = post_check(&base, json!({ "utterance": "something nasty" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "verdict": null, "reason": "Content deemed unsafe by AI." })
    );
}

#[tokio::test]
async fn test_unparseable_model_output_is_a_server_error() {
    init_tracing();
    let base = relay_with(Some(StubModel::answering("I think so"))).await;

    let (status, body) = post_check(&base, json!({ "utterance": "Coal use is declining" })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .starts_with("Fact-checking failed:")
    );
}

use anyhow::{Context, Result};
use clap::Parser;
use debate_relay::{AppState, RelayConfig, router};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = RelayConfig::parse();
    let state = AppState::from_config(&config).context("Failed to build Gemini client")?;
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Fact-check relay listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

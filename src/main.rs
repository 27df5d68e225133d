use anyhow::Context;
use clap::Parser;
use scout::{
    AppState, CapabilityRegistry, LLMClient, OpenAIClient, Orchestrator, ScoutConfig,
    api::create_router, cli::Cli,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load .env before resolving any credential
    dotenvy::dotenv().ok();

    let config = if cli.config.exists() {
        ScoutConfig::load(&cli.config)
            .with_context(|| format!("loading {}", cli.config.display()))?
    } else {
        tracing::warn!(path = %cli.config.display(), "config file not found, using defaults");
        ScoutConfig::default()
    };

    let default_filter = if cli.verbose {
        "debug".to_string()
    } else {
        config.server.log_level.clone()
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let llm: Arc<dyn LLMClient> =
        Arc::new(OpenAIClient::from_config(&config.llm).context("constructing LLM client")?);

    let registry = Arc::new(CapabilityRegistry::from_config(
        &config.capabilities,
        Arc::clone(&llm),
    ));
    if registry.is_empty() {
        tracing::warn!("no capabilities registered; every query will be answered directly");
    } else {
        tracing::info!(capabilities = ?registry.names(), "capability registry built");
    }

    let orchestrator = Arc::new(Orchestrator::new(
        llm,
        registry,
        &config.orchestrator,
    ));

    let state = AppState {
        config: Arc::new(config.clone()),
        orchestrator,
    };

    let app = create_router().with_state(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    tracing::info!(%addr, "scout server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("shutdown signal received");
    }
}

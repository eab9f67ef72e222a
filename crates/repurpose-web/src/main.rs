//! RepurposeAI Web Server
//!
//! Run with: cargo run -p repurpose-web

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use repurpose_llm::backend::{GeminiBackend, OllamaBackend};
use repurpose_llm::LlmBackend;
use repurpose_web::config::Config;
use repurpose_web::state::AppState;

fn build_llm_backend(config: &Config) -> anyhow::Result<Arc<dyn LlmBackend>> {
    match config.llm.provider.as_str() {
        "gemini" => {
            let gemini = &config.llm.gemini;
            let key = if gemini.api_key.is_empty() {
                std::env::var("GEMINI_API_KEY").unwrap_or_default()
            } else {
                gemini.api_key.clone()
            };
            if key.is_empty() {
                anyhow::bail!(
                    "Gemini selected but no API key found \
                     (set llm.gemini.api_key or GEMINI_API_KEY)"
                );
            }
            Ok(Arc::new(
                GeminiBackend::new(key, &gemini.model).with_base_url(&gemini.base_url),
            ))
        }
        "ollama" => {
            let ollama = &config.llm.ollama;
            Ok(Arc::new(OllamaBackend::new(&ollama.base_url, &ollama.model)))
        }
        other => anyhow::bail!(
            "Unknown llm.provider {other:?} (expected \"gemini\" or \"ollama\")"
        ),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialise structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("repurpose=info,tower_http=info")),
        )
        .init();

    info!("🧪 RepurposeAI starting up...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = Config::load()?;
    let llm = build_llm_backend(&config)?;
    info!(
        backend = llm.name(),
        model = llm.model_id(),
        local = llm.is_local(),
        "✅ LLM backend ready"
    );

    let state = AppState::new(llm);
    let app = repurpose_web::router::build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    info!("🚀 Server listening on http://{}", config.server.bind);

    axum::serve(listener, app).await?;

    Ok(())
}

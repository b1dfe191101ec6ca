use std::sync::Arc;

use form_assist::config::AppConfig;
use form_assist::explain::Explainer;
use form_assist::interview::{InterviewRouteState, interview_routes};
use form_assist::llm::{LlmBackend, LlmConfig, create_provider};
use form_assist::pdf::{FormRenderer, default_positions};
use form_assist::schema::default_questions;
use tower_http::cors::CorsLayer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AppConfig::from_env();

    eprintln!("📋 Form Assist v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Template: {}", config.template_path);
    eprintln!("   API: http://0.0.0.0:{}/api/interview", config.port);

    // Explanation provider is optional: no API key just means every
    // explanation resolves to the fallback sentence.
    let provider = explanation_provider(&config.model);
    match &provider {
        Some(p) => eprintln!("   Explanations: enabled (model: {})", p.model_name()),
        None => eprintln!("   Explanations: disabled (no API key set)"),
    }

    // Read-only schema and position registry, loaded once and passed
    // explicitly into the state machine and compositor.
    let schema = Arc::new(default_questions());
    let positions = Arc::new(default_positions());
    eprintln!(
        "   Questions: {} ({} mapped to form fields)\n",
        schema.len(),
        positions.len()
    );

    let renderer = Arc::new(FormRenderer::new(&config.template_path, positions));
    let explainer = Arc::new(Explainer::new(provider));

    let state = InterviewRouteState::new(schema, renderer, explainer);
    let app = interview_routes(state).layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!(port = config.port, "Interview server started");
    axum::serve(listener, app).await?;

    Ok(())
}

/// Pick an LLM backend from whichever API key is present.
fn explanation_provider(
    model: &str,
) -> Option<Arc<dyn form_assist::llm::LlmProvider>> {
    let config = if let Ok(key) = std::env::var("ANTHROPIC_API_KEY") {
        LlmConfig {
            backend: LlmBackend::Anthropic,
            api_key: secrecy::SecretString::from(key),
            model: model.to_string(),
        }
    } else if let Ok(key) = std::env::var("OPENAI_API_KEY") {
        LlmConfig {
            backend: LlmBackend::OpenAi,
            api_key: secrecy::SecretString::from(key),
            model: std::env::var("FORM_ASSIST_OPENAI_MODEL")
                .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
        }
    } else {
        return None;
    };

    match create_provider(&config) {
        Ok(provider) => Some(provider),
        Err(e) => {
            tracing::warn!(error = %e, "Could not create explanation provider");
            None
        }
    }
}

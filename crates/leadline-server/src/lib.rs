//! Leadline Server
//!
//! HTTP API over the lead pipeline: process a meeting summary, list stored
//! leads, aggregate statistics and clear the store.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;

use axum::http::{HeaderValue, Method};
use config::{ConfigError, ProviderKind, ServerConfig};
use handlers::{create_router, AppState};
use leadline_llm::{LlmBackend, OllamaProvider, OpenAiProvider};
use leadline_pii::PatternDetector;
use leadline_pipeline::Pipeline;
use leadline_store::{SqliteStore, StoreError};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// The pipeline as wired by the server
pub type LeadPipeline = Pipeline<PatternDetector, LlmBackend, SqliteStore>;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Lead store could not be opened
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Install the global tracing subscriber
///
/// Honors `RUST_LOG`, defaulting to `info`. Calling it twice is harmless.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Construct the configured extraction provider
pub fn build_provider(config: &ServerConfig) -> LlmBackend {
    let llm = &config.llm;
    let timeout = Duration::from_secs(llm.timeout_secs);

    let backend = match llm.provider {
        ProviderKind::OpenAi => {
            let provider = match &llm.base_url {
                Some(url) => OpenAiProvider::new(url.clone(), llm.model.clone(), llm.api_key.clone()),
                None => OpenAiProvider::openai(llm.model.clone(), llm.api_key.clone()),
            };
            LlmBackend::OpenAi(provider.with_timeout(timeout))
        }
        ProviderKind::Ollama => {
            let provider = match &llm.base_url {
                Some(url) => OllamaProvider::new(url.clone(), llm.model.clone()),
                None => OllamaProvider::default_endpoint(llm.model.clone()),
            };
            LlmBackend::Ollama(provider)
        }
    };

    if !backend.is_configured() {
        warn!("OPENAI_API_KEY is not set; extraction requests will fail until it is configured");
    }

    backend
}

/// Wire the pipeline from configuration
pub fn build_pipeline(config: &ServerConfig) -> Result<LeadPipeline, ServerError> {
    config.validate()?;

    let detector = PatternDetector::try_new(config.pii.clone())
        .map_err(|e| ConfigError::Invalid(e.to_string()))?;
    let store = SqliteStore::new(&config.database)?;
    let provider = build_provider(config);

    info!(
        "Pipeline ready: model {}, database {}",
        config.llm.model, config.database
    );

    Ok(Pipeline::new(detector, provider, store, config.pipeline.clone()))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {:?}", o);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any)
}

/// Start the HTTP server
///
/// Builds the pipeline from configuration, then serves the lead API until
/// the process is stopped.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    info!("Starting Leadline server");
    info!("Bind address: {}", config.bind);

    let pipeline = build_pipeline(&config)?;

    let state = AppState {
        pipeline: Arc::new(pipeline),
    };

    let app = create_router(state)
        .layer(cors_layer(&config.cors_origins))
        .layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(&config.bind).await?;
    info!("Listening on {}", config.bind);

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}

//! Application startup and lifecycle management.

use crate::config::ManifestoConfig;
use crate::handlers::{
    app::{health_check, index, not_found, readiness_check},
    manifesto::generate_manifesto,
    metrics::metrics,
};
use crate::middleware::metrics::http_metrics_middleware;
use crate::services::providers::gemini::{GeminiConfig, GeminiTextProvider};
use crate::services::providers::{GenerationParams, TextProvider};
use crate::services::ManifestoGenerator;
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    security_headers::security_headers_middleware, tracing::request_id_middleware,
    tracing::REQUEST_ID_HEADER,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Slack given to the HTTP client beyond the generation timeout, so the
/// generator's own bound fires first and is reported as a timeout.
const CLIENT_TIMEOUT_GRACE: Duration = Duration::from_secs(5);

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub generator: ManifestoGenerator,
    pub static_dir: String,
}

impl AppState {
    pub fn new(config: &ManifestoConfig, provider: Arc<dyn TextProvider>) -> Self {
        let params = GenerationParams {
            temperature: config.generation.temperature,
            top_p: config.generation.top_p,
            max_tokens: config.generation.max_output_tokens,
        };
        let timeout = Duration::from_secs(config.generation.timeout_secs);

        Self {
            generator: ManifestoGenerator::new(provider, params, timeout),
            static_dir: config.web.static_dir.clone(),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.static_dir);

    Router::new()
        .route("/", get(index))
        .route("/generate_manifesto", post(generate_manifesto))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics))
        .nest_service("/static", static_files)
        .fallback(not_found)
        .layer(from_fn(http_metrics_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        // Outermost so the id is set before the trace span is created
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Build the Gemini provider described by `config`.
pub fn gemini_provider(config: &ManifestoConfig) -> Result<Arc<dyn TextProvider>, AppError> {
    let gemini_config = GeminiConfig {
        api_key: config.google.api_key.clone(),
        model: config.models.text_model.clone(),
        api_base: config.models.api_base.clone(),
        request_timeout: Duration::from_secs(config.generation.timeout_secs) + CLIENT_TIMEOUT_GRACE,
    };

    let provider = GeminiTextProvider::new(gemini_config)
        .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?;

    tracing::info!(
        model = %config.models.text_model,
        "Initialized Gemini text provider"
    );

    Ok(Arc::new(provider))
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the configured Gemini provider.
    pub async fn build(config: ManifestoConfig) -> Result<Self, AppError> {
        let provider = gemini_provider(&config)?;
        Self::build_with_provider(config, provider).await
    }

    /// Build the application around an explicit text provider.
    pub async fn build_with_provider(
        config: ManifestoConfig,
        provider: Arc<dyn TextProvider>,
    ) -> Result<Self, AppError> {
        crate::services::metrics::init_metrics()
            .map_err(|e| AppError::InternalError(anyhow::anyhow!("Failed to initialize metrics: {}", e)))?;

        let state = AppState::new(&config, provider);
        let router = build_router(state);

        // Port 0 = random port for testing
        let address = config.common.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", address, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Manifesto service listening on {}:{}", config.common.host, port);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Get the HTTP port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until a shutdown signal arrives.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                std::io::Error::other(format!("HTTP server error: {}", e))
            })
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

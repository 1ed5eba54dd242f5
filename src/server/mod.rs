// Reverie — HTTP Server
//
// Routes:
//   GET  /health                        — backend reachability + model check
//   POST /generate-thought              — run the reflection pipeline
//   GET  /consciousness-metrics?limit=N — last N metrics snapshots (default 10)
//   GET  /thought-history?limit=N       — last N thoughts (default 20)
//
// The ReflectionService is built once here and injected into handlers as
// axum state.

pub mod handlers;
pub mod health;

use crate::config::Config;
use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use log::info;
use reverie_core::{Backend, ReflectionService};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ReflectionService>,
    pub service_name: &'static str,
}

impl AppState {
    /// Build the backend and service from configuration.
    pub fn from_config(config: &Config) -> Self {
        let backend = Backend::from_config(&config.provider_config());
        AppState {
            service: Arc::new(ReflectionService::new(backend, config.history_caps())),
            service_name: SERVICE_NAME,
        }
    }
}

pub const SERVICE_NAME: &str = "reverie";

/// All routes with CORS applied.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health::health))
        .route("/generate-thought", post(handlers::generate_thought))
        .route("/consciousness-metrics", get(handlers::consciousness_metrics))
        .route("/thought-history", get(handlers::thought_history))
        .with_state(state)
        .layer(cors)
}

/// Bind and serve until Ctrl-C.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let state = AppState::from_config(&config);
    let app = router(state);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("[http] Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("[http] Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("[http] Could not listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("[http] Shutdown requested");
}

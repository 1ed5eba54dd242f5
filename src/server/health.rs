// Reverie — Health endpoint
//
// Never fails: backend problems are folded into `status` and the
// human-readable `dependencies` lines.

use super::handlers::now;
use super::AppState;
use axum::extract::State;
use axum::Json;
use reverie_core::engine::providers::OllamaProbe;
use reverie_core::Backend;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub service: String,
    pub provider: String,
    pub model: String,
    pub dependencies: Vec<String>,
    pub timestamp: String,
}

/// Map a probe result to a status and dependency lines.
pub fn assess_ollama(probe: &OllamaProbe, model: &str) -> (HealthStatus, Vec<String>) {
    match probe {
        OllamaProbe::ModelAvailable => (
            HealthStatus::Healthy,
            vec![format!("Ollama model '{}' available", model)],
        ),
        OllamaProbe::ModelMissing(available) => (
            HealthStatus::Degraded,
            vec![
                format!("Ollama running but model '{}' not found", model),
                format!("Available models: {}", available.join(", ")),
            ],
        ),
        OllamaProbe::NotResponding(status) => (
            HealthStatus::Unhealthy,
            vec![format!("Ollama not responding (HTTP {})", status)],
        ),
        OllamaProbe::Unreachable(_) => (
            HealthStatus::Unhealthy,
            vec!["Ollama not running - start with 'ollama serve'".to_string()],
        ),
    }
}

/// Probe the configured backend.
pub async fn check(backend: &Backend) -> (HealthStatus, Vec<String>) {
    match backend {
        Backend::Ollama(ollama) => assess_ollama(&ollama.probe().await, ollama.model()),
        Backend::Unsupported(name) => (
            HealthStatus::Unhealthy,
            vec![format!("Unsupported LLM provider: {}", name)],
        ),
        Backend::OpenAi | Backend::Anthropic => (HealthStatus::Healthy, Vec::new()),
    }
}

pub async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    let backend = state.service.backend();
    let (status, dependencies) = check(backend).await;
    Json(HealthReport {
        status,
        service: state.service_name.to_string(),
        provider: backend.provider_name().to_string(),
        model: backend.model_name().to_string(),
        dependencies,
        timestamp: now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_model_is_degraded_and_lists_available() {
        let probe = OllamaProbe::ModelMissing(vec!["mistral:7b".into(), "phi3".into()]);
        let (status, deps) = assess_ollama(&probe, "llama3.2:3b");
        assert_eq!(status, HealthStatus::Degraded);
        assert_eq!(deps[1], "Available models: mistral:7b, phi3");
    }

    #[test]
    fn unreachable_and_error_status_are_unhealthy() {
        let (s, _) = assess_ollama(&OllamaProbe::Unreachable("refused".into()), "m");
        assert_eq!(s, HealthStatus::Unhealthy);
        let (s, deps) = assess_ollama(&OllamaProbe::NotResponding(503), "m");
        assert_eq!(s, HealthStatus::Unhealthy);
        assert!(deps[0].contains("503"));
    }

    #[tokio::test]
    async fn stub_providers_report_healthy_without_dependencies() {
        let (s, deps) = check(&Backend::Anthropic).await;
        assert_eq!(s, HealthStatus::Healthy);
        assert!(deps.is_empty());
    }

    #[tokio::test]
    async fn unsupported_provider_is_unhealthy() {
        let (s, _) = check(&Backend::Unsupported("palm".into())).await;
        assert_eq!(s, HealthStatus::Unhealthy);
    }
}

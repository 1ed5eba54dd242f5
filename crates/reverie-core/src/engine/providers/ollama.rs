// Reverie Engine — Ollama Backend
//
// Non-streaming completion via `POST /api/generate` and model discovery via
// `GET /api/tags` for the health probe.

use crate::atoms::error::BackendError;
use crate::atoms::types::ProviderConfig;
use log::{error, info, warn};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

/// Timeout for the `/api/tags` reachability probe.
const PROBE_TIMEOUT_SECS: u64 = 5;
/// How many installed models are named when the configured one is missing.
const LISTED_MODELS: usize = 3;

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OllamaBackend {
    client: Client,
    base_url: String,
    model: String,
    timeout_secs: u64,
}

/// Outcome of probing the Ollama server.
#[derive(Debug, Clone, PartialEq)]
pub enum OllamaProbe {
    /// Server answered and lists the configured model.
    ModelAvailable,
    /// Server answered but the model is missing; carries installed names.
    ModelMissing(Vec<String>),
    /// Server answered with a non-success status.
    NotResponding(u16),
    /// Server could not be reached.
    Unreachable(String),
}

impl OllamaBackend {
    pub fn new(config: &ProviderConfig) -> Self {
        let timeout_secs = config.request_timeout_secs.max(1);
        let client = match Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(timeout_secs))
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                error!("[backend] HTTP client build failed, using defaults without timeout: {}", e);
                Client::new()
            }
        };
        OllamaBackend {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            timeout_secs,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send the prompt and return the raw completion text.
    pub async fn complete(&self, prompt: &str) -> Result<String, BackendError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
        });

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendError::from_reqwest(&e, self.timeout_secs))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(BackendError::Api { status: status.as_u16(), message: text });
        }

        let parsed: GenerateResponse = resp.json().await.map_err(|e| {
            if e.is_timeout() {
                BackendError::Timeout(self.timeout_secs)
            } else {
                BackendError::Api { status: status.as_u16(), message: e.to_string() }
            }
        })?;

        parsed.response.ok_or_else(|| BackendError::Api {
            status: status.as_u16(),
            message: "missing 'response' field".to_string(),
        })
    }

    /// Check reachability and whether the configured model is installed.
    pub async fn probe(&self) -> OllamaProbe {
        let url = format!("{}/api/tags", self.base_url);
        let resp = match self
            .client
            .get(&url)
            .timeout(Duration::from_secs(PROBE_TIMEOUT_SECS))
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!("[backend] Ollama not reachable at {}: {}", self.base_url, e);
                return OllamaProbe::Unreachable(e.to_string());
            }
        };

        if !resp.status().is_success() {
            return OllamaProbe::NotResponding(resp.status().as_u16());
        }

        let v: Value = match resp.json().await {
            Ok(v) => v,
            Err(e) => return OllamaProbe::Unreachable(e.to_string()),
        };

        let names = model_names(&v);
        if names.iter().any(|n| model_matches(n, &self.model)) {
            info!("[backend] Ollama model '{}' is available", self.model);
            OllamaProbe::ModelAvailable
        } else {
            OllamaProbe::ModelMissing(names.into_iter().take(LISTED_MODELS).collect())
        }
    }
}

/// Model names from an `/api/tags` listing.
fn model_names(tags: &Value) -> Vec<String> {
    tags["models"]
        .as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(|m| m["name"].as_str().or_else(|| m["model"].as_str()))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Exact name match. An untagged configured name also matches its
/// `:latest` listing, which is how Ollama names untagged pulls.
pub fn model_matches(installed: &str, wanted: &str) -> bool {
    if installed == wanted {
        return true;
    }
    !wanted.contains(':') && installed.strip_suffix(":latest") == Some(wanted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_match_requires_same_tag() {
        assert!(model_matches("llama3.2:3b", "llama3.2:3b"));
        assert!(!model_matches("llama3.2:70b", "llama3.2:3b"));
        assert!(!model_matches("llama3.2:latest", "llama3.2:3b"));
        assert!(!model_matches("llama3.2", "llama3.2:3b"));
        assert!(!model_matches("mistral:7b", "llama3.2:3b"));
    }

    #[test]
    fn untagged_model_matches_latest_only() {
        assert!(model_matches("llama3.2:latest", "llama3.2"));
        assert!(model_matches("llama3.2", "llama3.2"));
        assert!(!model_matches("llama3.2:3b", "llama3.2"));
    }

    #[test]
    fn model_names_reads_name_or_model_key() {
        let tags = json!({"models": [{"name": "a:1"}, {"model": "b:2"}, {"size": 3}]});
        assert_eq!(model_names(&tags), vec!["a:1".to_string(), "b:2".to_string()]);
        assert!(model_names(&json!({})).is_empty());
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let backend = OllamaBackend::new(&ProviderConfig {
            provider: "ollama".into(),
            base_url: "http://localhost:11434/".into(),
            model: "llama3.2:3b".into(),
            request_timeout_secs: 30,
            api_key: String::new(),
        });
        assert_eq!(backend.base_url, "http://localhost:11434");
    }

    #[tokio::test]
    async fn unreachable_server_is_unavailable() {
        let backend = OllamaBackend::new(&ProviderConfig {
            provider: "ollama".into(),
            base_url: "http://127.0.0.1:1".into(),
            model: "m".into(),
            request_timeout_secs: 2,
            api_key: String::new(),
        });
        match backend.complete("hi").await {
            Err(BackendError::Unavailable(_)) | Err(BackendError::Timeout(_)) => {}
            other => panic!("expected unavailable, got {:?}", other),
        }
        assert!(matches!(backend.probe().await, OllamaProbe::Unreachable(_)));
    }
}

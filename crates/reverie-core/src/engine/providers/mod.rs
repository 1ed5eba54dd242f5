// Reverie Engine — Text Backend Registry
// Backend is a closed enum selected once from configuration. Only Ollama
// talks to a real model; OpenAI and Anthropic are valid placeholders that
// answer with a fixed string.

pub mod ollama;

pub use ollama::{OllamaBackend, OllamaProbe};

use crate::atoms::constants::{ANTHROPIC_NOT_IMPLEMENTED, OPENAI_NOT_IMPLEMENTED};
use crate::atoms::error::BackendError;
use crate::atoms::types::{ProviderConfig, ProviderKind};
use log::error;

/// Text-completion backend for thought generation.
#[derive(Debug, Clone)]
pub enum Backend {
    Ollama(OllamaBackend),
    OpenAi,
    Anthropic,
    /// Provider identifier that names no known backend. Every completion
    /// fails with `UnsupportedProvider`.
    Unsupported(String),
}

impl Backend {
    /// Construct the right backend from a `ProviderConfig`.
    pub fn from_config(config: &ProviderConfig) -> Self {
        match config.provider.parse::<ProviderKind>() {
            Ok(ProviderKind::Ollama) => Backend::Ollama(OllamaBackend::new(config)),
            Ok(ProviderKind::OpenAI) => Backend::OpenAi,
            Ok(ProviderKind::Anthropic) => Backend::Anthropic,
            Err(e) => {
                error!("[backend] {}", e);
                Backend::Unsupported(config.provider.clone())
            }
        }
    }

    /// Provider identifier as configured.
    pub fn provider_name(&self) -> &str {
        match self {
            Backend::Ollama(_) => ProviderKind::Ollama.as_str(),
            Backend::OpenAi => ProviderKind::OpenAI.as_str(),
            Backend::Anthropic => ProviderKind::Anthropic.as_str(),
            Backend::Unsupported(name) => name.as_str(),
        }
    }

    /// Model name reported by the health endpoint.
    pub fn model_name(&self) -> &str {
        match self {
            Backend::Ollama(b) => b.model(),
            _ => "unknown",
        }
    }

    /// Send a prompt and return the raw completion text.
    pub async fn complete(&self, prompt: &str) -> Result<String, BackendError> {
        match self {
            Backend::Ollama(b) => b.complete(prompt).await,
            Backend::OpenAi => Ok(OPENAI_NOT_IMPLEMENTED.to_string()),
            Backend::Anthropic => Ok(ANTHROPIC_NOT_IMPLEMENTED.to_string()),
            Backend::Unsupported(name) => Err(BackendError::UnsupportedProvider(name.clone())),
        }
    }
}

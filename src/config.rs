// ── Reverie: Service Configuration ─────────────────────────────────────────
//
// Load order: built-in defaults → optional TOML file (path in REVERIE_CONFIG)
// → environment variable overrides. The provider string is kept raw here and
// parsed once when the backend is built.

use log::info;
use reverie_core::atoms::constants::{
    DEFAULT_CONTEXT_HISTORY_CAP, DEFAULT_OLLAMA_BASE_URL, DEFAULT_OLLAMA_MODEL,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_THOUGHT_HISTORY_CAP,
};
use reverie_core::{EngineError, EngineResult, HistoryCaps, ProviderConfig, ProviderKind};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CONFIG_PATH_VAR: &str = "REVERIE_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Address to bind: "127.0.0.1" (localhost) or "0.0.0.0" (all interfaces)
    #[serde(default = "default_bind")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// One of ollama, openai, anthropic.
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_ollama_url")]
    pub ollama_base_url: String,
    #[serde(default = "default_ollama_model")]
    pub ollama_model: String,
    /// Unused until the OpenAI backend is implemented.
    #[serde(default)]
    pub openai_api_key: String,
    /// Unused until the Anthropic backend is implemented.
    #[serde(default)]
    pub anthropic_api_key: String,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_thought_cap")]
    pub thought_history_cap: usize,
    #[serde(default = "default_context_cap")]
    pub context_history_cap: usize,
}

fn default_bind() -> String { "0.0.0.0".into() }
fn default_port() -> u16 { 8083 }
fn default_provider() -> String { ProviderKind::Ollama.as_str().into() }
fn default_ollama_url() -> String { DEFAULT_OLLAMA_BASE_URL.into() }
fn default_ollama_model() -> String { DEFAULT_OLLAMA_MODEL.into() }
fn default_timeout() -> u64 { DEFAULT_REQUEST_TIMEOUT_SECS }
fn default_thought_cap() -> usize { DEFAULT_THOUGHT_HISTORY_CAP }
fn default_context_cap() -> usize { DEFAULT_CONTEXT_HISTORY_CAP }

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_address: default_bind(),
            port: default_port(),
            provider: default_provider(),
            ollama_base_url: default_ollama_url(),
            ollama_model: default_ollama_model(),
            openai_api_key: String::new(),
            anthropic_api_key: String::new(),
            request_timeout_secs: default_timeout(),
            thought_history_cap: default_thought_cap(),
            context_history_cap: default_context_cap(),
        }
    }
}

impl Config {
    /// Defaults, then the TOML file named by REVERIE_CONFIG, then env overrides.
    pub fn load() -> EngineResult<Self> {
        let mut config = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) if !path.is_empty() => Self::from_file(Path::new(&path))?,
            _ => Config::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        info!(
            "[config] provider={} model={} bind={}:{}",
            config.provider, config.ollama_model, config.bind_address, config.port
        );
        Ok(config)
    }

    pub fn from_file(path: &Path) -> EngineResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> EngineResult<Self> {
        toml::from_str(text).map_err(|e| EngineError::Config(format!("invalid config file: {}", e)))
    }

    /// Apply overrides from a key lookup (the process environment in production).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> EngineResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let set = |key: &str, target: &mut String| {
            if let Some(v) = lookup(key).filter(|v| !v.is_empty()) {
                *target = v;
            }
        };
        set("LLM_PROVIDER", &mut self.provider);
        set("OLLAMA_BASE_URL", &mut self.ollama_base_url);
        set("OLLAMA_MODEL", &mut self.ollama_model);
        set("OPENAI_API_KEY", &mut self.openai_api_key);
        set("ANTHROPIC_API_KEY", &mut self.anthropic_api_key);
        set("REVERIE_BIND", &mut self.bind_address);

        if let Some(v) = lookup("REVERIE_PORT") {
            self.port = parse_number("REVERIE_PORT", &v)?;
        }
        if let Some(v) = lookup("REVERIE_REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = parse_number("REVERIE_REQUEST_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = lookup("REVERIE_THOUGHT_HISTORY_CAP") {
            self.thought_history_cap = parse_number("REVERIE_THOUGHT_HISTORY_CAP", &v)?;
        }
        if let Some(v) = lookup("REVERIE_CONTEXT_HISTORY_CAP") {
            self.context_history_cap = parse_number("REVERIE_CONTEXT_HISTORY_CAP", &v)?;
        }
        Ok(())
    }

    /// Backend settings for the configured provider.
    pub fn provider_config(&self) -> ProviderConfig {
        let api_key = match self.provider.parse::<ProviderKind>() {
            Ok(ProviderKind::OpenAI) => self.openai_api_key.clone(),
            Ok(ProviderKind::Anthropic) => self.anthropic_api_key.clone(),
            _ => String::new(),
        };
        ProviderConfig {
            provider: self.provider.clone(),
            base_url: self.ollama_base_url.clone(),
            model: self.ollama_model.clone(),
            request_timeout_secs: self.request_timeout_secs,
            api_key,
        }
    }

    pub fn history_caps(&self) -> HistoryCaps {
        HistoryCaps {
            thoughts: self.thought_history_cap,
            contexts: self.context_history_cap,
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> EngineResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| EngineError::Config(format!("{} must be a number, got '{}'", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_match_service_contract() {
        let c = Config::default();
        assert_eq!(c.provider, "ollama");
        assert_eq!(c.port, 8083);
        assert_eq!(c.ollama_base_url, "http://localhost:11434");
        assert_eq!(c.ollama_model, "llama3.2:3b");
        assert_eq!(c.request_timeout_secs, 30);
    }

    #[test]
    fn toml_fills_missing_fields_with_defaults() {
        let c = Config::from_toml("provider = \"anthropic\"\nport = 9000\n").unwrap();
        assert_eq!(c.provider, "anthropic");
        assert_eq!(c.port, 9000);
        assert_eq!(c.ollama_model, "llama3.2:3b");
        assert_eq!(c.thought_history_cap, 1000);
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let err = Config::from_toml("port = \"high\"").unwrap_err();
        assert!(err.is_config(), "err={}", err);
    }

    #[test]
    fn env_overrides_win() {
        let mut c = Config::default();
        c.apply_overrides(env(&[
            ("LLM_PROVIDER", "openai"),
            ("OLLAMA_MODEL", "mistral:7b"),
            ("OPENAI_API_KEY", "sk-test"),
            ("REVERIE_PORT", "9100"),
            ("REVERIE_REQUEST_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(c.provider, "openai");
        assert_eq!(c.ollama_model, "mistral:7b");
        assert_eq!(c.port, 9100);
        assert_eq!(c.request_timeout_secs, 5);
        assert_eq!(c.provider_config().api_key, "sk-test");
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let mut c = Config::default();
        c.apply_overrides(env(&[("LLM_PROVIDER", "")])).unwrap();
        assert_eq!(c.provider, "ollama");
    }

    #[test]
    fn bad_number_is_rejected() {
        let mut c = Config::default();
        let err = c.apply_overrides(env(&[("REVERIE_PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("REVERIE_PORT"));
    }

    #[test]
    fn ollama_provider_carries_no_key() {
        let mut c = Config::default();
        c.openai_api_key = "sk-unused".into();
        assert!(c.provider_config().api_key.is_empty());
        assert_eq!(c.listen_addr(), "0.0.0.0:8083");
    }
}

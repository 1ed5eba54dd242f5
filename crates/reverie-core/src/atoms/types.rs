// ── Reverie Atoms: Pure Data Types ───────────────────────────────────────────
// All plain struct/enum definitions with no I/O.
// Atoms layer rule: no side effects, no imports from engine/.

use crate::atoms::constants::{NEUTRAL_AROUSAL, NEUTRAL_VALENCE};
use crate::atoms::error::BackendError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

// ── Context ──────────────────────────────────────────────────────────────────

/// One remembered event fed into a reflection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MemoryEvent {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Facet name → value, in insertion order.
    #[serde(default)]
    pub facets: Map<String, Value>,
}

/// A recurring pattern detected by the memory system.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MemoryPattern {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub pattern_type: Option<String>,
    #[serde(default)]
    pub strength: f64,
}

fn default_valence() -> f64 {
    NEUTRAL_VALENCE
}
fn default_arousal() -> f64 {
    NEUTRAL_AROUSAL
}

/// Valence/arousal pair plus any extra affect dimensions the caller sends.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmotionalState {
    #[serde(default = "default_valence")]
    pub valence: f64,
    #[serde(default = "default_arousal")]
    pub arousal: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for EmotionalState {
    fn default() -> Self {
        EmotionalState {
            valence: NEUTRAL_VALENCE,
            arousal: NEUTRAL_AROUSAL,
            extra: Map::new(),
        }
    }
}

/// Incoming, partially-specified context. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContextRequest {
    #[serde(default)]
    pub recent_events: Option<Vec<MemoryEvent>>,
    #[serde(default)]
    pub emotional_state: Option<EmotionalState>,
    #[serde(default)]
    pub attention_focus: Option<Vec<String>>,
    #[serde(default)]
    pub memory_patterns: Option<Vec<MemoryPattern>>,
}

/// Snapshot of input state for one generation call.
///
/// Fields are private so a context cannot change after construction.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MemoryContext {
    recent_events: Vec<MemoryEvent>,
    emotional_state: EmotionalState,
    attention_focus: Vec<String>,
    memory_patterns: Vec<MemoryPattern>,
    timestamp: String,
}

impl MemoryContext {
    pub fn new(
        recent_events: Vec<MemoryEvent>,
        emotional_state: EmotionalState,
        attention_focus: Vec<String>,
        memory_patterns: Vec<MemoryPattern>,
    ) -> Self {
        MemoryContext {
            recent_events,
            emotional_state,
            attention_focus,
            memory_patterns,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Fill missing request fields with defaults and stamp the current time.
    pub fn from_request(req: ContextRequest) -> Self {
        Self::new(
            req.recent_events.unwrap_or_default(),
            req.emotional_state.unwrap_or_default(),
            req.attention_focus.unwrap_or_default(),
            req.memory_patterns.unwrap_or_default(),
        )
    }

    pub fn recent_events(&self) -> &[MemoryEvent] {
        &self.recent_events
    }

    pub fn emotional_state(&self) -> &EmotionalState {
        &self.emotional_state
    }

    pub fn attention_focus(&self) -> &[String] {
        &self.attention_focus
    }

    pub fn memory_patterns(&self) -> &[MemoryPattern] {
        &self.memory_patterns
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }
}

// ── Thought ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmotionalTone {
    Positive,
    Negative,
    Neutral,
}

impl fmt::Display for EmotionalTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EmotionalTone::Positive => "positive",
            EmotionalTone::Negative => "negative",
            EmotionalTone::Neutral => "neutral",
        };
        f.write_str(s)
    }
}

/// One structured unit of generated text plus derived signals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Thought {
    pub content: String,
    pub confidence: f64,
    pub evidence: Vec<String>,
    pub emotional_tone: EmotionalTone,
    pub self_reference: bool,
    pub creative_insight: bool,
    pub timestamp: String,
    pub context_hash: String,
}

// ── Metrics ──────────────────────────────────────────────────────────────────

/// Derived indicators for one thought. Every score lies in [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConsciousnessMetrics {
    pub self_awareness: f64,
    pub memory_consolidation: f64,
    pub emotional_stability: f64,
    pub creative_insights: f64,
    pub unexpected_behaviors: f64,
    pub attention_coherence: f64,
    pub timestamp: String,
}

impl ConsciousnessMetrics {
    /// All six scores in declaration order.
    pub fn scores(&self) -> [f64; 6] {
        [
            self.self_awareness,
            self.memory_consolidation,
            self.emotional_stability,
            self.creative_insights,
            self.unexpected_behaviors,
            self.attention_coherence,
        ]
    }
}

// ── Provider ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Ollama,
    OpenAI,
    Anthropic,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Ollama => "ollama",
            ProviderKind::OpenAI => "openai",
            ProviderKind::Anthropic => "anthropic",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = BackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(ProviderKind::Ollama),
            "openai" => Ok(ProviderKind::OpenAI),
            "anthropic" => Ok(ProviderKind::Anthropic),
            other => Err(BackendError::UnsupportedProvider(other.to_string())),
        }
    }
}

/// Everything needed to build a text backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Raw provider identifier; parsed once when the backend is built.
    pub provider: String,
    pub base_url: String,
    pub model: String,
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub api_key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_request_fields_get_defaults() {
        let req: ContextRequest = serde_json::from_str("{}").unwrap();
        let ctx = MemoryContext::from_request(req);
        assert!(ctx.recent_events().is_empty());
        assert!(ctx.attention_focus().is_empty());
        assert!(ctx.memory_patterns().is_empty());
        assert_eq!(ctx.emotional_state().valence, 0.5);
        assert_eq!(ctx.emotional_state().arousal, 0.5);
        assert!(!ctx.timestamp().is_empty());
    }

    #[test]
    fn partial_emotional_state_defaults_missing_axis() {
        let req: ContextRequest =
            serde_json::from_str(r#"{"emotional_state": {"valence": 0.9, "dominance": 0.2}}"#).unwrap();
        let ctx = MemoryContext::from_request(req);
        assert_eq!(ctx.emotional_state().valence, 0.9);
        assert_eq!(ctx.emotional_state().arousal, 0.5);
        assert_eq!(ctx.emotional_state().extra.get("dominance"), Some(&Value::from(0.2)));
    }

    #[test]
    fn emotional_state_accepts_non_numeric_extras() {
        let req: ContextRequest = serde_json::from_str(
            r#"{"emotional_state": {"valence": 0.5, "label": "calm", "tags": ["a"]}}"#,
        )
        .unwrap();
        let ctx = MemoryContext::from_request(req);
        assert_eq!(ctx.emotional_state().extra.get("label"), Some(&Value::from("calm")));
        assert_eq!(ctx.emotional_state().arousal, 0.5);
    }

    #[test]
    fn event_facets_keep_insertion_order() {
        let ev: MemoryEvent = serde_json::from_str(
            r#"{"type": "observation", "facets": {"zeta": 1, "alpha": 2, "mid": 3}}"#,
        )
        .unwrap();
        let names: Vec<&String> = ev.facets.keys().collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn provider_kind_parses_case_insensitively() {
        assert_eq!("Ollama".parse::<ProviderKind>(), Ok(ProviderKind::Ollama));
        assert_eq!(" openai ".parse::<ProviderKind>(), Ok(ProviderKind::OpenAI));
        assert_eq!(
            "bard".parse::<ProviderKind>(),
            Err(BackendError::UnsupportedProvider("bard".into()))
        );
    }

    #[test]
    fn tone_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&EmotionalTone::Positive).unwrap(), "\"positive\"");
    }
}

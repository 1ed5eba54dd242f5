// Reverie Engine — Thought Generator
//
// Idle → Composing → AwaitingBackend → Parsing → Done
//                         └─ (backend failure) → Degraded → Parsing → Done
//
// A transient backend failure never fails the call: the fixed fallback text
// takes the place of the completion and is parsed exactly like real output.
// Only configuration errors (unsupported provider) propagate.

use crate::atoms::constants::FALLBACK_THOUGHT;
use crate::atoms::error::{BackendError, EngineResult};
use crate::atoms::types::{MemoryContext, Thought};
use crate::engine::prompt;
use crate::engine::providers::Backend;
use crate::engine::signals;
use log::{debug, info, warn};
use sha2::{Digest, Sha256};

/// Pipeline stage, used for logging transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorState {
    Idle,
    Composing,
    AwaitingBackend,
    Degraded,
    Parsing,
    Done,
}

/// Text handed to the parsing stage.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// Real backend output.
    Ok(String),
    /// Fallback text substituted after a recoverable backend failure.
    Degraded { text: String, cause: BackendError },
}

impl Completion {
    pub fn text(&self) -> &str {
        match self {
            Completion::Ok(text) => text,
            Completion::Degraded { text, .. } => text,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Completion::Degraded { .. })
    }
}

/// Produces thoughts from contexts through the configured backend.
#[derive(Debug, Clone)]
pub struct ThoughtGenerator {
    backend: Backend,
}

impl ThoughtGenerator {
    pub fn new(backend: Backend) -> Self {
        ThoughtGenerator { backend }
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    /// Run the full pipeline for one context.
    pub async fn generate(&self, context: &MemoryContext) -> EngineResult<Thought> {
        let mut state = GeneratorState::Idle;
        transition(&mut state, GeneratorState::Composing);
        let prompt = prompt::compose(context);

        transition(&mut state, GeneratorState::AwaitingBackend);
        let completion = self.request(&prompt).await?;
        if completion.is_degraded() {
            transition(&mut state, GeneratorState::Degraded);
        }

        transition(&mut state, GeneratorState::Parsing);
        let thought = parse_thought(&completion, context);

        transition(&mut state, GeneratorState::Done);
        info!(
            "[reflection] Thought generated: tone={} confidence={:.2} degraded={} hash={}",
            thought.emotional_tone,
            thought.confidence,
            completion.is_degraded(),
            thought.context_hash
        );
        Ok(thought)
    }

    /// Call the backend, folding recoverable failures into fallback text.
    pub async fn request(&self, prompt: &str) -> EngineResult<Completion> {
        match self.backend.complete(prompt).await {
            Ok(text) => Ok(Completion::Ok(text)),
            Err(cause) if cause.is_recoverable() => {
                warn!(
                    "[backend] {} call failed, using fallback thought: {}",
                    self.backend.provider_name(),
                    cause
                );
                Ok(Completion::Degraded { text: FALLBACK_THOUGHT.to_string(), cause })
            }
            Err(cause) => Err(cause.into()),
        }
    }
}

fn transition(state: &mut GeneratorState, next: GeneratorState) {
    debug!("[reflection] {:?} → {:?}", state, next);
    *state = next;
}

/// Build a Thought from completion text and its context.
pub fn parse_thought(completion: &Completion, context: &MemoryContext) -> Thought {
    let text = completion.text();
    let s = signals::analyze(text, context);
    Thought {
        content: text.trim().to_string(),
        confidence: s.confidence,
        evidence: s.evidence,
        emotional_tone: s.emotional_tone,
        self_reference: s.self_reference,
        creative_insight: s.creative_insight,
        timestamp: chrono::Utc::now().to_rfc3339(),
        context_hash: context_hash(context),
    }
}

/// First 16 hex chars of the SHA-256 of the context's JSON form.
pub fn context_hash(context: &MemoryContext) -> String {
    let json = serde_json::to_vec(context).unwrap_or_default();
    let digest = Sha256::digest(&json);
    let hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
    hex[..16].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atoms::constants::OPENAI_NOT_IMPLEMENTED;
    use crate::atoms::types::{EmotionalState, EmotionalTone, MemoryEvent, ProviderConfig};

    fn ctx() -> MemoryContext {
        MemoryContext::new(
            vec![MemoryEvent { event_type: Some("dialogue".into()), ..Default::default() }],
            EmotionalState::default(),
            vec!["voices".into()],
            vec![],
        )
    }

    fn ollama_at(url: &str) -> Backend {
        Backend::from_config(&ProviderConfig {
            provider: "ollama".into(),
            base_url: url.into(),
            model: "llama3.2:3b".into(),
            request_timeout_secs: 2,
            api_key: String::new(),
        })
    }

    #[test]
    fn parse_trims_content_and_runs_detectors() {
        let c = Completion::Ok("  I think the dialogue was interesting.\n".into());
        let t = parse_thought(&c, &ctx());
        assert_eq!(t.content, "I think the dialogue was interesting.");
        assert!(t.self_reference);
        assert!(t.creative_insight);
        assert_eq!(t.evidence, vec!["References dialogue event".to_string()]);
        assert_eq!(t.emotional_tone, EmotionalTone::Neutral);
    }

    #[test]
    fn confidence_uses_untrimmed_length() {
        let raw = format!("{}{}", " ".repeat(100), "x".repeat(100));
        let t = parse_thought(&Completion::Ok(raw), &ctx());
        assert_eq!(t.confidence, 1.0);
        assert_eq!(t.content.len(), 100);
    }

    #[test]
    fn context_hash_is_stable_per_context() {
        let c = ctx();
        assert_eq!(context_hash(&c), context_hash(&c));
        assert_eq!(context_hash(&c).len(), 16);
        let other = MemoryContext::new(vec![], EmotionalState::default(), vec![], vec![]);
        assert_ne!(context_hash(&c), context_hash(&other));
    }

    #[tokio::test]
    async fn unreachable_backend_degrades_to_fallback() {
        let generator = ThoughtGenerator::new(ollama_at("http://127.0.0.1:1"));
        let thought = generator.generate(&ctx()).await.unwrap();
        assert_eq!(thought.content, FALLBACK_THOUGHT);
        let expected = signals::confidence(FALLBACK_THOUGHT, &ctx());
        assert_eq!(thought.confidence, expected);
    }

    #[tokio::test]
    async fn stub_provider_text_is_parsed() {
        let generator = ThoughtGenerator::new(Backend::OpenAi);
        let thought = generator.generate(&ctx()).await.unwrap();
        assert_eq!(thought.content, OPENAI_NOT_IMPLEMENTED);
    }

    #[tokio::test]
    async fn unsupported_provider_propagates() {
        let generator = ThoughtGenerator::new(Backend::Unsupported("palm".into()));
        let err = generator.generate(&ctx()).await.unwrap_err();
        assert!(err.is_config(), "err={}", err);
    }
}

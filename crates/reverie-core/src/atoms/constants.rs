// ── Reverie Atoms: Constants ───────────────────────────────────────────────
// All named constants for the engine live here.

// ── History retention ─────────────────────────────────────────────────────
// Metrics history is a strict FIFO: once it grows past this size the oldest
// snapshots are dropped so exactly the most recent N remain.
pub const METRICS_HISTORY_CAP: usize = 100;

// Thought and context histories default to these caps; both are
// configurable at service construction.
pub const DEFAULT_THOUGHT_HISTORY_CAP: usize = 1000;
pub const DEFAULT_CONTEXT_HISTORY_CAP: usize = 100;

// ── Listing defaults ──────────────────────────────────────────────────────
pub const DEFAULT_METRICS_LIMIT: usize = 10;
pub const DEFAULT_THOUGHTS_LIMIT: usize = 20;

// ── Backend ───────────────────────────────────────────────────────────────
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.2:3b";

/// Substituted for backend output when the backend is unreachable or slow.
pub const FALLBACK_THOUGHT: &str =
    "I'm having trouble processing my thoughts right now. Let me try again later.";

pub const OPENAI_NOT_IMPLEMENTED: &str = "OpenAI integration not yet implemented.";
pub const ANTHROPIC_NOT_IMPLEMENTED: &str = "Anthropic integration not yet implemented.";

// ── Emotional state defaults ──────────────────────────────────────────────
pub const NEUTRAL_VALENCE: f64 = 0.5;
pub const NEUTRAL_AROUSAL: f64 = 0.5;

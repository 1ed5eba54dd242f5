// ── Reverie: Text Signal Extraction ─────────────────────────────────────────
//
// Keyword heuristics over backend output. Every detector lower-cases the
// text and looks for fixed markers as plain substrings, so "pattern" also
// fires inside "patterns" and "sad" inside "saddle".
//
// No LLM required. Pure functions, total over any input string.

use crate::atoms::types::{EmotionalTone, MemoryContext};

// ═════════════════════════════════════════════════════════════════════════════
// Marker Lexicons
// ═════════════════════════════════════════════════════════════════════════════

/// First-person introspective phrases.
const SELF_REFERENCE_MARKERS: &[&str] = &[
    "i am",
    "i feel",
    "i think",
    "i notice",
    "i realize",
    "my experience",
    "my thoughts",
    "my feelings",
    "i have learned",
    "i understand",
    "i see myself",
];

/// Words that signal speculation or noticing something new.
const CREATIVE_MARKERS: &[&str] = &[
    "interesting",
    "fascinating",
    "surprising",
    "unexpected",
    "connection",
    "pattern",
    "insight",
    "realization",
    "what if",
    "perhaps",
    "maybe",
    "could be",
];

const POSITIVE_MARKERS: &[&str] = &["happy", "excited", "curious", "optimistic", "confident"];

const NEGATIVE_MARKERS: &[&str] = &["sad", "worried", "confused", "frustrated", "uncertain"];

const NEUTRAL_MARKERS: &[&str] = &["calm", "reflective", "thoughtful", "analytical"];

/// Emotion words that count as the text referring to the emotional state.
const EMOTIONAL_STATE_MARKERS: &[&str] = &["happy", "sad", "excited", "calm"];

/// Character count at which length stops adding confidence.
const CONFIDENCE_SATURATION_CHARS: f64 = 200.0;
const SELF_REFERENCE_BONUS: f64 = 0.2;
const CREATIVE_BONUS: f64 = 0.1;

// ═════════════════════════════════════════════════════════════════════════════
// Detectors
// ═════════════════════════════════════════════════════════════════════════════

fn contains_any(lower: &str, markers: &[&str]) -> bool {
    markers.iter().any(|m| lower.contains(m))
}

/// Number of markers from the list present in the text (each counted once).
fn count_markers(lower: &str, markers: &[&str]) -> usize {
    markers.iter().filter(|m| lower.contains(*m)).count()
}

/// True if the text speaks about itself in the first person.
pub fn has_self_reference(text: &str) -> bool {
    contains_any(&text.to_lowercase(), SELF_REFERENCE_MARKERS)
}

/// True if the text contains speculative or insight language.
pub fn has_creative_insight(text: &str) -> bool {
    contains_any(&text.to_lowercase(), CREATIVE_MARKERS)
}

/// Classify tone by which word list has the strict majority of hits.
/// Ties, including no hits at all, are neutral.
pub fn emotional_tone(text: &str) -> EmotionalTone {
    let lower = text.to_lowercase();
    let pos = count_markers(&lower, POSITIVE_MARKERS);
    let neg = count_markers(&lower, NEGATIVE_MARKERS);
    let neu = count_markers(&lower, NEUTRAL_MARKERS);

    if pos > neg && pos > neu {
        EmotionalTone::Positive
    } else if neg > pos && neg > neu {
        EmotionalTone::Negative
    } else {
        EmotionalTone::Neutral
    }
}

/// Confidence score in [0, 1].
///
/// Length of the raw text (in characters) contributes up to 1.0, saturating
/// at 200 characters; self-reference adds 0.2 and creative insight 0.1.
/// The context is accepted for signature parity with evidence extraction
/// but does not influence the score.
pub fn confidence(text: &str, _context: &MemoryContext) -> f64 {
    let chars = text.chars().count() as f64;
    let mut score = (chars / CONFIDENCE_SATURATION_CHARS).min(1.0);
    if has_self_reference(text) {
        score += SELF_REFERENCE_BONUS;
    }
    if has_creative_insight(text) {
        score += CREATIVE_BONUS;
    }
    score.clamp(0.0, 1.0)
}

/// Short justifications linking the text back to its context.
///
/// One `References <type> event` per context event whose type appears in
/// the text (in event order), then a single `References emotional state`
/// if any emotion word is present.
pub fn extract_evidence(text: &str, context: &MemoryContext) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut evidence: Vec<String> = context
        .recent_events()
        .iter()
        .filter_map(|event| event.event_type.as_deref())
        .filter(|t| !t.is_empty() && lower.contains(&t.to_lowercase()))
        .map(|t| format!("References {} event", t))
        .collect();

    if contains_any(&lower, EMOTIONAL_STATE_MARKERS) {
        evidence.push("References emotional state".to_string());
    }
    evidence
}

/// All signals derived from one piece of backend text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSignals {
    pub self_reference: bool,
    pub creative_insight: bool,
    pub emotional_tone: EmotionalTone,
    pub confidence: f64,
    pub evidence: Vec<String>,
}

/// Run every detector against `text`.
pub fn analyze(text: &str, context: &MemoryContext) -> TextSignals {
    TextSignals {
        self_reference: has_self_reference(text),
        creative_insight: has_creative_insight(text),
        emotional_tone: emotional_tone(text),
        confidence: confidence(text, context),
        evidence: extract_evidence(text, context),
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Tests
// ═════════════════════════════════════════════════════════════════════════════

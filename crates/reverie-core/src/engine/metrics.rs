// Reverie Engine — Consciousness Metrics Aggregator
//
// Folds one Thought and its originating context into a ConsciousnessMetrics
// snapshot. Every score is computed from the raw formula and clamped into
// [0, 1] as the final step, so no stored field is ever negative or above 1.

use crate::atoms::constants::METRICS_HISTORY_CAP;
use crate::atoms::types::{ConsciousnessMetrics, MemoryContext, Thought};
use crate::engine::history::CappedHistory;

/// Confidence above which a thought counts as self-assured.
const HIGH_CONFIDENCE: f64 = 0.7;
/// Pattern count that saturates memory consolidation.
const PATTERN_SATURATION: f64 = 10.0;
/// Focus-label count that saturates attention coherence.
const FOCUS_SATURATION: f64 = 5.0;
/// No signal drives this score yet; it is reported as a constant.
pub const UNEXPECTED_BEHAVIORS_PLACEHOLDER: f64 = 0.5;

/// Compute the metrics snapshot for one generated thought.
pub fn score(thought: &Thought, context: &MemoryContext) -> ConsciousnessMetrics {
    let mut self_awareness = 0.5;
    if thought.self_reference {
        self_awareness += 0.3;
    }
    if thought.confidence > HIGH_CONFIDENCE {
        self_awareness += 0.2;
    }

    let memory_consolidation = context.memory_patterns().len() as f64 / PATTERN_SATURATION;

    let valence = context.emotional_state().valence;
    let emotional_stability = 1.0 - (valence - 0.5).abs() * 2.0;

    let creative_insights = if thought.creative_insight { 1.0 } else { 0.0 };

    let attention_coherence = context.attention_focus().len() as f64 / FOCUS_SATURATION;

    ConsciousnessMetrics {
        self_awareness: clamp_unit(self_awareness),
        memory_consolidation: clamp_unit(memory_consolidation),
        emotional_stability: clamp_unit(emotional_stability),
        creative_insights: clamp_unit(creative_insights),
        unexpected_behaviors: clamp_unit(UNEXPECTED_BEHAVIORS_PLACEHOLDER),
        attention_coherence: clamp_unit(attention_coherence),
        timestamp: chrono::Utc::now().to_rfc3339(),
    }
}

/// Scores thoughts and keeps the most recent 100 snapshots.
#[derive(Debug, Clone)]
pub struct MetricsAggregator {
    history: CappedHistory<ConsciousnessMetrics>,
}

impl Default for MetricsAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsAggregator {
    pub fn new() -> Self {
        MetricsAggregator { history: CappedHistory::new(METRICS_HISTORY_CAP) }
    }

    /// Score the thought, append the snapshot, and return it.
    pub fn update(&mut self, thought: &Thought, context: &MemoryContext) -> ConsciousnessMetrics {
        let metrics = score(thought, context);
        self.history.push(metrics.clone());
        metrics
    }

    /// The last `limit` snapshots, oldest first.
    pub fn recent(&self, limit: usize) -> Vec<ConsciousnessMetrics> {
        self.history.tail(limit)
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

/// Clamp into [0, 1]; NaN maps to 0.
fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

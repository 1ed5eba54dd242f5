// Reverie Engine — Reflection Service
//
// Façade owning the three histories (thoughts, metrics, contexts). Built once
// at startup and shared behind an Arc; there is no teardown.
//
// Concurrency: backend calls run outside the lock, so requests may overlap
// while waiting on the model. The context append, thought append and metrics
// update of one request happen under a single Mutex guard, so histories stay
// aligned and append order is the order in which requests finish.

use crate::atoms::constants::{
    DEFAULT_CONTEXT_HISTORY_CAP, DEFAULT_METRICS_LIMIT, DEFAULT_THOUGHTS_LIMIT,
    DEFAULT_THOUGHT_HISTORY_CAP,
};
use crate::atoms::error::EngineResult;
use crate::atoms::types::{ConsciousnessMetrics, ContextRequest, MemoryContext, Thought};
use crate::engine::generator::ThoughtGenerator;
use crate::engine::history::CappedHistory;
use crate::engine::metrics::MetricsAggregator;
use crate::engine::providers::Backend;
use log::{error, info};
use parking_lot::Mutex;

/// Retention limits for the uncapped-by-invariant histories.
#[derive(Debug, Clone, Copy)]
pub struct HistoryCaps {
    pub thoughts: usize,
    pub contexts: usize,
}

impl Default for HistoryCaps {
    fn default() -> Self {
        HistoryCaps {
            thoughts: DEFAULT_THOUGHT_HISTORY_CAP,
            contexts: DEFAULT_CONTEXT_HISTORY_CAP,
        }
    }
}

struct Histories {
    thoughts: CappedHistory<Thought>,
    metrics: MetricsAggregator,
    contexts: CappedHistory<MemoryContext>,
}

pub struct ReflectionService {
    generator: ThoughtGenerator,
    histories: Mutex<Histories>,
}

impl ReflectionService {
    pub fn new(backend: Backend, caps: HistoryCaps) -> Self {
        info!(
            "[reflection] Service ready: provider={} model={} thought_cap={} context_cap={}",
            backend.provider_name(),
            backend.model_name(),
            caps.thoughts,
            caps.contexts
        );
        ReflectionService {
            generator: ThoughtGenerator::new(backend),
            histories: Mutex::new(Histories {
                thoughts: CappedHistory::new(caps.thoughts),
                metrics: MetricsAggregator::new(),
                contexts: CappedHistory::new(caps.contexts),
            }),
        }
    }

    pub fn backend(&self) -> &Backend {
        self.generator.backend()
    }

    /// Default the request, generate a thought, and record it with its metrics.
    pub async fn generate_thought(&self, request: ContextRequest) -> EngineResult<Thought> {
        let context = MemoryContext::from_request(request);

        let thought = match self.generator.generate(&context).await {
            Ok(t) => t,
            Err(e) => {
                error!("[reflection] Thought generation failed: {}", e);
                return Err(e);
            }
        };

        let mut h = self.histories.lock();
        h.thoughts.push(thought.clone());
        let metrics = h.metrics.update(&thought, &context);
        h.contexts.push(context);
        drop(h);

        info!(
            "[reflection] Recorded thought: self_awareness={:.2} creative_insights={:.2}",
            metrics.self_awareness, metrics.creative_insights
        );
        Ok(thought)
    }

    /// The last `limit` metrics snapshots (default 10), oldest first.
    pub fn list_metrics(&self, limit: Option<usize>) -> Vec<ConsciousnessMetrics> {
        self.histories
            .lock()
            .metrics
            .recent(limit.unwrap_or(DEFAULT_METRICS_LIMIT))
    }

    /// The last `limit` thoughts (default 20), oldest first.
    pub fn list_thoughts(&self, limit: Option<usize>) -> Vec<Thought> {
        self.histories
            .lock()
            .thoughts
            .tail(limit.unwrap_or(DEFAULT_THOUGHTS_LIMIT))
    }

    /// The last `limit` contexts that produced thoughts, oldest first.
    pub fn recent_contexts(&self, limit: usize) -> Vec<MemoryContext> {
        self.histories.lock().contexts.tail(limit)
    }

    /// Current lengths of the thought, metrics and context histories.
    pub fn history_sizes(&self) -> (usize, usize, usize) {
        let h = self.histories.lock();
        (h.thoughts.len(), h.metrics.len(), h.contexts.len())
    }
}

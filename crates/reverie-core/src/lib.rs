//! Reverie core engine.
//!
//! Turns a rolling memory context into a reflective [`Thought`] via a text
//! backend, scores it into [`ConsciousnessMetrics`], and keeps capped
//! histories of both inside a [`ReflectionService`].

pub mod atoms;
pub mod engine;

pub use atoms::error::{BackendError, EngineError, EngineResult};
pub use atoms::types::{
    ConsciousnessMetrics, ContextRequest, EmotionalState, EmotionalTone, MemoryContext,
    MemoryEvent, MemoryPattern, ProviderConfig, ProviderKind, Thought,
};
pub use engine::providers::Backend;
pub use engine::service::{HistoryCaps, ReflectionService};

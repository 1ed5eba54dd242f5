//! Reverie HTTP service.
//!
//! Thin axum delivery layer around [`reverie_core::ReflectionService`]:
//! configuration loading, routing, and the JSON response envelopes.

pub mod config;
pub mod server;

pub use config::Config;
pub use server::{router, serve, AppState};

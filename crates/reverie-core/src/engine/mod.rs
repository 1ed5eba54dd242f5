// Reverie Engine — reflection pipeline
// compose prompt → backend completion → text signals → thought → metrics

pub mod generator;
pub mod history;
pub mod metrics;
pub mod prompt;
pub mod providers;
pub mod service;
pub mod signals;

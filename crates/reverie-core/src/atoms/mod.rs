// ── Reverie Atoms Layer ────────────────────────────────────────────────────
// Constants, data types and error types. No I/O.
// Dependency rule: atoms may only depend on std and external pure crates.
// Nothing here may import from engine/.

pub mod constants;
pub mod error;
pub mod types;

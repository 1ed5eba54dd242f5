// ── Reverie Atoms: Error Types ─────────────────────────────────────────────
// Single canonical error enum for the engine, built with `thiserror`.
//
// Design rules:
//   • Variants are coarse-grained by domain (I/O, Backend, Config).
//   • Backend failures are classified separately in `BackendError` so the
//     thought generator can decide between degrading and failing.
//   • `Display` output goes straight into the HTTP error envelope.
//   • No variant carries secret material (API keys) in its message.

use thiserror::Error;

// ── Backend classification ─────────────────────────────────────────────────

/// Failure of a text-completion backend call.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BackendError {
    /// Backend could not be reached (connection refused, DNS, reset).
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// Backend did not answer within the request timeout.
    #[error("Backend timeout after {0}s")]
    Timeout(u64),

    /// Backend answered with a non-success status or an unusable body.
    #[error("Backend API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Provider identifier does not name a known backend.
    #[error("Unsupported LLM provider: {0}")]
    UnsupportedProvider(String),
}

impl BackendError {
    /// Whether the failure is transient and may be replaced by fallback text.
    /// Configuration errors are never recoverable.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, BackendError::UnsupportedProvider(_))
    }

    /// Classify a reqwest failure into a backend error.
    pub fn from_reqwest(err: &reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            BackendError::Timeout(timeout_secs)
        } else if err.is_connect() || err.is_request() {
            BackendError::Unavailable(err.to_string())
        } else if let Some(status) = err.status() {
            BackendError::Api { status: status.as_u16(), message: err.to_string() }
        } else {
            BackendError::Unavailable(err.to_string())
        }
    }
}

// ── Primary error enum ─────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum EngineError {
    /// Filesystem or OS-level I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Text backend failure that could not be degraded.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Service configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl EngineError {
    /// True when the error stems from configuration rather than the request.
    pub fn is_config(&self) -> bool {
        matches!(self, EngineError::Config(_) | EngineError::Backend(BackendError::UnsupportedProvider(_)))
    }
}

// ── Convenience alias ──────────────────────────────────────────────────────

/// All engine operations return this type.
pub type EngineResult<T> = Result<T, EngineError>;

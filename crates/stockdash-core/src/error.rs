// ── Core error types ──
//
// Dashboard-facing errors. The refresh controller shows these to the user
// as a one-line banner, so `Display` stays short. The
// `From<stockdash_api::Error>` impl folds transport-layer failures into
// the network / parse / auth buckets.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Network ──────────────────────────────────────────────────────
    /// Connection failure or non-success status from an upstream.
    #[error("{message}")]
    Network { message: String },

    #[error("Request timed out: {message}")]
    Timeout { message: String },

    // ── Data ─────────────────────────────────────────────────────────
    /// Upstream body was not the JSON document we expected.
    #[error("{message}")]
    Parse { message: String },

    // ── Auth ─────────────────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<stockdash_api::Error> for CoreError {
    fn from(err: stockdash_api::Error) -> Self {
        use stockdash_api::Error as Api;

        match err {
            Api::Authentication { message } => CoreError::AuthenticationFailed { message },
            Api::Transport(ref e) if e.is_timeout() => CoreError::Timeout {
                message: e.to_string(),
            },
            Api::Transport(ref e) => CoreError::Network {
                message: e.to_string(),
            },
            Api::Http { .. } => CoreError::Network {
                message: err.to_string(),
            },
            Api::Deserialization { message, .. } => CoreError::Parse { message },
            Api::InvalidUrl(e) => CoreError::config(format!("invalid URL: {e}")),
            Api::Tls(message) => CoreError::Config { message },
        }
    }
}

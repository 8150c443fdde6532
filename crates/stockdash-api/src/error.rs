use thiserror::Error;

/// Top-level error type for the `stockdash-api` crate.
///
/// Covers every failure mode across the three upstreams: the portfolio
/// feed, the sleep-status proxy, and the Twitch OAuth/Helix pair.
/// `stockdash-core` maps these into dashboard-facing errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Token issuance failed, or Helix rejected a freshly issued token.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// Upstream answered with a non-success status.
    #[error("{context} HTTP {status}")]
    Http { status: u16, context: &'static str },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Build a deserialization error carrying a short preview of `body`.
    pub(crate) fn from_body(err: &serde_json::Error, body: &str) -> Self {
        let preview: String = body.chars().take(80).collect();
        Self::Deserialization {
            message: format!("{err} (first chars: {preview:?})"),
            body: body.to_owned(),
        }
    }
}

//! Sleep-status proxy.
//!
//! A single-endpoint HTTP service: every request, whatever its method or
//! path, looks up the configured broadcaster on Twitch Helix and answers
//! with a [`SleepStatus`](stockdash_api::SleepStatus) JSON document. The
//! Twitch app-access token is cached across requests inside
//! [`ProxyState`].

pub mod error;
pub mod handler;
pub mod state;

use axum::Router;
use tower_http::trace::TraceLayer;

pub use error::ProxyError;
pub use state::ProxyState;

/// Build the service. All routes fall through to the status handler.
pub fn router(state: ProxyState) -> Router {
    Router::new()
        .fallback(handler::sleep_status)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

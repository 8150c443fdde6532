// Status handler
//
// 200 with the status document and a one-minute public cache, or 502 with
// `{ "error": ... }` and caching disabled. CORS is open on both.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::{ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::{debug, warn};

use crate::state::ProxyState;

pub const CACHE_OK: &str = "public, max-age=60";
pub const CACHE_ERROR: &str = "no-store";

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

pub async fn sleep_status(State(state): State<ProxyState>) -> Response {
    match state
        .lookup()
        .sleep_status(state.channel(), state.sleep_game())
        .await
    {
        Ok(status) => {
            debug!(
                channel = state.channel(),
                live = status.live,
                sleeping = status.is_sleeping,
                "stream status resolved"
            );
            (
                StatusCode::OK,
                [(CACHE_CONTROL, CACHE_OK), (ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
                Json(status),
            )
                .into_response()
        }
        Err(e) => {
            warn!(error = %e, channel = state.channel(), "stream lookup failed");
            (
                StatusCode::BAD_GATEWAY,
                [(CACHE_CONTROL, CACHE_ERROR), (ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
                Json(ErrorBody {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

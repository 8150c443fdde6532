#![allow(clippy::unwrap_used)]
// Router tests: a wiremock Twitch upstream behind the axum service,
// driven in-process with `tower::ServiceExt::oneshot`.

use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stockdash_api::{HelixConfig, StreamLookup};
use stockdash_proxy::{ProxyState, router};

const CHANNEL: &str = "vedal987";
const SLEEP_GAME: &str = "I'm Only Sleeping";

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, axum::Router) {
    let server = MockServer::start().await;
    let helix = HelixConfig {
        client_id: "cid".into(),
        client_secret: SecretString::from("shh"),
        token_url: Url::parse(&format!("{}/oauth2/token", server.uri())).unwrap(),
        api_base: Url::parse(&format!("{}/helix/", server.uri())).unwrap(),
    };
    let lookup = StreamLookup::with_client(reqwest::Client::new(), &helix).unwrap();
    let app = router(ProxyState::new(lookup, CHANNEL.into(), SLEEP_GAME.into()));
    (server, app)
}

async fn mount_token(server: &MockServer, times: u64) {
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok", "expires_in": 3600, "token_type": "bearer"
        })))
        .expect(times)
        .mount(server)
        .await;
}

async fn mount_streams(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/helix/streams"))
        .and(query_param("user_login", CHANNEL))
        .respond_with(template)
        .mount(server)
        .await;
}

async fn call(app: axum::Router, method: Method, uri: &str) -> (StatusCode, axum::http::HeaderMap, Value) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, headers, serde_json::from_slice(&bytes).unwrap())
}

// ── Success ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_sleeping_stream_reports_true() {
    let (server, app) = setup().await;
    mount_token(&server, 1).await;
    mount_streams(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "type": "live", "game_name": SLEEP_GAME, "title": "zzz" }]
        })),
    )
    .await;

    let (status, headers, body) = call(app, Method::GET, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(headers[header::CACHE_CONTROL], "public, max-age=60");
    assert_eq!(
        body,
        json!({ "isSleeping": true, "live": true, "game_name": SLEEP_GAME, "title": "zzz" })
    );
}

#[tokio::test]
async fn test_offline_channel_reports_false() {
    let (server, app) = setup().await;
    mount_token(&server, 1).await;
    mount_streams(&server, ResponseTemplate::new(200).set_body_json(json!({ "data": [] }))).await;

    let (status, _, body) = call(app, Method::GET, "/status?t=123").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isSleeping"], json!(false));
    assert_eq!(body["live"], json!(false));
}

#[tokio::test]
async fn test_any_method_and_path_is_served() {
    let (server, app) = setup().await;
    mount_token(&server, 1).await;
    mount_streams(&server, ResponseTemplate::new(200).set_body_json(json!({ "data": [] }))).await;

    let (first, _, _) = call(app.clone(), Method::POST, "/deeply/nested/path").await;
    let (second, _, _) = call(app, Method::OPTIONS, "/").await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::OK);
}

// ── Failure ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_upstream_failure_is_bad_gateway() {
    let (server, app) = setup().await;
    mount_token(&server, 1).await;
    mount_streams(&server, ResponseTemplate::new(500)).await;

    let (status, headers, body) = call(app, Method::GET, "/").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(headers[header::CACHE_CONTROL], "no-store");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(body, json!({ "error": "Streams HTTP 500" }));
}

#[tokio::test]
async fn test_token_failure_is_bad_gateway() {
    let (server, app) = setup().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let (status, _, body) = call(app, Method::GET, "/").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body, json!({ "error": "Authentication failed: Token HTTP 401" }));
}

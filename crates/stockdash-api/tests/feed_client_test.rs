#![allow(clippy::unwrap_used)]
// Integration tests for `FeedClient` and `SleepProxyClient` using wiremock.

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{header, method, path, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stockdash_api::{Error, FeedClient, SleepProxyClient, SleepStatus, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn feed_setup() -> (MockServer, FeedClient) {
    let server = MockServer::start().await;
    let url = Url::parse(&format!("{}/portfolio.json", server.uri())).unwrap();
    let client = FeedClient::new(url, &TransportConfig::default()).unwrap();
    (server, client)
}

fn sample_feed() -> serde_json::Value {
    json!({
        "account": { "equity": "20500.25", "cash": 1200, "originalInvestment": 20000 },
        "history": [
            { "timestamp": 1_700_000_000, "equity": 20000 },
            { "timestamp": "2023-11-14T22:43:20Z", "equity": "20500.25",
              "change": 500.25, "changePercent": 0.0250125 }
        ],
        "positions": [{
            "symbol": "NVDA", "qty": "3", "marketValue": "1500.00", "costBasis": "1400",
            "currentPrice": "500", "lastdayPrice": "490", "changeToday": null
        }],
        "activities": {
            "grp-1": [{ "side": "buy", "qty": "3", "symbol": "NVDA", "price": "466.67",
                        "transaction_time": "2023-11-14T15:00:00Z" }]
        }
    })
}

// ── Feed tests ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_parses_document() {
    let (server, client) = feed_setup().await;

    Mock::given(method("GET"))
        .and(path("/portfolio.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_feed()))
        .expect(1)
        .mount(&server)
        .await;

    let feed = client.fetch().await.unwrap();
    assert_eq!(feed.history.len(), 2);
    assert_eq!(feed.positions[0].symbol, "NVDA");
    assert!(feed.positions[0].change_today.is_none());
    assert_eq!(feed.activities["grp-1"].len(), 1);
    assert!((feed.account.equity.as_ref().unwrap().value() - 20500.25).abs() < 1e-9);
}

#[tokio::test]
async fn test_fetch_sends_cache_busting_request() {
    let (server, client) = feed_setup().await;

    Mock::given(method("GET"))
        .and(path("/portfolio.json"))
        .and(header("cache-control", "no-cache"))
        .and(header("pragma", "no-cache"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    client.fetch().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let stamp = requests[0]
        .url
        .query_pairs()
        .find(|(k, _)| k == "t")
        .map(|(_, v)| v.into_owned())
        .expect("cache buster present");
    assert!(stamp.parse::<i64>().unwrap() > 1_600_000_000_000);
}

#[tokio::test]
async fn test_fetch_non_success_status() {
    let (server, client) = feed_setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client.fetch().await.unwrap_err();
    assert!(
        matches!(err, Error::Http { status: 503, .. }),
        "expected HTTP 503, got: {err:?}"
    );
    assert_eq!(err.to_string(), "Feed HTTP 503");
}

#[tokio::test]
async fn test_fetch_non_json_body() {
    let (server, client) = feed_setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>rate limited</html>"))
        .mount(&server)
        .await;

    let err = client.fetch().await.unwrap_err();
    let Error::Deserialization { message, body } = err else {
        panic!("expected deserialization error, got: {err:?}");
    };
    assert!(message.contains("<html>rate limited</html>"));
    assert_eq!(body, "<html>rate limited</html>");
}

// ── Sleep proxy tests ───────────────────────────────────────────────

#[tokio::test]
async fn test_sleep_proxy_status() {
    let server = MockServer::start().await;
    let client = SleepProxyClient::new(
        Url::parse(&server.uri()).unwrap(),
        &TransportConfig::default(),
    )
    .unwrap();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "isSleeping": true, "live": true,
            "game_name": "I'm Only Sleeping", "title": "goodnight"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let status = client.fetch_status().await.unwrap();
    assert_eq!(
        status,
        SleepStatus {
            is_sleeping: true,
            live: true,
            game_name: "I'm Only Sleeping".into(),
            title: "goodnight".into(),
        }
    );
}

#[tokio::test]
async fn test_sleep_proxy_error_status() {
    let server = MockServer::start().await;
    let client = SleepProxyClient::with_client(
        reqwest::Client::new(),
        Url::parse(&server.uri()).unwrap(),
    );

    Mock::given(method("GET"))
        .and(query_param_is_missing("channel"))
        .respond_with(ResponseTemplate::new(502).set_body_json(json!({ "error": "boom" })))
        .mount(&server)
        .await;

    let err = client.fetch_status().await.unwrap_err();
    assert_eq!(err.to_string(), "Twitch proxy HTTP 502");
}

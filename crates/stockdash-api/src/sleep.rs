// Sleep-status payload and the dashboard-side proxy client.
//
// `SleepStatus` is the fixed-shape document the proxy serves and the
// dashboard consumes, so both sides share this one definition.

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::cache_bust;
use crate::error::Error;
use crate::transport::TransportConfig;

/// Broadcaster status as reported by the sleep-status proxy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepStatus {
    /// Live and categorized under the configured sleep game.
    #[serde(rename = "isSleeping", default)]
    pub is_sleeping: bool,
    #[serde(default)]
    pub live: bool,
    #[serde(default)]
    pub game_name: String,
    #[serde(default)]
    pub title: String,
}

/// HTTP client for the sleep-status proxy.
#[derive(Debug, Clone)]
pub struct SleepProxyClient {
    http: reqwest::Client,
    url: Url,
}

impl SleepProxyClient {
    pub fn new(url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_uncached_client()?;
        Ok(Self { http, url })
    }

    pub fn with_client(http: reqwest::Client, url: Url) -> Self {
        Self { http, url }
    }

    /// Query the proxy once. Non-success statuses and non-JSON bodies are
    /// returned as errors; nothing is swallowed here.
    pub async fn fetch_status(&self) -> Result<SleepStatus, Error> {
        let url = cache_bust::now(&self.url);
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                context: "Twitch proxy",
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        serde_json::from_str(&body).map_err(|e| Error::from_body(&e, &body))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::SleepStatus;
    use serde_json::json;

    #[test]
    fn serializes_with_camel_case_flag() {
        let status = SleepStatus {
            is_sleeping: true,
            live: true,
            game_name: "I'm Only Sleeping".into(),
            title: "zzz".into(),
        };
        assert_eq!(
            serde_json::to_value(&status).unwrap(),
            json!({
                "isSleeping": true,
                "live": true,
                "game_name": "I'm Only Sleeping",
                "title": "zzz"
            })
        );
    }

    #[test]
    fn missing_fields_default_to_not_sleeping() {
        let status: SleepStatus = serde_json::from_value(json!({})).unwrap();
        assert_eq!(status, SleepStatus::default());
    }
}

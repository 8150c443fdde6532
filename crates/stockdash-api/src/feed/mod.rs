// Portfolio feed client
//
// One GET per refresh cycle. Every request is cache-busted and sent with
// no-cache headers; the body is read as text first so parse failures can
// report what the upstream actually returned.

pub mod types;

use tracing::debug;
use url::Url;

use crate::cache_bust;
use crate::error::Error;
use crate::transport::TransportConfig;

use self::types::PortfolioFeed;

/// HTTP client for the portfolio JSON feed.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    url: Url,
}

impl FeedClient {
    /// Create a feed client with its own no-cache `reqwest::Client`.
    pub fn new(url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_uncached_client()?;
        Ok(Self { http, url })
    }

    /// Create a feed client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, url: Url) -> Self {
        Self { http, url }
    }

    /// Fetch and parse the current portfolio document.
    pub async fn fetch(&self) -> Result<PortfolioFeed, Error> {
        let url = cache_bust::now(&self.url);
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                context: "Feed",
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        serde_json::from_str(&body).map_err(|e| Error::from_body(&e, &body))
    }
}
